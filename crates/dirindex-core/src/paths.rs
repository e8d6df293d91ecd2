/// Lexically clean a slash-separated path.
///
/// Collapses repeated separators, drops `.` segments, resolves `..` against
/// the preceding segment and removes any trailing slash. A rooted path
/// never climbs above `/`. An empty result becomes `/` for rooted paths and
/// `.` otherwise.
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            _ => segments.push(segment),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Link target for a directory member: `base` and `name` joined by exactly
/// one separator, then cleaned.
pub fn join_display_path(base: &str, name: &str) -> String {
    clean_path(&format!("{}/{}", base, name))
}

/// Suffix of `name` starting at its last `.`, or `""` when there is none.
pub fn file_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) => &name[i..],
        None => "",
    }
}
