use std::borrow::Cow;

/// Escape the five HTML-significant characters `& ' < > "`.
///
/// Returns the input unchanged (borrowed) when nothing needs escaping.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    let first = match s.find(|c: char| matches!(c, '&' | '\'' | '<' | '>' | '"')) {
        Some(i) => i,
        None => return Cow::Borrowed(s),
    };

    let mut out = String::with_capacity(s.len() + 16);
    out.push_str(&s[..first]);
    for c in s[first..].chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
