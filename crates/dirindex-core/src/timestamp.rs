use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

/// Human-facing form: `2020-12-31 23:59:59.5 +0000 UTC`
pub fn markup_time(t: SystemTime) -> String {
    let dt = to_utc(t);
    let mut out = with_fraction(&dt, "%Y-%m-%d %H:%M:%S");
    out.push_str(" +0000 UTC");
    out
}

/// RFC 3339 in UTC, fractional seconds without trailing zeros: `2020-12-31T23:59:59.5Z`
pub fn rfc3339_time(t: SystemTime) -> String {
    let dt = to_utc(t);
    let mut out = with_fraction(&dt, "%Y-%m-%dT%H:%M:%S");
    out.push('Z');
    out
}

/// Convert to UTC, clamping times outside chrono's range to its bounds.
pub fn to_utc(t: SystemTime) -> DateTime<Utc> {
    let converted = match t.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_secs())
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, d.subsec_nanos())),
        Err(e) => {
            // before the epoch: borrow a second for a non-zero fraction
            let d = e.duration();
            let (carry, nanos) = match d.subsec_nanos() {
                0 => (0, 0),
                n => (1, 1_000_000_000 - n),
            };
            i64::try_from(d.as_secs())
                .ok()
                .and_then(|secs| DateTime::<Utc>::from_timestamp(-secs - carry, nanos))
        }
    };

    converted.unwrap_or(if t >= UNIX_EPOCH {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    })
}

fn with_fraction(dt: &DateTime<Utc>, pattern: &str) -> String {
    let mut out = dt.format(pattern).to_string();
    let nanos = dt.timestamp_subsec_nanos() % 1_000_000_000;
    if nanos > 0 {
        let digits = format!("{:09}", nanos);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}
