//! LRC helpers
//!
//! Embedded tags and the online service both hand out lyrics that may be in
//! LRC form:
//! [ti:Title]
//! [00:12.34] Hello world
//! [00:15.00][01:02.50] Chorus line

/// Parse timestamp string like "00:12.34" or "00:12:34" to milliseconds
fn parse_timestamp(s: &str) -> Option<u64> {
    let parts: Vec<&str> = s.split([':', '.']).collect();

    let (min, sec, frac) = match parts.as_slice() {
        [m, s] => (m, s, None),
        [m, s, f] => (m, s, Some(*f)),
        _ => return None,
    };
    let min: u64 = min.parse().ok()?;
    let sec: u64 = sec.parse().ok()?;
    if sec >= 60 {
        return None;
    }
    // "3" tenths, "34" centiseconds, "340" milliseconds
    let ms: u64 = match frac {
        None => 0,
        Some(f) if f.len() == 1 => f.parse::<u64>().ok()? * 100,
        Some(f) if f.len() == 2 => f.parse::<u64>().ok()? * 10,
        Some(f) if f.len() == 3 => f.parse().ok()?,
        Some(_) => return None,
    };
    Some(min * 60_000 + sec * 1000 + ms)
}

/// Split leading `[mm:ss.xx]` stamps off a line.
fn split_timestamps(line: &str) -> Option<(Vec<u64>, &str)> {
    let mut stamps = Vec::new();
    let mut rest = line;
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(end) = inner.find(']') else { break };
        let Some(ms) = parse_timestamp(&inner[..end]) else { break };
        stamps.push(ms);
        rest = &inner[end + 1..];
    }
    if stamps.is_empty() {
        None
    } else {
        Some((stamps, rest.trim()))
    }
}

/// `[ti:Title]`, `[ar:Artist]`, `[offset:+200]` and friends.
fn is_metadata(line: &str) -> bool {
    let Some(inner) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) else {
        return false;
    };
    match inner.split_once(':') {
        Some((tag, _)) => !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphabetic()),
        None => false,
    }
}

/// Whether any line carries a playback timestamp.
pub fn is_synced(text: &str) -> bool {
    text.lines().any(|l| split_timestamps(l.trim()).is_some())
}

/// Lyrics as plain text: timestamps and metadata tags removed, line order
/// kept. Text that is not LRC comes back unchanged apart from trailing
/// whitespace.
pub fn strip_timestamps(text: &str) -> String {
    let mut out = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if is_metadata(trimmed) {
            continue;
        }
        match split_timestamps(trimmed) {
            Some((_, rest)) => out.push(rest),
            None => out.push(line.trim_end()),
        }
    }
    out.join("\n")
}
