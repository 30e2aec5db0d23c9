//! Ant-style path pattern matching.
//!
//! - `**` matches zero or more path segments
//! - `*` matches any run of characters within one segment
//! - `?` matches exactly one character
//! - A trailing slash must agree between pattern and path, unless the
//!   pattern ends in `**` (or in `*` and the path names the bare directory)
//!
//! No regex, so matching cost stays linear in practice.

/// Returns true if `path` matches `pattern`.
pub fn matches(pattern: &str, path: &str) -> bool {
    if pattern.starts_with('/') != path.starts_with('/') {
        return false;
    }
    let parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if !match_segments(&parts, &segments) {
        // `/dir/*` also accepts `/dir/`.
        return path.ends_with('/')
            && parts.last() == Some(&"*")
            && match_segments(&parts[..parts.len() - 1], &segments);
    }
    parts.last() == Some(&"**") || pattern.ends_with('/') == path.ends_with('/')
}

fn match_segments(pattern: &[&str], segments: &[&str]) -> bool {
    match pattern.split_first() {
        None => segments.is_empty(),
        Some((&"**", rest)) => (0..=segments.len()).any(|skip| match_segments(rest, &segments[skip..])),
        Some((head, rest)) => match segments.split_first() {
            Some((segment, remaining)) => {
                match_segment(head, segment) && match_segments(rest, remaining)
            }
            None => false,
        },
    }
}

fn match_segment(pattern: &str, segment: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let s: Vec<char> = segment.chars().collect();

    let (mut pi, mut si) = (0, 0);
    let mut star: Option<usize> = None;
    let mut mark = 0;

    while si < s.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == s[si]) {
            pi += 1;
            si += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some(pi);
            mark = si;
            pi += 1;
        } else if let Some(star_at) = star {
            pi = star_at + 1;
            mark += 1;
            si = mark;
        } else {
            return false;
        }
    }

    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}
