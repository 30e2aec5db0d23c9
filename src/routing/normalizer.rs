//! Route key normalization.

/// Canonical lookup key for a raw route path under a global prefix.
///
/// Ensures a leading slash, then prepends `prefix` (when non-empty) and
/// ensures the leading slash again, since the prefix may omit it.
pub fn normalize(path: &str, prefix: &str) -> String {
    let mut key = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    if !prefix.is_empty() {
        key = format!("{}{}", prefix, key);
        if !key.starts_with('/') {
            key.insert(0, '/');
        }
    }

    key
}
