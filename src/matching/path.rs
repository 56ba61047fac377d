//! Path normalization shared by the candidate index and the matcher.

/// Instance marker appended to cloned objects, compared case-insensitively.
const INSTANCE_MARKER: &str = "(instance)";

/// Separator used for persisted relative paths.
pub const PATH_SEPARATOR: char = '/';

/// Case-folds a segment after stripping trailing `(Instance)` markers and
/// numeric disambiguation suffixes (`_3`, `-2`, `.4`).
///
/// Suffixes are stripped repeatedly, so `normalize_segment` is idempotent.
pub fn normalize_segment(segment: &str) -> String {
    let mut current = segment.trim();
    loop {
        let stripped = strip_instance_marker(current);
        let stripped = strip_numeric_suffix(stripped);
        if stripped.len() == current.len() {
            break;
        }
        current = stripped;
    }
    current.to_lowercase()
}

/// Normalized key of `segments` with the leading root segment removed.
pub fn normalized_key<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .skip(1)
        .map(|segment| normalize_segment(segment.as_ref()))
        .collect::<Vec<_>>()
        .join("/")
}

/// Normalized key of a persisted `a/b/c` path, root segment removed.
///
/// The first segment is positional: a root that normalized to `""` still
/// occupies it.
pub fn normalized_key_from_str(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    normalized_key(&segments)
}

/// Persisted form of a path: every segment normalized, root kept.
pub fn persisted_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|segment| normalize_segment(segment.as_ref()))
        .collect::<Vec<_>>()
        .join("/")
}

fn strip_instance_marker(segment: &str) -> &str {
    let len = segment.len();
    if len >= INSTANCE_MARKER.len()
        && segment.is_char_boundary(len - INSTANCE_MARKER.len())
        && segment[len - INSTANCE_MARKER.len()..].eq_ignore_ascii_case(INSTANCE_MARKER)
    {
        segment[..len - INSTANCE_MARKER.len()].trim_end()
    } else {
        segment
    }
}

fn strip_numeric_suffix(segment: &str) -> &str {
    let without_digits = segment.trim_end_matches(|c: char| c.is_ascii_digit());
    if without_digits.len() == segment.len() {
        return segment;
    }
    match without_digits.chars().last() {
        Some(separator @ ('_' | '-' | '.')) => {
            let base = &without_digits[..without_digits.len() - separator.len_utf8()];
            // A bare "_3" is a name, not a suffix.
            if base.trim_end().is_empty() {
                segment
            } else {
                base.trim_end()
            }
        }
        _ => segment,
    }
}
