//! Caller-path capture for wrap points

/// Number of trailing path segments kept in a caller path (`module::function`).
const KEPT_SEGMENTS: usize = 2;

const CLOSURE_SEGMENT: &str = "{{closure}}";

/// Reduce the type name of a marker item to the path of the function that
/// declares it.
///
/// `raw` is the `std::any::type_name` of a zero-sized fn item declared inside
/// the calling function, so its last segment is the marker itself and is
/// dropped. Closure segments are dropped as well, and only the last two
/// remaining segments are kept:
///
/// ```rust
/// use errtrail::caller::function_path;
///
/// assert_eq!(function_path("app::orders::service::create::__here"), "service::create");
/// assert_eq!(function_path("app::run::{{closure}}::__here"), "app::run");
/// ```
pub fn function_path(raw: &str) -> String {
    let mut segments = split_segments(raw);
    segments.pop();
    segments.retain(|segment| *segment != CLOSURE_SEGMENT);

    let start = segments.len().saturating_sub(KEPT_SEGMENTS);
    segments[start..]
        .iter()
        .map(|segment| shorten_qualified(segment))
        .collect::<Vec<_>>()
        .join("::")
}

/// Trim the paths inside a qualified segment to their last segment:
/// `<app::db::Repo as app::db::Store>` becomes `<Repo as Store>`.
fn shorten_qualified(segment: &str) -> String {
    let Some(inner) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) else {
        return segment.to_string();
    };

    let last = |path: &str| split_segments(path).pop().unwrap_or(path).to_string();
    match inner.split_once(" as ") {
        Some((ty, tr)) => format!("<{} as {}>", last(ty), last(tr)),
        None => format!("<{}>", last(inner)),
    }
}

/// Split a type path on `::`, ignoring separators nested inside `<...>`
/// (qualified paths such as `<app::Repo as app::Store>::load`).
fn split_segments(raw: &str) -> Vec<&str> {
    let bytes = raw.as_bytes();
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            // `->` inside fn pointer types is not a closing bracket
            b'>' if i == 0 || bytes[i - 1] != b'-' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                segments.push(&raw[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    segments.push(&raw[start..]);

    segments
}
