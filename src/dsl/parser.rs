use super::{PathSegment, RuleSpec, SegmentKind, HOOK_SEPARATOR, SEGMENT_SEPARATOR, TYPE_SEPARATOR};
use crate::error::HarvestError;

/// Parse a rule spec of the form `<recordType>@<pathExpr>[#<hookName>]`
///
/// The spec is split at the first `@`, and the remainder at the first `#`.
/// An empty hook name (`type@path#`) is the same as no hook.
///
/// # Errors
/// Fails when the `@` separator is missing, the record type is empty, or any
/// path segment has an empty key.
pub fn parse(spec: &str) -> Result<RuleSpec, HarvestError> {
    let (record_type, tail) = spec
        .split_once(TYPE_SEPARATOR)
        .ok_or_else(|| HarvestError::invalid_spec(spec, "missing `@` separator"))?;

    if record_type.is_empty() {
        return Err(HarvestError::invalid_spec(spec, "empty record type"));
    }

    let (path_expr, hook) = match tail.split_once(HOOK_SEPARATOR) {
        Some((path_expr, hook)) if !hook.is_empty() => (path_expr, Some(hook.to_string())),
        Some((path_expr, _)) => (path_expr, None),
        None => (tail, None),
    };

    let path = parse_path(path_expr).map_err(|reason| HarvestError::invalid_spec(spec, reason))?;

    Ok(RuleSpec {
        record_type: record_type.to_string(),
        path,
        hook,
    })
}

/// Parse a dotted path expression such as `spellset[].spells[].letter`
///
/// Returns a human readable reason on failure; [`parse`] wraps it into a
/// [`HarvestError::InvalidSpec`].
pub fn parse_path(path_expr: &str) -> Result<Vec<PathSegment>, String> {
    path_expr
        .split(SEGMENT_SEPARATOR)
        .enumerate()
        .map(|(index, raw)| {
            let segment = parse_segment(raw);
            if segment.key.is_empty() {
                Err(format!("empty key in path segment {} (`{}`)", index + 1, raw))
            } else {
                Ok(segment)
            }
        })
        .collect()
}

fn parse_segment(raw: &str) -> PathSegment {
    for kind in [SegmentKind::Map, SegmentKind::Array] {
        if let Some(key) = raw.strip_suffix(kind.suffix()) {
            return PathSegment {
                key: key.to_string(),
                kind,
            };
        }
    }
    PathSegment::field(raw)
}
