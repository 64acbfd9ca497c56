use once_cell::sync::Lazy;
use regex::Regex;

/// Inline markup such as `<white>` or `</lightred>`
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[a-z]+>").unwrap());

/// Quoted block: underscore rule, blank line, then a tagged line
static QUOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)_{10,}\n\n<.+?>(.+?)\n<.+?>").unwrap());

/// Split text on inline tags, trimming each piece and dropping empty ones
pub fn tokenize(text: &str) -> Vec<String> {
    TAG_RE
        .split(text)
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pull the quoted line out of a description body
///
/// Returns the captured text of the first match, or nothing when the body
/// has no quote block.
pub fn quote(text: &str) -> Vec<String> {
    QUOTE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| vec![m.as_str().to_string()])
        .unwrap_or_default()
}

/// Split on `\n`, keeping empty lines
pub fn lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

/// Force the lazily compiled patterns
pub(crate) fn warm_up() {
    Lazy::force(&TAG_RE);
    Lazy::force(&QUOTE_RE);
}
