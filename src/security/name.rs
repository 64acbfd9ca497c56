use crate::error::HarvestError;

pub struct KeySanitizer;

impl KeySanitizer {
    /// Turn a rule key into a file stem that is safe on every common filesystem.
    ///
    /// Rule keys are DSL strings such as `ui-push@body#quote`; characters that
    /// Windows or POSIX reject in file names (`< > : " / \ | ? *`) and control
    /// characters are replaced with `_`. Everything else, including `@`, `#`
    /// and `[]`, is kept so the stem still reads like the rule it came from.
    pub fn sanitize(key: &str) -> Result<String, HarvestError> {
        Self::sanitize_with_replacement(key, '_')
    }

    /// Sanitize with a custom replacement character
    pub fn sanitize_with_replacement(key: &str, replacement: char) -> Result<String, HarvestError> {
        if key.is_empty() {
            return Err(HarvestError::InvalidKey("Empty key".to_string()));
        }
        if Self::is_forbidden(replacement) {
            return Err(HarvestError::InvalidKey(format!(
                "Replacement character {:?} is not allowed in file names",
                replacement
            )));
        }

        let stem: String = key
            .chars()
            .map(|c| if Self::is_forbidden(c) { replacement } else { c })
            .collect();

        // "." and ".." would resolve to directories once joined
        if stem.chars().all(|c| c == '.') {
            return Err(HarvestError::InvalidKey(format!(
                "Key resolves to a directory name: {}",
                key
            )));
        }

        Ok(stem)
    }

    fn is_forbidden(c: char) -> bool {
        matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c.is_control()
    }
}
