use crate::collector;
use crate::dsl::{self, PathSegment};
use crate::error::HarvestError;
use crate::hooks;
use crate::security::KeySanitizer;
use serde::Serialize;
use serde_json::Value;

/// Record field holding the message type
pub const DISCRIMINATOR: &str = "msg";

/// A compiled extraction rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// The DSL string this rule was built from; unique within a rule set
    pub key: String,
    /// Filesystem-safe form of `key`, used for sink and output file names
    pub file_stem: String,
    pub record_type: String,
    pub path: Vec<PathSegment>,
    pub hook: Option<String>,
}

impl Rule {
    /// Compile a single DSL string
    pub fn parse(spec: &str) -> Result<Self, HarvestError> {
        let parsed = dsl::parse(spec)?;
        Ok(Self {
            key: spec.to_string(),
            file_stem: KeySanitizer::sanitize(spec)?,
            record_type: parsed.record_type,
            path: parsed.path,
            hook: parsed.hook,
        })
    }

    /// Whether the hook (if any) names a registered transform
    pub fn hook_is_known(&self) -> bool {
        self.hook.as_deref().map_or(true, hooks::is_known)
    }

    /// True if the record has this rule's type and the path reaches at least one leaf
    pub fn matches(&self, record: &Value) -> bool {
        record.get(DISCRIMINATOR).and_then(Value::as_str) == Some(self.record_type.as_str())
            && collector::reaches_any(record, &self.path)
    }

    /// Collect the string leaves under the path and run each through the hook
    ///
    /// Non-string leaves are dropped here. Output keeps leaf order.
    pub fn extract(&self, record: &Value) -> Vec<String> {
        collector::collect(record, &self.path)
            .into_iter()
            .filter_map(Value::as_str)
            .flat_map(|text| hooks::apply(self.hook.as_deref(), text))
            .collect()
    }
}
