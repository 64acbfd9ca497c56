pub mod catalog;
mod rule;


pub use catalog::{read_spec_file, BUILTIN_SPECS};
pub use rule::{Rule, DISCRIMINATOR};

use crate::error::HarvestError;
use std::collections::HashMap;
use tracing::warn;

/// Immutable set of rules, built once before any processing starts
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile every spec, failing on the first malformed one
    ///
    /// Also rejects duplicate keys and keys that would share an output file.
    pub fn from_specs<I, S>(specs: I) -> Result<Self, HarvestError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Vec::new();
        let mut stems: HashMap<String, String> = HashMap::new();

        for spec in specs {
            let rule = Rule::parse(spec.as_ref())?;

            if let Some(existing) = stems.get(&rule.file_stem) {
                if *existing == rule.key {
                    return Err(HarvestError::DuplicateRule(rule.key));
                }
                return Err(HarvestError::KeyCollision {
                    first: existing.clone(),
                    second: rule.key,
                    stem: rule.file_stem,
                });
            }

            if !rule.hook_is_known() {
                warn!(
                    rule = %rule.key,
                    hook = rule.hook.as_deref().unwrap_or_default(),
                    "Unknown hook, values will pass through unchanged"
                );
            }

            stems.insert(rule.file_stem.clone(), rule.key.clone());
            rules.push(rule);
        }

        Ok(Self { rules })
    }

    /// The built-in catalog
    pub fn builtin() -> Result<Self, HarvestError> {
        Self::from_specs(BUILTIN_SPECS)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.key == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
