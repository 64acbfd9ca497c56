use super::transforms;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// A named text transform: one extracted string in, zero or more out
pub type HookFn = fn(&str) -> Vec<String>;

static HOOKS: Lazy<BTreeMap<&'static str, HookFn>> = Lazy::new(|| {
    let mut hooks: BTreeMap<&'static str, HookFn> = BTreeMap::new();
    hooks.insert("tokenize", transforms::tokenize);
    hooks.insert("quote", transforms::quote);
    hooks.insert("lines", transforms::lines);
    transforms::warm_up();
    hooks
});

/// Look up a hook by name
pub fn lookup(name: &str) -> Option<HookFn> {
    HOOKS.get(name).copied()
}

/// Whether `name` refers to a registered hook
pub fn is_known(name: &str) -> bool {
    HOOKS.contains_key(name)
}

/// Registered hook names in sorted order
pub fn names() -> Vec<&'static str> {
    HOOKS.keys().copied().collect()
}

/// Apply the named hook, or pass `text` through when the name is absent or unknown
pub fn apply(name: Option<&str>, text: &str) -> Vec<String> {
    match name.and_then(lookup) {
        Some(hook) => hook(text),
        None => vec![text.to_string()],
    }
}
