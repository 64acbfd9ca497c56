mod registry;
mod transforms;

#[cfg(test)]
mod tests;

pub use registry::{apply, is_known, lookup, names, HookFn};
pub use transforms::{lines, quote, tokenize};
