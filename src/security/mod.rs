mod name;

#[cfg(test)]
mod name_tests;

pub use name::KeySanitizer;
