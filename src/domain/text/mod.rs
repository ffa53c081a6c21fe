pub mod sanitizer;

pub use sanitizer::{derive_identifier_fragment, strip_markup, DEFAULT_FALLBACK_FRAGMENT};
