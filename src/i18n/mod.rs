//! Locales known to the tools.
//!
//! - `registry`: the supported locales and their metadata
//! - `locale`: the validated `Locale` type used as JSON key and provider target

mod locale;
mod registry;

pub use locale::Locale;
pub use registry::{LocaleConfig, LocaleRegistry};
