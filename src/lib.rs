//! Tools for the multilingual XML form data:
//!
//! - `strip`: blank the text of selected elements (`strip-fields`)
//! - `labels`: translate every `label` into the target locales (`translate-labels`)
//! - `options`: turn per-locale checkbox/dropdown definitions into JSON (`convert-options`)

pub mod config;
pub mod document;
pub mod error;
pub mod i18n;
pub mod labels;
pub mod options;
pub mod provider;
pub mod strip;
pub mod table;

pub use error::Error;
