use std::path::PathBuf;
use thiserror::Error;

use crate::provider::ProviderError;

/// Fatal failures of the strip, translate and convert passes.
///
/// None of them is recovered from: every utility aborts on the first error
/// and writes no output.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed XML in {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("{locale}: <{element}> entry #{position} has no <{field}> child")]
    MissingField {
        locale: String,
        element: String,
        position: usize,
        field: String,
    },

    #[error("Translation of \"{label}\" to {locale} failed: {source}")]
    Provider {
        locale: String,
        label: String,
        #[source]
        source: ProviderError,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to overwrite the input document {}", .0.display())]
    OverwriteInput(PathBuf),

    #[error("Unknown locale code: '{0}'")]
    UnknownLocale(String),

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_names_everything() {
        let err = Error::MissingField {
            locale: "de".to_string(),
            element: "checkbox".to_string(),
            position: 3,
            field: "value".to_string(),
        };
        assert_eq!(err.to_string(), "de: <checkbox> entry #3 has no <value> child");
    }

    #[test]
    fn test_io_error_includes_path() {
        let err = Error::io(
            "XML/data_en.xml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        let message = err.to_string();
        assert!(message.contains("XML/data_en.xml"));
        assert!(message.contains("not found"));
    }

    #[test]
    fn test_overwrite_input_message() {
        let err = Error::OverwriteInput(PathBuf::from("data_en.xml"));
        assert!(err.to_string().contains("data_en.xml"));
    }
}
