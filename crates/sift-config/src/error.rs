use std::num::ParseIntError;

use validator::ValidationErrors;

/// Error type for configuration loading and validation.
///
/// Configuration errors are never retried: they describe a deployment
/// problem that only an operator can fix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("database configuration cannot be empty")]
    MissingConfig,

    #[error("{key} environment variable is required")]
    MissingVar { key: &'static str },

    #[error("invalid port number: {value:?}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid SSL mode: {value:?} (expected disable, require, verify-ca or verify-full)")]
    InvalidSslMode { value: String },

    #[error("invalid database configuration: {0}")]
    Invalid(String),
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Invalid(format_errors(&errors))
    }
}

/// Flattens validation errors into one message, ordered by field name so
/// the output is stable.
fn format_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}
