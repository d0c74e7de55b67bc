//! Error handling for the PS-Lab crate
//!
//! Library code reports failures through [`PsLabError`]; the binaries wrap
//! it in `anyhow` for context. Filtering itself never fails.

use thiserror::Error;

/// Main error type for loading and visualizing hierarchies
#[derive(Error, Debug)]
pub enum PsLabError {
    #[error("No hierarchy data returned.")]
    MissingHierarchy,

    #[error("Data load failed: {0}")]
    Load(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ps_lab_graph::ConfigError),
}

/// Result type alias for PS-Lab operations
pub type PsLabResult<T> = Result<T, PsLabError>;

/// Join error messages into one user-facing line.
///
/// Empty messages read as "Unknown error"; an empty input yields the same.
pub fn reduce_errors<I, E>(errors: I) -> String
where
    I: IntoIterator<Item = E>,
    E: std::fmt::Display,
{
    let messages: Vec<String> = errors
        .into_iter()
        .map(|error| {
            let message = error.to_string();
            if message.trim().is_empty() {
                "Unknown error".to_string()
            } else {
                message
            }
        })
        .collect();

    if messages.is_empty() {
        "Unknown error".to_string()
    } else {
        messages.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_errors_joins_messages() {
        let joined = reduce_errors(["first", "second"]);
        assert_eq!(joined, "first, second");
    }

    #[test]
    fn test_reduce_errors_unknown_for_empty_message() {
        assert_eq!(reduce_errors(["", "boom"]), "Unknown error, boom");
        assert_eq!(reduce_errors(Vec::<String>::new()), "Unknown error");
    }

    #[test]
    fn test_reduce_errors_accepts_error_values() {
        let errors = vec![PsLabError::MissingHierarchy];
        assert_eq!(reduce_errors(&errors), "No hierarchy data returned.");
    }
}
