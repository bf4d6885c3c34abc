//! Crate error type.

use std::path::PathBuf;

use crate::validation::ValidationError;

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Fatal errors. Each one aborts the instance being processed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("required input '{}' is missing", .path.display())]
    MissingInput { path: PathBuf },

    #[error("instance is malformed: {}", summarize(.0))]
    MalformedEntity(Vec<ValidationError>),

    #[error("failed to access '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize '{}'", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn summarize(errors: &[ValidationError]) -> String {
    match errors {
        [] => "no details".to_owned(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!("{} (and {} more)", first.message, rest.len()),
    }
}

impl From<Vec<ValidationError>> for Error {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::MalformedEntity(errors)
    }
}
