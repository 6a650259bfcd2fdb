use thiserror::Error;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: field '{field}': {message}")]
    Config { field: String, message: String },
}

impl KnowledgeError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        KnowledgeError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn config(field: &str, message: &str) -> Self {
        KnowledgeError::Config {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

pub type KnowledgeResult<T> = Result<T, KnowledgeError>;
