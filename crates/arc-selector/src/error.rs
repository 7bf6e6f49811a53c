#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    #[error("failed to read task catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse task catalog {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid task catalog: {0}")]
    Invalid(String),
}
