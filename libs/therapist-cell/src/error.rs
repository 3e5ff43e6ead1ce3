use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Failed to read roster file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse roster file: {0}")]
    Parse(#[from] serde_json::Error),
}
