#[derive(Debug, thiserror::Error)]
pub enum CdsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid text: {0}")]
    Text(#[from] pama_types::TextError),

    #[error("failed to read rule file {path}: {source}", path = path.display())]
    RuleFileRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid rule file: {0}")]
    RuleFileParse(String),

    #[error("invalid guideline for procedure '{procedure}': {reason}")]
    InvalidGuideline { procedure: String, reason: String },
}

pub type CdsResult<T> = std::result::Result<T, CdsError>;
