use thiserror::Error;

/// Errors raised by the payload transforms
#[derive(Debug, Error)]
pub enum Error {
    #[error("no type named `{0}` is declared")]
    UnknownType(String),

    #[error("embedded `{type_key}` records nest deeper than the configured maximum of {max_depth}")]
    EmbeddingTooDeep { type_key: String, max_depth: usize },

    #[error("side-load collection `{0}` exists in the payload but is not an array")]
    SideCollectionNotArray(String),

    #[error("payload must be a JSON object")]
    PayloadNotObject,

    #[error("invalid schema document: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
