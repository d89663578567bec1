//! Error types for the element model and its serialized forms.
//!
//! Nothing here is fatal to the editor: every fallible operation leaves the
//! in-memory scene untouched when it returns an error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    /// A kind name that is not part of the closed element set.
    #[error("unknown element kind: {0}")]
    UnknownKind(String),

    /// A color string the parser does not understand.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// A serialized element whose fields cannot form a valid element.
    #[error("invalid element record {id}: {reason}")]
    InvalidRecord {
        /// The offending element's ID.
        id: String,
        /// What was wrong with it.
        reason: String,
    },

    /// An inspector edit whose key or value does not fit the element.
    #[error("invalid value {value:?} for property {key:?}")]
    InvalidProperty { key: String, value: String },

    /// Editor configuration that failed validation.
    #[error("invalid editor config: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("MessagePack encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("MessagePack decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

pub type Result<T, E = ModelError> = std::result::Result<T, E>;
