//! Error types for document decoding

/// Errors while decoding site documents
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Document text is not valid JSON
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),

    /// A single record inside an otherwise valid document could not be decoded
    #[error("skipping record {index}: {source}")]
    InvalidRecord {
        /// Position in the document array
        index: usize,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },

    /// Document root has the wrong JSON type
    #[error("{document} document is not an array")]
    NotAnArray {
        /// Which document
        document: &'static str,
    },
}
