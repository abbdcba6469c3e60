use thiserror::Error;

/// Errors from converting attachments to and from their text form.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to read attachment '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("encoded attachment is missing the 'data:' marker")]
    MissingDataMarker,

    #[error("encoded attachment is missing the ';base64,' marker")]
    MissingBase64Marker,

    #[error("encoded attachment has no MIME type")]
    MissingMimeType,

    #[error("invalid base64 payload: {0}")]
    InvalidPayload(String),
}

/// Errors from the key-value storage backend (used by trait definitions in shiftdesk-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("storage quota exceeded: {needed} bytes requested, limit is {limit}")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors surfaced by the draft lifecycle to the form layer.
///
/// Everything else (codec failures, unreadable collections, backend hiccups)
/// is absorbed and logged; only a full store reaches the caller.
#[derive(Debug, Error)]
pub enum DraftError {
    #[error("draft storage is full: {needed} bytes requested, limit is {limit}")]
    StorageFull { needed: usize, limit: usize },
}
