//! Binary-to-text attachment codec.
//!
//! Attachments are stored inside the draft collection as base64 data URIs
//! (`data:<mime>;base64,<payload>`), the same text a browser's `FileReader`
//! produces, so drafts written by the web client decode here unchanged.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use shiftdesk_types::attachment::{
    Attachment, AttachmentSource, EncodedFile, FALLBACK_MIME_TYPE,
};
use shiftdesk_types::error::CodecError;

const DATA_MARKER: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Read an attachment fully and render it as a data URI.
///
/// File-backed attachments are read from disk here; a failed read is
/// reported as [`CodecError::Read`] and the caller decides whether to drop
/// the attachment for this save.
pub async fn encode(attachment: &Attachment) -> Result<EncodedFile, CodecError> {
    let bytes = match &attachment.source {
        AttachmentSource::Memory(bytes) => std::borrow::Cow::Borrowed(bytes.as_slice()),
        AttachmentSource::File(path) => {
            let bytes = tokio::fs::read(path).await.map_err(|source| CodecError::Read {
                name: attachment.name.clone(),
                source,
            })?;
            std::borrow::Cow::Owned(bytes)
        }
    };

    let mime_type = if attachment.mime_type.is_empty() {
        FALLBACK_MIME_TYPE
    } else {
        attachment.mime_type.as_str()
    };

    Ok(EncodedFile {
        encoded_data: format!("{DATA_MARKER}{mime_type}{BASE64_MARKER},{}", STANDARD.encode(&bytes)),
        name: attachment.name.clone(),
        mime_type: mime_type.to_string(),
        size_bytes: bytes.len() as u64,
    })
}

/// Rebuild an in-memory attachment from a data URI.
///
/// The MIME type comes from the URI itself; `filename` restores the
/// original name, which the URI does not carry.
pub fn decode(encoded_data: &str, filename: &str) -> Result<Attachment, CodecError> {
    let rest = encoded_data
        .strip_prefix(DATA_MARKER)
        .ok_or(CodecError::MissingDataMarker)?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or(CodecError::MissingBase64Marker)?;
    let media = header
        .strip_suffix(BASE64_MARKER)
        .ok_or(CodecError::MissingBase64Marker)?;

    // Parameters such as `;charset=` or `;name=` may follow the type itself.
    let mime_type = media.split(';').next().unwrap_or("").trim();
    if mime_type.is_empty() {
        return Err(CodecError::MissingMimeType);
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| CodecError::InvalidPayload(e.to_string()))?;

    Ok(Attachment::from_bytes(filename, mime_type, bytes))
}

/// Create a file-backed attachment for a path, recording its size.
pub async fn attach_file(path: &Path) -> Result<Attachment, CodecError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|source| CodecError::Read { name, source })?;

    Ok(Attachment::from_file(path.to_path_buf(), metadata.len()))
}
