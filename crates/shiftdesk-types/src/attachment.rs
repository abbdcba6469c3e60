//! Attachment types for report photos.
//!
//! A live [`Attachment`] is what a form holds while the user edits it: either
//! bytes already in memory or a file on disk that has not been read yet.
//! At rest, drafts never hold live attachments; they hold the text
//! placeholders [`AttachmentRef`] (single-photo fields) and
//! [`AttachmentEntry`] (multi-photo fields).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Maximum size of a single report photo (50 MB, large enough for HEIC).
pub const MAX_PHOTO_BYTES: u64 = 50 * 1024 * 1024;

/// Maximum number of photos attached to one goods-receiving log.
pub const MAX_RECEIVING_PHOTOS: usize = 10;

/// MIME type used when neither the caller nor the extension names one.
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

const PHOTO_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/bmp",
    "image/webp",
    "image/heic",
    "image/heif",
];

const PHOTO_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".heic", ".heif",
];

/// Where the bytes of a live attachment come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentSource {
    /// Bytes already held in memory (e.g. restored from a draft).
    Memory(Vec<u8>),
    /// A file on disk, read lazily when the draft is saved.
    File(PathBuf),
}

/// A binary file attached to a report field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Original file name, including extension.
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub source: AttachmentSource,
}

impl Attachment {
    /// Create an in-memory attachment.
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: bytes.len() as u64,
            source: AttachmentSource::Memory(bytes),
        }
    }

    /// Create a file-backed attachment. The MIME type is inferred from the
    /// file name.
    pub fn from_file(path: PathBuf, size_bytes: u64) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = detect_mime(&name).to_string();
        Self {
            name,
            mime_type,
            size_bytes,
            source: AttachmentSource::File(path),
        }
    }

    /// In-memory bytes, if the attachment has been loaded.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.source {
            AttachmentSource::Memory(bytes) => Some(bytes),
            AttachmentSource::File(_) => None,
        }
    }

    /// Whether this attachment may be added to a report as a photo.
    pub fn is_accepted_photo(&self) -> bool {
        is_accepted_photo(&self.name, &self.mime_type, self.size_bytes)
    }
}

/// Infer a MIME type from a file name's extension.
pub fn detect_mime(filename: &str) -> &'static str {
    let lower = filename.to_lowercase();
    let ext = lower.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => FALLBACK_MIME_TYPE,
    }
}

/// Photo acceptance rule: an image MIME type or image extension, at most
/// [`MAX_PHOTO_BYTES`].
///
/// The extension check covers phones that report HEIC photos with an empty
/// or generic MIME type.
pub fn is_accepted_photo(name: &str, mime_type: &str, size_bytes: u64) -> bool {
    let lower = name.to_lowercase();
    let known_type = PHOTO_MIME_TYPES.contains(&mime_type);
    let known_extension = PHOTO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext));
    (known_type || known_extension) && size_bytes <= MAX_PHOTO_BYTES
}

/// Result of encoding a live attachment to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFile {
    /// `data:<mime>;base64,<payload>`
    pub encoded_data: String,
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl EncodedFile {
    /// Placeholder for a single-attachment field.
    pub fn into_ref(self) -> AttachmentRef {
        AttachmentRef {
            encoded_data: self.encoded_data,
            original_name: self.name,
        }
    }

    /// Placeholder entry for a multi-attachment field.
    pub fn into_entry(self) -> AttachmentEntry {
        AttachmentEntry {
            encoded_data: self.encoded_data,
            original_name: self.name,
            mime_type: self.mime_type,
            size_bytes: self.size_bytes,
        }
    }
}

/// At-rest placeholder for a single-attachment field.
///
/// The MIME type travels inside `encoded_data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    pub encoded_data: String,
    pub original_name: String,
}

/// At-rest placeholder for one item of a multi-attachment field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentEntry {
    pub encoded_data: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_mime() {
        assert_eq!(detect_mime("IMG_0001.JPG"), "image/jpeg");
        assert_eq!(detect_mime("scan.heic"), "image/heic");
        assert_eq!(detect_mime("invoice.pdf"), "application/pdf");
        assert_eq!(detect_mime("noextension"), FALLBACK_MIME_TYPE);
    }

    #[test]
    fn test_from_file_infers_name_and_mime() {
        let att = Attachment::from_file(PathBuf::from("/tmp/photos/receipt.png"), 2048);
        assert_eq!(att.name, "receipt.png");
        assert_eq!(att.mime_type, "image/png");
        assert_eq!(att.size_bytes, 2048);
        assert!(att.bytes().is_none());
    }

    #[test]
    fn test_from_bytes_records_size() {
        let att = Attachment::from_bytes("a.jpg", "image/jpeg", vec![0u8; 300]);
        assert_eq!(att.size_bytes, 300);
        assert_eq!(att.bytes().map(<[u8]>::len), Some(300));
    }

    #[test]
    fn test_photo_acceptance() {
        assert!(is_accepted_photo("a.jpg", "image/jpeg", 1024));
        // Generic MIME type but a known extension
        assert!(is_accepted_photo("IMG_1.HEIC", "", 1024));
        assert!(!is_accepted_photo("notes.txt", "text/plain", 10));
        assert!(!is_accepted_photo("huge.jpg", "image/jpeg", MAX_PHOTO_BYTES + 1));
    }

    #[test]
    fn test_placeholder_serializes_camel_case() {
        let entry = EncodedFile {
            encoded_data: "data:image/png;base64,AAAA".to_string(),
            name: "p.png".to_string(),
            mime_type: "image/png".to_string(),
            size_bytes: 3,
        }
        .into_entry();

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["encodedData"], "data:image/png;base64,AAAA");
        assert_eq!(json["originalName"], "p.png");
        assert_eq!(json["mimeType"], "image/png");
        assert_eq!(json["sizeBytes"], 3);
    }
}
