//! Filesystem helpers for ShiftDesk.
//!
//! Resolves the data directory and writes restored attachments back to
//! disk. All I/O goes through `tokio::fs`.

use std::path::{Path, PathBuf};

use shiftdesk_types::attachment::{Attachment, AttachmentSource};

/// Name used when an attachment carries no usable file name.
const FALLBACK_FILE_NAME: &str = "attachment";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `SHIFTDESK_DATA_DIR` environment variable
/// 2. `~/.shiftdesk`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SHIFTDESK_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".shiftdesk");
    }

    // Last resort: current directory
    PathBuf::from(".shiftdesk")
}

/// Reduce an attachment name to a bare file name safe to join onto a
/// directory. Path separators and parent references are dropped.
pub fn safe_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("").trim();
    if base.is_empty() || base == "." || base == ".." {
        FALLBACK_FILE_NAME.to_string()
    } else {
        base.to_string()
    }
}

/// Write an attachment into `dir`, creating the directory if needed.
///
/// `prefix` disambiguates attachments that share a name (e.g. the index of
/// a receiving photo). Returns the path written.
pub async fn export_attachment(
    dir: &Path,
    prefix: Option<&str>,
    attachment: &Attachment,
) -> Result<PathBuf, std::io::Error> {
    tokio::fs::create_dir_all(dir).await?;

    let file_name = match prefix {
        Some(prefix) => format!("{prefix}-{}", safe_file_name(&attachment.name)),
        None => safe_file_name(&attachment.name),
    };
    let path = dir.join(file_name);

    match &attachment.source {
        AttachmentSource::Memory(bytes) => tokio::fs::write(&path, bytes).await?,
        AttachmentSource::File(source) => {
            tokio::fs::copy(source, &path).await?;
        }
    }

    tracing::debug!(path = %path.display(), "attachment exported");
    Ok(path)
}
