use crate::ports::outbound::EvidenceFile;
use crate::shared::error::AuditError;
use crate::shared::security::{read_checked, MAX_EVIDENCE_SIZE};
use crate::shared::Result;
use std::path::Path;

/// Reads an evidence image from disk
///
/// # Errors
/// Returns an error if the file is not an image, is a symlink, is larger
/// than 10 MB, or cannot be read
pub fn read_evidence_file(path: &Path) -> Result<EvidenceFile> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let content_type = image_content_type(&extension).ok_or_else(|| AuditError::Validation {
        message: format!(
            "Evidence must be an image (jpg, jpeg, png, gif, webp, heic): {}",
            path.display()
        ),
    })?;

    let bytes = read_checked(path, "evidence image", MAX_EVIDENCE_SIZE)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("evidence.{}", extension));

    Ok(EvidenceFile::new(file_name, content_type, bytes))
}

fn image_content_type(extension: &str) -> Option<&'static str> {
    match extension {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_image() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Photo.JPG");
        fs::write(&path, [0xff, 0xd8, 0xff]).unwrap();

        let file = read_evidence_file(&path).unwrap();
        assert_eq!(file.file_name, "Photo.JPG");
        assert_eq!(file.content_type, "image/jpeg");
        assert_eq!(file.bytes.len(), 3);
    }

    #[test]
    fn test_rejects_non_image() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.pdf");
        fs::write(&path, b"%PDF").unwrap();

        let err = read_evidence_file(&path).unwrap_err();
        assert!(err.to_string().contains("Evidence must be an image"));
    }
}
