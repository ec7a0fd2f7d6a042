// src/document/mod.rs
use std::fs;
use std::path::Path;
use crate::utils::error::DocumentError;

/// Extracts the plain text of a PDF document.
///
/// Lines in the returned string follow the visual line breaks of the source as
/// far as `pdf-extract` can recover them; multi-column layouts may interleave.
pub fn extract_text_from_pdf<P: AsRef<Path>>(path: P) -> Result<String, DocumentError> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(DocumentError::NotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());

    let text = pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| DocumentError::Parse(format!("{}: {}", path.display(), e)))?;

    tracing::info!("Extracted {} characters of text from {}", text.chars().count(), path.display());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.pdf");

        let err = extract_text_from_pdf(&missing).unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(ref p) if p == &missing), "got {:?}", err);
    }

    #[test]
    fn test_directory_is_not_a_document() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_text_from_pdf(dir.path()).unwrap_err();
        assert!(matches!(err, DocumentError::NotFound(_)));
    }

    #[test]
    fn test_garbage_bytes_fail_to_parse() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"this is plainly not a PDF document").unwrap();

        let err = extract_text_from_pdf(file.path()).unwrap_err();
        assert!(matches!(err, DocumentError::Parse(_)), "got {:?}", err);
    }
}
