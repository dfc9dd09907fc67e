//! Document Extractor — turns an uploaded file into one flat string.

use std::path::Path;

use anyhow::{Context, Result};

/// Extracts text from `path`. Files with a `.pdf` extension (any case) go
/// through the PDF text extractor; everything else is read as UTF-8 with
/// undecodable bytes dropped.
pub async fn extract_text(path: &Path) -> Result<String> {
    if is_pdf(path) {
        let owned = path.to_path_buf();
        return tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text(&owned)
                .map_err(|e| anyhow::anyhow!("PDF extraction failed for {}: {e:?}", owned.display()))
        })
        .await
        .context("PDF extraction task panicked")?;
    }

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(decode_lossy(&bytes))
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// UTF-8 decode that skips invalid sequences instead of substituting them.
fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_detection_is_case_insensitive() {
        assert!(is_pdf(Path::new("cv.PDF")));
        assert!(is_pdf(Path::new("/tmp/cv.pdf")));
        assert!(!is_pdf(Path::new("cv.txt")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    #[test]
    fn test_decode_drops_invalid_bytes() {
        let bytes = b"Jane \xff\xfeDoe";
        assert_eq!(decode_lossy(bytes), "Jane Doe");
    }

    #[tokio::test]
    async fn test_plain_text_file_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "Jane Doe\njane@example.com").unwrap();
        let text = extract_text(&path).await.unwrap();
        assert_eq!(text, "Jane Doe\njane@example.com");
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(extract_text(&dir.path().join("nope.txt")).await.is_err());
    }

    #[tokio::test]
    async fn test_pdf_text_is_extracted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        std::fs::write(&path, include_bytes!("testdata/resume.pdf")).unwrap();
        let text = extract_text(&path).await.unwrap();
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("jane.doe@example.com"));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.PDF");
        std::fs::write(&path, "Jane Doe\njane@example.com").unwrap();
        assert!(extract_text(&path).await.is_err());
    }
}
