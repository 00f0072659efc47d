// SPDX-License-Identifier: MIT

//! Document-to-text extraction
//!
//! PDF text is pulled out with poppler's `pdftotext`, one page at a time,
//! and concatenated in page order. No layout is preserved.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

use crate::adk::error::DocumentError;

const PDF_MAGIC: &[u8] = b"%PDF";

/// Anything that can turn an uploaded document into plain text
pub trait DocumentReader: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, DocumentError>;
}

/// Check command output, mapping a missing binary to `ToolNotFound`
fn handle_cmd_output(
    result: std::io::Result<Output>,
    tool_name: &str,
    error_prefix: &str,
) -> Result<String, DocumentError> {
    match result {
        Ok(output) if output.status.success() => {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(DocumentError::ExtractionFailed(format!(
                "{}: {}",
                error_prefix,
                stderr.trim()
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(DocumentError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(DocumentError::Io(e)),
    }
}

/// Reject anything that does not start with the PDF header
pub fn check_pdf_magic(bytes: &[u8]) -> Result<(), DocumentError> {
    if bytes.starts_with(PDF_MAGIC) {
        Ok(())
    } else {
        Err(DocumentError::NotAPdf {
            magic: bytes.iter().take(PDF_MAGIC.len()).copied().collect(),
        })
    }
}

/// Parse the `Pages:` line of `pdfinfo` output
fn parse_page_count(pdfinfo: &str) -> Option<u32> {
    pdfinfo
        .lines()
        .find(|line| line.starts_with("Pages:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|n| n.parse().ok())
}

/// Fail on documents that yielded only whitespace
fn require_text(text: String) -> Result<String, DocumentError> {
    if text.trim().is_empty() {
        Err(DocumentError::NoText)
    } else {
        Ok(text)
    }
}

/// PDF reader backed by poppler-utils
#[derive(Debug, Clone, Default)]
pub struct PdfTextReader;

impl PdfTextReader {
    pub fn new() -> Self {
        Self
    }

    fn page_count(&self, path: &Path) -> Option<u32> {
        let output = Command::new("pdfinfo").arg(path).output().ok()?;
        if !output.status.success() {
            return None;
        }
        parse_page_count(&String::from_utf8_lossy(&output.stdout))
    }

    fn page_text(&self, path: &Path, page: u32) -> Result<String, DocumentError> {
        let page_str = page.to_string();
        let output = Command::new("pdftotext")
            .args(["-enc", "UTF-8", "-f", &page_str, "-l", &page_str])
            .arg(path)
            .arg("-")
            .output();

        handle_cmd_output(
            output,
            "pdftotext (install poppler-utils)",
            &format!("pdftotext failed on page {}", page),
        )
    }

    fn document_text(&self, path: &Path) -> Result<String, DocumentError> {
        let output = Command::new("pdftotext")
            .args(["-enc", "UTF-8"])
            .arg(path)
            .arg("-")
            .output();

        handle_cmd_output(output, "pdftotext (install poppler-utils)", "pdftotext failed")
    }

    /// Extract text from a PDF already on disk
    pub fn extract_file(&self, path: &Path) -> Result<String, DocumentError> {
        let text = match self.page_count(path) {
            Some(pages) => {
                log::debug!("Extracting {} pages from {}", pages, path.display());
                let mut text = String::new();
                for page in 1..=pages {
                    text.push_str(&self.page_text(path, page)?);
                }
                text
            }
            None => {
                log::debug!(
                    "Page count unavailable for {}, extracting whole document",
                    path.display()
                );
                self.document_text(path)?
            }
        };

        require_text(text)
    }
}

impl DocumentReader for PdfTextReader {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, DocumentError> {
        check_pdf_magic(bytes)?;

        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;

        self.extract_file(file.path())
    }
}

/// Read an input file for the CLI: PDFs go through `reader`, anything else
/// is read as UTF-8 text
pub fn read_input_file(path: &Path, reader: &dyn DocumentReader) -> Result<String, DocumentError> {
    let bytes = std::fs::read(path)?;
    if bytes.starts_with(PDF_MAGIC) {
        reader.extract_text(&bytes)
    } else {
        require_text(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedReader(&'static str);

    impl DocumentReader for FixedReader {
        fn extract_text(&self, _bytes: &[u8]) -> Result<String, DocumentError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_check_pdf_magic() {
        assert!(check_pdf_magic(b"%PDF-1.7\n...").is_ok());

        match check_pdf_magic(b"PK\x03\x04zip") {
            Err(DocumentError::NotAPdf { magic }) => assert_eq!(magic, b"PK\x03\x04".to_vec()),
            other => panic!("Expected NotAPdf, got {:?}", other),
        }
    }

    #[test]
    fn test_check_pdf_magic_short_input() {
        assert!(matches!(
            check_pdf_magic(b"%P"),
            Err(DocumentError::NotAPdf { .. })
        ));
    }

    #[test]
    fn test_non_pdf_bytes_rejected_before_extraction() {
        let err = PdfTextReader::new().extract_text(b"plain text").unwrap_err();
        assert!(matches!(err, DocumentError::NotAPdf { .. }));
    }

    #[test]
    fn test_parse_page_count() {
        let info = "Title:          Enlace\nProducer:       LibreOffice\nPages:          3\nEncrypted:      no\n";
        assert_eq!(parse_page_count(info), Some(3));
        assert_eq!(parse_page_count("Title: x\n"), None);
    }

    #[test]
    fn test_handle_missing_tool() {
        let result = Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"));
        assert!(matches!(
            handle_cmd_output(result, "pdftotext", "failed"),
            Err(DocumentError::ToolNotFound(tool)) if tool == "pdftotext"
        ));
    }

    #[test]
    fn test_require_text() {
        assert!(matches!(require_text(" \n\x0c".to_string()), Err(DocumentError::NoText)));
        assert_eq!(require_text("Metano".to_string()).unwrap(), "Metano");
    }

    #[test]
    fn test_read_input_file_plain_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("Enlace metálico".as_bytes()).unwrap();

        let text = read_input_file(file.path(), &FixedReader("unused")).unwrap();
        assert_eq!(text, "Enlace metálico");
    }

    #[test]
    fn test_read_input_file_pdf_uses_reader() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4 fake").unwrap();

        let text = read_input_file(file.path(), &FixedReader("from reader")).unwrap();
        assert_eq!(text, "from reader");
    }
}
