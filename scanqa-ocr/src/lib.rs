//! # scanqa-ocr
//!
//! Text extraction for the scanqa document Q&A service.
//!
//! Extraction is a black box from the retrieval core's point of view: one
//! uploaded file in, one string of extracted text out. This crate shells
//! out to system binaries rather than linking OCR libraries:
//!
//! - images → `tesseract <file> stdout`
//! - PDFs → `pdftoppm -png` renders each page, then `tesseract` per page
//! - `.txt` → read directly (already-extracted text)
//!
//! Both tools must be on `PATH` (`tesseract-ocr` and `poppler-utils` on
//! Debian-family systems). An empty extraction result is valid: a blank
//! or unreadable scan is a document with no extractable text, which the
//! indexing layer stores as an empty index.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum OcrError {
    /// An extraction tool failed or could not be launched.
    #[error("OCR tool error ({tool}): {message}")]
    Tool {
        /// The system binary involved.
        tool: String,
        /// A description of the failure.
        message: String,
    },

    /// The file extension maps to no supported extraction route.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Filesystem error while reading input or scratch files.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A convenience result type for extraction operations.
pub type Result<T> = std::result::Result<T, OcrError>;

/// A capability that extracts text from an uploaded file.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the document's text. An empty string is a valid result.
    async fn extract(&self, path: &Path) -> Result<String>;
}

/// How a file is routed to an extraction tool, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Image,
    Pdf,
    PlainText,
    Unsupported,
}

fn classify(path: &Path) -> FileKind {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return FileKind::Unsupported;
    };
    match ext.to_ascii_lowercase().as_str() {
        "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" => FileKind::Image,
        "pdf" => FileKind::Pdf,
        "txt" => FileKind::PlainText,
        _ => FileKind::Unsupported,
    }
}

/// A [`TextExtractor`] backed by the `tesseract` and `pdftoppm` system
/// binaries.
///
/// # Example
///
/// ```rust,ignore
/// use scanqa_ocr::{ShellOcrExtractor, TextExtractor};
///
/// let extractor = ShellOcrExtractor::new();
/// let text = extractor.extract(Path::new("uploads/scan.pdf")).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShellOcrExtractor {
    /// Tesseract language code (`-l`); tool default when unset.
    language: Option<String>,
}

/// Render resolution for PDF pages. 300 dpi is the usual floor for OCR
/// accuracy on scanned documents.
const PDF_RENDER_DPI: u32 = 300;

impl ShellOcrExtractor {
    /// Create an extractor using tesseract's default language.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tesseract language code (e.g. `deu`, `eng+fra`).
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// OCR a single raster image to text.
    async fn ocr_image(&self, path: &Path) -> Result<String> {
        let mut command = Command::new("tesseract");
        command.arg(path).arg("stdout");
        if let Some(language) = &self.language {
            command.arg("-l").arg(language);
        }
        let stdout = run_tool(command, "tesseract").await?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    /// Render a PDF to page images in a scratch directory, OCR each page
    /// in order, and join the page texts with newlines.
    async fn ocr_pdf(&self, path: &Path) -> Result<String> {
        let scratch = tempfile::tempdir()?;
        let prefix = scratch.path().join("page");

        let mut command = Command::new("pdftoppm");
        command
            .arg("-r")
            .arg(PDF_RENDER_DPI.to_string())
            .arg("-png")
            .arg(path)
            .arg(&prefix);
        run_tool(command, "pdftoppm").await?;

        let pages = page_images_in_order(scratch.path()).await?;
        if pages.is_empty() {
            warn!(path = %path.display(), "pdftoppm produced no page images");
            return Ok(String::new());
        }

        let mut page_texts = Vec::with_capacity(pages.len());
        for page in &pages {
            page_texts.push(self.ocr_image(page).await?);
        }

        debug!(path = %path.display(), page_count = pages.len(), "OCRed PDF pages");
        Ok(page_texts.join("\n"))
    }
}

/// Run a tool to completion, returning stdout or a [`OcrError::Tool`]
/// carrying its stderr.
async fn run_tool(mut command: Command, tool: &str) -> Result<Vec<u8>> {
    let output = command.output().await.map_err(|e| OcrError::Tool {
        tool: tool.to_string(),
        message: format!("failed to launch: {e} (is {tool} installed?)"),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(OcrError::Tool {
            tool: tool.to_string(),
            message: format!("exited with {}: {}", output.status, stderr.trim()),
        });
    }

    Ok(output.stdout)
}

/// Collect the page images pdftoppm wrote, sorted by page number.
///
/// pdftoppm zero-pads page numbers to a fixed width per run, but sorting
/// numerically keeps this independent of padding width.
async fn page_images_in_order(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages: Vec<(u32, PathBuf)> = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if let Some(number) = page_number(&path) {
            pages.push((number, path));
        }
    }
    pages.sort_by_key(|(number, _)| *number);
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

/// Parse the page number out of a `page-NN.png` filename.
fn page_number(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?;
    let digits = stem.rsplit('-').next()?;
    digits.parse().ok()
}

#[async_trait]
impl TextExtractor for ShellOcrExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let text = match classify(path) {
            FileKind::Image => self.ocr_image(path).await?,
            FileKind::Pdf => self.ocr_pdf(path).await?,
            FileKind::PlainText => tokio::fs::read_to_string(path).await?,
            FileKind::Unsupported => {
                return Err(OcrError::UnsupportedFormat(path.display().to_string()));
            }
        };

        info!(path = %path.display(), chars = text.chars().count(), "extracted text");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_extension_case_insensitively() {
        assert_eq!(classify(Path::new("scan.PNG")), FileKind::Image);
        assert_eq!(classify(Path::new("scan.jpeg")), FileKind::Image);
        assert_eq!(classify(Path::new("report.pdf")), FileKind::Pdf);
        assert_eq!(classify(Path::new("notes.txt")), FileKind::PlainText);
        assert_eq!(classify(Path::new("archive.zip")), FileKind::Unsupported);
        assert_eq!(classify(Path::new("no_extension")), FileKind::Unsupported);
    }

    #[test]
    fn parses_page_numbers_regardless_of_padding() {
        assert_eq!(page_number(Path::new("/tmp/x/page-3.png")), Some(3));
        assert_eq!(page_number(Path::new("/tmp/x/page-007.png")), Some(7));
        assert_eq!(page_number(Path::new("/tmp/x/page-12.png")), Some(12));
        assert_eq!(page_number(Path::new("/tmp/x/cover.png")), None);
    }

    #[tokio::test]
    async fn plain_text_files_bypass_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        tokio::fs::write(&path, "already extracted\ntext").await.unwrap();

        let text = ShellOcrExtractor::new().extract(&path).await.unwrap();
        assert_eq!(text, "already extracted\ntext");
    }

    #[tokio::test]
    async fn unsupported_extension_is_rejected() {
        let err = ShellOcrExtractor::new().extract(Path::new("x.docx")).await.unwrap_err();
        assert!(matches!(err, OcrError::UnsupportedFormat(_)));
    }
}
