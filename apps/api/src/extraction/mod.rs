// Text extraction: resolves a document kind from the file extension and hands the
// file to the matching strategy. PDF and DOCX are parsed locally on the blocking
// pool; legacy DOC goes through the Tika conversion server.

pub mod local;
pub mod tika;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::extraction::local::{DocxSource, PdfSource};
use crate::extraction::tika::TikaSource;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("Document conversion failed: {0}")]
    Conversion(String),

    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Document kinds the extractor understands, resolved once per file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Doc,
    /// Carries the lowercased extension with its leading dot (empty if none).
    Unsupported(String),
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => DocumentKind::Pdf,
            "docx" => DocumentKind::Docx,
            "doc" => DocumentKind::Doc,
            "" => DocumentKind::Unsupported(String::new()),
            other => DocumentKind::Unsupported(format!(".{other}")),
        }
    }
}

/// One extraction strategy. Implementations read the file themselves.
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// Dispatches a file to the strategy matching its extension.
#[derive(Clone)]
pub struct TextExtractor {
    pdf: Arc<dyn TextSource>,
    docx: Arc<dyn TextSource>,
    doc: Arc<dyn TextSource>,
}

impl TextExtractor {
    pub fn from_config(config: &Config) -> Result<Self, ExtractionError> {
        Ok(Self::with_sources(
            Arc::new(PdfSource),
            Arc::new(DocxSource),
            Arc::new(TikaSource::new(
                &config.tika_server_url,
                Duration::from_secs(config.tika_timeout_secs),
            )?),
        ))
    }

    pub fn with_sources(
        pdf: Arc<dyn TextSource>,
        docx: Arc<dyn TextSource>,
        doc: Arc<dyn TextSource>,
    ) -> Self {
        Self { pdf, docx, doc }
    }

    pub async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let source = match DocumentKind::from_path(path) {
            DocumentKind::Pdf => &self.pdf,
            DocumentKind::Docx => &self.docx,
            DocumentKind::Doc => &self.doc,
            DocumentKind::Unsupported(ext) => {
                return Err(ExtractionError::UnsupportedFileType(ext));
            }
        };

        let text = source.extract(path).await?;
        debug!("Extracted {} chars from {}", text.len(), path.display());
        Ok(text)
    }
}
