//! In-process PDF and DOCX text extraction.
//!
//! Both parsers are CPU-bound and run inside `tokio::task::spawn_blocking`.

use std::path::Path;

use async_trait::async_trait;
use docx_rs::{
    DocumentChild, InsertChild, Paragraph, ParagraphChild, Run, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};

use crate::extraction::{ExtractionError, TextSource};

/// Full-document PDF text in reading order, without layout.
pub struct PdfSource;

#[async_trait]
impl TextSource for PdfSource {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || extract_pdf(&path)).await?
    }
}

fn extract_pdf(path: &Path) -> Result<String, ExtractionError> {
    pdf_extract::extract_text(path).map_err(|e| ExtractionError::Pdf(e.to_string()))
}

/// Body text of a DOCX, one line per paragraph, table cells included.
pub struct DocxSource;

#[async_trait]
impl TextSource for DocxSource {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || extract_docx(&path)).await?
    }
}

fn extract_docx(path: &Path) -> Result<String, ExtractionError> {
    let data = std::fs::read(path).map_err(|source| ExtractionError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let docx = docx_rs::read_docx(&data).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut text = String::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => push_paragraph(&mut text, p),
            DocumentChild::Table(t) => push_table(&mut text, t),
            _ => {}
        }
    }
    Ok(text)
}

fn push_paragraph(text: &mut String, paragraph: &Paragraph) {
    push_inline(text, &paragraph.children);
    text.push('\n');
}

/// Runs, including those nested in hyperlinks and tracked insertions.
fn push_inline(text: &mut String, children: &[ParagraphChild]) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(text, run),
            ParagraphChild::Hyperlink(link) => push_inline(text, &link.children),
            ParagraphChild::Insert(insert) => {
                for child in &insert.children {
                    if let InsertChild::Run(run) = child {
                        push_run(text, run);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run(text: &mut String, run: &Run) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            _ => {}
        }
    }
}

/// Cell paragraphs in row order; nested tables are walked in place.
fn push_table(text: &mut String, table: &Table) {
    for TableChild::TableRow(row) in &table.rows {
        for TableRowChild::TableCell(cell) in &row.cells {
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(p) => push_paragraph(text, p),
                    TableCellContent::Table(t) => push_table(text, t),
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Hyperlink, HyperlinkType, TableCell, TableRow};

    fn write_docx(path: &Path, paragraphs: &[&str]) {
        let mut docx = Docx::new();
        for line in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*line)));
        }
        let file = std::fs::File::create(path).unwrap();
        docx.build().pack(file).unwrap();
    }

    #[tokio::test]
    async fn test_docx_paragraphs_become_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jane.docx");
        write_docx(&path, &["Jane Roe", "jane@example.com"]);

        let text = DocxSource.extract(&path).await.unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.contains(&"Jane Roe"), "got {text:?}");
        assert!(lines.contains(&"jane@example.com"), "got {text:?}");
    }

    #[tokio::test]
    async fn test_docx_keeps_hyperlink_and_table_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jane.docx");

        let link = Hyperlink::new("mailto:jane@example.com", HyperlinkType::External)
            .add_run(Run::new().add_text("jane@example.com"));
        let inner = Table::new(vec![TableRow::new(vec![TableCell::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Rust, Go")))])]);
        let table = Table::new(vec![TableRow::new(vec![
            TableCell::new()
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Senior Engineer at Acme"))),
            TableCell::new().add_table(inner),
        ])]);
        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Jane Roe")))
            .add_paragraph(Paragraph::new().add_hyperlink(link))
            .add_table(table);
        docx.build()
            .pack(std::fs::File::create(&path).unwrap())
            .unwrap();

        let text = DocxSource.extract(&path).await.unwrap();
        let lines: Vec<&str> = text.lines().collect();
        for expected in ["Jane Roe", "jane@example.com", "Senior Engineer at Acme", "Rust, Go"] {
            assert!(lines.contains(&expected), "missing {expected:?} in {text:?}");
        }
    }

    #[tokio::test]
    async fn test_docx_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DocxSource
            .extract(&dir.path().join("absent.docx"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Io { .. }));
    }

    #[tokio::test]
    async fn test_docx_garbage_is_docx_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        std::fs::write(&path, b"definitely not a zip archive").unwrap();

        let err = DocxSource.extract(&path).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Docx(_)));
    }

    #[tokio::test]
    async fn test_pdf_garbage_is_pdf_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.4 truncated").unwrap();

        // pdf-extract occasionally panics on malformed input; that surfaces as a task error.
        let err = PdfSource.extract(&path).await.unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Pdf(_) | ExtractionError::Task(_)
        ));
    }
}
