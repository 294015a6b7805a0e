//! Context assembly pipeline.
//!
//! Decides, per request, which inputs are present, routes them through the
//! right processors, and assembles the final `ContextDocument`. The pipeline
//! is a pure function of its inputs; persistence side effects belong to the
//! caller.

use std::sync::Arc;

use mentora_core::models::ContextDocument;
use mentora_core::AppError;

use crate::document::DocumentExtractor;
use crate::summarize::Summarizer;

const SUMMARY_LABEL: &str = "Document Summary";
const RAW_CONTENT_LABEL: &str = "Document Raw Content";

/// An uploaded file: bytes plus the declared media type and filename.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// The inputs of one upload request. A `description` of `Some("")` means the
/// form field was submitted blank: it counts as provided input but
/// contributes nothing to the context.
#[derive(Debug, Clone, Default)]
pub struct UploadInput {
    pub file: Option<FileUpload>,
    pub description: Option<String>,
}

impl UploadInput {
    /// True when neither a file nor a description field was provided.
    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.description.is_none()
    }
}

/// A file that was accepted but not incorporated into the context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub filename: String,
    pub content_type: String,
}

/// Pipeline output: the assembled document, plus an explicit signal when an
/// unsupported file type was skipped instead of silently dropping it.
#[derive(Debug)]
pub struct AssembledContext {
    pub document: ContextDocument,
    pub skipped: Option<SkippedFile>,
}

pub struct ContextPipeline {
    extractor: Arc<dyn DocumentExtractor>,
    summarizer: Summarizer,
    include_raw_content: bool,
}

impl ContextPipeline {
    pub fn new(
        extractor: Arc<dyn DocumentExtractor>,
        summarizer: Summarizer,
        include_raw_content: bool,
    ) -> Self {
        Self {
            extractor,
            summarizer,
            include_raw_content,
        }
    }

    /// Assemble the context for one request.
    ///
    /// PDFs are extracted and summarized; failures there abort with
    /// `UploadProcessingFailed` and no partial context. Images and
    /// unrecognized types are skipped with an explicit signal. A description
    /// is appended verbatim when no file is present.
    pub async fn assemble(
        &self,
        display_name: &str,
        input: UploadInput,
    ) -> Result<AssembledContext, AppError> {
        if input.is_empty() {
            return Err(AppError::NoInputProvided);
        }

        let mut document = ContextDocument::new(display_name);
        let mut skipped = None;

        if let Some(file) = input.file {
            if is_pdf(&file) {
                self.incorporate_pdf(&mut document, file).await?;
            } else {
                tracing::warn!(
                    filename = %file.filename,
                    content_type = %file.content_type,
                    "Unsupported file type, not incorporated into context"
                );
                skipped = Some(SkippedFile {
                    filename: file.filename,
                    content_type: file.content_type,
                });
            }
        } else if let Some(description) = input.description {
            let description = description.trim();
            if !description.is_empty() {
                document.push_raw(description);
            }
        }

        Ok(AssembledContext { document, skipped })
    }

    async fn incorporate_pdf(
        &self,
        document: &mut ContextDocument,
        file: FileUpload,
    ) -> Result<(), AppError> {
        let extractor = self.extractor.clone();
        let FileUpload { filename, data, .. } = file;
        let units = tokio::task::spawn_blocking(move || extractor.extract_units(&data))
            .await
            .map_err(|e| AppError::Internal(format!("extraction task failed: {}", e)))?
            .map_err(|e| AppError::UploadProcessingFailed {
                message: format!("text extraction failed for {}", filename),
                source: anyhow::Error::new(e),
            })?;

        if units.is_empty() {
            // Nothing extractable: the summarizer is never invoked and the
            // synopsis is deterministically absent.
            tracing::info!(filename = %filename, "PDF yielded no text units");
            return Ok(());
        }

        tracing::info!(filename = %filename, units = units.len(), "Summarizing document");

        let synopsis =
            self.summarizer
                .synthesize(&units)
                .await
                .map_err(|e| AppError::UploadProcessingFailed {
                    message: format!("summarization failed for {}", filename),
                    source: anyhow::Error::new(e),
                })?;

        document.push_section(SUMMARY_LABEL, synopsis);

        if self.include_raw_content {
            let raw = units
                .iter()
                .map(|u| u.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");
            document.push_section(RAW_CONTENT_LABEL, raw);
        }

        Ok(())
    }
}

fn is_pdf(file: &FileUpload) -> bool {
    file.content_type.eq_ignore_ascii_case("application/pdf")
        || file.filename.to_ascii_lowercase().ends_with(".pdf")
}
