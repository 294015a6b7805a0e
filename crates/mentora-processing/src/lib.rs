//! Internal processing: document extraction, summarization, speech analysis,
//! and the context assembly pipeline that ties them together.

pub mod context;
pub mod document;
pub mod speech;
pub mod summarize;

pub use context::{AssembledContext, ContextPipeline, FileUpload, SkippedFile, UploadInput};
pub use document::{DocumentError, DocumentExtractor, PdfExtractor, TextUnit};
pub use speech::SpeechAnalyzer;
pub use summarize::{SummarizeError, Summarizer};
