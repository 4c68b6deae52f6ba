// src/lib.rs
//! Job-application assistant core: page signal extraction, resume text
//! segmentation, and the profile record both produce.

pub mod cli;
pub mod core;
pub mod errors;
pub mod extraction;
pub mod resume;
pub mod types;
pub mod utils;

pub use errors::{AppError, GenerationError, ParseError, ScrapeError};
pub use extraction::{
    DomAccess, ExtractionMode, Lookup, PageContext, PageSignal, PageSignalExtractor,
};
pub use resume::ResumeSegmenter;
pub use types::{ContentType, JobPosting, Profile};
