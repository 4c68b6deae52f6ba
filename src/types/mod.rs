// src/types/mod.rs
pub mod profile;
pub mod response;

pub use profile::{JobPosting, Profile};
pub use response::{
    ContentType, GenerationErrorBody, GenerationRequest, GenerationResponse, HealthResponse,
    TokenUsage,
};
