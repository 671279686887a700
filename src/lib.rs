//! SEO Keyword Analyzer
//!
//! Uploads a video with seed keywords to the keyword inference service and
//! scores the knowledge-base terms associated with each ranked keyword.

pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub mod seeds;
pub mod state;
pub mod video;

// Re-export main types for easy access
pub use crate::client::{AnalysisRequest, HttpInferenceClient, InferenceResponse, KeywordService};
pub use crate::config::{Config, ConfigBuilder, OutputFormat};
pub use crate::error::{ClientError, InputError, StateError};
pub use crate::report::KeywordReport;
pub use crate::seeds::SeedKeywords;
pub use crate::state::{AnalysisResult, KeywordSession, SessionStage, SessionState};
pub use crate::video::VideoUpload;
pub use seo_core::{aggregate, AssociatedScores, AssociationMap, RankedKeyword};
