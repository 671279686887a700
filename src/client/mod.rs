pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use seo_core::{AssociationMap, RankedKeyword};
use std::path::Path;

use crate::config::UploadConfig;
use crate::error::{ClientError, InputError};
use crate::seeds::SeedKeywords;
use crate::video::VideoUpload;

pub use http::HttpInferenceClient;

/// One validated submission: a video plus the user's seed keywords
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub video: VideoUpload,
    pub seeds: SeedKeywords,
}

impl AnalysisRequest {
    pub fn new(video: VideoUpload, seeds: SeedKeywords) -> Self {
        Self { video, seeds }
    }

    /// Validate raw user input. The video is checked first, matching the
    /// order in which the form reports problems.
    pub async fn prepare(
        video_path: &Path,
        seed_text: &str,
        upload: &UploadConfig,
    ) -> Result<Self, InputError> {
        let video = VideoUpload::open(video_path, upload).await?;
        let seeds = SeedKeywords::parse(seed_text)?;
        Ok(Self::new(video, seeds))
    }
}

/// Successful body of the keyword ranking endpoint.
///
/// Missing or `null` fields come back empty, so the scoring core always gets
/// a ranking list and an association map.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InferenceResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub keyword_ranking: Vec<RankedKeyword>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub wikidata_keywords: AssociationMap,

    /// Keywords generated from the transcript merged with the seeds
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,

    /// Seed keywords as the service parsed them
    #[serde(default, deserialize_with = "null_as_default")]
    pub seed_keywords: Vec<String>,

    #[serde(default)]
    pub message: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A remote service that ranks keywords for a video
#[async_trait]
pub trait KeywordService: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<InferenceResponse, ClientError>;
    async fn is_available(&self) -> bool;
    fn endpoint(&self) -> &str;
}
