use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use seo_core::{aggregate, AssociatedScores, AssociationMap, RankedKeyword};
use std::fmt;
use tracing::{debug, info, warn};

use crate::client::{AnalysisRequest, InferenceResponse, KeywordService};
use crate::error::StateError;

/// What was submitted, kept alongside the outcome
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestSummary {
    pub video_name: String,
    pub video_size: u64,
    pub seed_keywords: Vec<String>,
    pub submitted_at: DateTime<Utc>,
}

impl RequestSummary {
    fn from_request(request: &AnalysisRequest) -> Self {
        Self {
            video_name: request.video.file_name.clone(),
            video_size: request.video.size,
            seed_keywords: request.seeds.parsed(),
            submitted_at: Utc::now(),
        }
    }
}

/// Outcome of one successful analysis. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub request: RequestSummary,
    pub keyword_ranking: Vec<RankedKeyword>,
    pub associations: AssociationMap,
    pub associated_scores: AssociatedScores,
    pub generated_keywords: Vec<String>,
    pub message: Option<String>,
    pub completed_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Score the response's associations and freeze the result
    pub fn from_response(request: RequestSummary, response: InferenceResponse) -> Self {
        let associated_scores = aggregate(&response.keyword_ranking, &response.wikidata_keywords);

        Self {
            request,
            keyword_ranking: response.keyword_ranking,
            associations: response.wikidata_keywords,
            associated_scores,
            generated_keywords: response.keywords,
            message: response.message,
            completed_at: Utc::now(),
        }
    }
}

/// A failed attempt and the message shown for it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailureRecord {
    pub request: RequestSummary,
    pub message: String,
    pub failed_at: DateTime<Utc>,
}

/// Where a session is in its request/response cycle
#[derive(Debug, Clone)]
pub enum SessionState {
    Idle,
    Submitting(RequestSummary),
    Success(AnalysisResult),
    Failure(FailureRecord),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionStage {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl fmt::Display for SessionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStage::Idle => "idle",
            SessionStage::Submitting => "submitting",
            SessionStage::Succeeded => "succeeded",
            SessionStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

impl SessionState {
    pub fn stage(&self) -> SessionStage {
        match self {
            SessionState::Idle => SessionStage::Idle,
            SessionState::Submitting(_) => SessionStage::Submitting,
            SessionState::Success(_) => SessionStage::Succeeded,
            SessionState::Failure(_) => SessionStage::Failed,
        }
    }
}

/// Single owner of the analysis state.
///
/// `Idle -> Submitting -> Success | Failure`, and `reset` back to `Idle` from
/// anywhere. Starting a new submission discards the previous outcome.
#[derive(Debug)]
pub struct KeywordSession {
    state: SessionState,
    attempts: u32,
}

impl KeywordSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            attempts: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn stage(&self) -> SessionStage {
        self.state.stage()
    }

    /// Number of submissions started since creation or the last reset
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Submitting(_))
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            SessionState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failure(failure) => Some(&failure.message),
            _ => None,
        }
    }

    /// Enter `Submitting`, clearing whatever was shown before
    pub fn begin_submission(&mut self, request: &AnalysisRequest) -> Result<(), StateError> {
        if self.is_loading() {
            return Err(StateError::InvalidTransition {
                stage: self.stage(),
                action: "begin a submission",
            });
        }

        self.attempts += 1;
        self.state = SessionState::Submitting(RequestSummary::from_request(request));
        debug!("🔄 Session submitting (attempt {})", self.attempts);
        Ok(())
    }

    /// Score a service response and enter `Success`
    pub fn complete(&mut self, response: InferenceResponse) -> Result<&AnalysisResult, StateError> {
        let request = self.take_submission("complete a submission")?;
        let result = AnalysisResult::from_response(request, response);

        info!(
            "✅ Scored {} associated terms from {} ranked keywords",
            result.associated_scores.len(),
            result.keyword_ranking.len()
        );

        self.state = SessionState::Success(result);
        match &self.state {
            SessionState::Success(result) => Ok(result),
            other => Err(StateError::InvalidTransition {
                stage: other.stage(),
                action: "complete a submission",
            }),
        }
    }

    /// Record a failure and enter `Failure`
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), StateError> {
        let request = self.take_submission("fail a submission")?;
        let message = message.into();

        warn!("❌ Submission failed: {}", message);

        self.state = SessionState::Failure(FailureRecord {
            request,
            message,
            failed_at: Utc::now(),
        });
        Ok(())
    }

    /// Drop everything and return to `Idle`
    pub fn reset(&mut self) {
        debug!("Session reset from {}", self.stage());
        self.state = SessionState::Idle;
        self.attempts = 0;
    }

    /// Run one full attempt against `service`.
    ///
    /// Service failures end in `Failure` rather than an `Err`; the scoring
    /// core only runs when the response arrived and parsed.
    pub async fn run(
        &mut self,
        service: &dyn KeywordService,
        request: &AnalysisRequest,
    ) -> Result<&SessionState, StateError> {
        self.begin_submission(request)?;

        match service.analyze(request).await {
            Ok(response) => {
                self.complete(response)?;
            }
            Err(e) => {
                self.fail(e.to_string())?;
            }
        }

        Ok(&self.state)
    }

    fn take_submission(&mut self, action: &'static str) -> Result<RequestSummary, StateError> {
        match std::mem::replace(&mut self.state, SessionState::Idle) {
            SessionState::Submitting(request) => Ok(request),
            other => {
                let stage = other.stage();
                self.state = other;
                Err(StateError::InvalidTransition { stage, action })
            }
        }
    }
}

impl Default for KeywordSession {
    fn default() -> Self {
        Self::new()
    }
}
