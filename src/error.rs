//! Error types for the analyzer client

use std::path::PathBuf;

use crate::state::SessionStage;

/// Message shown when the service fails without explaining why
pub const DEFAULT_SERVICE_FAILURE: &str = "Failed to generate keywords and associations.";

/// Problems with what the user asked to submit. Raised before any request is sent.
#[derive(thiserror::Error, Debug)]
pub enum InputError {
    #[error("Please select a video file ({} not found)", .0.display())]
    MissingVideo(PathBuf),

    #[error("Unsupported video type {extension:?}; expected one of: {}", .supported.join(", "))]
    UnsupportedVideoType {
        extension: String,
        supported: Vec<String>,
    },

    #[error("Video is {size} bytes, above the {limit} byte limit")]
    VideoTooLarge { size: u64, limit: u64 },

    #[error("Please enter seed keywords.")]
    MissingSeedKeywords,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the request/response exchange with the inference service
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("An error occurred while processing the video: {message}")]
    Network { url: String, message: String },

    #[error("Request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("Malformed response from inference service: {0}")]
    MalformedResponse(String),

    #[error("Could not read video: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Whether the service itself answered (as opposed to never being reached)
    pub fn is_service_error(&self) -> bool {
        matches!(self, Self::Service { .. } | Self::MalformedResponse(_))
    }
}

/// Session transitions attempted from a stage that does not allow them
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum StateError {
    #[error("Cannot {action} while {stage}")]
    InvalidTransition {
        stage: SessionStage,
        action: &'static str,
    },
}
