//! Assessment domain errors

use thiserror::Error;

use core_kernel::{MoneyError, PortError};
use crate::detection::DetectionId;

/// Errors that can occur in the assessment domain
#[derive(Debug, Error)]
pub enum AssessmentError {
    /// Malformed input: negative or non-numeric cost, unknown severity, bad assessment
    #[error("Validation error: {0}")]
    Validation(String),

    /// No detection with this id exists on the assessment
    #[error("Detection not found: {0}")]
    DetectionNotFound(DetectionId),

    /// The requested action is not allowed from the current state or routing outcome
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// The claim has been finalized and accepts no further changes
    #[error("Claim already finalized")]
    ClaimFinalized,

    /// The assessment provider failed
    #[error("Analysis failed: {0}")]
    Analysis(#[from] PortError),

    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}

impl AssessmentError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        AssessmentError::Validation(message.into())
    }

    /// Creates an invalid transition error
    pub fn invalid_transition(from: impl std::fmt::Display, to: impl std::fmt::Display) -> Self {
        AssessmentError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Returns true for errors caused by bad agent input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AssessmentError::Validation(_)
                | AssessmentError::DetectionNotFound(_)
                | AssessmentError::Money(_)
        )
    }

    /// Returns true if the error is an invalid transition
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, AssessmentError::InvalidTransition { .. })
    }
}
