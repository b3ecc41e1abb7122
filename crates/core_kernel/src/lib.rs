//! Core Kernel - Foundational types for the claims triage system
//!
//! This crate provides the building blocks shared by the domain and interface crates:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers
//! - Port error types for external collaborators

pub mod money;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use identifiers::{ClaimId, AssessmentId, DecisionId};
pub use ports::{PortError, DomainPort, OperationMetadata};
