//! Applicant identity intake: field validation, credential encoding, the evaluation
//! client, outcome interpretation, and the submission orchestrator that ties them together.

pub mod client;
pub mod credentials;
pub mod domain;
pub mod outcome;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use client::{
    EvaluationClientError, EvaluationGateway, EvaluationResult, HttpEvaluationClient,
    TransportError, NETWORK_FAILURE_STATUS,
};
pub use credentials::encode;
pub use domain::{fields, Address, FieldValue, FormSubmission, SUPPORTED_COUNTRY_CODE};
pub use outcome::{interpret, Outcome, ResultEnvelope, ResultView};
pub use router::intake_router;
pub use service::{SubmissionOutcome, SubmissionService};
pub use validation::{validate, FieldError, FieldPath, ValidationCode, ValidationErrors};
