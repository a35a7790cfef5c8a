use std::sync::Arc;

use tracing::{info, warn};

use super::client::{EvaluationGateway, EvaluationResult, TransportError};
use super::domain::FormSubmission;
use super::outcome::Outcome;
use super::validation::{validate, ValidationErrors};

/// Result of handling one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Validation failed; the evaluation service was not contacted.
    Rejected(ValidationErrors),
    Accepted(EvaluationResult),
    Failed(TransportError),
}

/// Trust-boundary entry point: re-validates, then makes exactly one evaluation call.
pub struct SubmissionService<G> {
    gateway: Arc<G>,
}

impl<G> SubmissionService<G>
where
    G: EvaluationGateway + 'static,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn handle(&self, submission: FormSubmission) -> SubmissionOutcome {
        let errors = validate(&submission);
        if !errors.is_empty() {
            let fields: Vec<&str> = errors.iter().map(|(field, _)| field.as_str()).collect();
            info!(?fields, "submission rejected by validation");
            return SubmissionOutcome::Rejected(errors);
        }

        match self.gateway.evaluate(&submission).await {
            Ok(result) => {
                let outcome = Outcome::from_code(result.outcome_code());
                info!(
                    status = result.status,
                    outcome = outcome.label(),
                    "evaluation completed"
                );
                SubmissionOutcome::Accepted(result)
            }
            Err(error) => {
                warn!(status = error.status(), %error, "evaluation request failed");
                SubmissionOutcome::Failed(error)
            }
        }
    }
}
