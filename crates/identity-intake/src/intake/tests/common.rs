use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};

use crate::intake::client::{EvaluationGateway, EvaluationResult, TransportError};
use crate::intake::domain::FormSubmission;
use crate::intake::service::SubmissionService;

pub(super) fn submission_json() -> Value {
    json!({
        "name_first": "Grace",
        "name_last": "Hopper",
        "document_ssn": "123456789",
        "email_address": "grace@example.com",
        "birth_date": "1986-12-09",
        "addresses": [{
            "address_line_1": "41 State St",
            "address_line_2": "Apt 3",
            "address_city": "Albany",
            "address_state": "NY",
            "address_postal_code": "12207",
            "address_country_code": "US"
        }]
    })
}

pub(super) fn decode(body: Value) -> FormSubmission {
    serde_json::from_value(body).expect("decodes submission")
}

pub(super) fn submission() -> FormSubmission {
    decode(submission_json())
}

pub(super) fn approved_result() -> EvaluationResult {
    EvaluationResult {
        status: 200,
        payload: json!({
            "evaluation_token": "L-7f1c",
            "summary": { "outcome": "Approved", "result": "success" }
        }),
    }
}

/// Gateway double that records every call and replays a fixed response.
pub(super) struct StubGateway {
    response: Result<EvaluationResult, TransportError>,
    calls: AtomicUsize,
    received: Mutex<Vec<FormSubmission>>,
}

impl StubGateway {
    pub(super) fn returning(response: Result<EvaluationResult, TransportError>) -> Arc<Self> {
        Arc::new(Self {
            response,
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        })
    }

    pub(super) fn approving() -> Arc<Self> {
        Self::returning(Ok(approved_result()))
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn received(&self) -> Vec<FormSubmission> {
        self.received.lock().expect("stub mutex poisoned").clone()
    }
}

#[async_trait]
impl EvaluationGateway for StubGateway {
    async fn evaluate(
        &self,
        submission: &FormSubmission,
    ) -> Result<EvaluationResult, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received
            .lock()
            .expect("stub mutex poisoned")
            .push(submission.clone());
        self.response.clone()
    }
}

pub(super) fn service_with(gateway: &Arc<StubGateway>) -> Arc<SubmissionService<StubGateway>> {
    Arc::new(SubmissionService::new(gateway.clone()))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf8 body")
}
