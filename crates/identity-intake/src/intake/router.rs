use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, RawQuery, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::client::{EvaluationGateway, TransportError};
use super::domain::FormSubmission;
use super::outcome::ResultView;
use super::service::{SubmissionOutcome, SubmissionService};
use super::validation::validate;

pub const SUBMITTED_MESSAGE: &str = "Form successfully submitted";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to submit form to external API";
pub const CONNECTION_FAILURE_MESSAGE: &str =
    "An error occurred while connecting to the external API";
const UNDECODABLE_BODY_MESSAGE: &str = "Request body must be a JSON form submission";

/// Router exposing form submission, entry-side validation, and the result page.
pub fn intake_router<G>(service: Arc<SubmissionService<G>>) -> Router
where
    G: EvaluationGateway + 'static,
{
    Router::new()
        .route(
            "/api/submit-form",
            post(submit_handler::<G>).fallback(method_not_allowed),
        )
        .route("/api/validate", post(validate_handler))
        .route("/result", get(result_handler))
        .with_state(service)
}

pub(crate) async fn submit_handler<G>(
    State(service): State<Arc<SubmissionService<G>>>,
    payload: Result<Json<FormSubmission>, JsonRejection>,
) -> Response
where
    G: EvaluationGateway + 'static,
{
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => return undecodable_body(rejection),
    };

    match service.handle(submission).await {
        SubmissionOutcome::Rejected(errors) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
        }
        SubmissionOutcome::Accepted(result) => {
            let status = StatusCode::from_u16(result.status).unwrap_or(StatusCode::OK);
            let payload = json!({
                "message": SUBMITTED_MESSAGE,
                "data": result.payload,
            });
            (status, Json(payload)).into_response()
        }
        SubmissionOutcome::Failed(TransportError::Upstream { status, body }) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            let payload = json!({
                "message": UPSTREAM_FAILURE_MESSAGE,
                "error": body,
            });
            (status, Json(payload)).into_response()
        }
        SubmissionOutcome::Failed(other) => {
            let payload = json!({
                "message": CONNECTION_FAILURE_MESSAGE,
                "error": other.detail(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

/// Same rules as the trust boundary, for immediate feedback while the form is filled in.
pub(crate) async fn validate_handler(
    payload: Result<Json<FormSubmission>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(submission)) => {
            let errors = validate(&submission);
            let payload = json!({
                "valid": errors.is_empty(),
                "errors": errors,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(rejection) => undecodable_body(rejection),
    }
}

pub(crate) async fn result_handler(RawQuery(query): RawQuery) -> Html<String> {
    Html(render_result_page(&ResultView::from_query(query.as_deref())))
}

pub(crate) async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        Json(json!({ "message": "Method Not Allowed" })),
    )
        .into_response()
}

fn undecodable_body(rejection: JsonRejection) -> Response {
    let payload = json!({
        "message": UNDECODABLE_BODY_MESSAGE,
        "error": rejection.body_text(),
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn render_result_page(view: &ResultView) -> String {
    let body = match view {
        ResultView::Rendered {
            message,
            outcome_code,
            outcome,
        } => format!(
            "<div>\n<p>Message: {}</p>\n<p>Outcome: {}</p>\n<p>{}</p>\n</div>",
            escape_html(message.as_deref().unwrap_or_default()),
            escape_html(outcome_code.as_deref().unwrap_or_default()),
            escape_html(outcome.message()),
        ),
        ResultView::Unavailable => "<p>There was an error submitting the form.</p>".to_string(),
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Form Submission Result</title></head>\n<body>\n<h1>Form Submission Result</h1>\n{body}\n</body>\n</html>\n"
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
