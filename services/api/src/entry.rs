//! Data-entry side of the pipeline: the same field rules the service enforces, run
//! locally before anything is sent.

use crate::infra::{parse_intake_endpoints, read_submission, IntakeEndpoints};
use clap::Args;
use identity_intake::error::AppError;
use identity_intake::intake::{interpret, validate, ResultEnvelope, ResultView, ValidationErrors};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Path to a JSON form submission
    #[arg(long)]
    pub(crate) file: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    /// Path to a JSON form submission
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Base URL of the running intake service
    #[arg(
        long,
        default_value = "http://127.0.0.1:3000",
        value_parser = parse_intake_endpoints
    )]
    pub(crate) server: IntakeEndpoints,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let submission = read_submission(&args.file)?;
    let errors = validate(&submission);
    if errors.is_empty() {
        println!("Form is valid");
        return Ok(());
    }

    render_errors(&errors);
    Err(rejected(&errors))
}

pub(crate) async fn run_submit(args: SubmitArgs) -> Result<(), AppError> {
    let SubmitArgs { file, server } = args;

    let submission = read_submission(&file)?;
    let errors = validate(&submission);
    if !errors.is_empty() {
        render_errors(&errors);
        return Err(rejected(&errors));
    }

    let response = reqwest::Client::new()
        .post(server.submit.clone())
        .json(&submission)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        println!("Failed to submit the form (HTTP {})", status.as_u16());
        if !body.is_empty() {
            println!("{body}");
        }
        return Err(AppError::Rejected(format!(
            "intake service returned HTTP {}",
            status.as_u16()
        )));
    }

    let envelope = ResultEnvelope::from_value(response.json::<Value>().await?);
    let mut result_link = server.result;
    result_link.set_query(Some(&ResultView::encode_query(&envelope)?));

    println!("Form Submission Result");
    println!(
        "Message: {}",
        envelope.message.as_deref().unwrap_or_default()
    );
    println!("Outcome: {}", envelope.outcome_code().unwrap_or("unknown"));
    println!("{}", interpret(&envelope));
    println!("Result page: {result_link}");

    Ok(())
}

fn render_errors(errors: &ValidationErrors) {
    println!("Form has {} invalid field(s)", errors.len());
    for (field, error) in errors.iter() {
        println!("- {field}: {}", error.message);
    }
}

fn rejected(errors: &ValidationErrors) -> AppError {
    AppError::Rejected(format!("{} field(s) failed validation", errors.len()))
}
