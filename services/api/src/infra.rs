use identity_intake::error::AppError;
use identity_intake::intake::FormSubmission;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use url::Url;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Routes of a running intake service that the CLI talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IntakeEndpoints {
    pub(crate) submit: Url,
    pub(crate) result: Url,
}

pub(crate) fn parse_intake_endpoints(raw: &str) -> Result<IntakeEndpoints, String> {
    let base = Url::parse(raw.trim())
        .map_err(|err| format!("failed to parse '{raw}' as a server URL ({err})"))?;
    if base.cannot_be_a_base() {
        return Err(format!("'{raw}' cannot be used as a server base URL"));
    }

    let join = |route: &str| {
        base.join(route)
            .map_err(|err| format!("failed to build {route} from '{raw}' ({err})"))
    };

    Ok(IntakeEndpoints {
        submit: join("/api/submit-form")?,
        result: join("/result")?,
    })
}

pub(crate) fn read_submission(path: &Path) -> Result<FormSubmission, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let submission = serde_json::from_str(&raw)?;
    Ok(submission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_rooted_at_the_server() {
        let endpoints =
            parse_intake_endpoints("http://127.0.0.1:3000/ignored/path").expect("valid URL");
        assert_eq!(
            endpoints.submit.as_str(),
            "http://127.0.0.1:3000/api/submit-form"
        );
        assert_eq!(endpoints.result.as_str(), "http://127.0.0.1:3000/result");
    }

    #[test]
    fn rejects_non_urls() {
        assert!(parse_intake_endpoints("localhost:3000").is_err());
        assert!(parse_intake_endpoints("not a url").is_err());
    }
}
