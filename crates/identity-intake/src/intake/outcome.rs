//! Turns the provider's decision code into user-facing text.
//!
//! Everything here is total: malformed or missing data degrades to [`Outcome::Unknown`]
//! instead of an error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use url::form_urlencoded;

pub const APPROVED_MESSAGE: &str = "Your identity has been verified and your application is approved.";
pub const MANUAL_REVIEW_MESSAGE: &str =
    "Your application is pending manual review. We will contact you once a decision is made.";
pub const DENIED_MESSAGE: &str = "We were unable to approve your application at this time.";
pub const UNKNOWN_MESSAGE: &str =
    "We received an unexpected outcome for your application. Please contact support.";

/// Decision classification returned by the evaluation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Approved,
    ManualReview,
    Denied,
    Unknown,
}

impl Outcome {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("Approved") => Outcome::Approved,
            Some("Manual Review") => Outcome::ManualReview,
            Some("Denied") => Outcome::Denied,
            _ => Outcome::Unknown,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Outcome::Approved => APPROVED_MESSAGE,
            Outcome::ManualReview => MANUAL_REVIEW_MESSAGE,
            Outcome::Denied => DENIED_MESSAGE,
            Outcome::Unknown => UNKNOWN_MESSAGE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Approved => "approved",
            Outcome::ManualReview => "manual_review",
            Outcome::Denied => "denied",
            Outcome::Unknown => "unknown",
        }
    }
}

/// `{message, data}` body produced by the intake endpoint and consumed by the result page.
///
/// Each level is optional and decoding never fails on a wrongly-typed member; it is
/// simply treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub data: Option<EvaluationData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationData {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub summary: Option<EvaluationSummary>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl ResultEnvelope {
    /// Decode any JSON value; non-objects yield an empty envelope.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    pub fn outcome_code(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .summary
            .as_ref()?
            .outcome
            .as_deref()
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::from_code(self.outcome_code())
    }
}

/// Message for the envelope's `data.summary.outcome`.
pub fn interpret(envelope: &ResultEnvelope) -> &'static str {
    envelope.outcome().message()
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

/// What the result page shows for an encoded envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Rendered {
        message: Option<String>,
        outcome_code: Option<String>,
        outcome: Outcome,
    },
    Unavailable,
}

impl ResultView {
    /// Encode an envelope into the query string the result page reads.
    pub fn encode_query(envelope: &ResultEnvelope) -> Result<String, serde_json::Error> {
        let data = serde_json::to_string(envelope)?;
        Ok(form_urlencoded::Serializer::new(String::new())
            .append_pair("success", "true")
            .append_pair("data", &data)
            .finish())
    }

    /// Read the `data` parameter of a raw query string. A missing parameter is treated as
    /// an empty envelope; anything that is not a JSON object is unavailable.
    pub fn from_query(raw_query: Option<&str>) -> Self {
        let data = raw_query.and_then(|query| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == "data")
                .map(|(_, value)| value.into_owned())
        });

        let value = match data {
            Some(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(value) => value,
                Err(_) => return ResultView::Unavailable,
            },
            None => Value::Object(Map::new()),
        };

        if !value.is_object() {
            return ResultView::Unavailable;
        }

        let envelope = ResultEnvelope::from_value(value);
        ResultView::Rendered {
            outcome: envelope.outcome(),
            outcome_code: envelope.outcome_code().map(str::to_string),
            message: envelope.message,
        }
    }
}
