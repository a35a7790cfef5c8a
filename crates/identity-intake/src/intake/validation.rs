//! Field rules shared by the entry side and the trust boundary.
//!
//! Both callers go through [`validate`], so identical input always produces identical
//! errors. Every rule runs; failures accumulate instead of short-circuiting.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::domain::{fields, Address, FieldValue, FormSubmission, SUPPORTED_COUNTRY_CODE};

static STATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").unwrap());
static POSTAL_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{5}$").unwrap());
static SSN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{9}$").unwrap());
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static BIRTH_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

/// Closed set of fields that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldPath {
    #[serde(rename = "name_first")]
    NameFirst,
    #[serde(rename = "name_last")]
    NameLast,
    #[serde(rename = "addresses")]
    Addresses,
    #[serde(rename = "addresses[0].address_state")]
    AddressState,
    #[serde(rename = "addresses[0].address_postal_code")]
    AddressPostalCode,
    #[serde(rename = "addresses[0].address_country_code")]
    AddressCountryCode,
    #[serde(rename = "document_ssn")]
    DocumentSsn,
    #[serde(rename = "email_address")]
    EmailAddress,
    #[serde(rename = "birth_date")]
    BirthDate,
}

impl FieldPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldPath::NameFirst => "name_first",
            FieldPath::NameLast => "name_last",
            FieldPath::Addresses => "addresses",
            FieldPath::AddressState => "addresses[0].address_state",
            FieldPath::AddressPostalCode => "addresses[0].address_postal_code",
            FieldPath::AddressCountryCode => "addresses[0].address_country_code",
            FieldPath::DocumentSsn => "document_ssn",
            FieldPath::EmailAddress => "email_address",
            FieldPath::BirthDate => "birth_date",
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable reason a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCode {
    Required,
    InvalidFormat,
    UnsupportedCountry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub code: ValidationCode,
    pub message: String,
}

impl FieldError {
    fn new(code: ValidationCode, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
        }
    }
}

/// Errors keyed by field path. An empty map means the submission is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<FieldPath, FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: FieldPath) -> Option<&FieldError> {
        self.0.get(&field)
    }

    pub fn contains(&self, field: FieldPath) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldPath, &FieldError)> {
        self.0.iter().map(|(field, error)| (*field, error))
    }

    fn insert(&mut self, field: FieldPath, code: ValidationCode, message: &str) {
        self.0.insert(field, FieldError::new(code, message));
    }

    fn check(&mut self, field: FieldPath, pattern: &Regex, value: FieldValue<'_>, message: &str) {
        let matches = value.as_text().is_some_and(|text| pattern.is_match(text));
        if !matches {
            self.insert(field, ValidationCode::InvalidFormat, message);
        }
    }

    fn require_text(
        &mut self,
        field: FieldPath,
        value: FieldValue<'_>,
        required: &str,
        not_text: &str,
    ) {
        if value.is_blank() {
            self.insert(field, ValidationCode::Required, required);
        } else if value.as_text().is_none() {
            self.insert(field, ValidationCode::InvalidFormat, not_text);
        }
    }
}

/// Run every field rule against the submission.
pub fn validate(submission: &FormSubmission) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    errors.require_text(
        FieldPath::NameFirst,
        submission.field(fields::NAME_FIRST),
        "First Name is required",
        "First Name must be text",
    );
    errors.require_text(
        FieldPath::NameLast,
        submission.field(fields::NAME_LAST),
        "Last Name is required",
        "Last Name must be text",
    );

    match submission.primary_address() {
        Some(address) => validate_address(address, &mut errors),
        None => errors.insert(
            FieldPath::Addresses,
            ValidationCode::Required,
            "At least one address is required",
        ),
    }

    errors.check(
        FieldPath::DocumentSsn,
        &SSN_RE,
        submission.field(fields::DOCUMENT_SSN),
        "SSN must be 9 digits with no dashes",
    );
    errors.check(
        FieldPath::EmailAddress,
        &EMAIL_RE,
        submission.field(fields::EMAIL_ADDRESS),
        "Email must be valid",
    );
    errors.check(
        FieldPath::BirthDate,
        &BIRTH_DATE_RE,
        submission.field(fields::BIRTH_DATE),
        "Date of Birth must be in YYYY-MM-DD format",
    );

    errors
}

fn validate_address(address: Address<'_>, errors: &mut ValidationErrors) {
    errors.check(
        FieldPath::AddressState,
        &STATE_RE,
        address.field(fields::ADDRESS_STATE),
        "State must be a 2-letter code (ex. NY, CA)",
    );
    errors.check(
        FieldPath::AddressPostalCode,
        &POSTAL_CODE_RE,
        address.field(fields::ADDRESS_POSTAL_CODE),
        "Zip/Postal Code must be 5 digits",
    );
    if address.field(fields::ADDRESS_COUNTRY_CODE).as_text() != Some(SUPPORTED_COUNTRY_CODE) {
        errors.insert(
            FieldPath::AddressCountryCode,
            ValidationCode::UnsupportedCountry,
            "Country must be US",
        );
    }
}
