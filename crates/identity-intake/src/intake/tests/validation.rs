use super::common::*;
use crate::intake::validation::{validate, FieldPath, ValidationCode, ValidationErrors};
use serde_json::{json, Value};

fn validate_json(body: Value) -> ValidationErrors {
    validate(&decode(body))
}

fn with_field(field: &str, value: Value) -> ValidationErrors {
    let mut body = submission_json();
    body[field] = value;
    validate_json(body)
}

fn with_address_field(field: &str, value: Value) -> ValidationErrors {
    let mut body = submission_json();
    body["addresses"][0][field] = value;
    validate_json(body)
}

#[test]
fn complete_submission_is_valid() {
    let errors = validate(&submission());
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn missing_names_are_required() {
    let mut body = submission_json();
    body["name_first"] = json!("");
    body["name_last"] = Value::Null;

    let errors = validate_json(body);
    let first = errors.get(FieldPath::NameFirst).expect("first name error");
    assert_eq!(first.code, ValidationCode::Required);
    assert_eq!(first.message, "First Name is required");
    assert_eq!(
        errors.get(FieldPath::NameLast).map(|e| e.message.as_str()),
        Some("Last Name is required")
    );
    assert_eq!(errors.len(), 2);
}

#[test]
fn ssn_must_be_exactly_nine_digits() {
    for ssn in ["123-45-6789", "12345678", "1234567890", "12345678a", "", "１２３４５６７８９"] {
        let errors = with_field("document_ssn", json!(ssn));
        assert_eq!(
            errors.get(FieldPath::DocumentSsn).map(|e| e.message.as_str()),
            Some("SSN must be 9 digits with no dashes"),
            "ssn {ssn:?} should be rejected"
        );
    }

    assert!(!with_field("document_ssn", json!("123456789")).contains(FieldPath::DocumentSsn));
}

#[test]
fn non_string_values_become_field_errors() {
    let errors = with_field("document_ssn", json!(123456789));
    let ssn = errors.get(FieldPath::DocumentSsn).expect("ssn error");
    assert_eq!(ssn.code, ValidationCode::InvalidFormat);
    assert_eq!(ssn.message, "SSN must be 9 digits with no dashes");
    assert_eq!(errors.len(), 1);

    let errors = with_field("name_first", json!(42));
    let first = errors.get(FieldPath::NameFirst).expect("first name error");
    assert_eq!(first.code, ValidationCode::InvalidFormat);
    assert_eq!(first.message, "First Name must be text");

    let errors = with_address_field("address_postal_code", json!(12207));
    assert!(errors.contains(FieldPath::AddressPostalCode));
}

#[test]
fn state_must_be_two_uppercase_letters() {
    for state in ["ny", "New York", "N1", "N", "NYC", ""] {
        assert!(
            with_address_field("address_state", json!(state)).contains(FieldPath::AddressState),
            "state {state:?} should be rejected"
        );
    }

    assert!(!with_address_field("address_state", json!("NY")).contains(FieldPath::AddressState));
}

#[test]
fn postal_code_must_be_five_digits() {
    for postal_code in ["1220", "122070", "12207-1234", "ABCDE"] {
        assert!(with_address_field("address_postal_code", json!(postal_code))
            .contains(FieldPath::AddressPostalCode));
    }
}

#[test]
fn non_us_country_fails_even_when_everything_else_is_valid() {
    let errors = with_address_field("address_country_code", json!("CA"));
    assert_eq!(errors.len(), 1);
    let error = errors
        .get(FieldPath::AddressCountryCode)
        .expect("country error");
    assert_eq!(error.code, ValidationCode::UnsupportedCountry);
    assert_eq!(error.message, "Country must be US");
}

#[test]
fn missing_country_is_not_assumed() {
    let mut body = submission_json();
    body["addresses"][0]
        .as_object_mut()
        .expect("address object")
        .remove("address_country_code");

    assert!(validate_json(body).contains(FieldPath::AddressCountryCode));
}

#[test]
fn email_needs_local_part_domain_and_tld() {
    for email in ["grace", "grace@example", "grace hopper@example.com", "@example.com", "a@b@c.d"] {
        assert!(
            with_field("email_address", json!(email)).contains(FieldPath::EmailAddress),
            "email {email:?} should be rejected"
        );
    }
}

#[test]
fn birth_date_is_checked_for_shape_only() {
    assert!(!with_field("birth_date", json!("1986-13-45")).contains(FieldPath::BirthDate));

    assert_eq!(
        with_field("birth_date", json!("12/09/1986"))
            .get(FieldPath::BirthDate)
            .map(|e| e.message.as_str()),
        Some("Date of Birth must be in YYYY-MM-DD format")
    );
}

#[test]
fn missing_addresses_skip_address_rules() {
    for addresses in [json!([]), Value::Null, json!("41 State St")] {
        let errors = with_field("addresses", addresses);
        assert!(errors.contains(FieldPath::Addresses));
        assert!(!errors.contains(FieldPath::AddressState));
        assert!(!errors.contains(FieldPath::AddressCountryCode));
    }
}

#[test]
fn only_the_first_address_is_validated() {
    let mut body = submission_json();
    body["addresses"]
        .as_array_mut()
        .expect("addresses array")
        .push(json!({ "address_country_code": "MX", "address_state": "jalisco" }));

    assert!(validate_json(body).is_empty());
}

#[test]
fn every_rule_reports_together() {
    let errors = validate_json(json!({
        "addresses": [{ "address_country_code": "CA" }]
    }));

    let fields: Vec<&str> = errors.iter().map(|(field, _)| field.as_str()).collect();
    assert_eq!(
        fields,
        vec![
            "name_first",
            "name_last",
            "addresses[0].address_state",
            "addresses[0].address_postal_code",
            "addresses[0].address_country_code",
            "document_ssn",
            "email_address",
            "birth_date",
        ]
    );
}

#[test]
fn errors_serialize_keyed_by_field_path() {
    let rendered = serde_json::to_value(with_address_field("address_state", json!("ny")))
        .expect("serializes");
    assert_eq!(
        rendered,
        json!({
            "addresses[0].address_state": {
                "code": "invalid_format",
                "message": "State must be a 2-letter code (ex. NY, CA)"
            }
        })
    );
}

#[test]
fn revalidation_is_idempotent() {
    let mut body = submission_json();
    body["email_address"] = json!("nope");
    body["addresses"][0]["address_postal_code"] = json!("1");
    let submission = decode(body);

    assert_eq!(validate(&submission), validate(&submission));
}
