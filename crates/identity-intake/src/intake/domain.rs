use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wire names of the fields the form collects. They are the evaluation service's contract.
pub mod fields {
    pub const NAME_FIRST: &str = "name_first";
    pub const NAME_LAST: &str = "name_last";
    pub const DOCUMENT_SSN: &str = "document_ssn";
    pub const EMAIL_ADDRESS: &str = "email_address";
    pub const BIRTH_DATE: &str = "birth_date";
    pub const ADDRESSES: &str = "addresses";
    pub const ADDRESS_LINE_1: &str = "address_line_1";
    pub const ADDRESS_LINE_2: &str = "address_line_2";
    pub const ADDRESS_CITY: &str = "address_city";
    pub const ADDRESS_STATE: &str = "address_state";
    pub const ADDRESS_POSTAL_CODE: &str = "address_postal_code";
    pub const ADDRESS_COUNTRY_CODE: &str = "address_country_code";
}

/// Only supported country; the form presents it as a fixed value.
pub const SUPPORTED_COUNTRY_CODE: &str = "US";

/// A field as it appeared in the body. `null` and absent are the same thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Missing,
    Text(&'a str),
    /// Present but not a string (number, bool, array or object).
    Other(&'a Value),
}

impl<'a> FieldValue<'a> {
    fn of(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => FieldValue::Missing,
            Some(Value::String(text)) => FieldValue::Text(text),
            Some(other) => FieldValue::Other(other),
        }
    }

    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            FieldValue::Text(text) => Some(*text),
            FieldValue::Missing | FieldValue::Other(_) => None,
        }
    }

    /// Missing, `null` or the empty string.
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Missing | FieldValue::Text(""))
    }
}

/// One form post, held exactly as received.
///
/// Serializing yields the same object that was decoded, so the evaluation service gets
/// the body the form produced, including keys, nulls and values this crate never reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSubmission(Map<String, Value>);

impl FormSubmission {
    pub fn field(&self, name: &str) -> FieldValue<'_> {
        FieldValue::of(self.0.get(name))
    }

    /// `addresses` when it is an array; any other shape counts as no addresses.
    pub fn addresses(&self) -> impl Iterator<Item = Address<'_>> {
        self.0
            .get(fields::ADDRESSES)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .map(|entry| Address(entry.as_object()))
    }

    /// The address that is validated and acted on; later entries are carried but ignored.
    pub fn primary_address(&self) -> Option<Address<'_>> {
        self.addresses().next()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for FormSubmission {
    fn from(body: Map<String, Value>) -> Self {
        Self(body)
    }
}

/// Read-only view of one `addresses` entry. A non-object entry has every field missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Address<'a>(Option<&'a Map<String, Value>>);

impl<'a> Address<'a> {
    pub fn field(&self, name: &str) -> FieldValue<'a> {
        FieldValue::of(self.0.and_then(|entry| entry.get(name)))
    }
}
