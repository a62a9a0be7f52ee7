//! The answer store.
//!
//! Holds the current raw value of every known field. Updates never mutate
//! in place; they return a new store, so a reader holding the previous
//! value never observes a partially applied merge.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A known form field.
///
/// Field names serialize in camelCase (`phoneNumber`, `postalCode`, ...).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FirstName,
    LastName,
    Address,
    AptUnit,
    HouseNumber,
    StreetName,
    City,
    State,
    PostalCode,
    Email,
    Dob,
    PhoneNumber,
    Moved,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::FirstName,
        Field::LastName,
        Field::Address,
        Field::AptUnit,
        Field::HouseNumber,
        Field::StreetName,
        Field::City,
        Field::State,
        Field::PostalCode,
        Field::Email,
        Field::Dob,
        Field::PhoneNumber,
        Field::Moved,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Address => "address",
            Self::AptUnit => "aptUnit",
            Self::HouseNumber => "houseNumber",
            Self::StreetName => "streetName",
            Self::City => "city",
            Self::State => "state",
            Self::PostalCode => "postalCode",
            Self::Email => "email",
            Self::Dob => "dob",
            Self::PhoneNumber => "phoneNumber",
            Self::Moved => "moved",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a field name is not one of the known identifiers.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Unknown field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Partial field map submitted together with a step.
pub type RawData = BTreeMap<Field, String>;

/// Current value of every known field.
///
/// # Example
///
/// ```rust
/// use chatform::core::{Answers, Field};
///
/// let answers = Answers::new();
/// let updated = answers.set_field(Field::Email, "a@b.com");
///
/// assert_eq!(updated.get(Field::Email), "a@b.com");
/// assert_eq!(answers.get(Field::Email), ""); // Original unchanged
/// ```
///
/// Serializes as a flat field map. Fields absent from the input come back
/// empty, so every field is present after decoding too.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawData", into = "RawData")]
pub struct Answers {
    values: BTreeMap<Field, String>,
}

impl From<RawData> for Answers {
    fn from(raw: RawData) -> Self {
        Self::with_prefill(&raw)
    }
}

impl From<Answers> for RawData {
    fn from(answers: Answers) -> Self {
        answers.values
    }
}

impl Default for Answers {
    fn default() -> Self {
        Self::new()
    }
}

impl Answers {
    /// Every field present with an empty value.
    pub fn new() -> Self {
        Self {
            values: Field::ALL
                .into_iter()
                .map(|field| (field, String::new()))
                .collect(),
        }
    }

    /// Every field present, with `prefill` values layered over empties.
    pub fn with_prefill(prefill: &RawData) -> Self {
        Self::new().merge_raw(prefill)
    }

    pub fn get(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }

    /// Overwrite a single field. No format validation happens here.
    pub fn set_field(&self, field: Field, value: impl Into<String>) -> Self {
        let mut values = self.values.clone();
        values.insert(field, value.into());
        Self { values }
    }

    /// Overwrite zero or more fields in one step.
    pub fn merge_raw(&self, raw: &RawData) -> Self {
        let mut values = self.values.clone();
        values.extend(raw.iter().map(|(field, value)| (*field, value.clone())));
        Self { values }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.values
            .iter()
            .map(|(field, value)| (*field, value.as_str()))
    }
}
