//! Order-form record domain model
//!
//! This module defines the core OrderFormRecord type and its variants.
//! Variants form a closed sum type sharing common fields, so storage and
//! serialization logic can pattern-match exhaustively on the variant kind
//! instead of relying on runtime type identity.

use super::ids::{RecordId, RecordType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An open-ended metadata value with a tagged shape
///
/// Each stored value carries a `Type` tag dictating how its `Value`
/// payload must be decoded. Unknown tags fail deserialization rather
/// than being skipped.
///
/// # Examples
///
/// ```
/// use formstore::domain::record::CustomContent;
///
/// let content = CustomContent::String("PID1234".to_string());
/// let json = serde_json::to_string(&content).unwrap();
/// assert_eq!(json, r#"{"Type":"string","Value":"PID1234"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type", content = "Value")]
pub enum CustomContent {
    /// Free-text value
    #[serde(rename = "string")]
    String(String),

    /// Numeric value
    #[serde(rename = "number")]
    Number(f64),

    /// Boolean flag
    #[serde(rename = "bool")]
    Bool(bool),
}

impl CustomContent {
    /// Returns the string payload if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CustomContent::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Variant-specific fields of an order-form record
///
/// The set of variants is closed; adding a variant requires updating the
/// wire mapping exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordKind {
    /// Plain test order form
    Base,

    /// Health test order form with patient demographics
    Health {
        /// Patient identifier
        patient_id: String,

        /// Patient date of birth
        date_of_birth: DateTime<Utc>,

        /// Patient sex
        sex: String,
    },
}

impl RecordKind {
    /// Canonical discriminator for this variant
    pub fn canonical_type(&self) -> &'static str {
        match self {
            RecordKind::Base => RecordType::BASE,
            RecordKind::Health { .. } => RecordType::HEALTH,
        }
    }
}

/// A laboratory test order-form record
///
/// Constructed entirely in memory, then submitted to the backend via
/// `upsert_if_absent`. The id is assigned exactly once at construction;
/// profile, date and source are immutable afterwards. The metadata bag
/// is always present, defaulting to empty.
///
/// # Examples
///
/// ```
/// use formstore::domain::record::OrderFormRecord;
///
/// let record = OrderFormRecord::builder()
///     .profile("Iron")
///     .source("RCLS")
///     .build()
///     .unwrap();
/// assert_eq!(record.record_type().as_str(), "TestOrderForm");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFormRecord {
    id: RecordId,
    record_type: RecordType,
    profile: String,
    date: DateTime<Utc>,
    source: String,
    metadata: HashMap<String, CustomContent>,
    kind: RecordKind,
}

impl OrderFormRecord {
    /// Creates a new builder for constructing a record
    pub fn builder() -> OrderFormRecordBuilder {
        OrderFormRecordBuilder::default()
    }

    /// Returns the record id
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Returns the record type discriminator (the partition key value)
    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    /// Returns the test profile label
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Returns the form creation timestamp
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Returns the originating organisation label
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the metadata bag
    pub fn metadata(&self) -> &HashMap<String, CustomContent> {
        &self.metadata
    }

    /// Returns the variant-specific fields
    pub fn kind(&self) -> &RecordKind {
        &self.kind
    }

    /// Reassembles a record from its stored parts
    ///
    /// Used by the wire mapping when reading documents back from the
    /// backend; not intended for constructing fresh records.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        id: RecordId,
        record_type: RecordType,
        profile: String,
        date: DateTime<Utc>,
        source: String,
        metadata: HashMap<String, CustomContent>,
        kind: RecordKind,
    ) -> Self {
        Self {
            id,
            record_type,
            profile,
            date,
            source,
            metadata,
            kind,
        }
    }
}

/// Builder for constructing OrderFormRecord instances
///
/// The id is generated when `build` is called; the record type defaults
/// to the variant's canonical discriminator unless overridden.
#[derive(Debug, Default)]
pub struct OrderFormRecordBuilder {
    record_type: Option<RecordType>,
    profile: Option<String>,
    date: Option<DateTime<Utc>>,
    source: Option<String>,
    metadata: HashMap<String, CustomContent>,
    kind: Option<RecordKind>,
}

impl OrderFormRecordBuilder {
    /// Creates a new OrderFormRecordBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the record type discriminator
    ///
    /// When not set, the variant's canonical name is used.
    pub fn record_type(mut self, record_type: RecordType) -> Self {
        self.record_type = Some(record_type);
        self
    }

    /// Sets the test profile label
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Sets the form creation timestamp (defaults to now)
    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the originating organisation label
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a metadata entry
    pub fn metadata(mut self, key: impl Into<String>, value: CustomContent) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Makes this a health order form with patient demographics
    pub fn health(
        mut self,
        patient_id: impl Into<String>,
        date_of_birth: DateTime<Utc>,
        sex: impl Into<String>,
    ) -> Self {
        self.kind = Some(RecordKind::Health {
            patient_id: patient_id.into(),
            date_of_birth,
            sex: sex.into(),
        });
        self
    }

    /// Builds the OrderFormRecord, generating a fresh id
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing
    pub fn build(self) -> Result<OrderFormRecord, String> {
        let kind = self.kind.unwrap_or(RecordKind::Base);
        let record_type = match self.record_type {
            Some(record_type) => record_type,
            None => RecordType::new(kind.canonical_type())?,
        };

        Ok(OrderFormRecord {
            id: RecordId::generate(),
            record_type,
            profile: self.profile.ok_or("profile is required")?,
            date: self.date.unwrap_or_else(Utc::now),
            source: self.source.ok_or("source is required")?,
            metadata: self.metadata,
            kind,
        })
    }
}
