//! Persisted order-form document shape
//!
//! This module defines the wire/storage JSON structure used when storing
//! order-form records, and the mapping to and from the domain model.
//! Field names follow the persisted record contract: `id`, `Profile`,
//! `Date`, `Source`, `Type`, `MetaData`, plus `PID`, `DateOfBirth` and
//! `Sex` for the health variant.

use crate::domain::record::{CustomContent, RecordKind};
use crate::domain::{BackendError, OrderFormRecord, RecordId, RecordType, Result, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An order-form record as stored in the backend
///
/// The `Type` field is the partition key value; a document's location is
/// fully determined by `(Type, id)`. `MetaData` is always written, even
/// when empty, so the bag round-trips empty-as-empty rather than absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDocument {
    /// Document id (string-form UUID)
    pub id: String,

    /// Test profile label
    #[serde(rename = "Profile")]
    pub profile: String,

    /// Form creation timestamp (ISO-8601)
    #[serde(rename = "Date")]
    pub date: DateTime<Utc>,

    /// Originating organisation label
    #[serde(rename = "Source")]
    pub source: String,

    /// Record type discriminator and partition key value
    #[serde(rename = "Type")]
    pub record_type: String,

    /// Open-ended metadata bag
    #[serde(rename = "MetaData", default)]
    pub metadata: HashMap<String, CustomContent>,

    /// Patient identifier (health variant only)
    #[serde(rename = "PID", skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,

    /// Patient date of birth (health variant only)
    #[serde(rename = "DateOfBirth", skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<DateTime<Utc>>,

    /// Patient sex (health variant only)
    #[serde(rename = "Sex", skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
}

impl FormDocument {
    /// Maps a domain record to its stored shape
    pub fn from_domain(record: &OrderFormRecord) -> Self {
        let (patient_id, date_of_birth, sex) = match record.kind() {
            RecordKind::Base => (None, None, None),
            RecordKind::Health {
                patient_id,
                date_of_birth,
                sex,
            } => (
                Some(patient_id.clone()),
                Some(*date_of_birth),
                Some(sex.clone()),
            ),
        };

        Self {
            id: record.id().to_string(),
            profile: record.profile().to_string(),
            date: record.date(),
            source: record.source().to_string(),
            record_type: record.record_type().clone().into_inner(),
            metadata: record.metadata().clone(),
            patient_id,
            date_of_birth,
            sex,
        }
    }

    /// Maps a stored document back to the domain record
    ///
    /// The variant is decided by the health fields: a document carrying
    /// `PID`, `DateOfBirth` and `Sex` is the health variant; a document
    /// carrying none of them is the base variant. A partial set is a
    /// malformed payload and surfaces as a deserialization error.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not a valid UUID, the type
    /// discriminator is empty, or the health fields are inconsistent.
    pub fn into_domain(self) -> Result<OrderFormRecord> {
        let id = RecordId::parse(&self.id)
            .map_err(|e| StoreError::Backend(BackendError::Deserialization(e)))?;
        let record_type = RecordType::new(self.record_type)
            .map_err(|e| StoreError::Backend(BackendError::Deserialization(e)))?;

        let kind = match (self.patient_id, self.date_of_birth, self.sex) {
            (None, None, None) => RecordKind::Base,
            (Some(patient_id), Some(date_of_birth), Some(sex)) => RecordKind::Health {
                patient_id,
                date_of_birth,
                sex,
            },
            _ => {
                return Err(StoreError::Backend(BackendError::Deserialization(format!(
                    "Document {} carries a partial set of health fields",
                    self.id
                ))));
            }
        };

        Ok(OrderFormRecord::from_parts(
            id,
            record_type,
            self.profile,
            self.date,
            self.source,
            self.metadata,
            kind,
        ))
    }
}
