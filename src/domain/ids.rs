//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for record identifiers.
//! Each type ensures type safety so a record id can never be confused
//! with a record type discriminator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Record identifier newtype wrapper
///
/// A UUID assigned exactly once, at record construction. Serves as the
/// primary key within a partition; a record's storage location is fully
/// determined by `(RecordType, RecordId)`.
///
/// # Examples
///
/// ```
/// use formstore::domain::ids::RecordId;
/// use std::str::FromStr;
///
/// let id = RecordId::from_str("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap();
/// assert_eq!(id.to_string(), "7d44b88c-4199-4bad-97dc-d78268e01398");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generates a fresh random record id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a record id from a string
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string is not a valid UUID
    pub fn parse(id: &str) -> Result<Self, String> {
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|e| format!("Invalid record id '{id}': {e}"))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Record type discriminator newtype wrapper
///
/// The discriminator identifies the stored record variant and doubles as
/// the partition key value, so records of the same type co-locate.
///
/// # Examples
///
/// ```
/// use formstore::domain::ids::RecordType;
///
/// let record_type = RecordType::new("HealthTestOrderForm").unwrap();
/// assert_eq!(record_type.as_str(), "HealthTestOrderForm");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordType(String);

impl RecordType {
    /// Canonical discriminator for the base order form variant
    pub const BASE: &'static str = "TestOrderForm";

    /// Canonical discriminator for the health order form variant
    pub const HEALTH: &'static str = "HealthTestOrderForm";

    /// Creates a new RecordType from a string
    ///
    /// # Errors
    ///
    /// Returns `Err` if the discriminator is empty or whitespace-only
    pub fn new(record_type: impl Into<String>) -> Result<Self, String> {
        let record_type = record_type.into();
        if record_type.trim().is_empty() {
            return Err("Record type cannot be empty".to_string());
        }
        Ok(Self(record_type))
    }

    /// Returns the record type as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for RecordType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_generate_unique() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_record_id_parse_roundtrip() {
        let id = RecordId::generate();
        let parsed = RecordId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_record_id_parse_invalid() {
        assert!(RecordId::parse("not-a-uuid").is_err());
        assert!(RecordId::parse("").is_err());
    }

    #[test]
    fn test_record_type_valid() {
        let record_type = RecordType::new("Iron").unwrap();
        assert_eq!(record_type.as_str(), "Iron");
    }

    #[test]
    fn test_record_type_empty() {
        assert!(RecordType::new("").is_err());
        assert!(RecordType::new("   ").is_err());
    }

    #[test]
    fn test_record_type_serde_plain_string() {
        let record_type = RecordType::new("TestOrderForm").unwrap();
        let json = serde_json::to_string(&record_type).unwrap();
        assert_eq!(json, "\"TestOrderForm\"");
    }
}
