//! Domain DTOs for the medication API.
//!
//! # Design
//! Field names on the wire are Portuguese (`nome`, `dosagem`, `horario`);
//! serde renames map them onto the English vocabulary used everywhere in
//! this crate. The types are defined independently from the mock-server
//! crate so integration tests catch schema drift between the two.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned identifier of a medication record.
///
/// Opaque to the client. Servers in the wild hand out either integers or
/// strings, so both are accepted and normalized to their text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MedicationId(String);

impl MedicationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MedicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for MedicationId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for MedicationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for MedicationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = MedicationId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or integer id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(MedicationId(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(MedicationId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(MedicationId(v.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// A single medication as returned by the API. Always carries an `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MedicationRecord {
    pub id: MedicationId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "dosagem")]
    pub dosage: String,
    #[serde(rename = "horario")]
    pub time: String,
}

/// Request payload for both creating and replacing a medication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MedicationPayload {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "dosagem")]
    pub dosage: String,
    #[serde(rename = "horario")]
    pub time: String,
}
