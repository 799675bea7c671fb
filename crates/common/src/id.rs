//! Object identifiers for users and conversations
//!
//! An `ObjectId` is 12 bytes rendered as 24 lowercase hex characters:
//! - bytes 0..4: seconds since the unix epoch, big-endian
//! - bytes 4..12: random
//!
//! The leading timestamp keeps ids roughly creation-ordered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::crypto::random_bytes;
use crate::error::{Error, Result};
use crate::validation::validate_object_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Generate a fresh id stamped with the current time
    pub fn generate() -> Result<Self> {
        Self::generate_at(Utc::now())
    }

    /// Generate an id stamped with the given time
    pub fn generate_at(at: DateTime<Utc>) -> Result<Self> {
        let random: [u8; 8] = random_bytes()?;
        let secs = at.timestamp().clamp(0, u32::MAX as i64) as u32;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..].copy_from_slice(&random);
        Ok(ObjectId(bytes))
    }

    /// Parse a 24-character lowercase hex id
    pub fn parse(s: &str) -> Result<Self> {
        if !validate_object_id(s) {
            return Err(Error::Validation(format!(
                "Invalid id '{}': expected 24 lowercase hex characters",
                s
            )));
        }

        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|_| Error::Validation(format!("Invalid id '{}'", s)))?;
        Ok(ObjectId(bytes))
    }

    /// Creation time encoded in the id (second precision)
    pub fn timestamp(&self) -> DateTime<Utc> {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        DateTime::from_timestamp(secs as i64, 0).unwrap_or_default()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ObjectId::parse(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ObjectId::parse(&s).map_err(serde::de::Error::custom)
    }
}
