//! Principal identities and their textual encoding.

use std::fmt;
use std::str::FromStr;

use data_encoding::BASE32_NOPAD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{crc32_be, AddressError};

/// Maximum length of a principal's canonical byte form
pub const MAX_PRINCIPAL_LEN: usize = 29;

const GROUP_LEN: usize = 5;

/// Public identity of a user or canister.
///
/// Holds the canonical bytes only; the textual form (`2vxsx-fae`) is derived
/// on demand.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Principal {
    bytes: Vec<u8>,
}

impl Principal {
    /// Build a principal from its canonical bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        if bytes.len() > MAX_PRINCIPAL_LEN {
            return Err(AddressError::PrincipalTooLong(bytes.len()));
        }
        Ok(Self { bytes: bytes.to_vec() })
    }

    /// The anonymous principal used by unauthenticated callers
    pub fn anonymous() -> Self {
        Self { bytes: vec![0x04] }
    }

    /// The management canister (empty principal)
    pub fn management() -> Self {
        Self { bytes: Vec::new() }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_anonymous(&self) -> bool {
        self.bytes == [0x04]
    }

    /// Parse the dashed base32 text form, verifying the CRC prefix.
    pub fn from_text(text: &str) -> Result<Self, AddressError> {
        let lowered = text.trim().to_ascii_lowercase();
        let compact: String = lowered.chars().filter(|c| *c != '-').collect();

        // Nonzero trailing bits are rejected by the decoder
        let decoded = BASE32_NOPAD
            .decode(compact.to_ascii_uppercase().as_bytes())
            .map_err(|e| AddressError::InvalidText(format!("bad base32 in {text:?}: {e}")))?;
        if decoded.len() < 4 {
            return Err(AddressError::InvalidText(format!("{text:?} is too short")));
        }

        let (checksum, bytes) = decoded.split_at(4);
        let principal = Self::from_slice(bytes)?;

        let expected = crc32_be(bytes);
        if checksum != expected {
            return Err(AddressError::InvalidChecksum {
                expected: u32::from_be_bytes(expected),
                found: u32::from_be_bytes([checksum[0], checksum[1], checksum[2], checksum[3]]),
            });
        }

        // Reject alternative groupings of otherwise valid text
        if principal.to_text() != lowered {
            return Err(AddressError::InvalidText(format!(
                "{text:?} is not in canonical form"
            )));
        }

        Ok(principal)
    }

    pub fn to_text(&self) -> String {
        let mut payload = Vec::with_capacity(4 + self.bytes.len());
        payload.extend_from_slice(&crc32_be(&self.bytes));
        payload.extend_from_slice(&self.bytes);

        let encoded = BASE32_NOPAD.encode(&payload).to_ascii_lowercase();
        encoded
            .as_bytes()
            .chunks(GROUP_LEN)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal({})", self.to_text())
    }
}

impl FromStr for Principal {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_text().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Principal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_text(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_text_forms() {
        assert_eq!(Principal::anonymous().to_text(), "2vxsx-fae");
        assert_eq!(Principal::management().to_text(), "aaaaa-aa");

        let ledger = Principal::from_slice(&[0, 0, 0, 0, 0, 0, 0, 2, 1, 1]).unwrap();
        assert_eq!(ledger.to_text(), "ryjl3-tyaaa-aaaaa-aaaba-cai");
    }

    #[test]
    fn test_parse_text() {
        let principal = Principal::from_text("kw6ia-hibai-bq").unwrap();
        assert_eq!(principal.as_slice(), &[1, 2, 3]);

        let upper = Principal::from_text("RYJL3-TYAAA-AAAAA-AAABA-CAI").unwrap();
        assert_eq!(upper.as_slice(), &[0, 0, 0, 0, 0, 0, 0, 2, 1, 1]);

        assert!(Principal::from_text("2vxsx-fae").unwrap().is_anonymous());
    }

    #[test]
    fn test_rejects_bad_checksum() {
        let err = Principal::from_text("kw6ib-hibai-bq").unwrap_err();
        assert_eq!(
            err,
            AddressError::InvalidChecksum {
                expected: 0x55bc_801d,
                found: 0x55bc_809d,
            }
        );

        // only the trailing bits differ
        assert!(matches!(
            Principal::from_text("kw6ia-hibai-bu"),
            Err(AddressError::InvalidText(_))
        ));
    }

    #[test]
    fn test_rejects_bad_alphabet_and_grouping() {
        assert!(matches!(
            Principal::from_text("2vxsx-fa1"),
            Err(AddressError::InvalidText(_))
        ));
        assert!(matches!(
            Principal::from_text("2vxsxfae"),
            Err(AddressError::InvalidText(_))
        ));
    }

    #[test]
    fn test_length_bound() {
        assert!(Principal::from_slice(&[7u8; MAX_PRINCIPAL_LEN]).is_ok());
        assert_eq!(
            Principal::from_slice(&[7u8; 30]).unwrap_err(),
            AddressError::PrincipalTooLong(30)
        );
    }

    #[test]
    fn test_text_round_trip_for_max_length() {
        let principal = Principal::from_slice(&[0xabu8; MAX_PRINCIPAL_LEN]).unwrap();
        let parsed: Principal = principal.to_text().parse().unwrap();
        assert_eq!(parsed, principal);
    }

    #[test]
    fn test_serde_uses_text_form() {
        let json = serde_json::to_string(&Principal::anonymous()).unwrap();
        assert_eq!(json, "\"2vxsx-fae\"");

        let back: Principal = serde_json::from_str(&json).unwrap();
        assert!(back.is_anonymous());
    }
}
