//! Account Identifiers
//!
//! `crc32(h) || h` where `h = sha224(0x0A || "account-id" || principal || subaccount)`.
//! Both the prefix byte and the label are fixed by the ledger; changing either
//! changes every derived address.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha224};

use super::{crc32_be, AddressError, Principal};

/// Domain separator for account identifier hashing
const ACCOUNT_DOMAIN_SEPARATOR: &[u8] = b"\x0Aaccount-id";

pub const SUBACCOUNT_LEN: usize = 32;
pub const ACCOUNT_ID_LEN: usize = 32;

/// 32-byte discriminator for balances under one principal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SubAccount(pub [u8; SUBACCOUNT_LEN]);

impl SubAccount {
    pub fn as_bytes(&self) -> &[u8; SUBACCOUNT_LEN] {
        &self.0
    }
}

impl TryFrom<&[u8]> for SubAccount {
    type Error = AddressError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let array: [u8; SUBACCOUNT_LEN] =
            bytes
                .try_into()
                .map_err(|_| AddressError::InvalidInputLength {
                    expected: SUBACCOUNT_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }
}

impl From<[u8; SUBACCOUNT_LEN]> for SubAccount {
    fn from(bytes: [u8; SUBACCOUNT_LEN]) -> Self {
        Self(bytes)
    }
}

/// Ledger address: 4-byte big-endian CRC-32 followed by the 28-byte hash
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountIdentifier([u8; ACCOUNT_ID_LEN]);

impl AccountIdentifier {
    pub fn new(owner: &Principal, subaccount: &SubAccount) -> Self {
        let mut hasher = Sha224::new();
        hasher.update(ACCOUNT_DOMAIN_SEPARATOR);
        hasher.update(owner.as_slice());
        hasher.update(subaccount.as_bytes());
        let hash: [u8; 28] = hasher.finalize().into();

        let mut bytes = [0u8; ACCOUNT_ID_LEN];
        bytes[..4].copy_from_slice(&crc32_be(&hash));
        bytes[4..].copy_from_slice(&hash);
        Self(bytes)
    }

    /// Parse 64 hex characters and validate the checksum prefix
    pub fn from_hex(hex_str: &str) -> Result<Self, AddressError> {
        let bytes = hex::decode(hex_str).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        let array: [u8; ACCOUNT_ID_LEN] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| AddressError::InvalidInputLength {
                    expected: ACCOUNT_ID_LEN,
                    actual: bytes.len(),
                })?;

        let id = Self(array);
        let expected = crc32_be(id.hash());
        if id.checksum() != expected {
            return Err(AddressError::InvalidChecksum {
                expected: u32::from_be_bytes(expected),
                found: u32::from_be_bytes(id.checksum()),
            });
        }
        Ok(id)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LEN] {
        &self.0
    }

    pub fn checksum(&self) -> [u8; 4] {
        [self.0[0], self.0[1], self.0[2], self.0[3]]
    }

    pub fn hash(&self) -> &[u8] {
        &self.0[4..]
    }
}

impl fmt::Display for AccountIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for AccountIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountIdentifier({})", self.to_hex())
    }
}

impl FromStr for AccountIdentifier {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for AccountIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_hex().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AccountIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Derive the ledger address for `owner`, defaulting to the all-zero
/// sub-account. A supplied sub-account must be exactly 32 bytes.
pub fn derive_account_identifier(
    owner: &Principal,
    subaccount: Option<&[u8]>,
) -> Result<AccountIdentifier, AddressError> {
    let subaccount = match subaccount {
        Some(bytes) => SubAccount::try_from(bytes)?,
        None => SubAccount::default(),
    };
    Ok(AccountIdentifier::new(owner, &subaccount))
}
