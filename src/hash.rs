//! Fixed-width hash identifiers
//!
//! Bytes are stored little-endian. Text form is big-endian hex with an optional
//! `0x` prefix, so `Display` reverses the stored order.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::{CodecError, CodecResult};

macro_rules! fixed_hash {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name([u8; $len]);

        impl $name {
            /// Width in bytes
            pub const LEN: usize = $len;

            /// The all-zero identifier
            pub const ZERO: $name = $name([0u8; $len]);

            /// Wrap bytes already in storage (little-endian) order
            pub fn from_le_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Copy a storage-order slice, which must be exactly `LEN` bytes
            pub fn from_slice(bytes: &[u8]) -> CodecResult<Self> {
                let array: [u8; $len] =
                    bytes
                        .try_into()
                        .map_err(|_| CodecError::InvalidHashLength {
                            expected: $len,
                            actual: bytes.len(),
                        })?;
                Ok(Self::from_le_bytes(array))
            }

            /// Parse big-endian hex text, `0x` prefix optional
            pub fn parse(text: &str) -> CodecResult<Self> {
                let digits = text
                    .strip_prefix("0x")
                    .or_else(|| text.strip_prefix("0X"))
                    .unwrap_or(text);
                let mut bytes = hex::decode(digits).map_err(|e| CodecError::encoding("hex", e))?;
                if bytes.len() != $len {
                    return Err(CodecError::InvalidHashLength {
                        expected: $len,
                        actual: bytes.len(),
                    });
                }
                bytes.reverse();
                Self::from_slice(&bytes)
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }
        }

        impl FromStr for $name {
            type Err = CodecError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut be = self.0;
                be.reverse();
                write!(f, "0x{}", hex::encode(be))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                Self::parse(&text).map_err(serde::de::Error::custom)
            }
        }
    };
}

fixed_hash!(
    /// 20-byte identifier: script hashes and account identifiers
    UInt160,
    20
);

fixed_hash!(
    /// 32-byte identifier: transaction and block hashes
    UInt256,
    32
);
