//! Named elliptic curves and public-key validation
//!
//! Public keys cross the wire as hex-encoded SEC1 points. A key is accepted only
//! if it decodes to a point on the configured curve; accepted keys are kept in
//! 33-byte compressed form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{CodecError, CodecResult};

/// Length of a compressed SEC1 point
pub const COMPRESSED_POINT_LEN: usize = 33;

/// Curves a public key may be validated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NamedCurve {
    /// NIST P-256
    #[default]
    Secp256r1,
    Secp256k1,
}

impl NamedCurve {
    pub fn name(&self) -> &'static str {
        match self {
            NamedCurve::Secp256r1 => "secp256r1",
            NamedCurve::Secp256k1 => "secp256k1",
        }
    }

    /// Check that `bytes` is a SEC1 point on this curve and return it compressed
    pub fn validate_point(&self, bytes: &[u8]) -> CodecResult<Vec<u8>> {
        match bytes.first() {
            Some(0x02) | Some(0x03) if bytes.len() == COMPRESSED_POINT_LEN => {}
            Some(0x04) if bytes.len() == 65 => {}
            _ => {
                return Err(CodecError::InvalidPublicKey {
                    reason: format!("{} bytes is not a SEC1 encoded point", bytes.len()),
                })
            }
        }

        let compressed = match self {
            NamedCurve::Secp256r1 => {
                use p256::elliptic_curve::sec1::ToEncodedPoint;
                let key = p256::PublicKey::from_sec1_bytes(bytes).map_err(|_| self.off_curve())?;
                key.to_encoded_point(true).as_bytes().to_vec()
            }
            NamedCurve::Secp256k1 => {
                use k256::elliptic_curve::sec1::ToEncodedPoint;
                let key = k256::PublicKey::from_sec1_bytes(bytes).map_err(|_| self.off_curve())?;
                key.to_encoded_point(true).as_bytes().to_vec()
            }
        };

        Ok(compressed)
    }

    fn off_curve(&self) -> CodecError {
        CodecError::InvalidPublicKey {
            reason: format!("point is not on {}", self.name()),
        }
    }
}

impl FromStr for NamedCurve {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "secp256r1" | "p256" | "p-256" | "prime256v1" => Ok(NamedCurve::Secp256r1),
            "secp256k1" | "k256" => Ok(NamedCurve::Secp256k1),
            _ => Err(CodecError::UnrecognizedType {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for NamedCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A validated, compressed public key
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    curve: NamedCurve,
    point: [u8; COMPRESSED_POINT_LEN],
}

impl PublicKey {
    /// Decode hex text (`0x` prefix optional) and validate it against `curve`
    pub fn parse(text: &str, curve: NamedCurve) -> CodecResult<Self> {
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        let bytes = hex::decode(digits).map_err(|e| CodecError::InvalidPublicKey {
            reason: format!("malformed hex: {}", e),
        })?;
        Self::from_sec1(&bytes, curve)
    }

    pub fn from_sec1(bytes: &[u8], curve: NamedCurve) -> CodecResult<Self> {
        let compressed = curve.validate_point(bytes)?;
        let point = compressed
            .as_slice()
            .try_into()
            .map_err(|_| CodecError::InvalidPublicKey {
                reason: format!("compressed point has {} bytes", compressed.len()),
            })?;
        Ok(Self { curve, point })
    }

    pub fn curve(&self) -> NamedCurve {
        self.curve
    }

    /// Compressed SEC1 encoding
    pub fn as_bytes(&self) -> &[u8] {
        &self.point
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.point))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}, {})", self.curve, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P256_GENERATOR: &str =
        "036b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296";
    const P256_GENERATOR_UNCOMPRESSED: &str = "046b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c2964fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5";
    const K256_GENERATOR: &str =
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    #[test]
    fn test_accepts_generator_points() {
        let key = PublicKey::parse(P256_GENERATOR, NamedCurve::Secp256r1).unwrap();
        assert_eq!(key.to_string(), P256_GENERATOR);
        assert_eq!(key.curve(), NamedCurve::Secp256r1);

        let key = PublicKey::parse(K256_GENERATOR, NamedCurve::Secp256k1).unwrap();
        assert_eq!(key.to_string(), K256_GENERATOR);
    }

    #[test]
    fn test_uncompressed_point_is_compressed() {
        let key = PublicKey::parse(P256_GENERATOR_UNCOMPRESSED, NamedCurve::Secp256r1).unwrap();
        assert_eq!(key.as_bytes().len(), COMPRESSED_POINT_LEN);
        assert_eq!(key.to_string(), P256_GENERATOR);
    }

    #[test]
    fn test_rejects_off_curve_point() {
        // x = 1 has no square root on P-256
        let mut bytes = vec![0u8; 33];
        bytes[0] = 0x02;
        bytes[32] = 0x01;
        let result = NamedCurve::Secp256r1.validate_point(&bytes);
        assert!(matches!(result, Err(CodecError::InvalidPublicKey { .. })));
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(matches!(
            PublicKey::parse("zz", NamedCurve::Secp256r1),
            Err(CodecError::InvalidPublicKey { .. })
        ));
        assert!(matches!(
            PublicKey::parse("0x02abcd", NamedCurve::Secp256r1),
            Err(CodecError::InvalidPublicKey { .. })
        ));
    }

    #[test]
    fn test_curve_names() {
        assert_eq!("P256".parse::<NamedCurve>().unwrap(), NamedCurve::Secp256r1);
        assert_eq!("Secp256K1".parse::<NamedCurve>().unwrap(), NamedCurve::Secp256k1);
        assert!("ed25519".parse::<NamedCurve>().is_err());
        assert_eq!(NamedCurve::Secp256k1.to_string(), "secp256k1");
    }
}
