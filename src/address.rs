//! Conversion between account script hashes and address strings
//!
//! An address is the base58 encoding of `version ++ script_hash ++ checksum`,
//! where the checksum is the first four bytes of a double SHA-256 over the
//! first 21 bytes.

use log::debug;
use multibase::Base;
use sha2::{Digest, Sha256};

use crate::config::CodecConfig;
use crate::errors::{CodecError, CodecResult};
use crate::hash::UInt160;

const CHECKSUM_LEN: usize = 4;
const PAYLOAD_LEN: usize = 1 + UInt160::LEN;

/// Address conversion bound to one network's address version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressCodec {
    address_version: u8,
}

impl AddressCodec {
    pub fn new(address_version: u8) -> Self {
        Self { address_version }
    }

    pub fn from_config(config: &CodecConfig) -> Self {
        Self::new(config.address_version)
    }

    pub fn address_version(&self) -> u8 {
        self.address_version
    }

    /// Accepts either a hex script hash or an address
    pub fn to_script_hash(&self, address: &str) -> CodecResult<UInt160> {
        address_to_script_hash(address, self.address_version)
    }

    /// Like [`to_script_hash`](Self::to_script_hash) but without the error detail
    pub fn try_to_script_hash(&self, address: &str) -> Option<UInt160> {
        try_address_to_script_hash(address, self.address_version)
    }

    pub fn to_address(&self, script_hash: &UInt160) -> String {
        script_hash_to_address(script_hash, self.address_version)
    }
}

/// Resolve `address` to a script hash
///
/// A fixed-width hex script hash is taken as is; anything else must be an
/// address for `address_version`.
pub fn address_to_script_hash(address: &str, address_version: u8) -> CodecResult<UInt160> {
    if let Ok(script_hash) = UInt160::parse(address) {
        return Ok(script_hash);
    }

    let payload = base58check_decode(address).map_err(|err| {
        debug!("Rejected address '{}': {}", address, err);
        err
    })?;
    if payload.len() != PAYLOAD_LEN {
        return Err(CodecError::address(format!(
            "payload is {} bytes, expected {}",
            payload.len(),
            PAYLOAD_LEN
        )));
    }
    if payload[0] != address_version {
        return Err(CodecError::address(format!(
            "address version {} does not match network version {}",
            payload[0], address_version
        )));
    }
    UInt160::from_slice(&payload[1..])
}

/// Same acceptance as [`address_to_script_hash`]; `None` on any failure
///
/// Callers wanting the zero-hash convention use `unwrap_or(UInt160::ZERO)`.
pub fn try_address_to_script_hash(address: &str, address_version: u8) -> Option<UInt160> {
    address_to_script_hash(address, address_version).ok()
}

pub fn script_hash_to_address(script_hash: &UInt160, address_version: u8) -> String {
    let mut payload = Vec::with_capacity(PAYLOAD_LEN);
    payload.push(address_version);
    payload.extend_from_slice(script_hash.as_bytes());
    base58check_encode(&payload)
}

fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = Sha256::digest(Sha256::digest(data));
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

fn base58check_encode(payload: &[u8]) -> String {
    let mut data = payload.to_vec();
    data.extend_from_slice(&checksum(payload));
    // drop the multibase prefix character
    multibase::encode(Base::Base58Btc, &data)[1..].to_string()
}

fn base58check_decode(text: &str) -> CodecResult<Vec<u8>> {
    if text.is_empty() {
        return Err(CodecError::address("empty address"));
    }

    let prefixed = format!("{}{}", Base::Base58Btc.code(), text);
    let (_, mut data) =
        multibase::decode(prefixed).map_err(|e| CodecError::encoding("base58", e))?;

    if data.len() < CHECKSUM_LEN {
        return Err(CodecError::address("too short to carry a checksum"));
    }
    let payload_len = data.len() - CHECKSUM_LEN;
    if checksum(&data[..payload_len]) != data[payload_len..] {
        return Err(CodecError::address("checksum mismatch"));
    }
    data.truncate(payload_len);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_round_trip() {
        let payload = [0x35u8, 1, 2, 3];
        let encoded = base58check_encode(&payload);
        assert_eq!(base58check_decode(&encoded).unwrap(), payload.to_vec());
    }

    #[test]
    fn test_corrupted_checksum() {
        let encoded = base58check_encode(&[0x35u8; 21]);
        let mut chars: Vec<char> = encoded.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == '1' { '2' } else { '1' };
        let corrupted: String = chars.into_iter().collect();

        assert!(matches!(
            base58check_decode(&corrupted),
            Err(CodecError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_invalid_alphabet() {
        // '0', 'O', 'I' and 'l' are not in the base58 alphabet
        assert!(matches!(
            base58check_decode("N0Il"),
            Err(CodecError::InvalidEncoding { .. })
        ));
    }

    #[test]
    fn test_codec_uses_configured_version() {
        let codec = AddressCodec::from_config(&CodecConfig::default());
        assert_eq!(codec.address_version(), 0x35);
        assert!(codec.to_address(&UInt160::ZERO).starts_with('N'));
    }
}
