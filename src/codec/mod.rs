//! JSON wire codecs
//!
//! Every wire value is an object with a `type` field naming the kind and a
//! `value` field whose shape depends on that kind. Binary payloads are base64,
//! hashes and public keys are hex, and integers are decimal strings.
//!
//! Both codecs are pure: the only state is local to one call, so a single
//! [`CodecConfig`] can serve any number of concurrent calls.

mod parameter;
mod stack;
pub mod wire;

pub use parameter::{decode_contract_parameter, encode_contract_parameter, ContractParameterDecoder};
pub use stack::{decode_stack_value, encode_stack_value, StackValueDecoder, StackValueEncoder};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::{CodecConfig, DEFAULT_CONFIG};
use crate::errors::CodecResult;
use crate::value::{ContractParameter, StackValue};

/// Decode a stack value from JSON text
pub fn decode_stack_value_str(text: &str, config: &CodecConfig) -> CodecResult<StackValue> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    decode_stack_value(&json, config)
}

/// Encode a stack value to compact JSON text
pub fn encode_stack_value_string(value: &StackValue, config: &CodecConfig) -> CodecResult<String> {
    let json = encode_stack_value(value, config)?;
    Ok(serde_json::to_string(&json)?)
}

/// Decode a contract parameter from JSON text
pub fn decode_contract_parameter_str(
    text: &str,
    config: &CodecConfig,
) -> CodecResult<ContractParameter> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    decode_contract_parameter(&json, config)
}

impl Serialize for StackValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode_stack_value(self, &DEFAULT_CONFIG)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StackValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        decode_stack_value(&json, &DEFAULT_CONFIG).map_err(serde::de::Error::custom)
    }
}

/// Read-only: serializing a parameter reports `NotSupported`
impl Serialize for ContractParameter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match encode_contract_parameter(self, &DEFAULT_CONFIG) {
            Ok(json) => json.serialize(serializer),
            Err(err) => Err(serde::ser::Error::custom(err)),
        }
    }
}

impl<'de> Deserialize<'de> for ContractParameter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        decode_contract_parameter(&json, &DEFAULT_CONFIG).map_err(serde::de::Error::custom)
    }
}
