//! Contract parameter codec
//!
//! Only the decode direction exists. Parameters flow in from clients as call
//! arguments; encoding them back out is refused with `NotSupported`.

use log::{debug, trace};
use serde_json::Value;

use crate::codec::wire::{
    self, as_object, decode_base64, expect_bool, expect_str, field, parse_integer, KEY_FIELD,
    TYPE_FIELD, VALUE_FIELD,
};
use crate::config::CodecConfig;
use crate::crypto::PublicKey;
use crate::errors::{CodecError, CodecResult};
use crate::hash::{UInt160, UInt256};
use crate::value::{ContractParameter, ContractParameterType};

/// Decodes one wire tree into a [`ContractParameter`]
pub struct ContractParameterDecoder<'c> {
    config: &'c CodecConfig,
    depth: usize,
}

impl<'c> ContractParameterDecoder<'c> {
    pub fn new(config: &'c CodecConfig) -> Self {
        Self { config, depth: 0 }
    }

    pub fn decode(&mut self, json: &Value) -> CodecResult<ContractParameter> {
        let object = as_object(json)?;
        let name = wire::type_name(object)?.ok_or_else(|| CodecError::missing_field(TYPE_FIELD))?;
        let value = field(object, VALUE_FIELD)?.ok_or_else(|| CodecError::missing_field(VALUE_FIELD))?;

        let param_type = ContractParameterType::parse(name).map_err(|err| {
            debug!("Unrecognized contract parameter type '{}'", name);
            err
        })?;
        trace!("Decoding {} parameter", param_type);

        match param_type {
            ContractParameterType::Any => Ok(ContractParameter::Any),
            ContractParameterType::Boolean => Ok(ContractParameter::Boolean(expect_bool(value)?)),
            ContractParameterType::Integer => Ok(ContractParameter::Integer(parse_integer(value)?)),
            ContractParameterType::ByteArray => Ok(ContractParameter::ByteArray(decode_base64(value)?)),
            ContractParameterType::Signature => Ok(ContractParameter::Signature(decode_base64(value)?)),
            ContractParameterType::String => Ok(ContractParameter::String(expect_str(value)?.to_string())),
            ContractParameterType::Hash160 => {
                Ok(ContractParameter::Hash160(UInt160::parse(expect_str(value)?)?))
            }
            ContractParameterType::Hash256 => {
                Ok(ContractParameter::Hash256(UInt256::parse(expect_str(value)?)?))
            }
            ContractParameterType::PublicKey => {
                let text = expect_str(value)?;
                let key = PublicKey::parse(text, self.config.curve).map_err(|err| {
                    debug!("Rejected public key '{}': {}", text, err);
                    err
                })?;
                Ok(ContractParameter::PublicKey(key))
            }
            ContractParameterType::Array => {
                let items = value
                    .as_array()
                    .ok_or_else(|| CodecError::shape_mismatch("array", value))?;
                let items = self.descend(|decoder| {
                    items.iter().map(|item| decoder.decode(item)).collect()
                })?;
                Ok(ContractParameter::Array(items))
            }
            ContractParameterType::Map => {
                let pairs = value
                    .as_array()
                    .ok_or_else(|| CodecError::shape_mismatch("array", value))?;
                let pairs = self.descend(|decoder| {
                    pairs.iter().map(|pair| decoder.decode_pair(pair)).collect()
                })?;
                Ok(ContractParameter::Map(pairs))
            }
            ContractParameterType::InteropInterface | ContractParameterType::Void => {
                Err(CodecError::NotSupported {
                    operation: format!("decoding {} contract parameters", param_type),
                })
            }
        }
    }

    fn decode_pair(&mut self, pair: &Value) -> CodecResult<(ContractParameter, ContractParameter)> {
        let object = pair
            .as_object()
            .ok_or_else(|| CodecError::shape_mismatch("key/value object", pair))?;
        let key = field(object, KEY_FIELD)?.ok_or_else(|| CodecError::missing_field(KEY_FIELD))?;
        let value = field(object, VALUE_FIELD)?.ok_or_else(|| CodecError::missing_field(VALUE_FIELD))?;
        Ok((self.decode(key)?, self.decode(value)?))
    }

    fn descend<T, F>(&mut self, body: F) -> CodecResult<T>
    where
        F: FnOnce(&mut Self) -> CodecResult<T>,
    {
        if self.depth >= self.config.max_depth {
            return Err(CodecError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }
}

/// Decode a wire value into a fresh contract parameter tree
pub fn decode_contract_parameter(json: &Value, config: &CodecConfig) -> CodecResult<ContractParameter> {
    ContractParameterDecoder::new(config).decode(json)
}

/// Always fails: contract parameters are decode-only
pub fn encode_contract_parameter(
    param: &ContractParameter,
    _config: &CodecConfig,
) -> CodecResult<Value> {
    Err(CodecError::NotSupported {
        operation: format!("encoding {} contract parameters", param.param_type()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields() {
        let config = CodecConfig::default();
        assert_eq!(
            decode_contract_parameter(&json!({"value": 1}), &config),
            Err(CodecError::missing_field("type"))
        );
        assert_eq!(
            decode_contract_parameter(&json!({"type": "Any"}), &config),
            Err(CodecError::missing_field("value"))
        );
    }

    #[test]
    fn test_any_ignores_value() {
        let config = CodecConfig::default();
        assert_eq!(
            decode_contract_parameter(&json!({"type": "any", "value": [1, 2]}), &config).unwrap(),
            ContractParameter::Any
        );
    }

    #[test]
    fn test_void_and_interop_not_supported() {
        let config = CodecConfig::default();
        for name in ["Void", "InteropInterface"] {
            assert!(matches!(
                decode_contract_parameter(&json!({"type": name, "value": null}), &config),
                Err(CodecError::NotSupported { .. })
            ));
        }
    }

    #[test]
    fn test_encode_not_supported() {
        let err = encode_contract_parameter(&ContractParameter::Any, &CodecConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            CodecError::NotSupported {
                operation: "encoding Any contract parameters".to_string()
            }
        );
    }

    #[test]
    fn test_map_pair_must_be_object() {
        let config = CodecConfig::default();
        let json = json!({"type": "Map", "value": [[1, 2]]});
        assert!(matches!(
            decode_contract_parameter(&json, &config),
            Err(CodecError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_map_pair_missing_key() {
        let config = CodecConfig::default();
        let json = json!({"type": "Map", "value": [{"value": {"type": "Any", "value": null}}]});
        assert_eq!(
            decode_contract_parameter(&json, &config),
            Err(CodecError::missing_field("key"))
        );
    }
}
