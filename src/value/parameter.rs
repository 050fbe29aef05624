//! Contract-call parameters
//!
//! A separate and simpler vocabulary than stack values: no shared references,
//! so a parameter is an ordinary owned tree.

use num_bigint::BigInt;
use std::fmt;

use crate::crypto::PublicKey;
use crate::hash::{UInt160, UInt256};
use crate::value::kind::ContractParameterType;

/// An argument or return value of a contract invocation
#[derive(Debug, Clone, PartialEq)]
pub enum ContractParameter {
    /// Untyped, carries no payload
    Any,
    Boolean(bool),
    Integer(BigInt),
    ByteArray(Vec<u8>),
    String(String),
    Hash160(UInt160),
    Hash256(UInt256),
    PublicKey(PublicKey),
    /// Raw signature bytes, length unconstrained
    Signature(Vec<u8>),
    Array(Vec<ContractParameter>),
    /// Ordered pairs; keys may be any parameter kind
    Map(Vec<(ContractParameter, ContractParameter)>),
    InteropInterface,
    Void,
}

impl ContractParameter {
    pub fn param_type(&self) -> ContractParameterType {
        match self {
            ContractParameter::Any => ContractParameterType::Any,
            ContractParameter::Boolean(_) => ContractParameterType::Boolean,
            ContractParameter::Integer(_) => ContractParameterType::Integer,
            ContractParameter::ByteArray(_) => ContractParameterType::ByteArray,
            ContractParameter::String(_) => ContractParameterType::String,
            ContractParameter::Hash160(_) => ContractParameterType::Hash160,
            ContractParameter::Hash256(_) => ContractParameterType::Hash256,
            ContractParameter::PublicKey(_) => ContractParameterType::PublicKey,
            ContractParameter::Signature(_) => ContractParameterType::Signature,
            ContractParameter::Array(_) => ContractParameterType::Array,
            ContractParameter::Map(_) => ContractParameterType::Map,
            ContractParameter::InteropInterface => ContractParameterType::InteropInterface,
            ContractParameter::Void => ContractParameterType::Void,
        }
    }

    /// Human-readable rendering with the type name of every node
    pub fn describe(&self) -> String {
        match self {
            ContractParameter::Any => "Any".into(),
            ContractParameter::Boolean(b) => format!("Boolean({})", b),
            ContractParameter::Integer(i) => format!("Integer({})", i),
            ContractParameter::ByteArray(bytes) => format!("ByteArray(0x{})", hex::encode(bytes)),
            ContractParameter::String(s) => format!("String({:?})", s),
            ContractParameter::Hash160(hash) => format!("Hash160({})", hash),
            ContractParameter::Hash256(hash) => format!("Hash256({})", hash),
            ContractParameter::PublicKey(key) => format!("PublicKey({})", key),
            ContractParameter::Signature(bytes) => format!("Signature(0x{})", hex::encode(bytes)),
            ContractParameter::Array(items) => {
                let inner: Vec<String> = items.iter().map(|p| p.describe()).collect();
                format!("Array[{}]", inner.join(", "))
            }
            ContractParameter::Map(pairs) => {
                let inner: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.describe(), v.describe()))
                    .collect();
                format!("Map{{{}}}", inner.join(", "))
            }
            ContractParameter::InteropInterface => "InteropInterface".into(),
            ContractParameter::Void => "Void".into(),
        }
    }
}

impl fmt::Display for ContractParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_nested() {
        let param = ContractParameter::Array(vec![
            ContractParameter::Integer(BigInt::from(-7)),
            ContractParameter::Map(vec![(
                ContractParameter::String("k".into()),
                ContractParameter::ByteArray(vec![0xde, 0xad]),
            )]),
            ContractParameter::Any,
        ]);

        assert_eq!(
            param.describe(),
            "Array[Integer(-7), Map{String(\"k\"): ByteArray(0xdead)}, Any]"
        );
        assert_eq!(param.to_string(), param.describe());
    }

    #[test]
    fn test_param_type() {
        assert_eq!(
            ContractParameter::Hash160(UInt160::ZERO).param_type(),
            ContractParameterType::Hash160
        );
        assert_eq!(ContractParameter::Void.param_type().name(), "Void");
    }
}
