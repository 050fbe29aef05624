//! Type-name vocabularies of the two value domains
//!
//! Names are matched case-insensitively on decode and written in their canonical
//! spelling on encode.

use std::fmt;

use crate::errors::{CodecError, CodecResult};

/// Kind tag of a [`StackValue`](crate::value::StackValue)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackValueType {
    /// The null value
    Any,
    Pointer,
    Boolean,
    Integer,
    ByteString,
    Buffer,
    Array,
    Struct,
    Map,
    InteropInterface,
}

impl StackValueType {
    pub const ALL: [StackValueType; 10] = [
        StackValueType::Any,
        StackValueType::Pointer,
        StackValueType::Boolean,
        StackValueType::Integer,
        StackValueType::ByteString,
        StackValueType::Buffer,
        StackValueType::Array,
        StackValueType::Struct,
        StackValueType::Map,
        StackValueType::InteropInterface,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StackValueType::Any => "Any",
            StackValueType::Pointer => "Pointer",
            StackValueType::Boolean => "Boolean",
            StackValueType::Integer => "Integer",
            StackValueType::ByteString => "ByteString",
            StackValueType::Buffer => "Buffer",
            StackValueType::Array => "Array",
            StackValueType::Struct => "Struct",
            StackValueType::Map => "Map",
            StackValueType::InteropInterface => "InteropInterface",
        }
    }

    /// Resolve a wire type name; `Null` is accepted as a spelling of `Any`
    pub fn parse(name: &str) -> CodecResult<Self> {
        if name.eq_ignore_ascii_case("Null") {
            return Ok(StackValueType::Any);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| CodecError::UnrecognizedType {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for StackValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind tag of a [`ContractParameter`](crate::value::ContractParameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractParameterType {
    Any,
    Boolean,
    Integer,
    ByteArray,
    String,
    Hash160,
    Hash256,
    PublicKey,
    Signature,
    Array,
    Map,
    InteropInterface,
    Void,
}

impl ContractParameterType {
    pub const ALL: [ContractParameterType; 13] = [
        ContractParameterType::Any,
        ContractParameterType::Boolean,
        ContractParameterType::Integer,
        ContractParameterType::ByteArray,
        ContractParameterType::String,
        ContractParameterType::Hash160,
        ContractParameterType::Hash256,
        ContractParameterType::PublicKey,
        ContractParameterType::Signature,
        ContractParameterType::Array,
        ContractParameterType::Map,
        ContractParameterType::InteropInterface,
        ContractParameterType::Void,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ContractParameterType::Any => "Any",
            ContractParameterType::Boolean => "Boolean",
            ContractParameterType::Integer => "Integer",
            ContractParameterType::ByteArray => "ByteArray",
            ContractParameterType::String => "String",
            ContractParameterType::Hash160 => "Hash160",
            ContractParameterType::Hash256 => "Hash256",
            ContractParameterType::PublicKey => "PublicKey",
            ContractParameterType::Signature => "Signature",
            ContractParameterType::Array => "Array",
            ContractParameterType::Map => "Map",
            ContractParameterType::InteropInterface => "InteropInterface",
            ContractParameterType::Void => "Void",
        }
    }

    pub fn parse(name: &str) -> CodecResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| CodecError::UnrecognizedType {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for ContractParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
