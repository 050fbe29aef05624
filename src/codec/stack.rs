//! Stack value codec
//!
//! Encoding walks the value graph keeping the identities of the compound values
//! currently being encoded. Meeting one of those again means the graph has a
//! cycle. An identity leaves the set once its children are done, so an object
//! reachable along two separate paths is expanded in full at each position.

use log::{debug, trace, warn};
use serde_json::Value;
use std::collections::HashSet;

use crate::codec::wire::{
    self, as_object, decode_base64, encode_base64, expect_bool, field, parse_integer, KEY_FIELD,
    VALUE_FIELD,
};
use crate::config::{CodecConfig, FallbackPolicy, ShapeChecking};
use crate::errors::{CodecError, CodecResult};
use crate::value::{MapEntries, PrimitiveValue, StackValue, StackValueType};

/// Encodes one value tree; holds the per-call ancestor set
pub struct StackValueEncoder<'c> {
    config: &'c CodecConfig,
    ancestors: HashSet<usize>,
}

impl<'c> StackValueEncoder<'c> {
    pub fn new(config: &'c CodecConfig) -> Self {
        Self {
            config,
            ancestors: HashSet::new(),
        }
    }

    pub fn encode(&mut self, value: &StackValue) -> CodecResult<Value> {
        trace!("Encoding {} value", value.kind());
        match value {
            StackValue::Null => Ok(null_wire()),
            StackValue::Boolean(b) => Ok(wire::wire(StackValueType::Boolean.name(), Value::Bool(*b))),
            StackValue::Integer(i) => Ok(wire::wire(
                StackValueType::Integer.name(),
                Value::String(i.to_string()),
            )),
            StackValue::ByteString(bytes) => {
                Ok(wire::wire(StackValueType::ByteString.name(), encode_base64(bytes)))
            }
            StackValue::Buffer(bytes) => {
                Ok(wire::wire(StackValueType::Buffer.name(), encode_base64(bytes)))
            }
            StackValue::InteropInterface(bytes) => Ok(wire::wire(
                StackValueType::InteropInterface.name(),
                encode_base64(bytes),
            )),
            StackValue::Pointer(offset) => {
                Ok(wire::wire(StackValueType::Pointer.name(), Value::from(*offset)))
            }
            StackValue::Array(items) | StackValue::Struct(items) => {
                self.encode_compound(value.kind(), items.id(), |encoder| {
                    let items = items.borrow();
                    let encoded = items
                        .iter()
                        .map(|item| encoder.encode(item))
                        .collect::<CodecResult<Vec<_>>>()?;
                    Ok(Value::Array(encoded))
                })
            }
            StackValue::Map(entries) => {
                self.encode_compound(StackValueType::Map, entries.id(), |encoder| {
                    let entries = entries.borrow();
                    let mut pairs = Vec::with_capacity(entries.len());
                    for (key, value) in entries.iter() {
                        let mut pair = serde_json::Map::new();
                        pair.insert(KEY_FIELD.to_string(), encode_primitive(key));
                        pair.insert(VALUE_FIELD.to_string(), encoder.encode(value)?);
                        pairs.push(Value::Object(pair));
                    }
                    Ok(Value::Array(pairs))
                })
            }
        }
    }

    fn encode_compound<F>(&mut self, kind: StackValueType, id: usize, body: F) -> CodecResult<Value>
    where
        F: FnOnce(&mut Self) -> CodecResult<Value>,
    {
        if !self.ancestors.insert(id) {
            return match self.config.fallback {
                FallbackPolicy::FailFast => {
                    debug!("Refusing to encode cyclic {} value", kind);
                    Err(CodecError::CyclicValue {
                        kind: kind.name().to_string(),
                    })
                }
                FallbackPolicy::EmitNull => {
                    warn!("Cyclic {} value replaced with null", kind);
                    Ok(null_wire())
                }
            };
        }

        if self.ancestors.len() > self.config.max_depth {
            self.ancestors.remove(&id);
            return Err(CodecError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }

        let result = body(self);
        self.ancestors.remove(&id);
        Ok(wire::wire(kind.name(), result?))
    }
}

/// Decodes one wire tree
pub struct StackValueDecoder<'c> {
    config: &'c CodecConfig,
    depth: usize,
}

impl<'c> StackValueDecoder<'c> {
    pub fn new(config: &'c CodecConfig) -> Self {
        Self { config, depth: 0 }
    }

    pub fn decode(&mut self, json: &Value) -> CodecResult<StackValue> {
        let object = as_object(json)?;

        // A missing, non-string or unknown type name is one case for the fallback policy
        let resolved = wire::type_name(object).and_then(|name| {
            let name = name.ok_or_else(|| CodecError::UnrecognizedType {
                name: String::new(),
            })?;
            StackValueType::parse(name)
        });

        let kind = match resolved {
            Ok(kind) => kind,
            Err(CodecError::UnrecognizedType { name }) => match self.config.fallback {
                FallbackPolicy::FailFast => {
                    debug!("Unrecognized stack value type '{}'", name);
                    return Err(CodecError::UnrecognizedType { name });
                }
                FallbackPolicy::EmitNull => {
                    warn!("Unrecognized stack value type '{}' decoded as null", name);
                    return Ok(StackValue::Null);
                }
            },
            Err(err) => return Err(err),
        };

        if kind == StackValueType::Any {
            return Ok(StackValue::Null);
        }

        let value = field(object, VALUE_FIELD)?.ok_or_else(|| CodecError::missing_field(VALUE_FIELD))?;
        trace!("Decoding {} value", kind);

        match kind {
            StackValueType::Any => Ok(StackValue::Null),
            StackValueType::Boolean => Ok(StackValue::Boolean(expect_bool(value)?)),
            StackValueType::Integer => Ok(StackValue::Integer(parse_integer(value)?)),
            StackValueType::ByteString => Ok(StackValue::ByteString(decode_base64(value)?)),
            StackValueType::Buffer => Ok(StackValue::Buffer(decode_base64(value)?)),
            StackValueType::InteropInterface => {
                Ok(StackValue::InteropInterface(decode_base64(value)?))
            }
            StackValueType::Pointer => Ok(StackValue::Pointer(decode_offset(value)?)),
            StackValueType::Array => Ok(StackValue::array(self.decode_items(kind, value)?)),
            StackValueType::Struct => Ok(StackValue::structure(self.decode_items(kind, value)?)),
            StackValueType::Map => Ok(StackValue::map(self.decode_entries(value)?)),
        }
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

    /// The payload of a compound value, or `None` when lenient and malformed
    fn compound_payload<'v>(
        &self,
        kind: StackValueType,
        value: &'v Value,
    ) -> CodecResult<Option<&'v Vec<Value>>> {
        match value.as_array() {
            Some(items) => Ok(Some(items)),
            None => match self.config.shape_checking {
                ShapeChecking::Strict => Err(CodecError::shape_mismatch("array", value)),
                ShapeChecking::Lenient => {
                    warn!("{} payload is not an array, decoding as empty", kind);
                    Ok(None)
                }
            },
        }
    }

    fn decode_items(&mut self, kind: StackValueType, value: &Value) -> CodecResult<Vec<StackValue>> {
        let Some(items) = self.compound_payload(kind, value)? else {
            return Ok(Vec::new());
        };
        self.descend(|decoder| items.iter().map(|item| decoder.decode(item)).collect())
    }

    fn decode_entries(&mut self, value: &Value) -> CodecResult<MapEntries> {
        let Some(pairs) = self.compound_payload(StackValueType::Map, value)? else {
            return Ok(MapEntries::new());
        };

        self.descend(|decoder| {
            let mut entries = MapEntries::new();
            for pair in pairs {
                let Some(object) = pair.as_object() else {
                    if decoder.config.shape_checking == ShapeChecking::Strict {
                        return Err(CodecError::shape_mismatch("key/value object", pair));
                    }
                    warn!("Skipping map pair that is not an object");
                    continue;
                };

                let (Some(key), Some(value)) = (field(object, KEY_FIELD)?, field(object, VALUE_FIELD)?)
                else {
                    debug!("Skipping map pair without both key and value");
                    continue;
                };

                let key = PrimitiveValue::try_from(decoder.decode(key)?)?;
                let value = decoder.decode(value)?;
                entries.insert(key, value);
            }
            Ok(entries)
        })
    }
}

fn null_wire() -> Value {
    wire::wire(StackValueType::Any.name(), Value::Null)
}

fn encode_primitive(key: &PrimitiveValue) -> Value {
    match key {
        PrimitiveValue::Boolean(b) => wire::wire(StackValueType::Boolean.name(), Value::Bool(*b)),
        PrimitiveValue::Integer(i) => {
            wire::wire(StackValueType::Integer.name(), Value::String(i.to_string()))
        }
        PrimitiveValue::ByteString(bytes) => {
            wire::wire(StackValueType::ByteString.name(), encode_base64(bytes))
        }
        PrimitiveValue::Buffer(bytes) => wire::wire(StackValueType::Buffer.name(), encode_base64(bytes)),
    }
}

/// Pointer payload: a JSON integer in `i32` range
fn decode_offset(value: &Value) -> CodecResult<i32> {
    if !value.is_number() {
        return Err(CodecError::type_mismatch("number", value));
    }
    let out_of_range = || CodecError::NumberFormat {
        input: value.to_string(),
        reason: "not a 32-bit signed offset".to_string(),
    };
    let offset = value.as_i64().ok_or_else(out_of_range)?;
    i32::try_from(offset).map_err(|_| out_of_range())
}

/// Encode a stack value to its wire form
pub fn encode_stack_value(value: &StackValue, config: &CodecConfig) -> CodecResult<Value> {
    StackValueEncoder::new(config).encode(value)
}

/// Decode a wire value into a fresh stack value tree
pub fn decode_stack_value(json: &Value, config: &CodecConfig) -> CodecResult<StackValue> {
    StackValueDecoder::new(config).decode(json)
}
