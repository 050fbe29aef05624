//! JSON wire codec for VM stack values and contract parameters
//!
//! Stack values are the runtime values of the virtual machine. They may share
//! and even cycle through compound children, so encoding tracks the compound
//! values currently on the path and refuses to loop. Contract parameters are
//! the typed arguments clients send in; they are decode-only.

pub mod address;
pub mod cli;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod hash;
pub mod value;

pub use address::{
    address_to_script_hash, script_hash_to_address, try_address_to_script_hash, AddressCodec,
};
pub use codec::{
    decode_contract_parameter, decode_contract_parameter_str, decode_stack_value,
    decode_stack_value_str, encode_contract_parameter, encode_stack_value,
    encode_stack_value_string,
};
pub use config::{CodecConfig, FallbackPolicy, ShapeChecking, DEFAULT_CONFIG};
pub use crypto::{NamedCurve, PublicKey};
pub use errors::{CodecError, CodecResult, ErrorModel};
pub use hash::{UInt160, UInt256};
pub use value::{
    ContractParameter, ContractParameterType, MapEntries, PrimitiveValue, Shared, StackValue,
    StackValueType,
};
