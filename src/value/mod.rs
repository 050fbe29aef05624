//! Value model shared by the codecs
//!
//! Two independent tagged unions live here: [`StackValue`], the VM's runtime
//! value, and [`ContractParameter`], the typed argument of a contract call.

mod kind;
mod parameter;
mod stack;

pub use kind::{ContractParameterType, StackValueType};
pub use parameter::ContractParameter;
pub use stack::{MapEntries, PrimitiveValue, Shared, StackValue};
