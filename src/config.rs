use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

use crate::crypto::NamedCurve;
use crate::errors::{CodecError, CodecResult};

/// Address version byte of N3 MainNet
pub const DEFAULT_ADDRESS_VERSION: u8 = 0x35;

/// Default bound on compound nesting
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// What the stack codec does on a cycle during encode or an unknown type during decode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Fail with `CyclicValue` / `UnrecognizedType`
    #[default]
    FailFast,
    /// Substitute a null value and keep going
    EmitNull,
}

/// How the stack codec treats compound values whose payload has the wrong shape
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ShapeChecking {
    #[default]
    Strict,
    /// Non-array payloads decode to empty compounds, malformed map pairs are skipped
    Lenient,
}

impl FromStr for FallbackPolicy {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "failfast" | "fail" => Ok(Self::FailFast),
            "emitnull" | "null" => Ok(Self::EmitNull),
            _ => Err(CodecError::UnrecognizedType {
                name: s.to_string(),
            }),
        }
    }
}

impl FromStr for ShapeChecking {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(CodecError::UnrecognizedType {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackPolicy::FailFast => write!(f, "fail-fast"),
            FallbackPolicy::EmitNull => write!(f, "emit-null"),
        }
    }
}

impl fmt::Display for ShapeChecking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeChecking::Strict => write!(f, "strict"),
            ShapeChecking::Lenient => write!(f, "lenient"),
        }
    }
}

/// Settings consumed by the codecs
///
/// The codecs only read this; one instance can be shared by any number of
/// concurrent encode/decode calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CodecConfig {
    /// Network address-version byte used by the address codec
    pub address_version: u8,
    /// Curve public keys must lie on
    pub curve: NamedCurve,
    pub fallback: FallbackPolicy,
    pub shape_checking: ShapeChecking,
    /// Maximum nesting of compound values
    pub max_depth: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            address_version: DEFAULT_ADDRESS_VERSION,
            curve: NamedCurve::Secp256r1,
            fallback: FallbackPolicy::FailFast,
            shape_checking: ShapeChecking::Strict,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from `STACKWIRE_*` environment variables
    ///
    /// Unset variables keep their defaults; set but malformed ones are an error.
    pub fn from_env() -> CodecResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> CodecResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("STACKWIRE_ADDRESS_VERSION") {
            config.address_version = parse_u8(&raw)?;
        }
        if let Some(raw) = lookup("STACKWIRE_CURVE") {
            config.curve = raw.parse()?;
        }
        if let Some(raw) = lookup("STACKWIRE_FALLBACK") {
            config.fallback = raw.parse()?;
        }
        if let Some(raw) = lookup("STACKWIRE_SHAPE_CHECKING") {
            config.shape_checking = raw.parse()?;
        }
        if let Some(raw) = lookup("STACKWIRE_MAX_DEPTH") {
            config.max_depth = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                CodecError::NumberFormat {
                    input: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        Ok(config)
    }

    pub fn with_address_version(mut self, version: u8) -> Self {
        self.address_version = version;
        self
    }

    pub fn with_curve(mut self, curve: NamedCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_shape_checking(mut self, shape_checking: ShapeChecking) -> Self {
        self.shape_checking = shape_checking;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn is_lenient(&self) -> bool {
        self.shape_checking == ShapeChecking::Lenient
    }

    pub fn emits_null(&self) -> bool {
        self.fallback == FallbackPolicy::EmitNull
    }
}

/// Accepts decimal (`53`) or hex (`0x35`)
pub(crate) fn parse_u8(raw: &str) -> CodecResult<u8> {
    let trimmed = raw.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex_digits) => u8::from_str_radix(hex_digits, 16),
        None => trimmed.parse::<u8>(),
    };
    parsed.map_err(|e| CodecError::NumberFormat {
        input: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Configuration used where no explicit config can be passed (serde impls)
pub static DEFAULT_CONFIG: Lazy<CodecConfig> = Lazy::new(CodecConfig::default);
