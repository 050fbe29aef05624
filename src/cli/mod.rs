//! Command-line front end for the codecs
//!
//! Each subcommand reads its input, runs one codec operation and returns the
//! text to print. Failures are reported as an [`ErrorModel`] JSON body.

mod commands;

pub use commands::run;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{parse_u8, CodecConfig, FallbackPolicy, ShapeChecking};
use crate::crypto::NamedCurve;
use crate::errors::{CodecError, ErrorModel};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Usage(String),
}

impl CliError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Error body printed on failure
    pub fn to_model(&self) -> ErrorModel {
        match self {
            CliError::Codec(err) => err.to_model(),
            other => ErrorModel {
                message: other.to_string(),
                ..ErrorModel::default()
            },
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;

pub fn build_cli() -> Command {
    Command::new("stackwire")
        .version(env!("CARGO_PKG_VERSION"))
        .about("JSON wire codec for VM stack values and contract parameters")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("JSON codec configuration file")
                .global(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("address-version")
                .long("address-version")
                .value_name("N")
                .help("Address version byte, decimal or 0x-prefixed hex")
                .global(true),
        )
        .arg(
            Arg::new("curve")
                .long("curve")
                .value_name("NAME")
                .help("Curve public keys are validated against (secp256r1, secp256k1)")
                .global(true),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .value_name("N")
                .help("Maximum nesting depth of compound values")
                .global(true)
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("lenient")
                .long("lenient")
                .help("Decode compounds with a malformed payload as empty")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("emit-null")
                .long("emit-null")
                .help("Replace unknown types and cycles with null instead of failing")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log codec decisions to stderr")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("stack")
                .about("Decode a stack value and print its normalized encoding")
                .arg(input_arg())
                .arg(
                    Arg::new("compact")
                        .long("compact")
                        .help("Print the encoding on a single line")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("param")
                .about("Decode a contract parameter and describe it")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("address")
                .about("Print the script hash an address (or hex hash) resolves to")
                .arg(
                    Arg::new("address")
                        .value_name("ADDRESS")
                        .help("Base58 address or 0x-prefixed script hash")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("script-hash")
                .about("Print the address of a script hash")
                .arg(
                    Arg::new("hash")
                        .value_name("HASH")
                        .help("Big-endian hex script hash, 0x prefix optional")
                        .required(true),
                ),
        )
}

fn input_arg() -> Arg {
    Arg::new("file")
        .value_name("FILE")
        .help("Input file; stdin when omitted or '-'")
        .value_parser(value_parser!(PathBuf))
}

/// Layer the codec configuration: file or environment, then flags
pub fn resolve_config(matches: &ArgMatches) -> CliResult<CodecConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            debug!("Loading codec config from {}", path.display());
            let text = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
            serde_json::from_str::<CodecConfig>(&text).map_err(CodecError::from)?
        }
        None => CodecConfig::from_env()?,
    };

    if let Some(raw) = matches.get_one::<String>("address-version") {
        config = config.with_address_version(parse_u8(raw)?);
    }
    if let Some(raw) = matches.get_one::<String>("curve") {
        config = config.with_curve(raw.parse::<NamedCurve>()?);
    }
    if let Some(depth) = matches.get_one::<usize>("max-depth") {
        config = config.with_max_depth(*depth);
    }
    if matches.get_flag("lenient") {
        config = config.with_shape_checking(ShapeChecking::Lenient);
    }
    if matches.get_flag("emit-null") {
        config = config.with_fallback(FallbackPolicy::EmitNull);
    }

    debug!("Using codec config {:?}", config);
    Ok(config)
}
