use clap::ArgMatches;
use log::info;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use super::{resolve_config, CliError, CliResult};
use crate::address::AddressCodec;
use crate::codec::{decode_contract_parameter_str, decode_stack_value_str, encode_stack_value};
use crate::config::CodecConfig;
use crate::errors::CodecError;
use crate::hash::UInt160;

/// Run the parsed command line and return what should be printed
pub fn run(matches: &ArgMatches) -> CliResult<String> {
    let config = resolve_config(matches)?;

    match matches.subcommand() {
        Some(("stack", sub)) => stack(sub, &config),
        Some(("param", sub)) => param(sub, &config),
        Some(("address", sub)) => {
            let address = required(sub, "address")?;
            let script_hash = AddressCodec::from_config(&config).to_script_hash(address)?;
            Ok(script_hash.to_string())
        }
        Some(("script-hash", sub)) => {
            let script_hash = UInt160::parse(required(sub, "hash")?)?;
            Ok(AddressCodec::from_config(&config).to_address(&script_hash))
        }
        Some((name, _)) => Err(CliError::Usage(format!("Unknown command '{}'", name))),
        None => Err(CliError::Usage("No command given".to_string())),
    }
}

fn stack(matches: &ArgMatches, config: &CodecConfig) -> CliResult<String> {
    let text = read_input(matches)?;
    let value = decode_stack_value_str(&text, config)?;
    info!("Decoded {} value", value.kind());

    let json = encode_stack_value(&value, config)?;
    let printed = if matches.get_flag("compact") {
        serde_json::to_string(&json)
    } else {
        serde_json::to_string_pretty(&json)
    };
    Ok(printed.map_err(CodecError::from)?)
}

fn param(matches: &ArgMatches, config: &CodecConfig) -> CliResult<String> {
    let text = read_input(matches)?;
    let param = decode_contract_parameter_str(&text, config)?;
    info!("Decoded {} parameter", param.param_type());
    Ok(param.describe())
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> CliResult<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(format!("Missing argument <{}>", name)))
}

fn read_input(matches: &ArgMatches) -> CliResult<String> {
    match matches.get_one::<PathBuf>("file") {
        Some(path) if path.as_os_str() != "-" => {
            fs::read_to_string(path).map_err(|e| CliError::io(path, e))
        }
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| CliError::io(Path::new("<stdin>"), e))?;
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::build_cli;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn run_args(args: &[&str]) -> CliResult<String> {
        run(&build_cli().try_get_matches_from(args).unwrap())
    }

    #[test]
    fn test_stack_normalizes_file_input() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"TYPE":"integer","VALUE":" 042 "}}"#).unwrap();
        let path = file.path().to_str().unwrap();

        let output = run_args(&["stackwire", "stack", "--compact", path]).unwrap();
        assert_eq!(output, r#"{"type":"Integer","value":"42"}"#);
    }

    #[test]
    fn test_param_describes_input() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"type":"Array","value":[{{"type":"Boolean","value":true}}]}}"#).unwrap();
        let path = file.path().to_str().unwrap();

        let output = run_args(&["stackwire", "param", path]).unwrap();
        assert_eq!(output, "Array[Boolean(true)]");
    }

    #[test]
    fn test_address_round_trip() {
        let hash = "0x14131211100f0e0d0c0b0a090807060504030201";
        let address = run_args(&["stackwire", "script-hash", hash]).unwrap();
        assert_eq!(address, "NL1JGjDe22U44R57ZXVSeRa4T7Jo1HDLF4");
        assert_eq!(run_args(&["stackwire", "address", address.as_str()]).unwrap(), hash);
    }
}
