use env_logger::Env;
use std::process;

use stackwire::cli::{build_cli, run};

fn main() {
    let matches = build_cli().get_matches();

    let default_filter = if matches.get_flag("verbose") {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    match run(&matches) {
        Ok(output) => println!("{}", output),
        Err(err) => {
            let model = err.to_model();
            match serde_json::to_string_pretty(&model) {
                Ok(body) => eprintln!("{}", body),
                Err(_) => eprintln!("Error: {}", err),
            }
            process::exit(1);
        }
    }
}
