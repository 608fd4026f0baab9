// SPDX-License-Identifier: MPL-2.0
use iced_carousel::app::{self, Flags};
use iced_carousel::config;
use std::path::Path;
use std::process::ExitCode;

const HELP: &str = "\
Usage: iced_carousel [OPTIONS] [DIRECTORY | MANIFEST.toml]

Options:
  --index <N>          Photo to start on (default: 0)
  --config-dir <DIR>   Directory holding settings.toml
  --init-config        Write default settings and exit
  -h, --help           Show this help
";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return ExitCode::SUCCESS;
    }

    let init_config = args.contains("--init-config");
    let start_index = match args.opt_value_from_str("--index") {
        Ok(index) => index,
        Err(err) => {
            eprintln!("Invalid --index: {err}");
            return ExitCode::FAILURE;
        }
    };
    let config_dir: Option<String> = match args.opt_value_from_str("--config-dir") {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("Invalid --config-dir: {err}");
            return ExitCode::FAILURE;
        }
    };

    if init_config {
        let defaults = config::Config::default();
        let result = match config_dir.as_deref() {
            Some(dir) => config::save_to_path(&defaults, &config::path_in_dir(Path::new(dir))),
            None => config::save(&defaults),
        };
        return match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{err}");
                ExitCode::FAILURE
            }
        };
    }

    let flags = Flags {
        source: args
            .finish()
            .into_iter()
            .next()
            .and_then(|s| s.into_string().ok()),
        start_index,
        config_dir,
    };

    match app::run(flags) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
