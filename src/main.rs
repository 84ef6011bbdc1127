use shader_debugger::{cli, logging, server, Settings};
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "\
usage: shader-debugger [--config <settings.json>] <shader.glsl>
       shader-debugger [--config <settings.json>] --server";

struct Args {
    server: bool,
    config: Option<PathBuf>,
    shader: Option<PathBuf>,
}

fn parse_args() -> Result<Option<Args>, String> {
    let mut args = Args {
        server: false,
        config: None,
        shader: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--server" | "--stdio" => args.server = true,
            "--config" => {
                let path = iter.next().ok_or("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--help" | "-h" => return Ok(None),
            other if other.starts_with('-') => return Err(format!("unknown option '{}'", other)),
            other => args.shader = Some(PathBuf::from(other)),
        }
    }
    Ok(Some(args))
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("{}\n{}", message, USAGE);
            return ExitCode::from(2);
        }
    };

    let settings = match Settings::load_or_default(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = logging::init(&settings) {
        eprintln!("could not open log: {}", e);
        return ExitCode::FAILURE;
    }
    log::debug!("settings: {:?}", settings);

    let result = if args.server {
        server::run_server_mode()
    } else {
        match &args.shader {
            Some(path) => cli::run_interactive_mode(path, &settings),
            None => {
                eprintln!("{}", USAGE);
                return ExitCode::from(2);
            }
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
