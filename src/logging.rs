use crate::config::Settings;
use crate::error::Result;
use env_logger::{Builder, Target};
use std::fs::OpenOptions;

/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "SHADER_DEBUG_LOG";

/// Installs the global logger.
///
/// Logs go to stderr, or to `settings.log_file` in append mode; stdout is
/// reserved for protocol frames and programs.
pub fn init(settings: &Settings) -> Result<()> {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .or_else(|| settings.log_level.clone())
        .unwrap_or_else(|| "info".to_string());

    let mut builder = Builder::new();
    builder.parse_filters(&filter);

    match &settings.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        None => {
            builder.target(Target::Stderr);
        }
    }

    // A second init (tests, embedding) keeps the first logger.
    let _ = builder.try_init();
    Ok(())
}
