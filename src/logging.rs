use crate::config::LogConfig;
use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling,
};
use tracing_subscriber::{
    EnvFilter,
    fmt,
};

pub const LOG_FILE_PREFIX: &str = "treasure-box.log";
const DEFAULT_FILTER: &str = "treasure_box=info";

// The terminal belongs to the UI, so everything goes to a daily rolling file.
// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init_tracing(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let LogConfig::File { dir } = config else {
        return Ok(None);
    };
    std::fs::create_dir_all(dir)
        .wrap_err_with(|| format!("creating log directory {}", dir.display()))?;

    let appender = rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| eyre!("installing tracing subscriber failed: {e}"))?;
    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;

    #[test]
    fn init_tracing__disabled_installs_nothing() {
        let guard = init_tracing(&LogConfig::Disabled).unwrap();
        assert!(guard.is_none());
    }
}
