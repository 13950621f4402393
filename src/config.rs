use color_eyre::eyre::{
    Result,
    eyre,
};
use std::{
    path::PathBuf,
    time::Duration,
};

pub const DEFAULT_REVEAL_MS: u64 = 1_500;
pub const MAX_REVEAL_MS: u64 = 60_000;
pub const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogConfig {
    Disabled,
    File { dir: PathBuf },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub reveal_delay: Duration,
    /// Fixed seed for reward draws; the thread RNG is used when absent.
    pub seed: Option<u64>,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            reveal_delay: Duration::from_millis(DEFAULT_REVEAL_MS),
            seed: None,
            log: LogConfig::File {
                dir: PathBuf::from(DEFAULT_LOG_DIR),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CliCommand {
    Run(AppConfig),
    Help,
}

pub fn usage() -> String {
    format!(
        "Usage: treasure-box [--reveal-ms <ms>] [--seed <n>] [--log-dir <path> | --no-log]\n\
         \n\
         Flags:\n\
           --reveal-ms <ms>    Pause before a box reveals its challenge (default {DEFAULT_REVEAL_MS}, max {MAX_REVEAL_MS})\n\
           --seed <n>          Draw challenges from a seeded RNG (repeatable sessions)\n\
           --log-dir <path>    Directory for the rolling log file (default ./{DEFAULT_LOG_DIR})\n\
           --no-log            Disable file logging\n\
           -h, --help          Show this message\n\
         \n\
         Log verbosity follows RUST_LOG (default treasure_box=info)."
    )
}

pub fn parse_args<I>(args: I) -> Result<CliCommand>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut reveal_ms: Option<u64> = None;
    let mut seed: Option<u64> = None;
    let mut log_dir: Option<String> = None;
    let mut no_log = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--reveal-ms" => {
                let raw = args
                    .next()
                    .ok_or_else(|| eyre!("--reveal-ms requires a number of milliseconds"))?;
                if reveal_ms.is_some() {
                    return Err(eyre!("--reveal-ms may only be specified once"));
                }
                let ms: u64 = raw
                    .parse()
                    .map_err(|_| eyre!("--reveal-ms expects a whole number, got {raw:?}"))?;
                if ms == 0 || ms > MAX_REVEAL_MS {
                    return Err(eyre!(
                        "--reveal-ms must be between 1 and {MAX_REVEAL_MS}, got {ms}"
                    ));
                }
                reveal_ms = Some(ms);
            }
            "--seed" => {
                let raw = args
                    .next()
                    .ok_or_else(|| eyre!("--seed requires a numeric argument"))?;
                if seed.is_some() {
                    return Err(eyre!("--seed may only be specified once"));
                }
                seed = Some(
                    raw.parse()
                        .map_err(|_| eyre!("--seed expects an unsigned integer, got {raw:?}"))?,
                );
            }
            "--log-dir" => {
                let dir = args
                    .next()
                    .ok_or_else(|| eyre!("--log-dir requires a path argument"))?;
                if log_dir.is_some() {
                    return Err(eyre!("--log-dir may only be specified once"));
                }
                log_dir = Some(dir);
            }
            "--no-log" => no_log = true,
            "--help" | "-h" => return Ok(CliCommand::Help),
            other => return Err(eyre!("Unknown argument: {other}")),
        }
    }

    let log = match (no_log, log_dir) {
        (true, Some(_)) => {
            return Err(eyre!("--no-log and --log-dir cannot be combined"));
        }
        (true, None) => LogConfig::Disabled,
        (false, Some(raw)) => LogConfig::File {
            dir: PathBuf::from(shellexpand::tilde(&raw).into_owned()),
        },
        (false, None) => LogConfig::File {
            dir: PathBuf::from(DEFAULT_LOG_DIR),
        },
    };

    Ok(CliCommand::Run(AppConfig {
        reveal_delay: Duration::from_millis(reveal_ms.unwrap_or(DEFAULT_REVEAL_MS)),
        seed,
        log,
    }))
}
