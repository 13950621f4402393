use color_eyre::eyre::Result;
use treasure_box::{
    config::{
        self,
        CliCommand,
    },
    logging,
};

mod client;
mod ui;

fn print_usage_and_exit() -> ! {
    println!("{}", config::usage());
    std::process::exit(0);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let app_config = match config::parse_args(std::env::args().skip(1))? {
        CliCommand::Run(app_config) => app_config,
        CliCommand::Help => print_usage_and_exit(),
    };
    let _log_guard = logging::init_tracing(&app_config.log)?;
    tracing::info!(
        reveal_ms = app_config.reveal_delay.as_millis() as u64,
        seed = ?app_config.seed,
        "starting treasure-box"
    );
    client::run_app(app_config).await
}
