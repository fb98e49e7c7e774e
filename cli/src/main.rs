mod commands;
mod terminal;

use std::time::Duration;

use commands::{CommandLine, Commands, detect, watch};
use terminal::{logging, print};

const SECONDS_PER_HOUR: u64 = 3600;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbosity());

    let cfg = commands.to_config();

    match commands.command.unwrap_or(Commands::Detect) {
        Commands::Detect => {
            if !commands.json {
                print::header("resolving fastest addresses");
            }
            detect::detect(cfg, commands.json).await
        }
        Commands::Watch { interval_hours } => {
            if !commands.json {
                print::header("watching domains");
            }
            let interval: Duration = Duration::from_secs(interval_hours.max(1) * SECONDS_PER_HOUR);
            watch::watch(cfg, interval, commands.json).await
        }
    }
}
