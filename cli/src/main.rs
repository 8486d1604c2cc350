mod commands;
mod terminal;

use commands::{CommandLine, sweep};
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose);

    let cfg = commands.to_config();
    sweep::sweep(commands.start, commands.end, &cfg).await
}
