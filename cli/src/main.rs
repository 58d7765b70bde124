mod commands;
mod settings;
mod terminal;

use commands::{CommandLine, fetch};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);
    print::banner(commands.quiet);

    let cfg = settings::resolve(&commands)?;
    fetch::fetch(&cfg, commands.quiet).await
}
