use clap::Parser;
use cutplan::{execute, logging, Cli};

fn main() -> anyhow::Result<()> {
    logging::init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    execute(&cli, &mut stdout.lock())
}
