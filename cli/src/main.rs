use clap::Parser;
use stockroom_cli::Cli;

fn main() -> anyhow::Result<()> {
    stockroom_cli::init_tracing();
    stockroom_cli::run(Cli::parse())
}
