use clap::Parser;
use tracing_subscriber::EnvFilter;

use meteor_align::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("meteor_align=debug,info")
    } else {
        EnvFilter::new("meteor_align=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let scorer = cli::load_scorer(cli.config.as_deref(), cli.locale)?;

    match cli.command {
        cli::Commands::Score(args) => {
            cli::score::run(args, cli.format, &scorer)?;
        }
        cli::Commands::Align(args) => {
            cli::align::run(args, cli.format, &scorer)?;
        }
        cli::Commands::Corpus(args) => {
            cli::corpus::run(args, cli.format, &scorer)?;
        }
    }

    Ok(())
}
