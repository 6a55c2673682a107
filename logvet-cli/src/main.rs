use clap::Parser;

use logvet_cli::cli::{Cli, Commands};
use logvet_cli::commands;
use logvet_cli::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Diagnostics go to stderr so stdout stays clean for command output
    tracing_subscriber::fmt()
        .with_env_filter(cli.log_level.as_deref().unwrap_or("warn"))
        .with_writer(std::io::stderr)
        .init();

    let writer = OutputWriter::new(cli.output);

    let result = match cli.command {
        Commands::Check(args) => commands::check::execute(args, &cli.config, &writer).await,
        Commands::Rules(args) => commands::rules::execute(args, &cli.config, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}
