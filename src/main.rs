use clap::Parser;

use typedeps::cli::{self, Cli};

fn main() {
    let cli = Cli::parse_from(cli::normalize_args(std::env::args_os()));
    init_logging(cli.verbose);

    // Unlocked: MCP mode hands stdout to the protocol transport.
    let mut out = std::io::stdout();
    if let Err(err) = cli::run(cli, &mut out) {
        tracing::debug!(error = ?err, "command failed");
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("typedeps=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("typedeps=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
