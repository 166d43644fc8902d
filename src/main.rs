//! Plexus - native portfolio front-end.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use plexus::{ContactForm, Portfolio, SiteConfig};

#[derive(Parser)]
#[command(name = "plexus")]
#[command(about = "Particle-network portfolio with typewriter effects")]
struct Cli {
    /// Run in verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Site configuration (JSON); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    dump_config: Option<PathBuf>,

    /// Submit a contact form on startup: NAME EMAIL MESSAGE
    #[arg(long, num_args = 3, value_names = ["NAME", "EMAIL", "MESSAGE"])]
    contact: Option<Vec<String>>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flag.
    let default = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), plexus::AppError> {
    let config = match &cli.config {
        Some(path) => {
            let config = SiteConfig::load(path)?;
            tracing::info!("Loaded configuration from {}", path.display());
            config
        }
        None => SiteConfig::default(),
    };

    if let Some(path) = &cli.dump_config {
        config.save(path)?;
        tracing::info!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    let mut portfolio = Portfolio::with_config(config);
    if let Some([name, email, message]) = cli.contact.as_deref() {
        portfolio = portfolio.with_contact(ContactForm::new(name, email, message));
    }

    tracing::info!("Starting {}", portfolio.config().title);
    portfolio.run()
}
