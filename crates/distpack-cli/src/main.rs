use clap::{Parser, Subcommand};
use distpack::{
    commands::{
        build::{self, BuildCommand},
        config::{self, ConfigAction},
        init,
        manifest::{self, ManifestCommand},
    },
    logger, GlobalOpts,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "distpack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Package an installed npm library for distribution",
    long_about = "distpack bundles an installed npm dependency into a single module with an external bundler and writes a matching package.json next to it."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bundle a package into the output directory
    Build(BuildCommand),
    /// Print the package.json a build would generate
    Manifest(ManifestCommand),
    /// Create a distpack.toml
    Init {
        /// Optional filename (default: distpack.toml)
        file: Option<String>,
    },
    /// Show or edit distpack.toml
    #[command(subcommand_required = false, arg_required_else_help = false)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.tracing_filter());
    if let Err(e) = logger::init_with_verbosity(cli.global.verbosity_level()) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    let result = match cli.command {
        Commands::Build(cmd) => build::handle_build(cmd, &cli.global),
        Commands::Manifest(cmd) => manifest::handle_manifest(cmd, &cli.global),
        Commands::Init { file } => init::handle_init(file, &cli.global),
        Commands::Config { action } => config::handle_config(action, &cli.global),
    };

    if let Err(e) = result {
        logger::error(&format!("{:#}", e));
        if cli.global.verbosity_level() > 0 {
            logger::show_log_path();
        }
        std::process::exit(1);
    }
}
