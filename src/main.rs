use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use initiatived::Result;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "initiatived")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Citizen initiative tracker", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "initiatived.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Bound the pending backlog to the configured ceiling
    Sweep {
        /// Pending ceiling (overrides config)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print dashboard statistics
    Stats {
        /// Force synthetic demo statistics
        #[arg(long)]
        synthetic: bool,

        /// Raw JSON output
        #[arg(long)]
        json: bool,
    },

    /// Bulk-import initiatives from JSON files
    Import {
        /// Glob pattern, e.g. "data/*.json"
        pattern: String,

        /// Delete existing initiatives first
        #[arg(long)]
        clear: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

async fn run_async(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { port } => {
            println!("{}", "🚀 Starting initiatived server...".cyan());
            initiatived::cli::serve::run(&cli.config, port).await?;
        }

        Commands::Sweep { limit } => {
            println!("{}", "🔄 Running capacity sweep...".cyan());
            initiatived::cli::sweep::run(&cli.config, limit)?;
        }

        Commands::Stats { synthetic, json } => {
            initiatived::cli::stats::run(&cli.config, synthetic, json)?;
        }

        Commands::Import { pattern, clear, yes } => {
            println!("{}", "📥 Importing initiatives...".cyan());
            initiatived::cli::import::run(&cli.config, &pattern, clear, yes)?;
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "initiatived", &mut io::stdout());
        }
    }

    Ok(())
}
