//! Command line entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use vellum::commands::list::ListKind;
use vellum::{commands, server, Vellum};

#[derive(Parser)]
#[command(name = "vellum", version, about = "A fast static blog generator")]
struct Cli {
    /// Run as if started in this directory
    #[arg(long, global = true, default_value = ".")]
    cwd: PathBuf,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new site
    Init {
        /// Directory to create the site in
        #[arg(default_value = ".")]
        folder: String,
    },
    /// Create a new draft post
    New {
        /// Post title
        title: String,
    },
    /// Build the site into the public directory
    Generate {
        /// Rebuild whenever the source changes
        #[arg(long)]
        watch: bool,
    },
    /// Serve the generated site
    Serve {
        #[arg(long, default_value = "localhost")]
        ip: String,
        #[arg(short, long, default_value_t = 4000)]
        port: u16,
        /// Serve the output as-is, without watching or live reload
        #[arg(long = "static")]
        static_only: bool,
    },
    /// Remove the public directory
    Clean,
    /// List posts, tags, authors or drafts
    List {
        #[arg(value_enum, default_value = "posts")]
        kind: ListKind,
    },
    /// Print the version
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug {
        "vellum=debug,info"
    } else {
        "vellum=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Init { folder } => commands::init::run(&folder, &cli.cwd),
        Commands::New { title } => {
            let vellum = Vellum::new(&cli.cwd)?;
            commands::new::run(&vellum, &title)
        }
        Commands::Generate { watch } => {
            if watch {
                commands::generate::watch(&cli.cwd).await
            } else {
                commands::generate::run(&cli.cwd)
            }
        }
        Commands::Serve {
            ip,
            port,
            static_only,
        } => server::start(&cli.cwd, &ip, port, !static_only).await,
        Commands::Clean => commands::clean::run(&cli.cwd),
        Commands::List { kind } => commands::list::run(&cli.cwd, kind),
        Commands::Version => {
            println!("vellum {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
