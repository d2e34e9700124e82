//! pagesmith CLI - build and live-reload tool for static marketing sites.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pagesmith_build::Task;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "pagesmith")]
#[command(about = "Build and live-reload tool for static marketing sites")]
#[command(version)]
pub struct Cli {
    /// Task to run; runs the full build and then serves when omitted
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to pagesmith.toml config file
    #[arg(short, long, default_value = "pagesmith.toml", global = true)]
    config: PathBuf,

    /// Page-set to build, overriding the config file
    #[arg(long, global = true)]
    page_set: Option<String>,

    /// Asset folder inside the page-set, overriding the config file
    #[arg(long, global = true)]
    asset_root: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a page-set source tree and config file
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Render page templates with the page data
    Render,

    /// Run plain CSS sources through the style compiler
    Css,

    /// Compile Sass sources
    Sass,

    /// Copy scripts
    Js,

    /// Copy images
    Images,

    /// Run every build task in order
    Build,

    /// Serve the output tree and rebuild on source changes
    Serve(ServeArgs),

    /// Run every build task in order, then serve
    Default(ServeArgs),
}

#[derive(clap::Args, Default)]
struct ServeArgs {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Do not open browser
    #[arg(long)]
    no_open: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let overrides = commands::Overrides {
        config: cli.config,
        page_set: cli.page_set,
        asset_root: cli.asset_root,
    };

    match cli.command.unwrap_or(Commands::Default(ServeArgs::default())) {
        Commands::Init { yes } => {
            commands::init::run(&overrides, yes).await?;
        }
        Commands::Render => commands::build::run(&overrides, &[Task::Render]).await?,
        Commands::Css => commands::build::run(&overrides, &[Task::Css]).await?,
        Commands::Sass => commands::build::run(&overrides, &[Task::Sass]).await?,
        Commands::Js => commands::build::run(&overrides, &[Task::Js]).await?,
        Commands::Images => commands::build::run(&overrides, &[Task::Images]).await?,
        Commands::Build => commands::build::run(&overrides, &Task::SEQUENCE).await?,
        Commands::Serve(args) => {
            commands::dev::run(&overrides, args.port, !args.no_open).await?;
        }
        Commands::Default(args) => {
            commands::build::run(&overrides, &Task::SEQUENCE).await?;
            commands::dev::run(&overrides, args.port, !args.no_open).await?;
        }
    }

    Ok(())
}
