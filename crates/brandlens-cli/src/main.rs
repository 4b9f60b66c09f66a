mod commands;
mod report;

use brandlens_analyzer::Analyzer;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "brandlens")]
#[command(about = "Brand presence analysis from a website URL")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full analysis and print the report
    Analyze {
        /// Brand website, with or without a scheme
        #[arg(long)]
        url: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Print the social links discovered on the homepage
    Links {
        #[arg(long)]
        url: String,
    },
    /// Discover links and extract a profile for each
    Profiles {
        #[arg(long)]
        url: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = brandlens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let analyzer = Analyzer::from_config(&config)?;
    let output = match cli.command {
        Commands::Analyze { url, format } => commands::run_analyze(&analyzer, &url, format).await?,
        Commands::Links { url } => commands::run_links(&analyzer, &url).await?,
        Commands::Profiles { url } => commands::run_profiles(&analyzer, &url).await?,
    };
    println!("{output}");

    Ok(())
}

#[cfg(test)]
mod tests;
