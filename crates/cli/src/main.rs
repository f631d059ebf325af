mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use commands::{FetchArgs, SiteArgs};
use std::io;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "newsroom")]
#[command(version, about = "Static article pages and sitemaps for a news site", long_about = None)]
struct Cli {
    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Fetch the latest articles and write their pages and news-sitemap.xml
    News {
        #[command(flatten)]
        site: SiteArgs,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Scan the site for HTML pages and write sitemap.xml
    Sitemap {
        #[command(flatten)]
        site: SiteArgs,
    },

    /// Run `news` and then `sitemap`
    Build {
        #[command(flatten)]
        site: SiteArgs,

        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::News { site, fetch } => {
            let config = commands::load_config(&site, Some(&fetch))?;
            commands::news::run(&config, &site.root).await?;
            Ok(())
        }
        Command::Sitemap { site } => {
            let config = commands::load_config(&site, None)?;
            commands::sitemap::run(&config, &site.root)?;
            Ok(())
        }
        Command::Build { site, fetch } => {
            let config = commands::load_config(&site, Some(&fetch))?;
            commands::news::run(&config, &site.root).await?;
            println!();
            commands::sitemap::run(&config, &site.root)?;
            Ok(())
        }
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "newsroom", &mut io::stdout());
            Ok(())
        }
    }
}
