/// Conty - audio-story pack tool
use clap::{Parser, Subcommand};
use conty_cli::{commands, ContyConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "conty")]
#[command(about = "Inspect, list and walk interactive audio-story packs", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the packs of a library folder
    List {
        /// Library root (defaults to the configured one)
        root: Option<PathBuf>,
    },
    /// Show a pack's structure and missing home transitions
    Inspect {
        /// Pack folder
        pack: PathBuf,
    },
    /// List the stories of a pack
    Stories {
        /// Pack folder
        pack: PathBuf,
        /// One story per long stage, ordered by episode
        #[arg(long)]
        podcast: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Walk a pack with a silent player, answering menus with the given choices
    Walk {
        /// Pack folder
        pack: PathBuf,
        /// Candidate index to pick at each menu, comma separated
        #[arg(short = 'C', long, value_delimiter = ',')]
        choose: Vec<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "conty=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = ContyConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::List { root } => {
            let root = root.unwrap_or_else(|| config.library.root.clone());
            for pack in commands::list(&root).await? {
                println!("{:<24} {:?}  {}", pack.id, pack.kind, pack.title());
            }
        }
        Commands::Inspect { pack } => {
            print!("{}", commands::inspect(&pack).await?);
        }
        Commands::Stories {
            pack,
            podcast,
            json,
        } => {
            let report = commands::stories(&pack, &config.extract_options(podcast)).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
        Commands::Walk { pack, choose } => {
            print!("{}", commands::walk(&pack, &choose, &config).await?);
        }
    }

    Ok(())
}
