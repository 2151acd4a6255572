use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use nastool::config::ConfigStore;
use nastool::lifecycle::preflight;
use nastool::observability::logging;
use nastool::qbittorrent::{QbEndpoint, QbittorrentClient, TorrentClientProbe};

#[derive(Parser)]
#[command(name = "nastool-cli")]
#[command(about = "Inspect and check the nastool configuration", long_about = None)]
struct Cli {
    /// Config file to use instead of $NASTOOL_CONFIG
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// qBittorrent login timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the startup checks; exits non-zero when startup would be refused
    Check,
    /// Print the loaded configuration
    Show,
    /// Print the config file path
    Path,
    /// Only try to log in to qBittorrent
    Probe,
    /// Load the config and write it back in canonical form
    Normalize,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init();

    let owned;
    let store: &ConfigStore = match &cli.config {
        Some(path) => {
            owned = ConfigStore::open(path);
            &owned
        }
        None => ConfigStore::get_instance()?,
    };
    let client = QbittorrentClient::with_timeout(Duration::from_secs(cli.timeout));

    match cli.command {
        Commands::Path => {
            println!("{}", store.path().display());
        }
        Commands::Check => match preflight(store, &client) {
            Ok(_) => println!("OK: startup allowed"),
            Err(e) => {
                eprintln!("Error: {}", e);
                return Ok(ExitCode::FAILURE);
            }
        },
        Commands::Show => {
            let doc = store.get_config().ok_or("no configuration loaded")?;
            print!("{}", serde_yaml::to_string(doc.as_ref())?);
        }
        Commands::Probe => {
            let doc = store.get_config().ok_or("no configuration loaded")?;
            let endpoint = QbEndpoint::from_section(&doc.qbittorrent)?;
            match client.authenticate(&endpoint) {
                Ok(()) => println!("OK: logged in to {}", endpoint.base_url),
                Err(e) => {
                    eprintln!("Error: {}: {}", endpoint.base_url, e);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Normalize => {
            let doc = store.get_config().ok_or("no configuration loaded")?;
            store.save(&doc)?;
            println!("Wrote {}", store.path().display());
        }
    }

    Ok(ExitCode::SUCCESS)
}
