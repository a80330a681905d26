mod browse;
mod display;

use std::time::Duration;

use anyhow::Context;
use catbreeds_client::{BreedClient, BreedService, ClientConfig, DEFAULT_API_URL, ImageLoader};
use catbreeds_core::{BreedState, BreedStore, DEFAULT_IMAGE_BASE, RemoteImage};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::display::ListPresenter;

#[derive(Parser, Debug)]
#[command(name = "catbreeds", version, about = "Browse cat breeds from TheCatAPI")]
struct Cli {
    /// Breed list endpoint
    #[arg(long, env = "CATBREEDS_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Base URL for breed images
    #[arg(long, env = "CATBREEDS_IMAGE_BASE", default_value = DEFAULT_IMAGE_BASE, global = true)]
    image_base: String,

    /// Overall request timeout in seconds (default: none)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Skip image requests; thumbnails stay pending
    #[arg(long, global = true)]
    no_images: bool,

    /// Log at info level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch breeds and print the list
    List,
    /// Fetch breeds and print the detail card for one row
    Show {
        /// Row number from `list` (0-based)
        row: usize,
    },
    /// Fetch once, then open rows interactively
    Browse,
    /// Fetch breeds and print them as JSON
    Json,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.api_url.clone(),
            image_base: self.image_base.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn load(cli: &Cli, store: &BreedStore) -> anyhow::Result<BreedState> {
    let client = BreedClient::new(&cli.client_config()).context("building HTTP client")?;
    let service = BreedService::new(client, store.clone());
    let pending = service.load_breeds();
    // The store is already `Loading` here, so this prints the busy indicator.
    eprint!("{}", ListPresenter::new(&store.snapshot(), &[]));
    pending
        .await
        .with_context(|| format!("loading breeds from {}", cli.api_url))?;
    Ok(store.snapshot())
}

async fn thumbnails(cli: &Cli, loader: &ImageLoader, state: &BreedState) -> Vec<RemoteImage> {
    let images: Vec<RemoteImage> = state.breeds.iter().map(|b| loader.image_for(b)).collect();
    if cli.no_images {
        return images;
    }
    loader.load_all(images).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::info!("catbreeds v{}", env!("CARGO_PKG_VERSION"));

    let store = BreedStore::new();
    let state = load(&cli, &store).await?;
    let loader = ImageLoader::new(&cli.client_config()).context("building HTTP client")?;

    match &cli.command {
        Command::List => {
            let images = thumbnails(&cli, &loader, &state).await;
            print!("{}", ListPresenter::new(&state, &images));
        }
        Command::Show { row } => {
            let images: Vec<RemoteImage> =
                state.breeds.iter().map(|b| loader.image_for(b)).collect();
            let list = ListPresenter::new(&state, &images);
            let detail = list
                .select(*row)
                .with_context(|| format!("no breed at row {row} ({} breeds)", list.len()))?;
            tracing::info!(id = %detail.breed().id, row, "showing breed");
            if !cli.no_images {
                let image = loader.load(detail.image().clone()).await;
                print!("{}", detail.with_image(image));
            } else {
                print!("{detail}");
            }
        }
        Command::Browse => {
            let images = thumbnails(&cli, &loader, &state).await;
            let list = ListPresenter::new(&state, &images);
            let stdin = std::io::stdin().lock();
            let mut stdout = std::io::stdout().lock();
            browse::browse(&list, stdin, &mut stdout)?;
        }
        Command::Json => {
            let json = serde_json::to_string_pretty(&*state.breeds)?;
            println!("{json}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_public_endpoints() {
        let cli = Cli::try_parse_from(["catbreeds", "list"]).unwrap();
        let config = cli.client_config();
        assert_eq!(config.api_url, "https://api.thecatapi.com/v1/breeds");
        assert_eq!(config.image_base, "https://cdn2.thecatapi.com/images");
        assert!(config.timeout.is_none());
        assert!(!cli.no_images);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "catbreeds",
            "show",
            "3",
            "--api-url",
            "http://localhost:8080/breeds",
            "--timeout-secs",
            "10",
            "--no-images",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Show { row: 3 }));
        let config = cli.client_config();
        assert_eq!(config.api_url, "http://localhost:8080/breeds");
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert!(cli.no_images);
    }

    #[test]
    fn show_requires_row() {
        assert!(Cli::try_parse_from(["catbreeds", "show"]).is_err());
        assert!(Cli::try_parse_from(["catbreeds", "show", "first"]).is_err());
    }
}
