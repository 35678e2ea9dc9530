mod catalog;
mod config;
mod error;
mod mxm;
mod pages;
mod storage;

use anyhow::Context;
use catalog::Catalog;
use clap::{Parser, Subcommand, ValueEnum};
use mxm::api::MxmClient;
use mxm::models::{Artist, SearchCategory, Track};
use pages::{
    ArtistPage, LandingPage, LandingTab, ResultsTab, SearchBox, SearchResultsPage, TrackPage,
};
use std::time::Duration;
use storage::{SharedStorage, Storage};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lyrica", version, about = "Browse the Musixmatch catalog from the terminal")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Use this API key instead of the configured one.
    #[arg(long, env = config::defaults::API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Top rated tracks with lyrics.
    PopularTracks,
    /// Top rated artists.
    PopularArtists,
    /// Artist details.
    Artist { artist_id: u64 },
    /// An artist's tracks, 30 per page.
    ArtistTracks {
        artist_id: u64,
        /// Number of pages to load.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Track details and lyrics.
    Track { track_id: u64 },
    /// Search artists, tracks and lyrics.
    Search {
        query: String,
        #[arg(long, value_enum, default_value_t = CategoryArg::All)]
        category: CategoryArg,
        /// Number of pages to load for a single category.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Type a query into the search-as-you-type box and print what settles.
    Suggest { query: String },
    /// Call any API method and dump the JSON envelope.
    Raw {
        method: String,
        /// Query parameters as key=value.
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Print the config file location.
    ConfigPath,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CategoryArg {
    All,
    Artists,
    Tracks,
    Lyrics,
}

impl From<CategoryArg> for ResultsTab {
    fn from(c: CategoryArg) -> Self {
        match c {
            CategoryArg::All => ResultsTab::All,
            CategoryArg::Artists => ResultsTab::Artists,
            CategoryArg::Tracks => ResultsTab::Tracks,
            CategoryArg::Lyrics => ResultsTab::Lyrics,
        }
    }
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load(cli.config.as_deref()).context("load config")?;
    let cfg_path = match cli.config.clone() {
        Some(p) => p,
        None => config::default_config_path().context("default config path")?,
    };
    if let Some(key) = cli.api_key {
        cfg.api.api_key = key;
    }

    let client = MxmClient::new(&cfg.api)?;
    let catalog = Catalog::new(client.clone(), &cfg.catalog);
    let storage = open_storage(&cfg);

    match cli.command {
        Command::PopularTracks => show_landing(catalog, LandingTab::Tracks).await,
        Command::PopularArtists => show_landing(catalog, LandingTab::Artists).await,
        Command::Artist { artist_id } => {
            let artist = catalog.fetch_artist(artist_id).await?;
            print_artists(std::slice::from_ref(&artist));
        }
        Command::ArtistTracks { artist_id, pages } => {
            let mut page = ArtistPage::new(catalog, artist_id, storage);
            page.open().await;
            for _ in 1..pages {
                if !page.pager.more_available() {
                    break;
                }
                page.load_more().await;
            }
            report(page.error.as_deref());
            if let Some(artist) = &page.artist {
                println!("{} (id={})", artist.artist_name, artist.artist_id);
            }
            print_tracks(&page.tracks);
            println!(
                "pages loaded: {}, tracks available: {}",
                page.pager.loaded_page(),
                page.pager.available()
            );
        }
        Command::Track { track_id } => {
            let mut page = TrackPage::new(catalog, track_id, storage);
            page.open().await;
            report(page.error.as_deref());
            if let Some(track) = &page.track {
                print_tracks(std::slice::from_ref(track));
            }
            if let Some(lyrics) = &page.lyrics {
                println!();
                if lyrics.is_restricted() {
                    println!("(lyrics are restricted in this region)");
                }
                for line in page.lyrics_lines() {
                    println!("{line}");
                }
                if !lyrics.lyrics_copyright.is_empty() {
                    println!();
                    println!("{}", lyrics.lyrics_copyright.trim());
                }
            }
        }
        Command::Search {
            query,
            category,
            pages,
        } => {
            let mut page = SearchResultsPage::new(catalog);
            page.show(&query, category.into()).await;
            for _ in 1..pages {
                page.load_more().await;
            }
            report(page.error.as_deref());
            println!("all: {}", page.all_tab_count());
            for c in SearchCategory::ALL {
                if !page.is_visible(c) {
                    continue;
                }
                println!();
                println!("{} ({})", c.label(), page.tab_count(c));
                match c {
                    SearchCategory::Artists => print_artists(&page.artists),
                    SearchCategory::Tracks => print_tracks(&page.tracks),
                    SearchCategory::Lyrics => print_tracks(&page.lyrics),
                }
            }
        }
        Command::Suggest { query } => {
            let debounce = Duration::from_millis(cfg.search.debounce_ms);
            let mut sb = SearchBox::new(catalog, debounce, storage);
            let mut typed = String::new();
            for ch in query.chars() {
                typed.push(ch);
                sb.input(&typed);
            }
            sb.next_results().await;
            report(sb.error.as_deref());
            println!("artists");
            print_artists(&sb.artists);
            println!("tracks");
            print_tracks(&sb.tracks);
            println!("lyrics");
            print_tracks(&sb.lyrics);
        }
        Command::Raw { method, params } => {
            let params: Vec<(&str, String)> =
                params.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
            let v = client.call_raw(&method, &params).await?;
            println!("{}", serde_json::to_string_pretty(&v)?);
        }
        Command::ConfigPath => println!("{}", cfg_path.display()),
    }

    Ok(())
}

async fn show_landing(catalog: Catalog<MxmClient>, tab: LandingTab) {
    let mut page = LandingPage::new(catalog);
    page.select_tab(tab);
    page.open().await;
    report(page.error.as_deref());
    match page.tab {
        LandingTab::Tracks => print_tracks(&page.tracks),
        LandingTab::Artists => print_artists(&page.artists),
    }
}

/// Session slots are optional; without them pages just start empty.
fn open_storage(cfg: &config::Config) -> Option<SharedStorage> {
    let path = cfg.paths.data_dir.join("session.sqlite3");
    match Storage::open(&path) {
        Ok(s) => Some(s.shared()),
        Err(e) => {
            tracing::warn!("session storage unavailable: {e:#}");
            None
        }
    }
}

fn report(error: Option<&str>) {
    if let Some(e) = error {
        eprintln!("error: {e}");
    }
}

fn print_tracks(tracks: &[Track]) {
    for (i, t) in tracks.iter().enumerate() {
        let duration = t
            .duration_label()
            .map(|d| format!(" [{d}]"))
            .unwrap_or_default();
        let lyrics = if t.has_lyrics() { "" } else { " (no lyrics)" };
        println!(
            "{:02}. {} - {}{}{}  (track_id={})",
            i + 1,
            t.track_name,
            t.artist_name,
            duration,
            lyrics,
            t.track_id
        );
    }
}

fn print_artists(artists: &[Artist]) {
    for (i, a) in artists.iter().enumerate() {
        println!(
            "{:02}. {}  (artist_id={}, rating={})",
            i + 1,
            a.artist_name,
            a.artist_id,
            a.artist_rating
        );
    }
}
