//! artshelf CLI
//!
//! Command-line interface for locating an iisu game library, browsing its
//! platforms and artwork coverage, and managing the scan cache.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use artshelf_core::AssetKind;
use artshelf_lib::cache::SNAPSHOT_NAMESPACE;
use artshelf_lib::{
    CacheManager, FileSnapshotStore, Filesystem, GameEntry, PlatformInfo, RealFilesystem,
    RootLocator, SnapshotStore, clean_title, normalize_for_search, search_variants, settings,
};

#[derive(Parser)]
#[command(name = "artshelf")]
#[command(about = "Browse an iisu game library and its artwork coverage", long_about = None)]
struct Cli {
    /// Library root (defaults to the saved override, then auto-detection)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved library root
    Locate,

    /// List platforms with game counts and artwork coverage
    Platforms {
        /// Rescan instead of serving cached results
        #[arg(short = 'f', long)]
        refresh: bool,
    },

    /// List games for one platform
    Games {
        /// Platform folder name (e.g. snes, psx)
        platform: String,

        /// Rescan instead of serving cached results
        #[arg(short = 'f', long)]
        refresh: bool,

        /// Only show games missing this artwork kind
        #[arg(long)]
        missing: Option<AssetKind>,
    },

    /// Show the cleaned title and search variants for a raw name
    Title {
        /// Raw folder/file name to clean
        name: String,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Manage the scan cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the settings file and the active override
    Show,
    /// Save a library root override
    SetRoot { path: PathBuf },
    /// Remove the saved override
    ClearRoot,
}

#[derive(Subcommand)]
enum CacheAction {
    /// Drop all cached scan results and the persisted snapshot
    Clear,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let (cache, store) = build_cache(cli.root);

    match cli.command {
        Commands::Locate => run_locate(&cache),
        Commands::Platforms { refresh } => run_platforms(&cache, &store, refresh),
        Commands::Games {
            platform,
            refresh,
            missing,
        } => run_games(&cache, &platform, refresh, missing),
        Commands::Title { name } => run_title(&name),
        Commands::Config { action } => match action {
            ConfigAction::Show => run_config_show(),
            ConfigAction::SetRoot { path } => run_config_set_root(&path),
            ConfigAction::ClearRoot => run_config_clear_root(),
        },
        Commands::Cache { action } => match action {
            CacheAction::Clear => run_cache_clear(&cache),
        },
    }
}

/// Wire the engine: real filesystem, file-backed snapshot store, and the
/// override chain (CLI flag, then saved setting).
fn build_cache(cli_root: Option<PathBuf>) -> (CacheManager, Arc<FileSnapshotStore>) {
    let fs: Arc<dyn Filesystem> = Arc::new(RealFilesystem::new());
    let override_root = cli_root.or_else(settings::load_override_root);
    let locator = RootLocator::with_override(fs.clone(), override_root);
    let snapshot_dir = FileSnapshotStore::default_dir();
    log::debug!("snapshot dir: {}", snapshot_dir.display());
    let store = Arc::new(FileSnapshotStore::new(fs.clone(), snapshot_dir));
    let cache = CacheManager::new(fs, locator, store.clone());
    (cache, store)
}

fn scan_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("/-\\|"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn run_locate(cache: &CacheManager) {
    let root = cache.root();
    let exists = root.is_dir();
    println!(
        "Library root: {}",
        root.display().if_supports_color(Stdout, |t| t.bold()),
    );
    if exists {
        let platforms = cache.platforms(false);
        println!(
            "  {} ({} platform folders)",
            "found".if_supports_color(Stdout, |t| t.green()),
            platforms.len(),
        );
    } else {
        println!(
            "  {}",
            "does not exist yet".if_supports_color(Stdout, |t| t.yellow()),
        );
    }
}

fn run_platforms(cache: &CacheManager, store: &FileSnapshotStore, refresh: bool) {
    let pb = scan_spinner("Scanning library...");
    let infos = cache.platform_info_list(refresh);
    pb.finish_and_clear();

    if infos.is_empty() {
        println!(
            "{}",
            "No platforms found.".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return;
    }

    for info in &infos {
        print_platform_info(info);
    }

    if let Ok(Some((_, timestamp))) = store.get(SNAPSHOT_NAMESPACE) {
        if let Some(written) = chrono::DateTime::from_timestamp(timestamp as i64, 0) {
            println!();
            println!(
                "{}",
                format!("snapshot written {}", written.format("%Y-%m-%d %H:%M:%S UTC"))
                    .if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
    }
}

fn print_platform_info(info: &PlatformInfo) {
    println!(
        "{} [{}]",
        info.key.if_supports_color(Stdout, |t| t.bold()),
        info.display_name.if_supports_color(Stdout, |t| t.cyan()),
    );
    println!(
        "  {} games, missing artwork: {} hero, {} logo, {} screenshot",
        info.game_count, info.missing_hero, info.missing_logo, info.missing_screenshot,
    );
    match info.icon() {
        Some(icon) => println!("  icon: {}", icon.display()),
        None => println!(
            "  icon: {}",
            "none".if_supports_color(Stdout, |t| t.dimmed()),
        ),
    }
}

fn run_games(
    cache: &CacheManager,
    platform: &str,
    refresh: bool,
    missing: Option<AssetKind>,
) {
    let pb = scan_spinner("Scanning games...");
    let mut games = cache.games(platform, refresh);
    pb.finish_and_clear();

    if let Some(kind) = missing {
        games.retain(|g| !g.has(kind));
    }

    if games.is_empty() {
        println!(
            "{}",
            "No matching games.".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return;
    }

    for game in &games {
        print_game(game);
    }
    println!();
    println!("{} games", games.len());
}

fn print_game(game: &GameEntry) {
    let mark = |kind: AssetKind, letter: char| -> String {
        if !game.has(kind) {
            "-".to_string()
        } else if game.is_generated(kind) {
            letter.to_uppercase().to_string()
        } else {
            letter.to_string()
        }
    };
    let coverage = format!(
        "{}{}{}{}",
        mark(AssetKind::Icon, 'i'),
        mark(AssetKind::Hero, 'h'),
        mark(AssetKind::Logo, 'l'),
        mark(AssetKind::Screenshot, 's'),
    );

    print!(
        "  [{}] {}",
        coverage.if_supports_color(Stdout, |t| t.cyan()),
        game.display_name.if_supports_color(Stdout, |t| t.bold()),
    );
    if game.display_name != game.raw_name {
        print!(
            "  {}",
            game.raw_name.if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    println!();
}

fn run_title(name: &str) {
    println!(
        "{} {}",
        "Display:".if_supports_color(Stdout, |t| t.cyan()),
        clean_title(name),
    );
    println!(
        "{} {}",
        "Search:".if_supports_color(Stdout, |t| t.cyan()),
        normalize_for_search(name),
    );
    println!("{}", "Variants:".if_supports_color(Stdout, |t| t.cyan()));
    for variant in search_variants(name) {
        println!("  {variant}");
    }
}

fn run_config_show() {
    println!("Settings file: {}", settings::settings_path().display());
    match settings::load_override_root() {
        Some(root) => println!("Override root: {}", root.display()),
        None => println!(
            "Override root: {}",
            "not set".if_supports_color(Stdout, |t| t.dimmed()),
        ),
    }
}

fn run_config_set_root(path: &PathBuf) {
    if !path.is_dir() {
        eprintln!(
            "{} {} does not exist; saving anyway (it will be skipped until it does)",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            path.display(),
        );
    }
    match settings::save_override_root(Some(path)) {
        Ok(()) => println!("Override root saved: {}", path.display()),
        Err(err) => {
            eprintln!("Failed to save settings: {err}");
            std::process::exit(1);
        }
    }
}

fn run_config_clear_root() {
    match settings::save_override_root(None) {
        Ok(()) => println!("Override root cleared."),
        Err(err) => {
            eprintln!("Failed to save settings: {err}");
            std::process::exit(1);
        }
    }
}

fn run_cache_clear(cache: &CacheManager) {
    cache.clear_all();
    println!(
        "{} cache cleared",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
    );
}
