use clap::{Parser, Subcommand};
use simple_folio::blog;
use simple_folio::catalog::{self, Catalog};
use simple_folio::config::{self, EngineConfig};
use simple_folio::engine::{GalleryEngine, InputEvent};
use simple_folio::fetch::{FsFetcher, ImageFetcher, ScriptedFetcher};
use simple_folio::filter::{self, FilterKey};
use simple_folio::output;
use simple_folio::render::{Container, RecordingSurface};
use simple_folio::types::BlogPost;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Headless driver for the portfolio gallery engine")]
#[command(long_about = "\
Headless driver for the portfolio gallery engine

Runs the gallery filter, staggered image loader, lightbox and notification
toasts against an in-memory page, on a virtual clock.

Site structure (every file optional):

  site/
  ├── config.toml      # Loader timing, lightbox keys, toast lifetime
  ├── catalog.toml     # [[items]] replacing the builtin twelve-item catalog
  └── posts.toml       # [[posts]] replacing the builtin blog posts

Run 'folio gen-config' to generate a documented config.toml.

Logging goes to stderr; set RUST_LOG (e.g. RUST_LOG=simple_folio=debug).")]
#[command(version = version_string())]
struct Cli {
    /// Site directory with config.toml, catalog.toml and posts.toml
    #[arg(long, default_value = "site", global = true)]
    source: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the catalog, optionally filtered
    Catalog {
        /// Filter key: all, nature, urban, photography, digital
        #[arg(long, default_value = "all")]
        filter: String,
        /// Print items as JSON instead of the listing
        #[arg(long)]
        json: bool,
    },
    /// Drive the engine headlessly and print what the page would show
    Preview(PreviewArgs),
    /// Validate config, catalog and posts without running anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct PreviewArgs {
    /// Filter to select after the initial render
    #[arg(long)]
    filter: Option<String>,
    /// Item ids whose images fail to load (scripted fetcher only)
    #[arg(long, value_delimiter = ',')]
    fail: Vec<u32>,
    /// Open the lightbox on this item once loading is done
    #[arg(long)]
    open: Option<u32>,
    /// Blog category to select
    #[arg(long)]
    blog: Option<String>,
    /// Advance the clock this far instead of running until idle
    #[arg(long)]
    advance_ms: Option<u64>,
    /// Load images from this directory instead of scripting them
    #[arg(long)]
    images: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Catalog { filter, json } => {
            let catalog = catalog::load_catalog(&cli.source)?;
            let key = FilterKey::parse(&filter);
            let items = filter::apply_filter(catalog.all(), &key);
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                output::print_catalog(&items, &key, catalog.len());
            }
        }
        Command::Preview(args) => {
            let (config, catalog, posts) = load_site(&cli.source)?;
            match &args.images {
                Some(dir) => {
                    if !args.fail.is_empty() {
                        return Err("--fail only applies to scripted images, not --images".into());
                    }
                    preview(config, catalog, posts, FsFetcher::new(dir), &args);
                }
                None => {
                    let fetcher = scripted_fetcher(&catalog, &args.fail)?;
                    preview(config, catalog, posts, fetcher, &args);
                }
            }
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let (config, catalog, posts) = load_site(&cli.source)?;
            output::print_check(&config, catalog.all(), &posts);
            println!("==> Site is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Structured logs to stderr, `warn` unless `RUST_LOG` says otherwise.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_site(
    source: &Path,
) -> Result<(EngineConfig, Catalog, Vec<BlogPost>), Box<dyn std::error::Error>> {
    let config = config::load_config(source)?;
    let catalog = catalog::load_catalog(source)?;
    let posts = blog::load_posts(source)?;
    Ok((config, catalog, posts))
}

fn scripted_fetcher(
    catalog: &Catalog,
    fail: &[u32],
) -> Result<ScriptedFetcher, Box<dyn std::error::Error>> {
    let mut fetcher = ScriptedFetcher::new();
    for id in fail {
        let item = catalog
            .get(*id)
            .ok_or_else(|| format!("--fail: no catalog item with id {id}"))?;
        fetcher = fetcher.failing(item.url.clone());
    }
    Ok(fetcher)
}

fn preview<F: ImageFetcher>(
    config: EngineConfig,
    catalog: Catalog,
    posts: Vec<BlogPost>,
    fetcher: F,
    args: &PreviewArgs,
) {
    let mut engine = GalleryEngine::new(config, catalog, posts, RecordingSurface::new(), fetcher);

    if let Some(key) = &args.filter {
        engine.handle(InputEvent::FilterSelected(key.clone()));
    }
    if let Some(category) = &args.blog {
        engine.handle(InputEvent::BlogCategorySelected(blog::category_key(category)));
    }
    match args.advance_ms {
        Some(ms) => engine.advance(Duration::from_millis(ms)),
        None => engine.run_until_idle(),
    }
    if let Some(id) = args.open {
        engine.handle(InputEvent::CardActivated(id));
    }

    let timeline = engine.take_timeline();
    output::print_preview(&timeline, &engine.loader().summary());

    let surface = engine.into_surface();
    println!();
    for (container, html) in surface.mounted() {
        if matches!(
            container,
            Container::Gallery | Container::CardImage(_) | Container::Lightbox | Container::Toast(_)
        ) {
            println!("<!-- {container} -->");
            println!("{html}");
        }
    }
}
