use clap::{Parser, Subcommand};
use simple_card::batch::{self, BatchEvent};
use simple_card::config::{self, CardConfig};
use simple_card::output;
use simple_card::render::Thumbnailer;
use simple_card::types::LayoutInput;
use simple_card::upload::{DirectoryStore, RemoteStore, spawn_upload};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use time::OffsetDateTime;
use time::macros::format_description;

/// The article to draw.
#[derive(clap::Args, Clone)]
struct ArticleArgs {
    /// Article title
    #[arg(long)]
    title: String,

    /// Author name (rendered as "Author: <name>")
    #[arg(long)]
    author: String,

    /// Category name (rendered as "Category: <name>")
    #[arg(long)]
    category: String,

    /// Tag, repeatable; drawn in the order given
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Creation date as YYYY-MM-DD (default: today, UTC)
    #[arg(long, value_parser = parse_date)]
    date: Option<OffsetDateTime>,
}

impl ArticleArgs {
    fn into_input(self) -> LayoutInput {
        LayoutInput {
            title: self.title,
            author: self.author,
            category: self.category,
            tags: self.tags,
            created_at: self.date.unwrap_or_else(OffsetDateTime::now_utc),
        }
    }
}

/// Shared flags for commands that write thumbnails.
#[derive(clap::Args, Clone)]
struct WriteArgs {
    /// Skip the background mirror copy even if [mirror] is configured
    #[arg(long)]
    no_mirror: bool,

    /// Print the result as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn parse_date(s: &str) -> Result<OffsetDateTime, String> {
    let format = format_description!("[year]-[month]-[day]");
    time::Date::parse(s, format)
        .map(|date| date.midnight().assume_utc())
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

#[derive(Parser)]
#[command(name = "simple-card")]
#[command(about = "Render 300x300 social thumbnails for blog articles")]
#[command(long_about = "\
Render 300x300 social thumbnails for blog articles

Each card stacks, top to bottom: the title (bold, up to 30px), the author,
the category, one chip per tag, and the creation date pinned to the bottom
margin. Font sizes shrink until each block fits its share of the canvas;
long text wraps per character, so CJK titles break cleanly.

Output lands in [storage].upload_dir as <uuid>_thumb.png and the public URL
is base_url + public_path + file name.

Run 'simple-card gen-config' to generate a documented card.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = "card.toml", global = true)]
    config: PathBuf,

    /// Override [storage].upload_dir
    #[arg(long, global = true)]
    upload_dir: Option<PathBuf>,

    /// Override [storage].base_url
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one thumbnail and store it
    Render {
        #[command(flatten)]
        article: ArticleArgs,
        #[command(flatten)]
        write: WriteArgs,
    },
    /// Print the computed layout without drawing anything
    Layout {
        #[command(flatten)]
        article: ArticleArgs,
        /// Print the layout as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render every article in a JSON array file, in parallel
    Batch {
        /// JSON file: [{"title", "author", "category", "tags", "created_at"}, ...]
        input: PathBuf,
        #[command(flatten)]
        write: WriteArgs,
    },
    /// Validate config and load fonts without rendering
    Check,
    /// Print a stock card.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let card_config = load_config(&cli)?;

    match cli.command {
        Command::Render { article, write } => {
            let thumbnailer = Thumbnailer::from_config(&card_config)?;
            let (thumbnail, scene) = thumbnailer.render_with_scene(&article.into_input())?;
            let mirror = mirror_store(&card_config, &write).map(|store| {
                spawn_upload(
                    store,
                    thumbnail.file_path.clone(),
                    thumbnail.file_name.clone(),
                )
            });

            if write.json {
                let summary = output::RenderSummary {
                    thumbnail: &thumbnail,
                    layout: output::LayoutSummary::from(&scene),
                };
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                output::print_render_output(&thumbnail, &scene);
            }
            wait_for_mirrors(mirror);
        }
        Command::Layout { article, json } => {
            let thumbnailer = Thumbnailer::from_config(&card_config)?;
            let scene = thumbnailer.layout(&article.into_input());
            if json {
                let summary = output::LayoutSummary::from(&scene);
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                output::print_layout_output(&scene);
            }
        }
        Command::Batch { input, write } => {
            let inputs = batch::load_inputs(&input)?;
            init_thread_pool(&card_config.processing);
            let thumbnailer = Thumbnailer::from_config(&card_config)?;

            let (tx, rx) = std::sync::mpsc::channel::<BatchEvent>();
            let quiet = write.json;
            let printer = std::thread::spawn(move || {
                for event in rx {
                    if quiet {
                        continue;
                    }
                    for line in output::format_batch_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let report = batch::render_batch(&thumbnailer, &inputs, Some(tx));
            printer.join().map_err(|_| "progress printer panicked")?;

            let mirrors: Vec<_> = match mirror_store(&card_config, &write) {
                Some(store) => report
                    .rendered
                    .iter()
                    .map(|(_, t)| {
                        spawn_upload(store.clone(), t.file_path.clone(), t.file_name.clone())
                    })
                    .collect(),
                None => Vec::new(),
            };

            if write.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_batch_summary(&report);
            }
            wait_for_mirrors(mirrors);
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.display());
            println!("    Upload dir: {}", card_config.storage.upload_dir.display());
            println!("    Image URL: {}", card_config.storage.image_url("<uuid>_thumb.png"));
            Thumbnailer::from_config(&card_config)?;
            println!("    Title font: {}", card_config.fonts.title.display());
            println!("    Body font: {}", card_config.fonts.body.display());
            println!("==> Config is valid");
        }
        Command::GenConfig => {}
    }

    Ok(())
}

/// Config file, then CLI overrides on top.
fn load_config(cli: &Cli) -> Result<CardConfig, config::ConfigError> {
    let mut overrides = Vec::new();
    if let Some(dir) = &cli.upload_dir {
        overrides.push(config::override_value(
            "storage",
            "upload_dir",
            dir.display().to_string(),
        ));
    }
    if let Some(url) = &cli.base_url {
        overrides.push(config::override_value("storage", "base_url", url.as_str()));
    }
    config::load_config(&cli.config, overrides)
}

fn mirror_store(config: &CardConfig, write: &WriteArgs) -> Option<Arc<dyn RemoteStore>> {
    if write.no_mirror {
        return None;
    }
    let dir = config.mirror.dir.as_ref()?;
    let store: Arc<dyn RemoteStore> = Arc::new(DirectoryStore::new(dir));
    Some(store)
}

/// Mirrors run detached; wait so the process does not exit mid-copy.
fn wait_for_mirrors(handles: impl IntoIterator<Item = JoinHandle<()>>) {
    for handle in handles {
        if handle.join().is_err() {
            log::warn!("mirror thread panicked");
        }
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
