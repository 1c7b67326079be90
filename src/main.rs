use clap::{Parser, Subcommand};
use inkpost::config::{self, BlogConfig};
use inkpost::load::{self, LoadedSite};
use inkpost::pagination::Feed;
use inkpost::routes::{self, Route, View};
use inkpost::store::PostStore;
use inkpost::{generate, output};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

#[derive(Parser)]
#[command(name = "inkpost")]
#[command(about = "Markdown blog engine: query posts and build a static site")]
#[command(long_about = "\
Markdown blog engine: query posts and build a static site

Posts are markdown files with an optional frontmatter block. Only the files
listed in config.toml are loaded, newest first.

Content structure:

  content/
  ├── config.toml                  # Site config (optional, merged over defaults)
  └── posts/
      ├── getting-started-with-react.md
      └── future-of-javascript.md

Frontmatter (every field optional):

  ---
  title: The Future of JavaScript
  date: 2024-03-01
  tags: [JavaScript, ES2024]
  author: 3Dayg
  excerpt: Shown on the list instead of a derived excerpt
  slug: future-of-js
  ---

Missing fields are derived: slug from the title, excerpt from the body,
reading time at 200 words per minute.

Run 'inkpost gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List posts, newest first
    List {
        /// Case-insensitive search over title, excerpt and tags
        #[arg(long)]
        search: Option<String>,
        /// Only posts carrying this tag (repeatable; all must match)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Number of pages to reveal
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    /// Show a single post by slug or by path (/post/<slug>)
    Show { slug: String },
    /// List every tag with its post count
    Tags,
    /// Render the static HTML site
    Build,
    /// Validate the content directory without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::List {
            search,
            tags,
            pages,
        } => {
            let (store, config) = open_store(&cli.source);
            let posts = match routes::resolve(&Route::List, &store) {
                View::List(posts) => posts,
                View::Failed(message) => return Err(message.into()),
                _ => return Ok(()),
            };
            let mut feed = Feed::new(posts, &config.pagination);
            if let Some(term) = &search {
                feed.set_search(term);
            }
            for tag in &tags {
                feed.select_tag(tag);
            }
            for _ in 1..pages.max(1) {
                let Some(ticket) = feed.request_more() else {
                    break;
                };
                feed.complete(ticket);
            }
            output::print_post_list(&feed);
        }
        Command::Show { slug } => {
            let route = if slug.starts_with('/') {
                Route::parse(&slug)
            } else {
                Route::Post(slug.clone())
            };
            let (store, _) = open_store(&cli.source);
            match routes::resolve(&route, &store) {
                View::Post(post) => output::print_post(&post),
                View::PostNotFound(missing) => output::print_not_found(&missing),
                View::NotFound => println!("No page at {}", slug),
                View::Failed(message) => return Err(message.into()),
                View::Loading | View::List(_) => {}
            }
        }
        Command::Tags => {
            let (store, _) = open_store(&cli.source);
            match routes::resolve(&Route::List, &store) {
                View::List(posts) => output::print_tags(&posts),
                View::Failed(message) => return Err(message.into()),
                _ => {}
            }
        }
        Command::Build => {
            println!("==> Loading {}", cli.source.display());
            let site = load_with_progress(&cli.source)?;

            println!("==> Generating HTML → {}", cli.output.display());
            let report = generate::generate(&site.report.posts, &site.config, &cli.output)?;
            output::print_build_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let site = load_with_progress(&cli.source)?;
            let report = load::check_site(&cli.source, &site);
            output::print_check(&report);
            if !report.is_clean() {
                return Err("content check failed".into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load `source` into a fresh store. A broken content root leaves the store
/// `Failed` (and the config at its defaults) rather than aborting here.
fn open_store(source: &Path) -> (PostStore, BlogConfig) {
    let store = PostStore::new();
    // A new store is still loading, so settling cannot fail.
    match load::load_site(source, None) {
        Ok(site) => {
            store.ready(site.report.posts).ok();
            (store, site.config)
        }
        Err(e) => {
            store.fail(format!("posts failed to load: {e}")).ok();
            (store, BlogConfig::default())
        }
    }
}

/// Load `source`, printing progress events from a printer thread.
fn load_with_progress(source: &Path) -> Result<LoadedSite, Box<dyn Error>> {
    let (tx, rx) = mpsc::channel();
    let printer = thread::spawn(move || {
        for event in rx {
            for line in output::format_load_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = load::load_site(source, Some(&tx));
    drop(tx);
    printer
        .join()
        .map_err(|_| "progress printer panicked")?;
    Ok(result?)
}
