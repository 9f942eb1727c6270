use clap::{Parser, Subcommand};
use mkdocs_prebuild::config::{self, SiteConfig};
use mkdocs_prebuild::generate::{self, GenerateError};
use mkdocs_prebuild::output;
use mkdocs_prebuild::store::DiskStore;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "mkdocs-prebuild")]
#[command(about = "Generate MkDocs configuration and pages before a site build")]
#[command(long_about = "\
Generate MkDocs configuration and pages before a site build

Reads a small set of source-of-truth files and writes the artifacts MkDocs
consumes. Every run is a full rebuild.

Project structure:

  .
  ├── prebuild.toml                      # Optional settings (see gen-config)
  ├── build/meta/versions.json           # {\"versions\": [...], \"latest\": \"\"}
  ├── data/implementations.yaml          # Implementations catalogue
  ├── nav.yml                            # Hand-written navigation (merge-nav)
  ├── templates/
  │   ├── mkdocs.yml.template            # {{NAVIGATION}}, {{VERSIONS}}
  │   ├── spec-overlay.yml.template      # {{VERSION}}
  │   └── spec-overlay-v1.0.yml.template # Optional per-version override
  └── docs/
      ├── faq.md                         # ---\\ntitle: ...\\ntags: [...]\\n---
      └── news/2025-04-23-title.md       # Dated news post

Generated:

  .monorepo-overlays/spec-<version>.mkdocs.yml
  mkdocs.yml
  docs/tags/index.md
  docs/implementations.md

Run 'mkdocs-prebuild gen-config' to print a documented prebuild.toml.")]
#[command(version)]
struct Cli {
    /// Project root; all configured paths are relative to it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (default: prebuild.toml under the project root)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug diagnostics
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate version overlays and mkdocs.yml
    Config,
    /// Generate the tags index page
    Tags,
    /// Generate the implementations page from the catalogue
    Implementations,
    /// Replace the nav section of mkdocs.yml with nav.yml
    MergeNav,
    /// Run config, tags and implementations
    Build,
    /// Scan versions, news and tags without writing anything
    Check,
    /// Print a stock prebuild.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn load_site_config(cli: &Cli, store: &DiskStore) -> Result<SiteConfig, Box<dyn Error>> {
    let path = match &cli.config {
        Some(path) => {
            if !store.root().join(path).is_file() {
                return Err(format!("config file not found: {}", path.display()).into());
            }
            path.clone()
        }
        None => PathBuf::from(config::CONFIG_FILE),
    };
    Ok(config::load_config(store, &path)?)
}

/// Run the selected command. `Ok(false)` means at least one build task failed.
fn run(cli: &Cli) -> Result<bool, Box<dyn Error>> {
    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(true);
    }

    let mut store = DiskStore::new(&cli.root);
    let site = load_site_config(cli, &store)?;

    match cli.command {
        Command::Config => {
            let report = generate::generate_config(&mut store, &site)?;
            output::print_config_output(&report);
        }
        Command::Tags => {
            let report = generate::generate_tags_page(&mut store, &site)?;
            output::print_tags_output(&report);
        }
        Command::Implementations => {
            let report = generate::generate_implementations_page(&mut store, &site)?;
            output::print_implementations_output(&report);
        }
        Command::MergeNav => {
            let report = generate::merge_nav_files(&mut store, &site)?;
            output::print_merge_output(&report);
        }
        Command::Build => {
            let mut failed = 0;

            println!("==> Config");
            match generate::generate_config(&mut store, &site) {
                Ok(report) => output::print_config_output(&report),
                Err(e) => failed += report_failure("config", &e),
            }

            println!("==> Tags");
            match generate::generate_tags_page(&mut store, &site) {
                Ok(report) => output::print_tags_output(&report),
                Err(e) => failed += report_failure("tags", &e),
            }

            println!("==> Implementations");
            match generate::generate_implementations_page(&mut store, &site) {
                Ok(report) => output::print_implementations_output(&report),
                Err(e) => failed += report_failure("implementations", &e),
            }

            if failed > 0 {
                eprintln!("==> Build finished with {failed} failed task(s)");
                return Ok(false);
            }
            println!("==> Build complete");
        }
        Command::Check => {
            println!("==> Checking {}", cli.root.display());
            let report = generate::check(&store, &site)?;
            output::print_check_output(&report);
            println!("==> Check complete");
        }
        // Printed before the config is loaded
        Command::GenConfig => {}
    }

    Ok(true)
}

fn report_failure(task: &str, err: &GenerateError) -> usize {
    eprintln!("Error ({task}): {err}");
    1
}
