//! viet-migrate CLI
//!
//! One-shot copy of the college website's JSON data files into its database.

mod error;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use viet_migrate_catalog::Collection;
use viet_migrate_import::{LogProgress, SourceDir, run_migration};
use viet_migrate_supabase::{SupabaseClient, SupabaseConfig};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "viet-migrate")]
#[command(about = "Migrate the site's JSON data files into Supabase", long_about = None)]
struct Cli {
    /// Directory holding one <collection>.json file per collection
    #[arg(long, default_value = "server/data")]
    data_dir: PathBuf,

    /// Write into a local SQLite mirror instead of Supabase
    #[arg(long)]
    sqlite: Option<PathBuf>,

    /// Only migrate these collections (e.g., users,pages,hero-videos)
    #[arg(long, value_delimiter = ',')]
    only: Option<Vec<Collection>>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        log::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install the logger. `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        "info,viet_migrate_import=debug,viet_migrate_supabase=debug,viet_migrate=debug"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format(|buf, record| match record.level() {
            log::Level::Error => writeln!(
                buf,
                "{}",
                record.args().if_supports_color(Stderr, |t| t.red())
            ),
            log::Level::Warn => writeln!(
                buf,
                "{}",
                record.args().if_supports_color(Stderr, |t| t.yellow())
            ),
            _ => writeln!(buf, "{}", record.args()),
        })
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let collections = select_collections(cli.only.as_deref());
    let source = SourceDir::new(&cli.data_dir);

    match &cli.sqlite {
        Some(path) => {
            let conn = viet_migrate_db::open_database(path).map_err(|e| {
                CliError::database(format!("failed to open {}: {}", path.display(), e))
            })?;
            log::info!(
                "Migrating {} into SQLite mirror {}",
                source.root().display(),
                path.display()
            );
            run_migration(&conn, &source, &collections, &LogProgress)?;
        }
        None => {
            // Checked before any file or network access
            let config = SupabaseConfig::from_env()?;
            let client = SupabaseClient::new(&config)?;
            log::info!(
                "Migrating {} into {}",
                source.root().display(),
                config.url
            );
            run_migration(&client, &source, &collections, &LogProgress)?;
        }
    }

    Ok(())
}

/// Collections to run, always in migration order.
fn select_collections(only: Option<&[Collection]>) -> Vec<Collection> {
    Collection::all()
        .iter()
        .copied()
        .filter(|c| only.is_none_or(|wanted| wanted.contains(c)))
        .collect()
}
