mod cli;
mod error;
mod output;

use crate::cli::{Args, Command};
use crate::error::{ErrorKind, Result};
use appdata_config::Config;
use appdata_library::{DesktopFileResolver, DirectoryIngestor};
use appdata_parse::{Flags, Ingestor};
use appdata_pool::{PackageStore, Pool};
use clap::Parser;
use exn::ResultExt;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

/// Command-line switches override whatever the config layers said.
fn configure(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    if let Some(root) = &args.root {
        config.root = Some(root.clone());
    }
    if args.no_desktop {
        config.check_desktop_files = false;
    }
    if args.search_filelist {
        config.search_filelist = true;
    }
    Ok(config)
}

/// Returns `false` if any document failed.
fn run(args: &Args) -> Result<bool> {
    let config = configure(args)?;
    let flags = config.flags();
    info!(?flags, "configured");

    let mut desktop = DesktopFileResolver::new(&config.applications_dir);
    if let Some(root) = &config.root {
        desktop = desktop.with_root(root);
    }

    let mut pool = Pool::new();
    let clean = match &args.command {
        Command::File { paths } => ingest_files(&mut pool, paths, flags, &desktop),
        Command::Dir { dir } => {
            let dir = dir.as_deref().unwrap_or(config.appdata_dir.as_path());
            let mut ingestor = DirectoryIngestor::new(flags)
                .desktop_fallback(config.check_desktop_files)
                .desktop_resolver(&desktop);
            if let Some(root) = &config.root {
                ingestor = ingestor.root(root);
            }
            let report = ingestor.ingest(&mut pool, dir).or_raise(|| ErrorKind::Ingest)?;
            for failure in &report.errors {
                eprintln!("{failure}");
            }
            info!(documents = report.documents, records = report.records.len(), "directory ingested");
            report.is_clean()
        },
    };

    let views = output::views(&pool)?;
    let mut out = BufWriter::new(io::stdout().lock());
    if args.json {
        output::write_json(&mut out, &views)?;
    } else {
        output::write_text(&mut out, &views)?;
    }
    out.flush().or_raise(|| ErrorKind::Output)?;
    Ok(clean)
}

/// Ingest each path as its own document; `-` is standard input.
fn ingest_files(pool: &mut Pool, paths: &[impl AsRef<Path>], flags: Flags, desktop: &DesktopFileResolver) -> bool {
    let ingestor = Ingestor::new(flags | Flags::NO_INTERNALIZE).desktop_resolver(desktop);
    let mut clean = true;
    for path in paths {
        let path = path.as_ref();
        let input: Box<dyn Read> = match path.to_str() {
            Some("-") => Box::new(io::stdin().lock()),
            _ => match File::open(path) {
                Ok(file) => Box::new(file),
                Err(err) => {
                    eprintln!("{}: could not open file: {err}", path.display());
                    clean = false;
                    continue;
                },
            },
        };
        if let Err(err) = ingestor.ingest(pool, input) {
            eprintln!("{}: {}", path.display(), *err);
            clean = false;
        }
    }
    if !flags.contains(Flags::NO_INTERNALIZE) {
        pool.internalize();
    }
    clean
}
