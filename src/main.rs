//! javadoc-fixer: repair javadoc blocks in Java sources.
//!
//! Two modes:
//!
//! - **stdin mode**: `javadoc-fixer < Foo.java > Fixed.java`
//! - **file mode**: `javadoc-fixer src/main/java 'legacy/**/*.java'`, rewriting
//!   changed files in place

use anyhow::{bail, Context, Result};
use clap::Parser;
use javadoc_fixer::discover::collect_sources;
use javadoc_fixer::progress::{create_progress_bar, summary};
use javadoc_fixer::rewrite::rule_names;
use javadoc_fixer::{FixOptions, Fixer};
use rayon::prelude::*;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "javadoc-fixer",
    version,
    about = "Repair javadoc blocks so their tags and markup match the declarations they document"
)]
struct Cli {
    /// Files, directories or glob patterns. If omitted, reads one unit from stdin.
    paths: Vec<String>,

    /// File extension to pick up when scanning directories (repeatable)
    #[arg(short = 'e', long = "ext", value_name = "EXT", default_value = "java")]
    extensions: Vec<String>,

    /// Write nothing; list files that would change and fail if there are any
    #[arg(long)]
    check: bool,

    /// Write nothing; list files that would change
    #[arg(long, conflicts_with = "check")]
    dry_run: bool,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(short = 'j', long, value_name = "N")]
    jobs: Option<usize>,

    /// Disable a rewrite rule by name (repeatable)
    #[arg(long = "skip-rule", value_name = "NAME", value_parser = parse_rule_name)]
    skip_rules: Vec<String>,

    /// Leave @param, @throws and @return tags alone
    #[arg(long)]
    no_tag_sync: bool,

    /// No progress bar or summary
    #[arg(short, long)]
    quiet: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn fix_options(&self) -> FixOptions {
        FixOptions {
            disabled_rules: self.skip_rules.iter().cloned().collect(),
            sync_tags: !self.no_tag_sync,
        }
    }

    fn writes(&self) -> bool {
        !self.check && !self.dry_run
    }
}

fn parse_rule_name(name: &str) -> Result<String, String> {
    if rule_names().any(|r| r == name) {
        Ok(name.to_string())
    } else {
        let known: Vec<_> = rule_names().collect();
        Err(format!("unknown rule '{}' (known: {})", name, known.join(", ")))
    }
}

enum FileStatus {
    Unchanged,
    Fixed,
    Skipped,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let fixer = Fixer::new(cli.fix_options());
    if cli.paths.is_empty() {
        return stdin_mode(&cli, &fixer);
    }
    file_mode(&cli, &fixer)
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("javadoc_fixer={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// stdin mode: rewrite one unit from stdin onto stdout.
fn stdin_mode(cli: &Cli, fixer: &Fixer) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let outcome = fixer.process(&input);
    if cli.check {
        if outcome.changed {
            bail!("stdin would be changed");
        }
        return Ok(());
    }
    print!("{}", outcome.result);
    Ok(())
}

/// file mode: rewrite every discovered unit in parallel.
fn file_mode(cli: &Cli, fixer: &Fixer) -> Result<()> {
    let files = collect_sources(&cli.paths, &cli.extensions)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cli.jobs.unwrap_or(0))
        .build()
        .context("failed to start worker pool")?;

    let pb = create_progress_bar(files.len() as u64, cli.quiet);
    let statuses: Vec<(PathBuf, FileStatus)> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let status = match fix_file(path, fixer, cli.writes()) {
                    Ok(true) => FileStatus::Fixed,
                    Ok(false) => FileStatus::Unchanged,
                    Err(e) => {
                        warn!("skipping {}: {:#}", path.display(), e);
                        FileStatus::Skipped
                    }
                };
                pb.inc(1);
                (path.clone(), status)
            })
            .collect()
    });
    pb.finish_and_clear();

    let mut fixed = 0;
    for (path, status) in &statuses {
        if let FileStatus::Fixed = status {
            fixed += 1;
            if cli.writes() {
                info!("fixed {}", path.display());
            } else {
                println!("{}", path.display());
            }
        }
    }
    let scanned = statuses
        .iter()
        .filter(|(_, s)| !matches!(s, FileStatus::Skipped))
        .count();

    if !cli.quiet {
        println!("{}", summary(scanned, fixed));
    }
    if cli.check && fixed > 0 {
        bail!("{} file(s) would be changed", fixed);
    }
    Ok(())
}

/// Rewrite one unit. Returns whether it changed; writes only when `write`.
fn fix_file(path: &Path, fixer: &Fixer, write: bool) -> Result<bool> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let outcome = fixer.process(&content);
    if outcome.changed && write {
        fs::write(path, &outcome.result)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(outcome.changed)
}
