// NVR Renamer CLI binary

use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use nvr_renamer_lib::config::{Config, DiveLogConfig};
use nvr_renamer_lib::ingest::{self, RecordingEntry, RunSummary};

#[derive(Parser)]
#[command(name = "nvr-renamer")]
#[command(about = "Rename and flatten ROV video recorder footage by camera and dive", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    options: GlobalOptions,
}

#[derive(Args)]
struct GlobalOptions {
    /// TOML config file (flags override its values)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minutes subtracted from each dive's launch time
    #[arg(long, global = true)]
    skew_minutes: Option<i64>,

    /// File extension to ignore (repeatable, replaces the default list)
    #[arg(long = "exclude-ext", global = true)]
    exclude_ext: Vec<String>,

    /// Name of the per-recording metadata file
    #[arg(long, global = true)]
    metadata_file: Option<String>,

    /// Write the run summary as JSON to this file
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Label directories, flatten files, and tag dives if a log is given
    Run {
        /// Recorder root directory
        root: PathBuf,
        /// Dive log (delimited text with Dive, Launch, Recovery columns)
        #[arg(long)]
        dive_log: Option<PathBuf>,
        /// Project name prefix for dive-tagged files
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Rename recording directories after their camera (pass 1 only)
    Label {
        /// Recorder root directory
        root: PathBuf,
    },

    /// Move segment files into the root under their camera name (pass 2 only)
    Flatten {
        /// Recorder root directory
        root: PathBuf,
    },

    /// Tag flattened files with their dive (pass 3 only)
    Tag {
        /// Recorder root directory
        root: PathBuf,
        /// Dive log (delimited text with Dive, Launch, Recovery columns)
        #[arg(long)]
        dive_log: Option<PathBuf>,
        /// Project name prefix for dive-tagged files
        #[arg(short, long)]
        project: Option<String>,
    },

    /// List recordings and the label each would get, without renaming
    Scan {
        /// Recorder root directory
        root: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.options.verbose, cli.options.quiet);

    match cli.command {
        Commands::Run { root, dive_log, project } => {
            let config = build_config(&cli.options, root, dive_log, project)?;
            cmd_passes("Run", &config, cli.options.report.as_deref(), ingest::run)
        }
        Commands::Label { root } => {
            let config = build_config(&cli.options, root, None, None)?;
            cmd_passes("Label", &config, cli.options.report.as_deref(), ingest::label_directories)
        }
        Commands::Flatten { root } => {
            let config = build_config(&cli.options, root, None, None)?;
            cmd_passes("Flatten", &config, cli.options.report.as_deref(), ingest::flatten_segments)
        }
        Commands::Tag { root, dive_log, project } => {
            let config = build_config(&cli.options, root, dive_log, project)?;
            cmd_passes("Tag", &config, cli.options.report.as_deref(), ingest::tag_dives)
        }
        Commands::Scan { root } => {
            let config = build_config(&cli.options, root, None, None)?;
            cmd_scan(&config)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_target(false)
        .init();
}

/// Config file first, then command-line overrides.
fn build_config(
    options: &GlobalOptions,
    root: PathBuf,
    dive_log: Option<PathBuf>,
    project: Option<String>,
) -> Result<Config> {
    let mut config = match &options.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    config.root = root;
    if let Some(project) = project {
        config.project_name = Some(project);
    }
    if let Some(path) = dive_log {
        match config.dive_log.as_mut() {
            Some(existing) => existing.path = path,
            None => config.dive_log = Some(DiveLogConfig::new(path)),
        }
    }
    if let Some(minutes) = options.skew_minutes {
        config.clip_skew_minutes = minutes;
    }
    if !options.exclude_ext.is_empty() {
        config.excluded_extensions = options.exclude_ext.clone();
    }
    if let Some(name) = &options.metadata_file {
        config.metadata_filename = name.clone();
    }

    config.validate()?;
    Ok(config)
}

fn cmd_passes<F>(name: &str, config: &Config, report: Option<&Path>, pass: F) -> Result<()>
where
    F: Fn(&Config) -> nvr_renamer_lib::Result<RunSummary>,
{
    log::info!("{} on {}", name, config.root.display());

    let summary = pass(config)
        .with_context(|| format!("{} failed for {}", name, config.root.display()))?;

    print_summary(&summary);

    if let Some(path) = report {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    if !summary.is_clean() {
        anyhow::bail!("{} item(s) failed; see the list above", summary.failures.len());
    }

    Ok(())
}

fn cmd_scan(config: &Config) -> Result<()> {
    let entries = ingest::scan(config)
        .with_context(|| format!("Scan failed for {}", config.root.display()))?;

    if entries.is_empty() {
        println!("No recordings found under {}", config.root.display());
        return Ok(());
    }

    println!("{:<36}  {:<24}  {:>8}  {}", "Recording", "Label", "Files", "Source");
    println!("{}", "-".repeat(84));

    for entry in &entries {
        print_entry(config, entry);
    }

    println!();
    println!("{} recordings", entries.len());
    Ok(())
}

fn print_entry(config: &Config, entry: &RecordingEntry) {
    let name = entry
        .path
        .strip_prefix(&config.root)
        .unwrap_or(&entry.path)
        .to_string_lossy()
        .to_string();
    let name = truncate(&name, 36);

    let (label, source) = match (&entry.label, &entry.error) {
        (Some(label), _) => (
            label.label().to_string(),
            if label.is_fallback() { "fallback" } else { "metadata" },
        ),
        (None, Some(error)) => (format!("error: {}", error), "-"),
        (None, None) => ("-".to_string(), "-"),
    };

    println!("{:<36}  {:<24}  {:>8}  {}", name, truncate(&label, 24), entry.segment_files, source);
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("Summary:");
    println!("  Directories renamed:        {}", summary.directories_renamed);
    println!("  Directories disambiguated:  {}", summary.directories_disambiguated);
    println!("  Directories unchanged:      {}", summary.directories_unchanged);
    println!("  Labels defaulted:           {}", summary.labels_defaulted);
    println!("  Files flattened:            {}", summary.files_flattened);
    println!("  Files tagged:               {}", summary.files_tagged);
    println!("    matched a dive:           {}", summary.dives_matched);
    println!("    off transect:             {}", summary.off_transect);
    println!("  Files skipped:              {}", summary.files_skipped);
    println!("  Failures:                   {}", summary.failures.len());

    if !summary.failures.is_empty() {
        println!();
        println!("{:>8}  {}", "Stage", "Path / Error");
        println!("{}", "-".repeat(70));
        for failure in &summary.failures {
            println!("{:>8}  {}", failure.stage.to_string(), failure.path.display());
            println!("{:>8}  {}", "", failure.error);
        }
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let head: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}
