use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, ColorChoice, Parser, Subcommand};
use sitefix::config::SiteConfig;
use sitefix::logger;
use sitefix::runner::{ContactOptions, ImageFixOptions, RunSummary, fix_contacts, fix_images};

#[derive(Debug, Parser)]
#[command(
    name = "sitefix",
    version,
    about = "Maintenance helpers for static HTML sites"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Config file (defaults to <ROOT>/sitefix.json when present)"
    )]
    config: Option<PathBuf>,
    #[arg(short, long, global = true, help = "Print every individual replacement")]
    verbose: bool,
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Repair broken image references in HTML pages")]
    Images(ImagesArgs),
    #[command(about = "Normalise contact addresses and inject the contact footer")]
    Contacts(ContactsArgs),
}

#[derive(Debug, Args)]
struct ImagesArgs {
    #[arg(default_value = ".", value_name = "ROOT", help = "Directory to scan for HTML pages")]
    root: PathBuf,
    #[arg(long, value_name = "DIR", help = "Images directory (auto-detected when omitted)")]
    images_dir: Option<PathBuf>,
    #[arg(long, help = "Emit images/... instead of /images/...")]
    relative: bool,
    #[arg(long, help = "Report changes without writing files")]
    dry_run: bool,
    #[arg(
        long,
        value_name = "RATIO",
        value_parser = parse_threshold,
        help = "Minimum fuzzy match ratio (0.0 to 1.0)"
    )]
    threshold: Option<f32>,
}

#[derive(Debug, Args)]
struct ContactsArgs {
    #[arg(default_value = ".", value_name = "ROOT", help = "Directory to scan for HTML pages")]
    root: PathBuf,
    #[arg(long, help = "Canonical email domain")]
    domain: Option<String>,
    #[arg(long, help = "Organization name used in the footer and structured data")]
    name: Option<String>,
    #[arg(long, help = "Scan subdirectories as well as the top level")]
    recursive: bool,
    #[arg(long, help = "Do not inject Organization JSON-LD")]
    no_structured_data: bool,
    #[arg(long, help = "Report changes without writing files")]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Images(args) => run_images(cli.config.as_deref(), args),
        Commands::Contacts(args) => run_contacts(cli.config.as_deref(), args),
    }
}

fn run_images(config_path: Option<&Path>, args: &ImagesArgs) -> Result<()> {
    let mut config = load_config(config_path, &args.root)?;
    if let Some(threshold) = args.threshold {
        config.images.fuzzy_threshold = threshold;
    }

    let summary = fix_images(&config, &ImageFixOptions {
        root: args.root.clone(),
        images_dir: args.images_dir.clone(),
        relative: args.relative,
        dry_run: args.dry_run,
    })?;
    report(&summary, args.dry_run);
    Ok(())
}

fn run_contacts(config_path: Option<&Path>, args: &ContactsArgs) -> Result<()> {
    let mut config = load_config(config_path, &args.root)?;
    if let Some(domain) = &args.domain {
        config.contacts.domain = domain.clone();
    }
    if let Some(name) = &args.name {
        config.contacts.organization = name.clone();
    }
    if args.no_structured_data {
        config.contacts.structured_data = false;
    }

    let summary = fix_contacts(&config, &ContactOptions {
        root: args.root.clone(),
        recursive: args.recursive,
        dry_run: args.dry_run,
    })?;
    report(&summary, args.dry_run);
    Ok(())
}

fn parse_threshold(value: &str) -> Result<f32, String> {
    let ratio: f32 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if !(0.0..=1.0).contains(&ratio) {
        return Err(format!("`{value}` is outside 0.0..=1.0"));
    }
    Ok(ratio)
}

fn load_config(explicit: Option<&Path>, root: &Path) -> Result<SiteConfig> {
    let config = match explicit {
        Some(path) => SiteConfig::from_path(path)?,
        None => SiteConfig::discover(root)?,
    };
    Ok(config)
}

fn report(summary: &RunSummary, dry_run: bool) {
    let verb = if dry_run { "would change" } else { "changed" };
    sitefix::log!(
        "done";
        "{} of {} page(s) {verb}, {} replacement(s)",
        summary.changed.len(),
        summary.pages_scanned,
        summary.total_changes()
    );
}
