use anyhow::Context;
use atlassian_backup::backup::BackupKind;
use atlassian_backup::config::{self, Config};
use atlassian_backup::{run, wizard};
use clap::{crate_authors, crate_version, Parser};
use simplelog::{info, ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;

#[derive(Parser)]
#[clap(author = crate_authors!("\n"), version = crate_version!(), about = "Jira and Confluence Cloud backups", long_about = None)]
struct App {
    /// Run the configuration wizard before the backup
    #[clap(short = 'w', long)]
    wizard: bool,

    /// Back up Confluence instead of Jira
    #[clap(short = 'c', long)]
    confluence: bool,

    /// Config file to use [default: ./_config.json]
    #[clap(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Show more information in command output
    #[clap(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) -> Result<(), anyhow::Error> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    TermLogger::init(
        level,
        ConfigBuilder::new().build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    Ok(())
}

fn main() -> Result<(), anyhow::Error> {
    let app = App::parse();
    init_logger(app.verbose)?;

    let config_path = Config::full_path(app.config.as_deref())?;
    if app.wizard {
        wizard::create_config(&config_path).context("config wizard failed")?;
    }

    let config = Config::load(&config_path)?;
    let kind = if app.confluence {
        BackupKind::Confluence
    } else {
        BackupKind::Jira
    };

    let outcome = run::execute(
        &config,
        &config::base_dir(&config_path),
        kind,
        kind.default_schedule(),
    )
    .with_context(|| format!("{:?} backup failed", kind))?;

    info!("backup finished: {}", outcome.file_name);

    Ok(())
}
