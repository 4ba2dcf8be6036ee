use crate::backup::{BackupKind, Orchestrator, PollSchedule};
use crate::client::AtlassianClient;
use crate::config::Config;
use crate::delivery::{artifact_file_name, Delivery, S3Store};
use crate::errors::Result;
use simplelog::*;
use std::path::{Path, PathBuf};

/// What a finished run produced.
#[derive(Debug, Default, PartialEq)]
pub struct Outcome {
    pub locator: String,
    pub file_name: String,
    pub local_path: Option<PathBuf>,
    pub uploaded: bool,
}

/// One full backup: export, then the configured sinks in order. The config
/// is validated before any request goes out.
pub fn execute(
    config: &Config,
    base_dir: &Path,
    kind: BackupKind,
    schedule: PollSchedule,
) -> Result<Outcome> {
    config.validate()?;

    let client = AtlassianClient::new(&config.user_email, &config.api_token)?;
    let orchestrator = Orchestrator::new(&client, config).with_schedule(kind, schedule);
    let locator = orchestrator.create_backup(kind)?;
    let file_name = artifact_file_name(&locator);

    let delivery = Delivery::new(&client, base_dir);
    let mut outcome = Outcome {
        locator,
        file_name,
        ..Outcome::default()
    };

    if config.download_locally {
        outcome.local_path = Some(delivery.download_file(&outcome.locator, &outcome.file_name)?);
    }

    if config.uploads_to_s3() {
        let store = S3Store::connect(&config.upload_to_s3)?;
        outcome.uploaded = delivery.stream_to_s3(&outcome.locator, &outcome.file_name, &store)?;
    }

    if outcome.local_path.is_none() && !config.uploads_to_s3() {
        warn!("neither DOWNLOAD_LOCALLY nor UPLOAD_TO_S3 is set; the backup was not saved");
    }

    Ok(outcome)
}
