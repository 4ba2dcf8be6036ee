//! Starting Jira and Confluence Cloud exports and waiting for them to finish
pub mod progress;

use crate::client::AtlassianClient;
use crate::config::Config;
use crate::endpoints::Endpoints;
use crate::errors::{BackupError, Result};
use progress::{ConfluenceProgress, JiraProgress, ProgressReport, StartedTask};
use reqwest::blocking::Response;
use reqwest::StatusCode;
use serde::Serialize;
use simplelog::*;
use std::thread;
use std::time::Duration;

/// Which product an export is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupKind {
    Jira,
    Confluence,
}

impl BackupKind {
    /// Jira reports progress coarsely, so it is polled far less often.
    pub fn default_schedule(self) -> PollSchedule {
        match self {
            BackupKind::Jira => PollSchedule::new(Duration::from_secs(30), Duration::from_secs(30)),
            BackupKind::Confluence => {
                PollSchedule::new(Duration::from_secs(30), Duration::from_secs(2))
            }
        }
    }
}

/// Waits applied around the progress loop: once before the first poll,
/// then between polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub warmup: Duration,
    pub interval: Duration,
}

impl PollSchedule {
    pub const IMMEDIATE: PollSchedule = PollSchedule::new(Duration::ZERO, Duration::ZERO);

    pub const fn new(warmup: Duration, interval: Duration) -> PollSchedule {
        PollSchedule { warmup, interval }
    }
}

#[derive(Serialize, Debug, PartialEq)]
struct BackupRequest {
    #[serde(rename = "cbAttachments")]
    cb_attachments: bool,
    #[serde(rename = "exportToCloud")]
    export_to_cloud: &'static str,
}

pub struct Orchestrator<'a> {
    client: &'a AtlassianClient,
    endpoints: Endpoints,
    include_attachments: bool,
    jira_schedule: PollSchedule,
    confluence_schedule: PollSchedule,
}

impl<'a> Orchestrator<'a> {
    pub fn new(client: &'a AtlassianClient, config: &Config) -> Orchestrator<'a> {
        info!("{}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S"));

        Orchestrator {
            client,
            endpoints: Endpoints::new(&config.host_url),
            include_attachments: config.include_attachments,
            jira_schedule: BackupKind::Jira.default_schedule(),
            confluence_schedule: BackupKind::Confluence.default_schedule(),
        }
    }

    pub fn with_schedule(mut self, kind: BackupKind, schedule: PollSchedule) -> Orchestrator<'a> {
        match kind {
            BackupKind::Jira => self.jira_schedule = schedule,
            BackupKind::Confluence => self.confluence_schedule = schedule,
        }
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Runs an export of the given kind and returns the archive URL.
    pub fn create_backup(&self, kind: BackupKind) -> Result<String> {
        match kind {
            BackupKind::Jira => self.create_jira_backup(),
            BackupKind::Confluence => self.create_confluence_backup(),
        }
    }

    pub fn create_confluence_backup(&self) -> Result<String> {
        self.start(&self.endpoints.confluence_start())?;
        info!("Backup process successfully started");

        let file_name = self.poll_until_done::<ConfluenceProgress>(
            &self.endpoints.confluence_progress(),
            self.confluence_schedule,
        )?;

        Ok(format!(
            "{}/{}",
            self.endpoints.confluence_download_prefix(),
            file_name.trim_start_matches('/')
        ))
    }

    pub fn create_jira_backup(&self) -> Result<String> {
        let url = self.endpoints.jira_start();
        let started: StartedTask = serde_json::from_str(&self.start(&url)?.text()?)?;
        let task_id = started
            .task_id()
            .ok_or_else(|| BackupError::UnexpectedResponse {
                url: url.clone(),
                reason: String::from("no taskId in response"),
            })?;
        info!("Backup process successfully started: taskId={}", task_id);

        let result = self.poll_until_done::<JiraProgress>(
            &self.endpoints.jira_progress(&task_id),
            self.jira_schedule,
        )?;

        Ok(format!("{}/{}", self.endpoints.jira_download_prefix(), result))
    }

    fn request(&self) -> BackupRequest {
        BackupRequest {
            cb_attachments: self.include_attachments,
            export_to_cloud: "true",
        }
    }

    fn start(&self, url: &str) -> Result<Response> {
        info!(
            "-> Starting backup; include attachments: {}",
            self.include_attachments
        );
        let res = self.client.post_json(url, &self.request())?;

        if res.status() != StatusCode::OK {
            let status = res.status();
            let body = res.text().unwrap_or_default();
            error!("backup request failed with {}: {}", status, body);

            return Err(BackupError::StartRejected {
                url: url.to_string(),
                status,
                body,
            });
        }

        Ok(res)
    }

    // No ceiling on the number of polls; errors end the loop.
    fn poll_until_done<P: ProgressReport>(&self, url: &str, schedule: PollSchedule) -> Result<String> {
        thread::sleep(schedule.warmup);

        loop {
            let report: P = self.client.get_json(url)?;
            report.log_progress();

            if let Some(artifact) = report.artifact() {
                return Ok(artifact.to_string());
            }

            thread::sleep(schedule.interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_intervals_differ_per_kind() {
        assert_eq!(
            BackupKind::Jira.default_schedule(),
            PollSchedule::new(Duration::from_secs(30), Duration::from_secs(30))
        );
        assert_eq!(
            BackupKind::Confluence.default_schedule(),
            PollSchedule::new(Duration::from_secs(30), Duration::from_secs(2))
        );
    }

    #[test]
    fn request_body_shape() {
        let body = BackupRequest {
            cb_attachments: true,
            export_to_cloud: "true",
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"cbAttachments": true, "exportToCloud": "true"})
        );
    }

    #[test]
    fn with_schedule_only_touches_one_kind() {
        let client = AtlassianClient::new("ops@acme.io", "token").unwrap();
        let config = Config {
            host_url: "acme.atlassian.net".to_string(),
            ..Config::default()
        };
        let orchestrator = Orchestrator::new(&client, &config)
            .with_schedule(BackupKind::Jira, PollSchedule::IMMEDIATE);

        assert_eq!(orchestrator.jira_schedule, PollSchedule::IMMEDIATE);
        assert_eq!(
            orchestrator.confluence_schedule,
            BackupKind::Confluence.default_schedule()
        );
        assert_eq!(orchestrator.endpoints().base(), "https://acme.atlassian.net");
    }
}
