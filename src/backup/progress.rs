use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use simplelog::*;
use std::fmt::Debug;

/// One answer from a progress endpoint.
pub trait ProgressReport: DeserializeOwned + Debug {
    /// The download reference, present only once the export has finished.
    fn artifact(&self) -> Option<&str>;

    fn log_progress(&self);
}

/// Body of a Jira `getProgress` response.
#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct JiraProgress {
    pub status: Option<String>,
    pub progress: Option<Value>,
    pub description: Option<String>,
    pub result: Option<String>,
}

impl ProgressReport for JiraProgress {
    fn artifact(&self) -> Option<&str> {
        self.result.as_deref()
    }

    fn log_progress(&self) {
        info!(
            "Current status: {} {}; {}",
            self.status.as_deref().unwrap_or("-"),
            display_value(self.progress.as_ref()),
            self.description.as_deref().unwrap_or("-")
        );
    }
}

/// Body of a Confluence `getprogress` response.
#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct ConfluenceProgress {
    #[serde(rename = "currentStatus")]
    pub current_status: Option<String>,
    #[serde(rename = "alternativePercentage")]
    pub alternative_percentage: Option<Value>,
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
}

impl ProgressReport for ConfluenceProgress {
    fn artifact(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    fn log_progress(&self) {
        info!(
            "Current status: {} {}",
            self.current_status.as_deref().unwrap_or("-"),
            display_value(self.alternative_percentage.as_ref())
        );
        debug!("progress: {:?}", self);
    }
}

/// Jira answers the start request with `{"taskId": ...}`.
#[derive(Deserialize, Debug)]
pub struct StartedTask {
    #[serde(rename = "taskId", default)]
    task_id: Value,
}

impl StartedTask {
    /// The id arrives as a string or a bare number depending on the instance.
    pub fn task_id(&self) -> Option<String> {
        match &self.task_id {
            Value::String(id) if !id.is_empty() => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::from("-"),
        Some(other) => other.to_string(),
    }
}
