/// Every URL the run talks to, derived once from the configured host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    /// A bare host gets `https://`; a host with an explicit scheme is kept.
    pub fn new(host: &str) -> Endpoints {
        let host = host.trim().trim_end_matches('/');
        let base = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };

        Endpoints { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn jira_start(&self) -> String {
        format!("{}/rest/backup/1/export/runbackup", self.base)
    }

    pub fn jira_progress(&self, task_id: &str) -> String {
        format!("{}/rest/backup/1/export/getProgress?taskId={task_id}", self.base)
    }

    pub fn jira_download_prefix(&self) -> String {
        format!("{}/plugins/servlet", self.base)
    }

    pub fn confluence_start(&self) -> String {
        format!("{}/wiki/rest/obm/1.0/runbackup", self.base)
    }

    pub fn confluence_progress(&self) -> String {
        format!("{}/wiki/rest/obm/1.0/getprogress", self.base)
    }

    pub fn confluence_download_prefix(&self) -> String {
        format!("{}/wiki/download", self.base)
    }
}
