use crate::errors::{BackupError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "_config.json";

/// Host value shipped in the template config; a run against it is refused.
pub const PLACEHOLDER_HOST: &str = "something.atlassian.net";

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct Config {
    #[serde(rename = "HOST_URL")]
    pub host_url: String,
    #[serde(rename = "USER_EMAIL")]
    pub user_email: String,
    #[serde(rename = "API_TOKEN")]
    pub api_token: String,
    #[serde(
        rename = "INCLUDE_ATTACHMENTS",
        default,
        deserialize_with = "lenient_flag"
    )]
    pub include_attachments: bool,
    #[serde(
        rename = "DOWNLOAD_LOCALLY",
        default = "default_true",
        deserialize_with = "lenient_flag"
    )]
    pub download_locally: bool,
    #[serde(rename = "UPLOAD_TO_S3", default)]
    pub upload_to_s3: S3Settings,
}

// Holds the data from the `UPLOAD_TO_S3` section.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
pub struct S3Settings {
    #[serde(rename = "AWS_ACCESS_KEY", default)]
    pub aws_access_key: String,
    #[serde(rename = "AWS_SECRET_KEY", default)]
    pub aws_secret_key: String,
    #[serde(rename = "S3_BUCKET", default)]
    pub s3_bucket: String,
    #[serde(
        rename = "AWS_REGION",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub aws_region: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host_url: PLACEHOLDER_HOST.to_string(),
            user_email: String::new(),
            api_token: String::new(),
            include_attachments: false,
            download_locally: true,
            upload_to_s3: S3Settings::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

// Older config files store flags as "true"/"false" strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Text(String),
}

fn lenient_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Text(value) => value.trim() == "true",
    })
}

impl Config {
    /// Resolves the config file location. A relative path is taken from the
    /// current directory; no path at all means `_config.json` in it.
    pub fn full_path(path: Option<&Path>) -> Result<PathBuf> {
        let cwd = env::current_dir()?;

        Ok(match path {
            Some(path) if path.is_relative() => cwd.join(path),
            Some(path) => path.to_path_buf(),
            None => cwd.join(CONFIG_FILE_NAME),
        })
    }

    pub fn load(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path).map_err(|e| {
            BackupError::Config(format!("unable to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            BackupError::Config(format!("unable to parse {}: {}", path.display(), e))
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;

        Ok(())
    }

    /// Refuses a config that still points at the template host.
    pub fn validate(&self) -> Result<()> {
        let host = self.host_url.trim();
        if host == PLACEHOLDER_HOST || host.is_empty() {
            return Err(BackupError::Config(String::from(
                "HOST_URL was not edited; update the config file or run with \"-w\"",
            )));
        }

        Ok(())
    }

    pub fn uploads_to_s3(&self) -> bool {
        !self.upload_to_s3.s3_bucket.trim().is_empty()
    }
}

/// Directory the `backups/` folder lives in: the one holding the config file.
pub fn base_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
