use crate::config::S3Settings;
use crate::errors::{BackupError, Result};
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use simplelog::*;
use tokio::runtime::Runtime;

const DEFAULT_REGION: &str = "us-east-1";

/// Destination for uploaded archives.
pub trait ObjectStore {
    fn put_object(&self, key: &str, content_type: &str, body: Vec<u8>) -> Result<()>;
}

/// Where S3 credentials come from, decided once from the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Key pair taken from the config file.
    Static {
        access_key: String,
        secret_key: String,
    },
    /// Environment, shared profile, instance role and so on.
    Ambient,
}

impl CredentialSource {
    pub fn from_settings(settings: &S3Settings) -> CredentialSource {
        if settings.aws_access_key.trim().is_empty() {
            CredentialSource::Ambient
        } else {
            CredentialSource::Static {
                access_key: settings.aws_access_key.clone(),
                secret_key: settings.aws_secret_key.clone(),
            }
        }
    }

    async fn client(&self, region: Option<String>) -> S3Client {
        let region_provider = match region {
            Some(region) => RegionProviderChain::first_try(Region::new(region)),
            None => RegionProviderChain::default_provider(),
        }
        .or_else(Region::new(DEFAULT_REGION));

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);
        if let CredentialSource::Static {
            access_key,
            secret_key,
        } = self
        {
            loader = loader.credentials_provider(Credentials::new(
                access_key.clone(),
                secret_key.clone(),
                None,
                None,
                "atlassian-backup-config",
            ));
        }

        S3Client::new(&loader.load().await)
    }
}

/// S3 bucket driven from blocking code through a private runtime.
pub struct S3Store {
    runtime: Runtime,
    client: S3Client,
    bucket: String,
}

impl S3Store {
    /// Builds the client and checks that the bucket is reachable.
    pub fn connect(settings: &S3Settings) -> Result<S3Store> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let credentials = CredentialSource::from_settings(settings);
        debug!("s3 credentials: {}", credential_kind(&credentials));

        let client = runtime.block_on(credentials.client(settings.aws_region.clone()));
        let bucket = settings.s3_bucket.trim().to_string();

        runtime
            .block_on(client.head_bucket().bucket(&bucket).send())
            .map_err(|e| {
                BackupError::ObjectStore(format!(
                    "bucket {} is not reachable: {}",
                    bucket,
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(S3Store {
            runtime,
            client,
            bucket,
        })
    }
}

impl ObjectStore for S3Store {
    fn put_object(&self, key: &str, content_type: &str, body: Vec<u8>) -> Result<()> {
        let req = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body));

        self.runtime.block_on(req.send()).map_err(|e| {
            BackupError::ObjectStore(format!(
                "failed to upload {} to {}: {}",
                key,
                self.bucket,
                DisplayErrorContext(&e)
            ))
        })?;
        info!("uploaded s3://{}/{}", self.bucket, key);

        Ok(())
    }
}

fn credential_kind(source: &CredentialSource) -> &'static str {
    match source {
        CredentialSource::Static { .. } => "config file",
        CredentialSource::Ambient => "ambient",
    }
}
