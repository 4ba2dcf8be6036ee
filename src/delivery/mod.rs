//! Moving a finished archive to local disk and/or an S3 bucket
pub mod s3;

use crate::client::AtlassianClient;
use crate::errors::Result;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use simplelog::*;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

pub use s3::{CredentialSource, ObjectStore, S3Store};

pub const BACKUPS_DIR: &str = "backups";

const CHUNK_SIZE: usize = 1024;
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// File name for an archive: the last path segment of its URL without the
/// query string, plus `.zip`.
pub fn artifact_file_name(locator: &str) -> String {
    let segment = locator.rsplit('/').next().unwrap_or(locator);
    let stem = segment.split('?').next().unwrap_or(segment);

    format!("{stem}.zip")
}

pub struct Delivery<'a> {
    client: &'a AtlassianClient,
    backups_dir: PathBuf,
}

impl<'a> Delivery<'a> {
    /// `base_dir` must already hold a `backups/` directory.
    pub fn new(client: &'a AtlassianClient, base_dir: &Path) -> Delivery<'a> {
        Delivery {
            client,
            backups_dir: base_dir.join(BACKUPS_DIR),
        }
    }

    /// Streams `url` into `backups/<local_filename>`. The HTTP status is not
    /// checked: an error page is saved like any other body.
    pub fn download_file(&self, url: &str, local_filename: &str) -> Result<PathBuf> {
        info!("-> Downloading file from URL: {}", url);
        let mut res = self.client.get(url)?;
        if !res.status().is_success() {
            debug!("download answered {}, writing body anyway", res.status());
        }

        let file_path = self.backups_dir.join(local_filename);
        let mut file = File::create(&file_path)?;
        let written = write_chunks(&mut res, &mut file)?;
        file.flush()?;

        info!("{} ({} bytes)", file_path.display(), written);
        Ok(file_path)
    }

    /// Fetches `url` and uploads it as `remote_filename`. Anything but a 200
    /// skips the upload without failing the run; the return value says
    /// whether an object was written.
    pub fn stream_to_s3(
        &self,
        url: &str,
        remote_filename: &str,
        store: &dyn ObjectStore,
    ) -> Result<bool> {
        info!("-> Streaming to S3");
        let res = self.client.get(url)?;

        if res.status() != StatusCode::OK {
            warn!("skipping upload: {} answered {}", url, res.status());
            return Ok(false);
        }

        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        let body = res.bytes()?;

        store.put_object(remote_filename, &content_type, body.to_vec())?;

        Ok(true)
    }
}

/// Copies `reader` to `writer` in fixed-size chunks, skipping empty reads.
fn write_chunks<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<u64> {
    let mut buf = [0u8; CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n])?;
        total += n as u64;
    }
}
