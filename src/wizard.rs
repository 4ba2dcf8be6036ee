//! Interactive prompts that write the config file
use crate::config::{Config, S3Settings};
use crate::errors::Result;
use rpassword::read_password;
use simplelog::*;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Asks for every setting on the terminal and saves the result to `path`.
pub fn create_config(path: &Path) -> Result<Config> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let config = prompt_config(&mut input, &mut output, read_password)?;
    config.save(path)?;
    info!("- config file created at: {}", path.display());

    Ok(config)
}

/// Collects a config from `input`. The API token is read through
/// `read_secret` so it is not echoed.
pub fn prompt_config<R, W, S>(input: &mut R, output: &mut W, mut read_secret: S) -> Result<Config>
where
    R: BufRead,
    W: Write,
    S: FnMut() -> io::Result<String>,
{
    let host_url = ask(input, output, "Atlassian host (e.g. something.atlassian.net)", None)?;
    let user_email = ask(input, output, "Email address of the backup user", None)?;

    write!(output, "API token for {user_email}: ")?;
    output.flush()?;
    let api_token = read_secret()?.trim().to_string();

    let include_attachments = ask_flag(input, output, "Include attachments?", false)?;
    let download_locally = ask_flag(input, output, "Download the backup locally?", true)?;

    let s3_bucket = ask(input, output, "S3 bucket (leave empty to skip upload)", Some(""))?;
    let mut upload_to_s3 = S3Settings {
        s3_bucket,
        ..S3Settings::default()
    };
    if !upload_to_s3.s3_bucket.is_empty() {
        upload_to_s3.aws_access_key = ask(
            input,
            output,
            "AWS access key (leave empty for ambient credentials)",
            Some(""),
        )?;
        if !upload_to_s3.aws_access_key.is_empty() {
            write!(output, "AWS secret key: ")?;
            output.flush()?;
            upload_to_s3.aws_secret_key = read_secret()?.trim().to_string();
        }
        let region = ask(input, output, "AWS region (leave empty for default)", Some(""))?;
        upload_to_s3.aws_region = (!region.is_empty()).then_some(region);
    }

    Ok(Config {
        host_url,
        user_email,
        api_token,
        include_attachments,
        download_locally,
        upload_to_s3,
    })
}

// Re-asks until an answer is given, unless there is a default.
fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: Option<&str>,
) -> Result<String> {
    loop {
        write!(output, "{question}: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(default.unwrap_or_default().to_string());
        }

        let answer = line.trim();
        match (answer.is_empty(), default) {
            (false, _) => return Ok(answer.to_string()),
            (true, Some(default)) => return Ok(default.to_string()),
            (true, None) => writeln!(output, "a value is required")?,
        }
    }
}

fn ask_flag<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: bool,
) -> Result<bool> {
    let hint = if default { "Y/n" } else { "y/N" };
    let answer = ask(input, output, &format!("{question} [{hint}]"), Some(""))?;

    Ok(match answer.to_lowercase().as_str() {
        "y" | "yes" | "true" => true,
        "n" | "no" | "false" => false,
        _ => default,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn collects_all_fields() {
        let mut input = Cursor::new("acme.atlassian.net\nops@acme.io\ny\nn\nacme-backups\nAKIAEXAMPLE\neu-west-1\n");
        let mut output = Vec::new();
        let mut secrets = vec!["secret".to_string(), "token".to_string()];

        let config = prompt_config(&mut input, &mut output, || {
            Ok(secrets.pop().unwrap_or_default())
        })
        .unwrap();

        assert_eq!(config.host_url, "acme.atlassian.net");
        assert_eq!(config.user_email, "ops@acme.io");
        assert_eq!(config.api_token, "token");
        assert!(config.include_attachments);
        assert!(!config.download_locally);
        assert_eq!(config.upload_to_s3.s3_bucket, "acme-backups");
        assert_eq!(config.upload_to_s3.aws_access_key, "AKIAEXAMPLE");
        assert_eq!(config.upload_to_s3.aws_secret_key, "secret");
        assert_eq!(config.upload_to_s3.aws_region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn empty_answers_use_defaults() {
        let mut input = Cursor::new("\nacme.atlassian.net\nops@acme.io\n\n\n\n");
        let mut output = Vec::new();

        let config =
            prompt_config(&mut input, &mut output, || Ok("token".to_string())).unwrap();

        assert_eq!(config.host_url, "acme.atlassian.net");
        assert!(!config.include_attachments);
        assert!(config.download_locally);
        assert!(!config.uploads_to_s3());
        assert!(String::from_utf8(output)
            .unwrap()
            .contains("a value is required"));
    }
}
