use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value.to_owned())
        } else {
            Self::File(PathBuf::from(value))
        }
    }

    pub(super) fn read_to_string(&self) -> Result<String> {
        match self {
            Self::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read network file {}", path.display())),
            Self::Url(url) => fetch(url),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

fn fetch(url: &str) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("failed to build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("failed to request network data from {url}"))?;

    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("network endpoint {url} answered with status {status}"));
    }

    response
        .text()
        .with_context(|| format!("network data from {url} was not valid text"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_and_paths_are_told_apart() {
        assert_eq!(
            DataSource::parse("https://example.invalid/data/network.json"),
            DataSource::Url("https://example.invalid/data/network.json".to_owned())
        );
        assert_eq!(
            DataSource::parse("data/network.json"),
            DataSource::File(PathBuf::from("data/network.json"))
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let source = DataSource::parse("/definitely/not/here/network.json");
        let error = source.read_to_string().unwrap_err();
        assert!(format!("{error:#}").contains("/definitely/not/here/network.json"));
    }
}
