use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Base URL of the deployed scoring API.
pub const DEFAULT_SCORING_API_BASE_URL: &str =
    "https://p7-ocr-api-mathis-d22bcf66c298.herokuapp.com";
pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_REFERENCE_DATASET: &str = "df300.csv";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub scoring_api_base_url: String,
    pub reference_dataset_path: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            scoring_api_base_url: normalize_base_url(
                &std::env::var("SCORING_API_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_SCORING_API_BASE_URL.to_string()),
            )?,
            reference_dataset_path: resolve_dataset_path(
                std::env::var("REFERENCE_DATASET_PATH")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_REFERENCE_DATASET.to_string()),
                executable_dir().as_deref(),
            ),
        };

        tracing::debug!("Scoring API Base URL: {}", config.scoring_api_base_url);
        tracing::debug!(
            "Reference dataset: {}",
            config.reference_dataset_path.display()
        );
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

/// Checks that `raw` is an http(s) URL and strips any trailing slash.
pub fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("SCORING_API_BASE_URL cannot be empty");
    }
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| anyhow::anyhow!("SCORING_API_BASE_URL is not a valid URL: {}", e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("SCORING_API_BASE_URL must start with http:// or https://");
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Relative dataset paths are anchored on the program's own directory.
pub fn resolve_dataset_path(raw: impl Into<PathBuf>, base: Option<&Path>) -> PathBuf {
    let path = raw.into();
    match base {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    }
}

fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}
