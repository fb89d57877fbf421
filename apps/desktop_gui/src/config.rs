use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "studentnest.toml";

#[derive(Debug, Parser)]
#[command(name = "studentnest", about = "StudentNest desktop client")]
pub struct Args {
    /// TOML file with `database_url`, `asset_dir` and transition settings.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub database_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub asset_dir: PathBuf,
    pub max_transition: Duration,
    pub history_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let database_url = dirs::data_local_dir()
            .map(|base| {
                let path = base.join("studentnest").join("studentnest.db");
                format!("sqlite://{}", path.to_string_lossy().replace('\\', "/"))
            })
            .unwrap_or_else(|| "sqlite://./data/studentnest.db".to_string());

        Self {
            database_url,
            asset_dir: PathBuf::from("assets"),
            max_transition: navigation::DEFAULT_MAX_TRANSITION,
            history_limit: navigation::DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl AppConfig {
    pub fn stylesheet_dir(&self) -> PathBuf {
        self.asset_dir.join("styles")
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    database_url: Option<String>,
    asset_dir: Option<PathBuf>,
    max_transition_ms: Option<u64>,
    history_limit: Option<usize>,
}

pub fn load_config(args: &Args) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::default();

    match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            apply_file(&mut config, &raw, path)?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(DEFAULT_CONFIG_FILE) {
                apply_file(&mut config, &raw, Path::new(DEFAULT_CONFIG_FILE))?;
            }
        }
    }

    apply_env(&mut config, |name| std::env::var(name).ok());

    if let Some(url) = &args.database_url {
        config.database_url = url.clone();
    }
    config.database_url = normalize_database_url(&config.database_url);

    Ok(config)
}

fn apply_file(config: &mut AppConfig, raw: &str, path: &Path) -> anyhow::Result<()> {
    let file: FileConfig = toml::from_str(raw)
        .with_context(|| format!("invalid config file '{}'", path.display()))?;

    if let Some(v) = file.database_url {
        config.database_url = v;
    }
    if let Some(v) = file.asset_dir {
        config.asset_dir = v;
    }
    if let Some(v) = file.max_transition_ms {
        config.max_transition = Duration::from_millis(v);
    }
    if let Some(v) = file.history_limit {
        config.history_limit = v;
    }
    Ok(())
}

fn apply_env(config: &mut AppConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("APP__DATABASE_URL") {
        config.database_url = v;
    }
    if let Some(v) = var("APP__ASSET_DIR") {
        config.asset_dir = PathBuf::from(v);
    }
    if let Some(v) = var("APP__MAX_TRANSITION_MS") {
        match v.parse::<u64>() {
            Ok(parsed) => config.max_transition = Duration::from_millis(parsed),
            Err(_) => tracing::warn!(value = %v, "ignoring non-numeric APP__MAX_TRANSITION_MS"),
        }
    }
}

fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return AppConfig::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn bare_paths_become_sqlite_urls() {
        assert_eq!(normalize_database_url("data/app.db"), "sqlite://data/app.db");
        assert_eq!(normalize_database_url("sqlite:data\\app.db"), "sqlite://data/app.db");
        assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_database_url("  "),
            AppConfig::default().database_url
        );
    }

    #[test]
    fn file_values_override_defaults() {
        let mut config = AppConfig::default();
        apply_file(
            &mut config,
            "database_url = \"sqlite://nest.db\"\nmax_transition_ms = 750\nhistory_limit = 4\n",
            Path::new("studentnest.toml"),
        )
        .expect("valid file");

        assert_eq!(config.database_url, "sqlite://nest.db");
        assert_eq!(config.max_transition, Duration::from_millis(750));
        assert_eq!(config.history_limit, 4);
        assert_eq!(config.asset_dir, PathBuf::from("assets"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut config = AppConfig::default();
        let err = apply_file(&mut config, "max_transition_ms = \"soon\"", Path::new("bad.toml"))
            .expect_err("type mismatch");
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn env_overrides_apply_and_bad_numbers_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("APP__ASSET_DIR", "/opt/studentnest/assets"),
            ("APP__MAX_TRANSITION_MS", "fast"),
        ]);
        let mut config = AppConfig::default();
        apply_env(&mut config, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.asset_dir, PathBuf::from("/opt/studentnest/assets"));
        assert_eq!(config.max_transition, navigation::DEFAULT_MAX_TRANSITION);
        assert_eq!(
            config.stylesheet_dir(),
            PathBuf::from("/opt/studentnest/assets/styles")
        );
    }
}
