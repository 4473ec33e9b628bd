use std::{fmt, fs, io, path::Path, str::FromStr};

use anyhow::{bail, Context};
use serde::Deserialize;
use shared::protocol::DEFAULT_TABLE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Rest,
    Sqlite,
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rest" | "supabase" => Ok(Self::Rest),
            "sqlite" | "local" => Ok(Self::Sqlite),
            other => bail!("unknown backend '{other}'; expected 'rest' or 'sqlite'"),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rest => f.write_str("rest"),
            Self::Sqlite => f.write_str("sqlite"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend: Backend,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub table: String,
    pub database_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: Backend::Sqlite,
            supabase_url: None,
            supabase_key: None,
            table: DEFAULT_TABLE.into(),
            database_url: "sqlite://./data/vincula.db".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    backend: Option<String>,
    supabase_url: Option<String>,
    supabase_key: Option<String>,
    table: Option<String>,
    database_url: Option<String>,
}

/// Defaults, then the TOML file at `path` if it exists, then the process
/// environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    if let Some(file_cfg) = read_settings_file(path)? {
        apply_file(&mut settings, file_cfg)?;
    }
    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn read_settings_file(path: &Path) -> anyhow::Result<Option<FileSettings>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };
    let parsed = toml::from_str(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
    Ok(Some(parsed))
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) -> anyhow::Result<()> {
    if let Some(v) = file_cfg.backend {
        settings.backend = v.parse()?;
    }
    if let Some(v) = file_cfg.supabase_url {
        settings.supabase_url = Some(v);
    }
    if let Some(v) = file_cfg.supabase_key {
        settings.supabase_key = Some(v);
    }
    if let Some(v) = file_cfg.table {
        settings.table = v;
    }
    if let Some(v) = file_cfg.database_url {
        settings.database_url = v;
    }
    Ok(())
}

/// `APP__*` aliases are read after the plain names and win.
fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    for key in ["VINCULA_BACKEND", "APP__BACKEND"] {
        if let Some(v) = lookup(key) {
            settings.backend = v.parse().with_context(|| format!("invalid {key}"))?;
        }
    }
    for key in ["SUPABASE_URL", "APP__SUPABASE_URL"] {
        if let Some(v) = lookup(key) {
            settings.supabase_url = Some(v);
        }
    }
    for key in ["SUPABASE_KEY", "APP__SUPABASE_KEY"] {
        if let Some(v) = lookup(key) {
            settings.supabase_key = Some(v);
        }
    }
    for key in ["VINCULA_TABLE", "APP__TABLE"] {
        if let Some(v) = lookup(key) {
            settings.table = v;
        }
    }
    for key in ["DATABASE_URL", "APP__DATABASE_URL"] {
        if let Some(v) = lookup(key) {
            settings.database_url = v;
        }
    }
    Ok(())
}

/// Turns the configured database location into a sqlite URL for the local
/// backend. Accepts `sqlite:` URLs, `:memory:`, and bare file paths; a blank
/// value means the default file. Any other scheme belongs to the rest backend.
pub fn normalize_database_url(database_url: &str) -> anyhow::Result<String> {
    let database_url = database_url.trim();

    match database_url {
        "" => Ok(Settings::default().database_url),
        ":memory:" => Ok("sqlite::memory:".to_string()),
        url if url.starts_with("sqlite::memory:") => Ok(url.to_string()),
        url if url.starts_with("sqlite://") => Ok(url.replace('\\', "/")),
        url if url.starts_with("sqlite:") => {
            Ok(format!("sqlite://{}", url["sqlite:".len()..].replace('\\', "/")))
        }
        url if url.contains("://") => bail!(
            "database_url '{url}' is not a sqlite location; use backend = \"rest\" for hosted tables"
        ),
        path => Ok(format!("sqlite://{}", path.replace('\\', "/"))),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
