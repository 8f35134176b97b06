use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub selection: Option<SelectionConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Editions and book to open with instead of the first ones in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub editions: Option<Vec<String>>,
    pub book: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
    pub fps: Option<u32>,
}

/// Platform config directory path: `<config_dir>/raah/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("raah").join("config.toml"))
}

/// Load config by cascading CWD `.raah.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".raah.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        server: Some(ServerConfig {
            base_url: overlay
                .server
                .as_ref()
                .and_then(|s| s.base_url.clone())
                .or_else(|| base.server.as_ref().and_then(|s| s.base_url.clone())),
            timeout_secs: overlay
                .server
                .as_ref()
                .and_then(|s| s.timeout_secs)
                .or_else(|| base.server.as_ref().and_then(|s| s.timeout_secs)),
        }),
        selection: Some(SelectionConfig {
            editions: overlay
                .selection
                .as_ref()
                .and_then(|s| s.editions.clone())
                .or_else(|| base.selection.as_ref().and_then(|s| s.editions.clone())),
            book: overlay
                .selection
                .as_ref()
                .and_then(|s| s.book.clone())
                .or_else(|| base.selection.as_ref().and_then(|s| s.book.clone())),
        }),
        display: Some(DisplayConfig {
            theme: overlay
                .display
                .as_ref()
                .and_then(|d| d.theme.clone())
                .or_else(|| base.display.as_ref().and_then(|d| d.theme.clone())),
            fps: overlay
                .display
                .as_ref()
                .and_then(|d| d.fps)
                .or_else(|| base.display.as_ref().and_then(|d| d.fps)),
        }),
    }
}

/// Store `editions` and `book` as the `[selection]` of the platform config,
/// keeping every other section of that file.
pub fn save_selection(editions: &[String], book: Option<&str>) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
    save_selection_to(&path, editions, book)?;
    Ok(path)
}

pub fn save_selection_to(path: &Path, editions: &[String], book: Option<&str>) -> Result<(), String> {
    let mut config = load_from_path(path).unwrap_or_default();
    config.selection = Some(selection_config(editions, book));
    save_to_path(&config, path)
}

fn selection_config(editions: &[String], book: Option<&str>) -> SelectionConfig {
    SelectionConfig {
        editions: Some(editions.to_vec()),
        book: book.map(String::from),
    }
}

pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(path, content).map_err(|e| format!("Failed to write config: {}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_round_trip_toml() {
        let config = ConfigFile {
            server: Some(ServerConfig {
                base_url: Some("https://raah.example".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(
            parsed.server.unwrap().base_url.unwrap(),
            "https://raah.example"
        );
    }

    #[test]
    fn partial_selection_section() {
        let toml_str = "[selection]\neditions = [\"kjv\", \"niv\"]\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let selection = parsed.selection.unwrap();
        assert_eq!(selection.editions.unwrap(), ["kjv", "niv"]);
        assert!(selection.book.is_none());
        assert!(parsed.server.is_none());
    }

    #[test]
    fn merge_overlay_wins_and_base_fills_gaps() {
        let base = ConfigFile {
            server: Some(ServerConfig {
                base_url: Some("http://base".to_string()),
                timeout_secs: Some(30),
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            server: Some(ServerConfig {
                base_url: Some("http://overlay".to_string()),
                timeout_secs: None,
            }),
            display: Some(DisplayConfig {
                theme: Some("modern".to_string()),
                fps: None,
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        let server = merged.server.unwrap();
        assert_eq!(server.base_url.as_deref(), Some("http://overlay"));
        assert_eq!(server.timeout_secs, Some(30));
        assert_eq!(merged.display.unwrap().theme.as_deref(), Some("modern"));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = ConfigFile {
            selection: Some(SelectionConfig {
                editions: Some(vec!["kjv".into()]),
                book: Some("GEN".into()),
            }),
            ..Default::default()
        };
        save_to_path(&config, &path).unwrap();
        assert_eq!(load_from_path(&path), Some(config));
    }

    #[test]
    fn save_selection_keeps_other_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nbase_url = \"http://bible.local\"\n").unwrap();

        save_selection_to(&path, &["kjv".into(), "yor".into()], Some("EXO")).unwrap();

        let loaded = load_from_path(&path).unwrap();
        assert_eq!(
            loaded.server.unwrap().base_url.as_deref(),
            Some("http://bible.local")
        );
        let selection = loaded.selection.unwrap();
        assert_eq!(selection.editions.unwrap(), ["kjv", "yor"]);
        assert_eq!(selection.book.as_deref(), Some("EXO"));
    }

    #[test]
    fn unparsable_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nbase_url = ").unwrap();
        assert_eq!(load_from_path(&path), None);
        assert_eq!(load_from_path(&dir.path().join("missing.toml")), None);
    }
}
