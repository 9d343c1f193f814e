//! Persistent browser configuration model and defaults.

/// Root configuration persisted to `db_browser.toml`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Config {
    #[serde(default)]
    /// Database file opened at startup.
    pub database: DatabaseConfig,
    #[serde(default)]
    /// Window preferences.
    pub ui: UiConfig,
    #[serde(default = "default_stages")]
    /// Linked list stages, upstream first.
    pub stages: Vec<StageConfig>,
}

/// Database location.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// Window preferences.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct UiConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
}

/// How a selected row is turned into the identifier passed downstream.
#[derive(Debug, Clone, Copy, serde::Deserialize, serde::Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionResolution {
    /// Use the identifier captured alongside the label when the list was populated.
    #[default]
    RowIdentifier,
    /// Look the identifier up again by display value, scoped to the active filter.
    /// Ambiguous when labels repeat inside one filter partition.
    LabelLookup,
}

/// One linked list in the browser chain.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct StageConfig {
    /// Pane header.
    pub title: String,
    pub table: String,
    pub display_field: String,
    #[serde(default = "default_id_column")]
    pub id_column: String,
    /// Empty means "sort by `display_field`".
    #[serde(default)]
    pub sort_keys: Vec<String>,
    /// Foreign-key column filtered by the previous stage's selection.
    #[serde(default)]
    pub link_column: Option<String>,
    /// Placeholder shown while the pane has no rows.
    #[serde(default)]
    pub empty_hint: String,
    #[serde(default)]
    pub selection_resolution: SelectionResolution,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            ui: UiConfig::default(),
            stages: default_stages(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

fn default_database_path() -> String {
    "music.db".to_string()
}

fn default_window_title() -> String {
    "Music DB Browser".to_string()
}

fn default_window_width() -> u32 {
    1024
}

fn default_window_height() -> u32 {
    768
}

fn default_id_column() -> String {
    "_id".to_string()
}

/// Returns the Artists → Albums → Songs chain used for new configs.
pub fn default_stages() -> Vec<StageConfig> {
    vec![
        StageConfig {
            title: "Artists".to_string(),
            table: "artists".to_string(),
            display_field: "name".to_string(),
            id_column: default_id_column(),
            sort_keys: Vec::new(),
            link_column: None,
            empty_hint: String::new(),
            selection_resolution: SelectionResolution::RowIdentifier,
        },
        StageConfig {
            title: "Albums".to_string(),
            table: "albums".to_string(),
            display_field: "name".to_string(),
            id_column: default_id_column(),
            sort_keys: vec!["name".to_string()],
            link_column: Some("artist".to_string()),
            empty_hint: "Choose an artist".to_string(),
            selection_resolution: SelectionResolution::RowIdentifier,
        },
        StageConfig {
            title: "Songs".to_string(),
            table: "songs".to_string(),
            display_field: "title".to_string(),
            id_column: default_id_column(),
            sort_keys: vec!["track".to_string()],
            link_column: Some("album".to_string()),
            empty_hint: "Choose an album".to_string(),
            selection_resolution: SelectionResolution::RowIdentifier,
        },
    ]
}

/// Clamps window geometry and restores the default chain when none is configured.
pub fn sanitize_config(config: Config) -> Config {
    let stages = if config.stages.is_empty() {
        default_stages()
    } else {
        config.stages
    };
    Config {
        database: config.database,
        ui: UiConfig {
            window_title: config.ui.window_title,
            window_width: config.ui.window_width.clamp(320, 7_680),
            window_height: config.ui.window_height.clamp(240, 4_320),
        },
        stages,
    }
}

#[cfg(test)]
mod tests {
    use super::{default_stages, sanitize_config, Config, SelectionResolution};

    #[test]
    fn test_default_config_has_music_chain() {
        let config = Config::default();

        assert_eq!(config.database.path, "music.db");
        assert_eq!(config.ui.window_title, "Music DB Browser");
        assert_eq!(config.ui.window_width, 1024);
        assert_eq!(config.ui.window_height, 768);

        let tables: Vec<&str> = config.stages.iter().map(|s| s.table.as_str()).collect();
        assert_eq!(tables, vec!["artists", "albums", "songs"]);
        assert_eq!(config.stages[0].link_column, None);
        assert_eq!(config.stages[1].link_column.as_deref(), Some("artist"));
        assert_eq!(config.stages[2].link_column.as_deref(), Some("album"));
        assert_eq!(config.stages[2].sort_keys, vec!["track".to_string()]);
        assert!(config
            .stages
            .iter()
            .all(|s| s.id_column == "_id"
                && s.selection_resolution == SelectionResolution::RowIdentifier));
    }

    #[test]
    fn test_partial_config_fills_missing_sections() {
        let partial_toml = r#"
[database]
path = "/tmp/other.db"
"#;

        let parsed: Config = toml::from_str(partial_toml).expect("config should parse");
        assert_eq!(parsed.database.path, "/tmp/other.db");
        assert_eq!(parsed.ui.window_width, 1024);
        assert_eq!(parsed.stages, default_stages());
    }

    #[test]
    fn test_custom_stage_parses_optional_fields() {
        let stage_toml = r#"
[[stages]]
title = "Genres"
table = "genres"
display_field = "label"

[[stages]]
title = "Tracks"
table = "tracks"
display_field = "title"
id_column = "track_id"
sort_keys = ["disc", "number"]
link_column = "genre_id"
selection_resolution = "label_lookup"
"#;

        let parsed: Config = toml::from_str(stage_toml).expect("config should parse");
        assert_eq!(parsed.stages.len(), 2);
        assert_eq!(parsed.stages[0].id_column, "_id");
        assert!(parsed.stages[0].sort_keys.is_empty());
        assert!(parsed.stages[0].empty_hint.is_empty());
        assert_eq!(parsed.stages[1].id_column, "track_id");
        assert_eq!(parsed.stages[1].sort_keys, vec!["disc", "number"]);
        assert_eq!(
            parsed.stages[1].selection_resolution,
            SelectionResolution::LabelLookup
        );
    }

    #[test]
    fn test_sanitize_clamps_window_and_restores_empty_chain() {
        let mut config = Config::default();
        config.ui.window_width = 10;
        config.ui.window_height = 100_000;
        config.stages.clear();

        let sanitized = sanitize_config(config);
        assert_eq!(sanitized.ui.window_width, 320);
        assert_eq!(sanitized.ui.window_height, 4_320);
        assert_eq!(sanitized.stages, default_stages());
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let text = toml::to_string(&Config::default()).expect("config should serialize");
        let parsed: Config = toml::from_str(&text).expect("config should parse");
        assert_eq!(parsed, Config::default());
    }
}
