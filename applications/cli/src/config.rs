/// CLI configuration
use crate::error::{CliError, Result};
use conty_playback::NavigationConfig;
use conty_stories::ExtractOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "conty.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContyConfig {
    #[serde(default = "default_library")]
    pub library: LibrarySettings,

    #[serde(default)]
    pub stories: StoriesSettings,

    #[serde(default)]
    pub navigation: NavigationConfig,

    #[serde(default = "default_walk")]
    pub walk: WalkSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    /// Folder holding one sub-folder per pack
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoriesSettings {
    /// Thumbnail for stories that have no image of their own
    #[serde(default)]
    pub default_thumbnail: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WalkSettings {
    /// Upper bound on simulated segment ends and choices per walk
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

impl Default for ContyConfig {
    fn default() -> Self {
        Self {
            library: default_library(),
            stories: StoriesSettings::default(),
            navigation: NavigationConfig::default(),
            walk: default_walk(),
        }
    }
}

impl ContyConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `conty.toml` in the working
    /// directory is used when present. `CONTY_*` variables override both,
    /// with `__` between nesting levels (`CONTY_NAVIGATION__FADE_OUT_MS`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CONTY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.navigation.fade_steps == 0 {
            return Err(CliError::Config(
                "navigation.fade_steps must be at least 1".to_string(),
            ));
        }

        if self.walk.max_steps == 0 {
            return Err(CliError::Config(
                "walk.max_steps must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn extract_options(&self, podcast: bool) -> ExtractOptions {
        ExtractOptions {
            podcast,
            default_thumbnail: self.stories.default_thumbnail.clone(),
        }
    }
}

// Default values
fn default_library() -> LibrarySettings {
    LibrarySettings {
        root: default_root(),
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_walk() -> WalkSettings {
    WalkSettings {
        max_steps: default_max_steps(),
    }
}

fn default_max_steps() -> usize {
    500
}

#[cfg(test)]
mod tests {
    use super::*;
    use conty_playback::FadeCurve;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ContyConfig::default();
        assert_eq!(config.library.root, PathBuf::from("."));
        assert_eq!(config.navigation.fade_out_ms, 500);
        assert_eq!(config.walk.max_steps, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conty.toml");
        fs::write(
            &path,
            r#"
[library]
root = "/srv/packs"

[stories]
default_thumbnail = "cover.png"

[navigation]
fade_out_ms = 800
fade_curve = "SCurve"
"#,
        )
        .unwrap();

        let config = ContyConfig::load(Some(&path)).unwrap();

        assert_eq!(config.library.root, PathBuf::from("/srv/packs"));
        assert_eq!(config.navigation.fade_out_ms, 800);
        assert_eq!(config.navigation.fade_curve, FadeCurve::SCurve);
        // untouched keys keep their defaults
        assert_eq!(config.navigation.fade_steps, 25);
        assert_eq!(config.walk.max_steps, 500);

        let options = config.extract_options(true);
        assert!(options.podcast);
        assert_eq!(options.default_thumbnail.as_deref(), Some("cover.png"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = ContyConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_fade_steps() {
        let mut config = ContyConfig::default();
        config.navigation.fade_steps = 0;
        assert!(matches!(config.validate(), Err(CliError::Config(_))));
    }
}
