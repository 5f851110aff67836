use std::path::Path;

/// Optional viewer settings. Everything has a built-in default so the binary
/// runs without any file on disk; a `showroom.json` next to the executable
/// overrides individual fields.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub model_path: String,
    pub environment_dir: String,
    pub window_title: String,
    pub window_size: [u32; 2],
    pub body_color: [u8; 3],
    pub highlight_color: [u8; 3],
    pub rotate: bool,
    pub overlay: OverlayConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub title: String,
    pub byline: String,
    pub links: Vec<OverlayLink>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayLink {
    pub label: String,
    pub url: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_path: "assets/GLS-580.glb".to_string(),
            environment_dir: "assets/environment/garage".to_string(),
            window_title: "Showroom - Mercedes GLS 580".to_string(),
            window_size: [1280, 720],
            body_color: [10, 8, 13],
            highlight_color: [29, 255, 77],
            rotate: true,
            overlay: OverlayConfig::default(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            title: "Mercedes GLS 580".to_string(),
            byline: "@ryanirilli".to_string(),
            links: vec![
                OverlayLink {
                    label: "GitHub".to_string(),
                    url: "https://github.com/ryanirilli".to_string(),
                },
                OverlayLink {
                    label: "Twitter".to_string(),
                    url: "https://twitter.com/ryanirilli".to_string(),
                },
                OverlayLink {
                    label: "Instagram".to_string(),
                    url: "https://www.instagram.com/ryanirilli/".to_string(),
                },
            ],
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ViewerConfig {
    /// Missing file is not an error; malformed JSON is.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        let config: ViewerConfig = serde_json::from_str(&json)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::ViewerConfig;

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::path::Path::new("definitely/not/here/showroom.json");
        let config = ViewerConfig::load(path).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{ "rotate": false, "body_color": [255, 0, 0] }"#).unwrap();
        assert!(!config.rotate);
        assert_eq!(config.body_color, [255, 0, 0]);
        assert_eq!(config.highlight_color, [29, 255, 77]);
        assert_eq!(config.model_path, "assets/GLS-580.glb");
    }

    #[test]
    fn roundtrip_via_file() {
        let mut config = ViewerConfig::default();
        config.body_color = [1, 2, 3];
        config.overlay.title = "Test Car".to_string();

        let mut path = std::env::temp_dir();
        path.push(format!("showroom_config_{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = ViewerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let mut path = std::env::temp_dir();
        path.push(format!("showroom_bad_config_{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();

        assert!(ViewerConfig::load(&path).is_err());

        let _ = std::fs::remove_file(path);
    }
}
