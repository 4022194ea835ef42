use std::path::{Path, PathBuf};

use citesplit_parsing::{ConfigError, SegmenterConfig, SegmenterConfigBuilder};
use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub signals: Option<ListConfig>,
    pub abbreviations: Option<ListConfig>,
    pub segmentation: Option<SegmentationConfig>,
    pub output: Option<OutputConfig>,
}

/// A keyword list: `replace` swaps out the built-in list, `extend` appends to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListConfig {
    pub replace: Option<Vec<String>>,
    pub extend: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentationConfig {
    pub supplemental_regex: Option<String>,
    pub min_sentence_boundaries: Option<usize>,
    pub max_semicolons: Option<usize>,
    pub lead_window_chars: Option<usize>,
    pub case_name_window_chars: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<String>,
    pub color: Option<bool>,
}

/// Platform config directory path: `<config_dir>/citesplit/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("citesplit").join("config.toml"))
}

/// Load config by cascading CWD `.citesplit.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".citesplit.toml"));

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
    match read_from_path(path) {
        Ok(config) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            Some(config)
        }
        Err(_) => None,
    }
}

/// Read a config the user asked for explicitly; unlike [`load_from_path`],
/// a missing or malformed file is an error.
pub fn read_from_path(path: &Path) -> Result<ConfigFile, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&content)
        .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))
}

fn merge_list(base: Option<ListConfig>, overlay: Option<ListConfig>) -> Option<ListConfig> {
    if base.is_none() && overlay.is_none() {
        return None;
    }
    Some(ListConfig {
        replace: overlay
            .as_ref()
            .and_then(|l| l.replace.clone())
            .or_else(|| base.as_ref().and_then(|l| l.replace.clone())),
        extend: overlay
            .as_ref()
            .and_then(|l| l.extend.clone())
            .or_else(|| base.as_ref().and_then(|l| l.extend.clone())),
    })
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        signals: merge_list(base.signals, overlay.signals),
        abbreviations: merge_list(base.abbreviations, overlay.abbreviations),
        segmentation: Some(SegmentationConfig {
            supplemental_regex: overlay
                .segmentation
                .as_ref()
                .and_then(|s| s.supplemental_regex.clone())
                .or_else(|| {
                    base.segmentation
                        .as_ref()
                        .and_then(|s| s.supplemental_regex.clone())
                }),
            min_sentence_boundaries: overlay
                .segmentation
                .as_ref()
                .and_then(|s| s.min_sentence_boundaries)
                .or_else(|| {
                    base.segmentation
                        .as_ref()
                        .and_then(|s| s.min_sentence_boundaries)
                }),
            max_semicolons: overlay
                .segmentation
                .as_ref()
                .and_then(|s| s.max_semicolons)
                .or_else(|| base.segmentation.as_ref().and_then(|s| s.max_semicolons)),
            lead_window_chars: overlay
                .segmentation
                .as_ref()
                .and_then(|s| s.lead_window_chars)
                .or_else(|| base.segmentation.as_ref().and_then(|s| s.lead_window_chars)),
            case_name_window_chars: overlay
                .segmentation
                .as_ref()
                .and_then(|s| s.case_name_window_chars)
                .or_else(|| {
                    base.segmentation
                        .as_ref()
                        .and_then(|s| s.case_name_window_chars)
                }),
        }),
        output: Some(OutputConfig {
            format: overlay
                .output
                .as_ref()
                .and_then(|o| o.format.clone())
                .or_else(|| base.output.as_ref().and_then(|o| o.format.clone())),
            color: overlay
                .output
                .as_ref()
                .and_then(|o| o.color)
                .or_else(|| base.output.as_ref().and_then(|o| o.color)),
        }),
    }
}

impl ConfigFile {
    /// Build the engine configuration this file describes.
    pub fn to_segmenter_config(&self) -> Result<SegmenterConfig, ConfigError> {
        let mut builder = SegmenterConfigBuilder::new();

        if let Some(signals) = &self.signals {
            match &signals.replace {
                Some(replace) => {
                    let mut all = replace.clone();
                    all.extend(signals.extend.iter().flatten().cloned());
                    builder = builder.set_signals(all);
                }
                None => {
                    for signal in signals.extend.iter().flatten() {
                        builder = builder.add_signal(signal.clone());
                    }
                }
            }
        }

        if let Some(abbreviations) = &self.abbreviations {
            match &abbreviations.replace {
                Some(replace) => {
                    let mut all = replace.clone();
                    all.extend(abbreviations.extend.iter().flatten().cloned());
                    builder = builder.set_abbreviations(all);
                }
                None => {
                    for abbreviation in abbreviations.extend.iter().flatten() {
                        builder = builder.add_abbreviation(abbreviation.clone());
                    }
                }
            }
        }

        if let Some(seg) = &self.segmentation {
            if let Some(pattern) = &seg.supplemental_regex {
                builder = builder.supplemental_ref_regex(pattern);
            }
            if let Some(n) = seg.min_sentence_boundaries {
                builder = builder.min_sentence_boundaries(n);
            }
            if let Some(n) = seg.max_semicolons {
                builder = builder.max_semicolons(n);
            }
            if let Some(n) = seg.lead_window_chars {
                builder = builder.lead_window_chars(n);
            }
            if let Some(n) = seg.case_name_window_chars {
                builder = builder.case_name_window_chars(n);
            }
        }

        builder.build()
    }

    pub fn output_format(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.format.as_deref())
    }

    pub fn color(&self) -> Option<bool> {
        self.output.as_ref().and_then(|o| o.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_parses() {
        let toml_str = "[segmentation]\nmin_sentence_boundaries = 5\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert!(parsed.signals.is_none());
        let seg = parsed.segmentation.unwrap();
        assert_eq!(seg.min_sentence_boundaries, Some(5));
        assert!(seg.supplemental_regex.is_none());
    }

    #[test]
    fn round_trip_toml() {
        let config = ConfigFile {
            signals: Some(ListConfig {
                extend: Some(vec!["see especially".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(
            parsed.signals.unwrap().extend.unwrap(),
            vec!["see especially".to_string()]
        );
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            output: Some(OutputConfig {
                format: Some("csv".to_string()),
                color: Some(false),
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            output: Some(OutputConfig {
                format: Some("json".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        assert_eq!(merged.output_format(), Some("json"));
        assert_eq!(merged.color(), Some(false));
    }

    #[test]
    fn merge_keeps_base_lists() {
        let base = ConfigFile {
            abbreviations: Some(ListConfig {
                extend: Some(vec!["restatement".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(
            merged.abbreviations.unwrap().extend.unwrap(),
            vec!["restatement".to_string()]
        );
        assert!(merged.signals.is_none());
    }

    #[test]
    fn to_segmenter_config_applies_sections() {
        let toml_str = r#"
[signals]
replace = ["see", "but see"]
extend = ["contra"]

[abbreviations]
extend = ["restatement"]

[segmentation]
max_semicolons = 4
"#;
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let config = parsed.to_segmenter_config().unwrap();
        assert_eq!(config.signals(), vec!["see", "but see", "contra"]);
        assert!(config.abbreviations().contains(&"restatement".to_string()));
        assert!(config.abbreviations().contains(&"v".to_string()));
        assert_eq!(config.max_semicolons(), 4);
    }

    #[test]
    fn to_segmenter_config_rejects_bad_regex() {
        let config = ConfigFile {
            segmentation: Some(SegmentationConfig {
                supplemental_regex: Some("(unclosed".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            config.to_segmenter_config(),
            Err(ConfigError::Regex(_))
        ));
    }

    #[test]
    fn load_from_path_missing_or_malformed() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("absent.toml")).is_none());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[signals\nreplace = 3").unwrap();
        assert!(load_from_path(&bad).is_none());
        assert!(read_from_path(&bad).unwrap_err().starts_with("Failed to parse config"));
    }

    #[test]
    fn read_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output]\nformat = \"markdown\"\ncolor = false\n").unwrap();
        let config = read_from_path(&path).unwrap();
        assert_eq!(config.output_format(), Some("markdown"));
        assert_eq!(config.color(), Some(false));
    }
}
