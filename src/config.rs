use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::Color32;
use serde::{Deserialize, Serialize};

use crate::color::parse_color;
use crate::error::PlotError;
use crate::limits::{Padding, DEFAULT_KEEP_FRACTION};
use crate::outliers::MaskGroup;
use crate::surface::ArrowStyle;

// ---------------------------------------------------------------------------
// Figure configuration (JSON)
// ---------------------------------------------------------------------------

/// Everything that controls the limiter and the indicator for one figure.
///
/// ```json
/// {
///   "pad": [0.05, 0.2],
///   "keep_fraction": 0.995,
///   "default_color": "black",
///   "arrow": { "width": 1.5 },
///   "masks": [ { "name": "flagged", "mask": [3, 17], "color": "red" } ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub pad: Padding,
    pub keep_fraction: f64,
    pub default_color: Option<String>,
    pub arrow: ArrowStyle,
    pub masks: Vec<MaskSpec>,
}

impl Default for FigureConfig {
    fn default() -> Self {
        FigureConfig {
            pad: Padding::default(),
            keep_fraction: DEFAULT_KEEP_FRACTION,
            default_color: None,
            arrow: ArrowStyle::default(),
            masks: Vec::new(),
        }
    }
}

/// A mask group as written in the config file. `mask` is mandatory but
/// kept optional here so its absence can be reported by group name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaskSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<bool>,
}

impl TryFrom<&MaskSpec> for MaskGroup {
    type Error = PlotError;

    fn try_from(spec: &MaskSpec) -> Result<Self, Self::Error> {
        let mask = spec.mask.as_ref().ok_or_else(|| PlotError::MissingKey {
            group: spec.name.clone(),
            key: "mask".to_string(),
        })?;
        let color = spec.color.as_deref().map(parse_color).transpose()?;
        Ok(MaskGroup {
            name: spec.name.clone(),
            mask: mask.iter().copied().collect(),
            color,
            plot: spec.plot.unwrap_or(true),
        })
    }
}

impl FigureConfig {
    /// Read a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: FigureConfig = serde_json::from_str(text).context("parsing figure config JSON")?;
        Ok(cfg)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing figure config")
    }

    /// Mask groups in file order.
    pub fn mask_groups(&self) -> Result<Vec<MaskGroup>, PlotError> {
        self.masks.iter().map(MaskGroup::try_from).collect()
    }

    /// The parsed default arrow colour, if one is set.
    pub fn default_color(&self) -> Result<Option<Color32>, PlotError> {
        self.default_color.as_deref().map(parse_color).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = FigureConfig::from_json("{}").unwrap();
        assert_eq!(cfg, FigureConfig::default());
        assert_eq!(cfg.pad, Padding::Symmetric(0.1));
        assert_eq!(cfg.keep_fraction, 0.995);
    }

    #[test]
    fn full_config() {
        let cfg = FigureConfig::from_json(
            r##"{
                "pad": [0.05, 0.2],
                "default_color": "#102030",
                "arrow": { "width": 1.5, "head_length": 8.0 },
                "masks": [
                    { "name": "flagged", "mask": [3, 17], "color": "red" },
                    { "name": "ignored", "mask": [5], "plot": false }
                ]
            }"##,
        )
        .unwrap();

        assert_eq!(cfg.pad, Padding::Asymmetric { bottom: 0.05, top: 0.2 });
        assert_eq!(cfg.default_color().unwrap(), Some(Color32::from_rgb(0x10, 0x20, 0x30)));
        assert_eq!(cfg.arrow.width, Some(1.5));
        assert_eq!(cfg.arrow.head_width, None);

        let groups = cfg.mask_groups().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "flagged");
        assert!(groups[0].contains(17));
        assert_eq!(groups[0].color, Some(Color32::from_rgb(255, 0, 0)));
        assert!(groups[0].plot);
        assert!(!groups[1].plot);
        assert_eq!(groups[1].color, None);
    }

    #[test]
    fn mask_group_without_mask_key() {
        let cfg = FigureConfig::from_json(r#"{ "masks": [ { "name": "oops", "color": "red" } ] }"#)
            .unwrap();
        assert_eq!(
            cfg.mask_groups().unwrap_err(),
            PlotError::MissingKey {
                group: "oops".to_string(),
                key: "mask".to_string()
            }
        );
    }

    #[test]
    fn bad_pad_length_is_rejected() {
        assert!(FigureConfig::from_json(r#"{ "pad": [0.1] }"#).is_err());
        assert!(FigureConfig::from_json(r#"{ "pad": [0.1, 0.2, 0.3] }"#).is_err());
    }

    #[test]
    fn bad_color_is_invalid_argument() {
        let cfg = FigureConfig::from_json(
            r#"{ "masks": [ { "name": "m", "mask": [1], "color": "no-such-colour" } ] }"#,
        )
        .unwrap();
        assert!(matches!(cfg.mask_groups(), Err(PlotError::InvalidArgument(_))));
    }

    #[test]
    fn json_round_trip_keeps_masks() {
        let mut cfg = FigureConfig::default();
        cfg.masks.push(MaskSpec {
            name: "a".to_string(),
            mask: Some(vec![1, 2]),
            color: None,
            plot: Some(false),
        });
        let back = FigureConfig::from_json(&cfg.to_json().unwrap()).unwrap();
        assert_eq!(back, cfg);
    }
}
