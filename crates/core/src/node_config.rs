//! Typed per-stage node configuration.
//!
//! The backend stores node config as an opaque JSON object inside the
//! workflow document and each stage handler reads the keys it knows
//! about. Client-side the bag is modelled as a tagged union keyed by
//! the node kind, so the configuration panel cannot write a key the
//! executing stage will never read.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::types::{DbId, NodeKind, Platform};

/// Scan-stage video cap: everything, or the newest `n`.
///
/// On the wire this is the string `"all"` or a number (historically also
/// a numeric string), stored under `video_limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoLimit {
    #[default]
    All,
    Max(u32),
}

impl Serialize for VideoLimit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VideoLimit::All => serializer.serialize_str("all"),
            VideoLimit::Max(n) => serializer.serialize_u32(*n),
        }
    }
}

impl<'de> Deserialize<'de> for VideoLimit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) if s == "all" => Ok(VideoLimit::All),
            serde_json::Value::String(s) => s
                .parse::<u32>()
                .map(VideoLimit::Max)
                .map_err(|_| D::Error::custom(format!("invalid video_limit: {s:?}"))),
            serde_json::Value::Number(n) => n
                .as_u64()
                .map(|n| VideoLimit::Max(n as u32))
                .ok_or_else(|| D::Error::custom("video_limit must be a non-negative integer")),
            other => Err(D::Error::custom(format!(
                "video_limit must be \"all\" or a number, got {other}"
            ))),
        }
    }
}

/// Configuration for a `scan` node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub video_limit: VideoLimit,
}

/// Configuration for a `download` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "default_true")]
    pub download_subtitles: bool,
    #[serde(default = "default_language")]
    pub subtitle_language: String,
    #[serde(default = "default_quality")]
    pub quality: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_subtitles: true,
            subtitle_language: default_language(),
            quality: default_quality(),
        }
    }
}

/// Configuration for a `burn` node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BurnConfig {
    #[serde(default)]
    pub add_watermark: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watermark_text: Option<String>,
}

/// Configuration for an `upload` node.
///
/// Both fields are optional while authoring; [`NodeConfig::validate`]
/// requires them before the workflow is executable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<DbId>,
}

fn default_true() -> bool {
    true
}

fn default_language() -> String {
    "en".to_string()
}

fn default_quality() -> String {
    "best".to_string()
}

/// Per-kind node configuration.
///
/// Serialized as the bare field map (no tag) because the node's `type`
/// field already carries the discriminant in the workflow document; use
/// [`NodeConfig::from_value`] to decode with the kind known.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeConfig {
    Scan(ScanConfig),
    Download(DownloadConfig),
    Burn(BurnConfig),
    Upload(UploadConfig),
}

impl NodeConfig {
    /// Default config for a freshly placed node of `kind`.
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Scan => NodeConfig::Scan(ScanConfig::default()),
            NodeKind::Download => NodeConfig::Download(DownloadConfig::default()),
            NodeKind::Burn => NodeConfig::Burn(BurnConfig::default()),
            NodeKind::Upload => NodeConfig::Upload(UploadConfig::default()),
        }
    }

    /// The node kind this config belongs to.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeConfig::Scan(_) => NodeKind::Scan,
            NodeConfig::Download(_) => NodeKind::Download,
            NodeConfig::Burn(_) => NodeKind::Burn,
            NodeConfig::Upload(_) => NodeKind::Upload,
        }
    }

    /// Decode the config map of a node whose kind is already known.
    ///
    /// A missing or `null` config falls back to the kind's defaults,
    /// matching how the backend reads absent keys.
    pub fn from_value(
        kind: NodeKind,
        value: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        let value = if value.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            value
        };
        Ok(match kind {
            NodeKind::Scan => NodeConfig::Scan(serde_json::from_value(value)?),
            NodeKind::Download => NodeConfig::Download(serde_json::from_value(value)?),
            NodeKind::Burn => NodeConfig::Burn(serde_json::from_value(value)?),
            NodeKind::Upload => NodeConfig::Upload(serde_json::from_value(value)?),
        })
    }

    /// Encode as the bare field map stored under `data.config`.
    pub fn to_value(&self) -> serde_json::Value {
        // Serialization of these plain structs cannot fail.
        match self {
            NodeConfig::Scan(c) => serde_json::to_value(c),
            NodeConfig::Download(c) => serde_json::to_value(c),
            NodeConfig::Burn(c) => serde_json::to_value(c),
            NodeConfig::Upload(c) => serde_json::to_value(c),
        }
        .unwrap_or(serde_json::Value::Null)
    }

    /// Check the config is complete enough for the backend to execute.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            NodeConfig::Scan(c) => {
                if c.url.trim().is_empty() {
                    return Err(CoreError::Validation(
                        "Scan node has no channel URL".to_string(),
                    ));
                }
            }
            NodeConfig::Download(c) => {
                if c.subtitle_language.trim().is_empty() {
                    return Err(CoreError::Validation(
                        "Download node has an empty subtitle language".to_string(),
                    ));
                }
            }
            NodeConfig::Burn(c) => {
                if c.add_watermark
                    && c.watermark_text
                        .as_deref()
                        .map(str::trim)
                        .unwrap_or("")
                        .is_empty()
                {
                    return Err(CoreError::Validation(
                        "Burn node enables a watermark but has no watermark text".to_string(),
                    ));
                }
            }
            NodeConfig::Upload(c) => {
                if c.platform.is_none() || c.account.is_none() {
                    return Err(CoreError::Validation(
                        "Upload node is missing platform or account".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn video_limit_wire_forms() {
        let all: VideoLimit = serde_json::from_value(json!("all")).unwrap();
        assert_eq!(all, VideoLimit::All);
        let ten: VideoLimit = serde_json::from_value(json!(10)).unwrap();
        assert_eq!(ten, VideoLimit::Max(10));
        let legacy: VideoLimit = serde_json::from_value(json!("25")).unwrap();
        assert_eq!(legacy, VideoLimit::Max(25));

        assert_eq!(serde_json::to_value(VideoLimit::All).unwrap(), json!("all"));
        assert_eq!(serde_json::to_value(VideoLimit::Max(5)).unwrap(), json!(5));
    }

    #[test]
    fn video_limit_rejects_garbage() {
        assert!(serde_json::from_value::<VideoLimit>(json!("soon")).is_err());
        assert!(serde_json::from_value::<VideoLimit>(json!(-3)).is_err());
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let cfg = NodeConfig::from_value(NodeKind::Download, serde_json::Value::Null).unwrap();
        match cfg {
            NodeConfig::Download(c) => {
                assert!(c.download_subtitles);
                assert_eq!(c.subtitle_language, "en");
                assert_eq!(c.quality, "best");
            }
            other => panic!("expected download config, got {other:?}"),
        }
    }

    #[test]
    fn scan_config_decodes_known_keys() {
        let cfg = NodeConfig::from_value(
            NodeKind::Scan,
            json!({"url": "https://youtube.com/@demo", "video_limit": 10}),
        )
        .unwrap();
        match cfg {
            NodeConfig::Scan(c) => {
                assert_eq!(c.url, "https://youtube.com/@demo");
                assert_eq!(c.video_limit, VideoLimit::Max(10));
            }
            other => panic!("expected scan config, got {other:?}"),
        }
    }

    #[test]
    fn empty_scan_url_fails_validation() {
        let cfg = NodeConfig::default_for(NodeKind::Scan);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn watermark_without_text_fails_validation() {
        let cfg = NodeConfig::Burn(BurnConfig {
            add_watermark: true,
            watermark_text: Some("   ".to_string()),
        });
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn complete_upload_config_validates() {
        let cfg = NodeConfig::Upload(UploadConfig {
            platform: Some(Platform::Youtube),
            account: Some(3),
        });
        assert!(cfg.validate().is_ok());
    }
}
