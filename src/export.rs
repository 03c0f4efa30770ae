/// Serialization of generated scenes
use crate::procgen::SceneSnapshot;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("MessagePack encode error: {0}")]
    MsgpackEncode(#[from] rmp_serde::encode::Error),
    #[error("MessagePack decode error: {0}")]
    MsgpackDecode(#[from] rmp_serde::decode::Error),
}

/// On-disk encoding for scene snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
    Msgpack,
}

impl ExportFormat {
    /// Conventional file extension
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
            ExportFormat::Msgpack => "msgpack",
        }
    }

    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(ExportFormat::Json),
            "yaml" | "yml" => Some(ExportFormat::Yaml),
            "msgpack" | "mpk" => Some(ExportFormat::Msgpack),
            _ => None,
        }
    }
}

pub fn encode_snapshot(snapshot: &SceneSnapshot, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    let bytes = match format {
        ExportFormat::Json => serde_json::to_vec_pretty(snapshot)?,
        ExportFormat::Yaml => serde_yaml::to_string(snapshot)?.into_bytes(),
        ExportFormat::Msgpack => rmp_serde::to_vec_named(snapshot)?,
    };
    Ok(bytes)
}

pub fn decode_snapshot(bytes: &[u8], format: ExportFormat) -> Result<SceneSnapshot, ExportError> {
    let snapshot = match format {
        ExportFormat::Json => serde_json::from_slice(bytes)?,
        ExportFormat::Yaml => serde_yaml::from_slice(bytes)?,
        ExportFormat::Msgpack => rmp_serde::from_slice(bytes)?,
    };
    Ok(snapshot)
}

/// Write a snapshot to `path`, or to stdout when no path is given
pub fn write_snapshot(
    snapshot: &SceneSnapshot,
    format: ExportFormat,
    path: Option<&Path>,
) -> Result<(), ExportError> {
    let bytes = encode_snapshot(snapshot, format)?;

    match path {
        Some(path) => fs::write(path, bytes)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)?;
            if format != ExportFormat::Msgpack {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Load a snapshot, picking the format from the file extension (JSON if unknown)
pub fn read_snapshot(path: &Path) -> Result<SceneSnapshot, ExportError> {
    let format = ExportFormat::from_path(path).unwrap_or_default();
    let bytes = fs::read(path)?;
    decode_snapshot(&bytes, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procgen::{Position, SceneryKind, SpriteHandle, WorldObject};

    fn sample_snapshot() -> SceneSnapshot {
        let mut tagged = WorldObject::new(SceneryKind::House, Position::ground(-180.0, 1240.0), 0.9);
        tagged.sprite = Some(SpriteHandle::new("barn.png"));

        SceneSnapshot {
            distance: 1234.5,
            base_distance: 1200.0,
            objects: vec![
                WorldObject::new(SceneryKind::Mountain, Position::new(-2110.0, 320.5, 1200.0), 1.25),
                tagged,
            ],
        }
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("a.json")), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_path(Path::new("a.YML")), Some(ExportFormat::Yaml));
        assert_eq!(ExportFormat::from_path(Path::new("a.msgpack")), Some(ExportFormat::Msgpack));
        assert_eq!(ExportFormat::from_path(Path::new("a.txt")), None);
        assert_eq!(ExportFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_json_uses_kind_names() {
        let bytes = encode_snapshot(&sample_snapshot(), ExportFormat::Json).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("\"mountain\""));
        assert!(text.contains("\"base_distance\": 1200.0"));
        // Unset sprites are left out
        assert_eq!(text.matches("sprite").count(), 1);
    }

    #[test]
    fn test_msgpack_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.msgpack");
        let snapshot = sample_snapshot();

        write_snapshot(&snapshot, ExportFormat::Msgpack, Some(&path)).unwrap();
        let loaded = read_snapshot(&path).unwrap();

        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = decode_snapshot(b"{ not json", ExportFormat::Json);
        assert!(matches!(result, Err(ExportError::Json(_))));
    }
}
