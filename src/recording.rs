// Recording filename grammar
//
// Dashcam segments are named `{yyyymmdd}_{time}_{camera-token}.{ext}`.
// The date and time tokens are fixed-width numeric strings; ordering is
// lexicographic on the concatenated key, never parsed into calendar types.

use std::path::{Path, PathBuf};

use crate::error::{Result, RoadLapseError};

/// Which camera recorded a segment, derived from the third filename token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraChannel {
    Front,
    Rear,
    Unknown,
}

impl CameraChannel {
    pub fn from_token(token: &str) -> Self {
        match token {
            "0" => CameraChannel::Front,
            "1" => CameraChannel::Rear,
            _ => CameraChannel::Unknown,
        }
    }

    /// Folder name used for this channel under the output directory.
    pub fn folder_name(&self) -> &'static str {
        match self {
            CameraChannel::Front => crate::constants::FRONT_FOLDER,
            CameraChannel::Rear => crate::constants::REAR_FOLDER,
            CameraChannel::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for CameraChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.folder_name())
    }
}

/// Parsed identity of one raw segment. Constructed once at scan time,
/// immutable thereafter.
#[derive(Debug, Clone)]
pub struct RecordingFilename {
    /// Path exactly as discovered, directories preserved
    pub origin_path: PathBuf,
    /// Everything after the first `.` of the basename, lowercased
    pub extension: String,
    /// 8-digit calendar date token, not validated beyond format
    pub date: String,
    /// Time-of-day token, not independently validated
    pub time: String,
    /// `{date}_{time}`, used only for lexicographic ordering
    pub datetime_key: String,
    pub camera: CameraChannel,
}

impl RecordingFilename {
    /// Parse a segment path. Fails when the basename (minus extension) has
    /// fewer than 3 underscore-delimited tokens or the first token is not an
    /// 8-digit date. Pure function of the path string.
    pub fn parse(path: &Path) -> Result<RecordingFilename> {
        let basename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| RoadLapseError::InvalidFilename(path.display().to_string()))?;

        let (stem, extension) = match basename.split_once('.') {
            Some((stem, ext)) => (stem, ext.to_lowercase()),
            None => (basename, String::new()),
        };

        let tokens: Vec<&str> = stem.split('_').collect();
        if tokens.len() < 3 {
            return Err(RoadLapseError::InvalidFilename(path.display().to_string()));
        }

        let date_re = regex::Regex::new(r"^\d{8}$")
            .map_err(|e| RoadLapseError::Other(e.to_string()))?;
        if !date_re.is_match(tokens[0]) {
            return Err(RoadLapseError::InvalidFilename(format!(
                "bad date token in {}",
                path.display()
            )));
        }

        let date = tokens[0].to_string();
        let time = tokens[1].to_string();

        Ok(RecordingFilename {
            origin_path: path.to_path_buf(),
            extension,
            datetime_key: format!("{}_{}", date, time),
            date,
            time,
            camera: CameraChannel::from_token(tokens[2]),
        })
    }
}
