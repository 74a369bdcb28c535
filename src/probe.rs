// FFprobe wrapper for stream metadata

use std::path::Path;
use std::process::Command;
use serde::Deserialize;

use crate::error::{Result, RoadLapseError};

/// Stream metadata the pipeline cares about.
#[derive(Debug, Clone, Default)]
pub struct MediaInfo {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub duration_secs: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FFprobeOutput {
    streams: Option<Vec<FFprobeStream>>,
    format: Option<FFprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FFprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FFprobeFormat {
    duration: Option<String>,
}

/// Run ffprobe on a file and extract width, height and duration.
pub fn probe(path: &Path) -> Result<MediaInfo> {
    let output = Command::new(crate::tools::ffprobe_path())
        .args([
            "-v", "quiet",
            "-print_format", "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| RoadLapseError::FFprobe(format!("Failed to run ffprobe: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RoadLapseError::FFprobe(format!("ffprobe failed: {}", stderr)));
    }

    let probe_output: FFprobeOutput = serde_json::from_slice(&output.stdout)
        .map_err(|e| RoadLapseError::FFprobe(format!("Failed to parse ffprobe output: {}", e)))?;

    let mut info = MediaInfo::default();

    // Dimensions and per-stream duration come from the first video stream
    if let Some(ref streams) = probe_output.streams {
        for stream in streams {
            if stream.codec_type.as_deref() == Some("video") {
                info.width = stream.width;
                info.height = stream.height;
                if info.duration_secs.is_none() {
                    info.duration_secs = parse_duration(stream.duration.as_deref());
                }
                break;
            }
        }
    }

    // Container-level duration wins when the stream carries none (mpegts does not)
    if info.duration_secs.is_none() {
        if let Some(ref format) = probe_output.format {
            info.duration_secs = parse_duration(format.duration.as_deref());
        }
    }

    Ok(info)
}

/// Probe just the duration, erroring when the container reports none.
pub fn probe_duration(path: &Path) -> Result<f64> {
    probe(path)?.duration_secs.ok_or_else(|| {
        RoadLapseError::FFprobe(format!("No duration reported for {}", path.display()))
    })
}

fn parse_duration(duration_str: Option<&str>) -> Option<f64> {
    duration_str?.parse().ok()
}

/// Check if ffprobe is available
pub fn is_available() -> bool {
    crate::tools::is_tool_available("ffprobe")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration(Some("12.5")), Some(12.5));
        assert_eq!(parse_duration(Some("0")), Some(0.0));
        assert_eq!(parse_duration(Some("N/A")), None);
        assert_eq!(parse_duration(None), None);
    }
}
