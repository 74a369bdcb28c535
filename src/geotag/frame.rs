// Still-frame extraction for the telemetry overlay
//
// Grabs a single frame at a timestamp, cropped to the overlay region where
// coordinates are burned in.

use std::path::Path;
use std::process::Command;

use crate::constants::{OVERLAY_CROP_HEIGHT, OVERLAY_CROP_WIDTH};
use crate::error::{Result, RoadLapseError};

/// Write one frame of `video` at `seconds`, cropped to the top-left overlay
/// region, to `output` (format inferred from the extension).
pub fn extract_overlay_frame(video: &Path, seconds: f64, output: &Path) -> Result<()> {
    let seek = format_timestamp(seconds.max(0.0));
    let filter = format!("crop={}:{}:0:0", OVERLAY_CROP_WIDTH, OVERLAY_CROP_HEIGHT);

    let result = Command::new(crate::tools::ffmpeg_path())
        .args(["-y", "-ss", &seek])
        .arg("-i")
        .arg(video)
        .args(["-vframes", "1", "-vf", &filter])
        .arg(output)
        .output()
        .map_err(|e| RoadLapseError::FFmpeg(format!("Failed to run ffmpeg: {}", e)))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(RoadLapseError::FFmpeg(format!(
            "frame extraction at {} failed: {}",
            seek, stderr
        )));
    }

    Ok(())
}

/// Format seconds as HH:MM:SS.mmm for ffmpeg.
fn format_timestamp(seconds: f64) -> String {
    let hours = (seconds / 3600.0) as u32;
    let minutes = ((seconds % 3600.0) / 60.0) as u32;
    let secs = seconds % 60.0;
    format!("{:02}:{:02}:{:06.3}", hours, minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00:00.000");
        assert_eq!(format_timestamp(1.0), "00:00:01.000");
        assert_eq!(format_timestamp(65.25), "00:01:05.250");
        assert_eq!(format_timestamp(3661.0), "01:01:01.000");
    }
}
