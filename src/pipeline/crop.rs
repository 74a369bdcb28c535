// Stage 3: crop/zoom
//
// Crops to a fraction of the source frame, optionally centered. Dimensions
// come from ffprobe; geometry is floor math on the probed width/height.

use std::path::Path;
use std::process::Command;

use crate::error::{Result, RoadLapseError};
use crate::probe;

/// Crop rectangle in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

/// Crop `input` to `zoom` of its frame into `output`.
pub fn crop_zoom(input: &Path, output: &Path, zoom: f64, center: bool) -> Result<()> {
    if !(zoom > 0.0 && zoom <= 1.0) {
        return Err(RoadLapseError::Other(format!(
            "zoom must be in (0, 1], got {}",
            zoom
        )));
    }

    let info = probe::probe(input)?;
    let (width, height) = match (info.width, info.height) {
        (Some(w), Some(h)) => (w, h),
        _ => {
            return Err(RoadLapseError::FFprobe(format!(
                "no video dimensions for {}",
                input.display()
            )))
        }
    };

    let rect = crop_geometry(width, height, zoom, center);
    log::info!(
        "Cropping {} ({}x{}) to {}x{}+{}+{} -> {}",
        input.display(),
        width,
        height,
        rect.width,
        rect.height,
        rect.x,
        rect.y,
        output.display()
    );

    let filter = format!("crop={}:{}:{}:{}", rect.width, rect.height, rect.x, rect.y);
    let result = Command::new(crate::tools::ffmpeg_path())
        .arg("-y")
        .arg("-i")
        .arg(input)
        .args(["-vf", &filter])
        .arg(output)
        .output()
        .map_err(|e| RoadLapseError::FFmpeg(format!("Failed to run ffmpeg: {}", e)))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(RoadLapseError::FFmpeg(format!("crop failed: {}", stderr)));
    }

    Ok(())
}

/// Floor the zoomed dimensions; when centering, offset by half the trim on
/// each axis, otherwise anchor top-left.
fn crop_geometry(width: u32, height: u32, zoom: f64, center: bool) -> CropRect {
    let new_width = (width as f64 * zoom).floor() as u32;
    let new_height = (height as f64 * zoom).floor() as u32;
    let (x, y) = if center {
        ((width - new_width) / 2, (height - new_height) / 2)
    } else {
        (0, 0)
    };
    CropRect { width: new_width, height: new_height, x, y }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_geometry_1080p() {
        let rect = crop_geometry(1920, 1080, 0.9, true);
        assert_eq!(
            rect,
            CropRect { width: 1728, height: 972, x: 96, y: 54 }
        );
    }

    #[test]
    fn test_uncentered_geometry_anchors_top_left() {
        let rect = crop_geometry(1920, 1080, 0.9, false);
        assert_eq!(rect.x, 0);
        assert_eq!(rect.y, 0);
        assert_eq!(rect.width, 1728);
        assert_eq!(rect.height, 972);
    }

    #[test]
    fn test_odd_dimensions_floor() {
        let rect = crop_geometry(1279, 719, 0.84, true);
        assert_eq!(rect.width, 1074); // floor(1279 * 0.84) = floor(1074.36)
        assert_eq!(rect.height, 603); // floor(719 * 0.84) = floor(603.96)
        assert_eq!(rect.x, (1279 - 1074) / 2);
        assert_eq!(rect.y, (719 - 603) / 2);
    }

    #[test]
    fn test_full_zoom_is_identity_rect() {
        let rect = crop_geometry(1920, 1080, 1.0, true);
        assert_eq!(
            rect,
            CropRect { width: 1920, height: 1080, x: 0, y: 0 }
        );
    }
}
