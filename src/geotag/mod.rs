// Geotag extraction
//
// Samples one frame near the start and one near the end of a combined
// artifact, reads the burned-in coordinate overlay off each, and resolves
// both to short address labels. This component degrades, it never fails:
// anything unresolvable becomes the "unknown" sentinel on that side only.

pub mod frame;
pub mod geocode;
pub mod ocr;

use std::path::Path;

use crate::constants::{FRAME_END_GUARD_SECS, FRAME_START_OFFSET_SECS, UNKNOWN_ADDRESS};
use crate::error::Result;
use crate::probe;
use geocode::ReverseGeocoder;

/// Start and end address labels for one day's footage. Never null; an
/// unresolvable side carries the sentinel instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoLabel {
    pub start_address: String,
    pub end_address: String,
}

impl GeoLabel {
    pub fn unknown() -> Self {
        GeoLabel {
            start_address: UNKNOWN_ADDRESS.to_string(),
            end_address: UNKNOWN_ADDRESS.to_string(),
        }
    }
}

/// Extract the geographic label for `video`. Start is sampled 1s in, end 2s
/// before the reported duration, both clear of blank boundary frames. Each
/// side resolves independently; OCR or geocoding trouble on one side leaves
/// the other intact.
pub fn extract(video: &Path, geocoder: &ReverseGeocoder) -> GeoLabel {
    let duration = match probe::probe_duration(video) {
        Ok(d) => d,
        Err(e) => {
            log::warn!("Cannot probe {} for geotagging: {}", video.display(), e);
            return GeoLabel::unknown();
        }
    };

    let start_time = FRAME_START_OFFSET_SECS;
    let end_time = (duration - FRAME_END_GUARD_SECS).max(start_time);

    GeoLabel {
        start_address: resolve_side(video, start_time, geocoder, "start"),
        end_address: resolve_side(video, end_time, geocoder, "end"),
    }
}

fn resolve_side(video: &Path, seconds: f64, geocoder: &ReverseGeocoder, side: &str) -> String {
    match try_resolve_side(video, seconds, geocoder) {
        Ok(Some(address)) => address,
        Ok(None) => {
            log::info!("No {} coordinates readable in {}", side, video.display());
            UNKNOWN_ADDRESS.to_string()
        }
        Err(e) => {
            log::warn!("Geotag {} side failed for {}: {}", side, video.display(), e);
            UNKNOWN_ADDRESS.to_string()
        }
    }
}

fn try_resolve_side(
    video: &Path,
    seconds: f64,
    geocoder: &ReverseGeocoder,
) -> Result<Option<String>> {
    // NamedTempFile removes the still when it goes out of scope, on success
    // and on every early return alike
    let still = tempfile::Builder::new()
        .prefix("roadlapse_overlay_")
        .suffix(".png")
        .tempfile()?;

    frame::extract_overlay_frame(video, seconds, still.path())?;
    let lines = ocr::recognize_lines(still.path())?;

    let (latitude, longitude) = match ocr::parse_coordinates(&lines) {
        Some(coords) => coords,
        None => return Ok(None),
    };

    let address = match geocoder.reverse(latitude, longitude)? {
        Some(address) => address,
        None => return Ok(None),
    };

    Ok(geocode::normalize_address(&address))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_label_sentinels() {
        let label = GeoLabel::unknown();
        assert_eq!(label.start_address, "unknown");
        assert_eq!(label.end_address, "unknown");
    }
}
