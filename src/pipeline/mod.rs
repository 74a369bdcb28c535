// Transform pipeline
//
// Drives one DayBatch through combine -> speedup -> crop -> geotag, strictly
// in order. Every artifact path is a pure function of (output dir, date,
// camera, stage), so a re-run targets the same names; there is no locking
// against a concurrent run over the same output directory.

pub mod combine;
pub mod crop;
pub mod speedup;

use std::path::{Path, PathBuf};

use crate::constants::{
    COMBINED_SUFFIX, CROPPED_SUFFIX, OUTPUT_EXTENSION, SEGMENT_EXTENSION, SPEEDUP_SUFFIX,
};
use crate::error::Result;
use crate::geotag::{self, GeoLabel};
use crate::geotag::geocode::ReverseGeocoder;
use crate::grouping::DayBatch;
use crate::recording::CameraChannel;

/// Pipeline stages with an on-disk artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Combined,
    Speedup,
    Cropped,
}

impl Stage {
    fn suffix(&self) -> &'static str {
        match self {
            Stage::Combined => COMBINED_SUFFIX,
            Stage::Speedup => SPEEDUP_SUFFIX,
            Stage::Cropped => CROPPED_SUFFIX,
        }
    }

    /// The combine stage is a stream copy and keeps the segment container;
    /// later stages re-encode into the output container.
    fn extension(&self) -> &'static str {
        match self {
            Stage::Combined => SEGMENT_EXTENSION,
            Stage::Speedup | Stage::Cropped => OUTPUT_EXTENSION,
        }
    }
}

/// Knobs for one batch run. Defaults mirror `constants`.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub output_dir: PathBuf,
    pub speed_factor: f64,
    pub zoom: f64,
    pub center: bool,
    pub keep_audio: bool,
}

/// Directory holding all artifacts for a channel.
pub fn channel_dir(output_dir: &Path, camera: CameraChannel) -> PathBuf {
    output_dir.join(camera.folder_name())
}

/// Deterministic intermediate artifact path for a (date, camera, stage).
pub fn stage_path(output_dir: &Path, date: &str, camera: CameraChannel, stage: Stage) -> PathBuf {
    channel_dir(output_dir, camera).join(format!(
        "{}_{}.{}",
        date,
        stage.suffix(),
        stage.extension()
    ))
}

/// Final labeled output path for a (date, camera, label).
pub fn final_path(output_dir: &Path, date: &str, camera: CameraChannel, label: &GeoLabel) -> PathBuf {
    channel_dir(output_dir, camera).join(format!(
        "{}__{}_{}.{}",
        date, label.start_address, label.end_address, OUTPUT_EXTENSION
    ))
}

/// Run all stages for one batch. Returns the final output path; any stage
/// error abandons the batch, leaving whatever intermediates exist for
/// diagnosis. Geotag extraction runs against the combined artifact, where the
/// overlay text is still full-size and legible.
pub fn run_batch(
    batch: &DayBatch,
    opts: &PipelineOptions,
    geocoder: Option<&ReverseGeocoder>,
) -> Result<PathBuf> {
    std::fs::create_dir_all(channel_dir(&opts.output_dir, batch.camera))?;

    let combined = stage_path(&opts.output_dir, &batch.date, batch.camera, Stage::Combined);
    let sources: Vec<&Path> = batch.members.iter().map(|m| m.origin_path.as_path()).collect();
    combine::combine_segments(&sources, &combined)?;

    let sped = stage_path(&opts.output_dir, &batch.date, batch.camera, Stage::Speedup);
    speedup::speed_up(&combined, &sped, opts.speed_factor, opts.keep_audio)?;

    let cropped = stage_path(&opts.output_dir, &batch.date, batch.camera, Stage::Cropped);
    crop::crop_zoom(&sped, &cropped, opts.zoom, opts.center)?;

    let label = match geocoder {
        Some(geocoder) => geotag::extract(&combined, geocoder),
        None => GeoLabel::unknown(),
    };

    let output = final_path(&opts.output_dir, &batch.date, batch.camera, &label);
    std::fs::rename(&cropped, &output)?;

    // Intermediates only go away once the final rename has landed
    for intermediate in [&combined, &sped] {
        if let Err(e) = std::fs::remove_file(intermediate) {
            log::warn!("Could not remove {}: {}", intermediate.display(), e);
        }
    }

    Ok(output)
}
