// Conversion orchestrator
//
// One run: filter out too-short segments, scan and parse what remains, group
// per day and camera, push each batch through the transform pipeline, and
// delete consumed sources last. A failing batch is logged and skipped; its
// sources stay on the card.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::constants::{
    DEFAULT_GEOCODER_LANGUAGE, DEFAULT_MIN_SEGMENT_SECONDS, DEFAULT_SPEED_FACTOR, DEFAULT_ZOOM,
    SEGMENT_EXTENSION,
};
use crate::error::{Result, RoadLapseError};
use crate::filter;
use crate::geotag::geocode::ReverseGeocoder;
use crate::grouping::{self, DayBatch};
use crate::pipeline::{self, PipelineOptions};
use crate::recording::{CameraChannel, RecordingFilename};

/// Options for one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub speed_factor: f64,
    pub zoom: f64,
    pub center: bool,
    pub keep_audio: bool,
    pub min_segment_seconds: f64,
    pub geotag: bool,
    pub language: String,
    pub delete_sources: bool,
}

impl ConvertOptions {
    pub fn new(input_dir: PathBuf, output_dir: PathBuf) -> Self {
        ConvertOptions {
            input_dir,
            output_dir,
            speed_factor: DEFAULT_SPEED_FACTOR,
            zoom: DEFAULT_ZOOM,
            center: true,
            keep_audio: false,
            min_segment_seconds: DEFAULT_MIN_SEGMENT_SECONDS,
            geotag: true,
            language: DEFAULT_GEOCODER_LANGUAGE.to_string(),
            delete_sources: true,
        }
    }
}

/// What a run did, for the CLI report.
#[derive(Debug, Default)]
pub struct ConvertSummary {
    pub segments_found: usize,
    pub segments_skipped: usize,
    pub segments_unclassified: usize,
    pub short_deleted: usize,
    pub batches_total: usize,
    pub batches_converted: usize,
    pub batches_failed: usize,
    pub sources_deleted: usize,
    pub outputs: Vec<PathBuf>,
}

/// Run a full conversion over `options.input_dir`.
pub fn run(options: &ConvertOptions) -> Result<ConvertSummary> {
    if !options.input_dir.is_dir() {
        return Err(RoadLapseError::InvalidPath(format!(
            "input directory does not exist: {}",
            options.input_dir.display()
        )));
    }

    let mut summary = ConvertSummary::default();

    summary.short_deleted =
        filter::filter_short_segments(&options.input_dir, options.min_segment_seconds)?;

    let (segments, skipped) = scan_segments(&options.input_dir)?;
    summary.segments_found = segments.len();
    summary.segments_skipped = skipped;

    summary.segments_unclassified = segments
        .iter()
        .filter(|s| s.camera == CameraChannel::Unknown)
        .count();
    if summary.segments_unclassified > 0 {
        log::warn!(
            "{} segment(s) with an unrecognized camera token were set aside",
            summary.segments_unclassified
        );
    }

    if segments.len() == summary.segments_unclassified {
        return Err(RoadLapseError::EmptyInput(format!(
            "no front or rear segments in {}",
            options.input_dir.display()
        )));
    }

    let geocoder = if options.geotag {
        Some(ReverseGeocoder::new(&options.language)?)
    } else {
        None
    };

    let pipeline_opts = PipelineOptions {
        output_dir: options.output_dir.clone(),
        speed_factor: options.speed_factor,
        zoom: options.zoom,
        center: options.center,
        keep_audio: options.keep_audio,
    };

    // Sources become deletable only once their batch's final output exists
    let mut consumed: Vec<PathBuf> = Vec::new();

    for channel in [CameraChannel::Front, CameraChannel::Rear] {
        let batches = grouping::group_by_day(&segments, channel);
        if batches.is_empty() {
            log::info!("No {} segments to convert", channel);
            continue;
        }

        for (date, batch) in &batches {
            summary.batches_total += 1;
            log::info!(
                "Converting {} {} segment(s) for {}",
                batch.members.len(),
                channel,
                date
            );

            match pipeline::run_batch(batch, &pipeline_opts, geocoder.as_ref()) {
                Ok(output) => {
                    log::info!("Produced {}", output.display());
                    summary.batches_converted += 1;
                    summary.outputs.push(output);
                    consumed.extend(consumed_sources(batch));
                }
                Err(e) => {
                    summary.batches_failed += 1;
                    log::error!("Batch {} ({}) failed: {}", date, channel, e);
                }
            }
        }
    }

    // Deleting sources is the last, irreversible step of the run
    if options.delete_sources {
        for source in &consumed {
            match std::fs::remove_file(source) {
                Ok(()) => summary.sources_deleted += 1,
                Err(e) => log::warn!("Could not delete source {}: {}", source.display(), e),
            }
        }
    }

    Ok(summary)
}

/// Discover and parse segment files directly inside `dir`. Unparsable names
/// are logged and counted, never fatal. Returns (segments in path order,
/// skipped count).
pub fn scan_segments(dir: &Path) -> Result<(Vec<RecordingFilename>, usize)> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file() && has_segment_extension(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();

    // Sort by path for consistent discovery ordering
    files.sort();

    let mut segments = Vec::new();
    let mut skipped = 0;
    for file in files {
        match RecordingFilename::parse(&file) {
            Ok(segment) => segments.push(segment),
            Err(e) => {
                skipped += 1;
                log::error!("Skipping file: {}", e);
            }
        }
    }

    Ok((segments, skipped))
}

fn consumed_sources(batch: &DayBatch) -> Vec<PathBuf> {
    batch.members.iter().map(|m| m.origin_path.clone()).collect()
}

fn has_segment_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(SEGMENT_EXTENSION))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn test_scan_parses_and_skips() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "20221002_190128_0.ts");
        touch(tmp.path(), "20221002_184909_0.ts");
        touch(tmp.path(), "garbage.ts");
        touch(tmp.path(), "20221002_184909_0.mp4"); // wrong extension, ignored
        touch(tmp.path(), "notes.txt");

        let (segments, skipped) = scan_segments(tmp.path()).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(skipped, 1, "only the bad .ts name counts as skipped");

        // Path-sorted discovery order
        assert_eq!(segments[0].time, "184909");
        assert_eq!(segments[1].time, "190128");
    }

    #[test]
    fn test_scan_ignores_subdirectories() {
        let tmp = TempDir::new().unwrap();
        let sub = tmp.path().join("nested");
        std::fs::create_dir(&sub).unwrap();
        touch(&sub, "20221002_184909_0.ts");

        let (segments, skipped) = scan_segments(tmp.path()).unwrap();
        assert!(segments.is_empty());
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_run_reports_empty_input() {
        let tmp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let options = ConvertOptions::new(tmp.path().to_path_buf(), out.path().to_path_buf());

        let err = run(&options).unwrap_err();
        assert!(matches!(err, RoadLapseError::EmptyInput(_)), "got {:?}", err);
    }

    #[test]
    fn test_run_rejects_missing_input_dir() {
        let out = TempDir::new().unwrap();
        let options = ConvertOptions::new(
            PathBuf::from("/definitely/not/here"),
            out.path().to_path_buf(),
        );
        let err = run(&options).unwrap_err();
        assert!(matches!(err, RoadLapseError::InvalidPath(_)), "got {:?}", err);
    }

    #[test]
    fn test_unclassified_only_input_is_empty() {
        let tmp = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        touch(tmp.path(), "20221002_184909_9.ts"); // parses, but unknown channel

        let options = ConvertOptions::new(tmp.path().to_path_buf(), out.path().to_path_buf());
        let err = run(&options).unwrap_err();
        assert!(matches!(err, RoadLapseError::EmptyInput(_)), "got {:?}", err);

        // Never consumed, so never deleted
        assert!(tmp.path().join("20221002_184909_9.ts").exists());
    }
}
