// Stage 1: concatenation
//
// Stream-copy concat via ffmpeg's concat demuxer; no re-encode. A single
// member batch is a plain filesystem copy.

use std::io::Write;
use std::path::Path;
use std::process::Command;

use crate::error::{Result, RoadLapseError};

/// Concatenate `sources` (already in batch order) into `output`.
pub fn combine_segments(sources: &[&Path], output: &Path) -> Result<()> {
    match sources {
        [] => Err(RoadLapseError::EmptyInput("no segments to combine".to_string())),
        [single] => {
            log::info!("Single segment, copying {} -> {}", single.display(), output.display());
            std::fs::copy(single, output)?;
            Ok(())
        }
        many => concat_with_ffmpeg(many, output),
    }
}

fn concat_with_ffmpeg(sources: &[&Path], output: &Path) -> Result<()> {
    let mut list_file = tempfile::Builder::new()
        .prefix("roadlapse_concat_")
        .suffix(".txt")
        .tempfile()?;
    list_file.write_all(concat_manifest(sources).as_bytes())?;
    list_file.flush()?;

    log::info!("Concatenating {} segments into {}", sources.len(), output.display());

    let result = Command::new(crate::tools::ffmpeg_path())
        .args(["-y", "-f", "concat", "-safe", "0", "-i"])
        .arg(list_file.path())
        .args(["-c", "copy"])
        .arg(output)
        .output()
        .map_err(|e| RoadLapseError::FFmpeg(format!("Failed to run ffmpeg: {}", e)))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(RoadLapseError::FFmpeg(format!("concat failed: {}", stderr)));
    }

    Ok(())
}

/// Build the concat demuxer manifest: one `file '<path>'` line per source,
/// single quotes escaped the way the demuxer expects.
fn concat_manifest(sources: &[&Path]) -> String {
    let mut manifest = String::new();
    for source in sources {
        let escaped = source.to_string_lossy().replace('\'', r"'\''");
        manifest.push_str(&format!("file '{}'\n", escaped));
    }
    manifest
}
