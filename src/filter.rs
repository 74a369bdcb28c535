// Duration filter
//
// Deletes segments at or below the minimum duration before any grouping
// happens. Destructive and irreversible; runs once per conversion.

use std::path::Path;
use walkdir::WalkDir;

use crate::constants::SEGMENT_EXTENSION;
use crate::error::Result;
use crate::probe;

/// Probe every segment file directly inside `dir` and delete the ones whose
/// duration is at or below `min_seconds`. A probe failure leaves the file
/// untouched (fail-open per file). Returns the number of deleted files.
pub fn filter_short_segments(dir: &Path, min_seconds: f64) -> Result<usize> {
    let mut deleted = 0;

    for entry in WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || !has_segment_extension(path) {
            continue;
        }

        let duration = match probe::probe_duration(path) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("Could not probe {}, leaving it in place: {}", path.display(), e);
                continue;
            }
        };

        if should_discard(duration, min_seconds) {
            log::info!(
                "Deleting short segment {} ({:.2}s <= {:.2}s)",
                path.display(),
                duration,
                min_seconds
            );
            std::fs::remove_file(path)?;
            deleted += 1;
        }
    }

    Ok(deleted)
}

/// Boundary is inclusive: a segment exactly at the threshold is discarded.
fn should_discard(duration_secs: f64, min_seconds: f64) -> bool {
    duration_secs <= min_seconds
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

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        assert!(should_discard(5.0, 5.0), "exactly at threshold is deleted");
        assert!(should_discard(4.99, 5.0));
        assert!(!should_discard(5.01, 5.0), "one unit above is retained");
    }

    #[test]
    fn test_segment_extension_match() {
        assert!(has_segment_extension(Path::new("20221002_184909_0.ts")));
        assert!(has_segment_extension(Path::new("20221002_184909_0.TS")));
        assert!(!has_segment_extension(Path::new("20221002_184909_0.mp4")));
        assert!(!has_segment_extension(Path::new("noext")));
    }
}
