// Volume watcher
//
// Polls a mount root until the named volume shows up, then runs one
// conversion against the segment directory on it. Edge-triggered: the volume
// must disappear before another appearance converts again. Conversion errors
// are logged and the loop keeps running.

use std::path::PathBuf;
use std::time::Duration;

use crate::convert::{self, ConvertOptions};
use crate::error::{Result, RoadLapseError};

/// Options for the watch loop.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Directory removable volumes are mounted under
    pub volumes_dir: PathBuf,
    /// Volume name to wait for
    pub volume_name: String,
    /// Segment directory relative to the mount point
    pub movie_subdir: PathBuf,
    pub poll_interval: Duration,
}

/// Watch for the volume forever. Only setup errors are returned; anything
/// that goes wrong inside a triggered conversion is logged and the loop
/// continues, so a long-lived watcher process never dies to a bad card.
pub fn watch(options: &WatchOptions, convert_template: &ConvertOptions) -> Result<()> {
    if !options.volumes_dir.is_dir() {
        return Err(RoadLapseError::InvalidPath(format!(
            "mount root does not exist: {}",
            options.volumes_dir.display()
        )));
    }

    let mount = options.volumes_dir.join(&options.volume_name);
    log::info!(
        "Watching for {} every {:?}",
        mount.display(),
        options.poll_interval
    );

    let mut was_present = mount.exists();
    if was_present {
        log::info!("{} already mounted, waiting for it to be re-inserted", mount.display());
    }

    loop {
        let is_present = mount.exists();
        if is_present && !was_present {
            log::info!("Volume connected: {}", mount.display());
            let input_dir = mount.join(&options.movie_subdir);
            let mut options = convert_template.clone();
            options.input_dir = input_dir;

            match convert::run(&options) {
                Ok(summary) => log::info!(
                    "Conversion finished: {} batch(es) converted, {} failed",
                    summary.batches_converted,
                    summary.batches_failed
                ),
                Err(RoadLapseError::EmptyInput(msg)) => {
                    log::info!("Nothing to do: {}", msg)
                }
                Err(e) => log::error!("Conversion failed: {}", e),
            }
        }
        was_present = is_present;

        std::thread::sleep(options.poll_interval);
    }
}
