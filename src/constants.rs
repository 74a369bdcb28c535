// Roadlapse Constants
// Contract values for the conversion pipeline. Filenames, filter geometry and
// stage suffixes are load-bearing: outputs are addressed by name, not by a DB.

// Segment discovery
pub const SEGMENT_EXTENSION: &str = "ts";
pub const OUTPUT_EXTENSION: &str = "mp4";

// Camera channel folder names under the output directory
pub const FRONT_FOLDER: &str = "front";
pub const REAR_FOLDER: &str = "rear";

// Pipeline defaults
pub const DEFAULT_SPEED_FACTOR: f64 = 10.0;
pub const DEFAULT_ZOOM: f64 = 0.9;
pub const DEFAULT_MIN_SEGMENT_SECONDS: f64 = 5.0;

// Single-stage atempo range; factors outside are chained multiplicatively
pub const ATEMPO_STAGE_MIN: f64 = 0.5;
pub const ATEMPO_STAGE_MAX: f64 = 2.0;

// Intermediate artifact suffixes
pub const COMBINED_SUFFIX: &str = "combined";
pub const SPEEDUP_SUFFIX: &str = "speedup";
pub const CROPPED_SUFFIX: &str = "cropped";

// Telemetry overlay region (top-left corner of the frame)
pub const OVERLAY_CROP_WIDTH: u32 = 420;
pub const OVERLAY_CROP_HEIGHT: u32 = 100;

// Frame sampling offsets: 1s in from the start, 2s back from the end,
// away from blank/transitional boundary frames
pub const FRAME_START_OFFSET_SECS: f64 = 1.0;
pub const FRAME_END_GUARD_SECS: f64 = 2.0;

// Reverse geocoding
pub const GEOCODER_ENDPOINT: &str = "https://nominatim.openstreetmap.org/reverse";
pub const DEFAULT_GEOCODER_LANGUAGE: &str = "ja";
pub const GEOCODER_USER_AGENT: &str = concat!("roadlapse/", env!("CARGO_PKG_VERSION"));
pub const GEOCODER_TIMEOUT_SECS: u64 = 10;

// Sentinel for an unresolvable address (either side of the label)
pub const UNKNOWN_ADDRESS: &str = "unknown";

// Volume watcher defaults
pub const DEFAULT_VOLUMES_DIR: &str = "/Volumes";
pub const DEFAULT_VOLUME_NAME: &str = "MyDriveUSB";
pub const DEFAULT_MOVIE_SUBDIR: &str = "movie/drive";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
