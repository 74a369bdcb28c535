// Roadlapse CLI binary

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use roadlapse::constants;
use roadlapse::convert::{self, ConvertOptions};
use roadlapse::geotag::{self, geocode::ReverseGeocoder};
use roadlapse::watch::{self, WatchOptions};
use roadlapse::RoadLapseError;

#[derive(Parser)]
#[command(name = "roadlapse")]
#[command(about = "Turn dashcam card dumps into sped-up, geolabeled daily drive videos", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a directory of dashcam segments
    Convert {
        /// Directory containing raw segment files
        input: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
        /// Speed-up factor
        #[arg(long, default_value_t = constants::DEFAULT_SPEED_FACTOR)]
        speed: f64,
        /// Zoom fraction in (0, 1]
        #[arg(long, default_value_t = constants::DEFAULT_ZOOM)]
        zoom: f64,
        /// Anchor the crop top-left instead of centering it
        #[arg(long)]
        no_center: bool,
        /// Keep and tempo-correct the audio track
        #[arg(long)]
        keep_audio: bool,
        /// Delete segments at or below this duration before grouping
        #[arg(long, default_value_t = constants::DEFAULT_MIN_SEGMENT_SECONDS)]
        min_duration: f64,
        /// Skip OCR/geocoding; outputs are labeled "unknown"
        #[arg(long)]
        no_geotag: bool,
        /// Geocoder language
        #[arg(long, default_value = constants::DEFAULT_GEOCODER_LANGUAGE)]
        language: String,
        /// Leave source segments in place after conversion
        #[arg(long)]
        keep_sources: bool,
    },

    /// Wait for a removable volume and convert whatever it carries
    Watch {
        /// Directory removable volumes are mounted under
        #[arg(long, default_value = constants::DEFAULT_VOLUMES_DIR)]
        volumes: PathBuf,
        /// Volume name to wait for
        #[arg(long, default_value = constants::DEFAULT_VOLUME_NAME)]
        volume: String,
        /// Segment directory relative to the mount point
        #[arg(long, default_value = constants::DEFAULT_MOVIE_SUBDIR)]
        subdir: PathBuf,
        /// Poll interval in seconds
        #[arg(long, default_value_t = constants::DEFAULT_POLL_INTERVAL_SECS)]
        interval: u64,
        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
        /// Skip OCR/geocoding; outputs are labeled "unknown"
        #[arg(long)]
        no_geotag: bool,
    },

    /// Resolve and print the geographic label for one video
    Geotag {
        /// Video file to sample
        video: PathBuf,
        /// Geocoder language
        #[arg(long, default_value = constants::DEFAULT_GEOCODER_LANGUAGE)]
        language: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            speed,
            zoom,
            no_center,
            keep_audio,
            min_duration,
            no_geotag,
            language,
            keep_sources,
        } => {
            let mut options = ConvertOptions::new(input, output);
            options.speed_factor = speed;
            options.zoom = zoom;
            options.center = !no_center;
            options.keep_audio = keep_audio;
            options.min_segment_seconds = min_duration;
            options.geotag = !no_geotag;
            options.language = language;
            options.delete_sources = !keep_sources;
            cmd_convert(&options)
        }
        Commands::Watch { volumes, volume, subdir, interval, output, no_geotag } => {
            let watch_options = WatchOptions {
                volumes_dir: volumes,
                volume_name: volume,
                movie_subdir: subdir,
                poll_interval: Duration::from_secs(interval),
            };
            // Input dir is filled in per mount event
            let mut template = ConvertOptions::new(PathBuf::new(), output);
            template.geotag = !no_geotag;
            watch::watch(&watch_options, &template)?;
            Ok(())
        }
        Commands::Geotag { video, language } => cmd_geotag(video, language),
    }
}

fn cmd_convert(options: &ConvertOptions) -> Result<()> {
    println!(
        "Converting segments from {} into {}",
        options.input_dir.display(),
        options.output_dir.display()
    );

    let summary = match convert::run(options) {
        Ok(summary) => summary,
        Err(RoadLapseError::EmptyInput(msg)) => {
            println!("Nothing to do: {}", msg);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!();
    println!("Conversion complete:");
    println!("  Segments found:    {}", summary.segments_found);
    println!("  Invalid names:     {}", summary.segments_skipped);
    println!("  Unclassified:      {}", summary.segments_unclassified);
    println!("  Short deleted:     {}", summary.short_deleted);
    println!("  Batches converted: {}/{}", summary.batches_converted, summary.batches_total);
    println!("  Sources deleted:   {}", summary.sources_deleted);

    if !summary.outputs.is_empty() {
        println!();
        println!("Outputs:");
        for output in &summary.outputs {
            println!("  {}", output.display());
        }
    }

    if summary.batches_failed > 0 {
        anyhow::bail!("{} batch(es) failed; their sources were kept", summary.batches_failed);
    }

    Ok(())
}

fn cmd_geotag(video: PathBuf, language: String) -> Result<()> {
    if !video.is_file() {
        anyhow::bail!("No such file: {}", video.display());
    }

    let geocoder = ReverseGeocoder::new(&language)?;
    let label = geotag::extract(&video, &geocoder);

    println!("Start: {}", label.start_address);
    println!("End:   {}", label.end_address);

    Ok(())
}
