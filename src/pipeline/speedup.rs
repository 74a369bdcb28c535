// Stage 2: speed change
//
// Scales video presentation timestamps by 1/speed. Audio, when kept, is
// tempo-corrected with an atempo chain; a single atempo stage only accepts
// factors in [0.5, 2.0], so larger factors are chained multiplicatively.

use std::path::Path;
use std::process::Command;

use crate::constants::{ATEMPO_STAGE_MAX, ATEMPO_STAGE_MIN};
use crate::error::{Result, RoadLapseError};

/// Re-encode `input` into `output` at `speed_factor` times real time.
/// With `keep_audio` false the audio track is dropped entirely, which is the
/// cheap default for footage whose audio is road noise.
pub fn speed_up(input: &Path, output: &Path, speed_factor: f64, keep_audio: bool) -> Result<()> {
    if speed_factor <= 0.0 {
        return Err(RoadLapseError::Other(format!(
            "speed factor must be positive, got {}",
            speed_factor
        )));
    }

    log::info!(
        "Speeding up {} by {}x -> {}",
        input.display(),
        speed_factor,
        output.display()
    );

    let video_filter = format!("setpts=PTS/{}", speed_factor);

    let mut cmd = Command::new(crate::tools::ffmpeg_path());
    cmd.arg("-y").arg("-i").arg(input).args(["-vf", &video_filter]);

    if keep_audio {
        cmd.args(["-af", &audio_tempo_filter(speed_factor)]);
    } else {
        cmd.arg("-an");
    }

    let result = cmd
        .arg(output)
        .output()
        .map_err(|e| RoadLapseError::FFmpeg(format!("Failed to run ffmpeg: {}", e)))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(RoadLapseError::FFmpeg(format!("speedup failed: {}", stderr)));
    }

    Ok(())
}

fn audio_tempo_filter(speed_factor: f64) -> String {
    atempo_chain(speed_factor)
        .iter()
        .map(|f| format!("atempo={}", f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Decompose a tempo factor into stages that each fit the atempo range and
/// multiply back to the requested factor. 10x becomes 2.0, 2.0, 2.0, 1.25.
fn atempo_chain(speed_factor: f64) -> Vec<f64> {
    let mut stages = Vec::new();
    let mut remainder = speed_factor;

    while remainder > ATEMPO_STAGE_MAX {
        stages.push(ATEMPO_STAGE_MAX);
        remainder /= ATEMPO_STAGE_MAX;
    }
    while remainder < ATEMPO_STAGE_MIN {
        stages.push(ATEMPO_STAGE_MIN);
        remainder /= ATEMPO_STAGE_MIN;
    }
    stages.push(remainder);

    stages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_chain(speed: f64, expected: &[f64]) {
        let chain = atempo_chain(speed);
        assert_eq!(chain.len(), expected.len(), "chain {:?} for {}", chain, speed);
        for (got, want) in chain.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "chain {:?} for {}", chain, speed);
        }
    }

    #[test]
    fn test_ten_x_chains_to_expected_stages() {
        assert_chain(10.0, &[2.0, 2.0, 2.0, 1.25]);
    }

    #[test]
    fn test_chain_multiplies_back_and_stays_in_range() {
        for speed in [0.25, 0.5, 1.0, 1.5, 2.0, 4.0, 10.0, 16.0, 30.0] {
            let chain = atempo_chain(speed);
            let product: f64 = chain.iter().product();
            assert!(
                (product - speed).abs() < 1e-9,
                "stages {:?} multiply to {}, want {}",
                chain,
                product,
                speed
            );
            for stage in &chain {
                assert!(
                    (ATEMPO_STAGE_MIN..=ATEMPO_STAGE_MAX).contains(stage),
                    "stage {} out of range for speed {}",
                    stage,
                    speed
                );
            }
        }
    }

    #[test]
    fn test_slowdown_chains_through_lower_bound() {
        assert_chain(0.25, &[0.5, 0.5]);
    }

    #[test]
    fn test_identity_speed_keeps_a_single_stage() {
        assert_chain(1.0, &[1.0]);
    }

    #[test]
    fn test_filter_string_shape() {
        assert_eq!(
            audio_tempo_filter(10.0),
            "atempo=2,atempo=2,atempo=2,atempo=1.25"
        );
    }
}
