// OCR boundary
//
// Text recognition is delegated to the tesseract binary; this module only
// runs it and picks the coordinate line out of whatever it read.

use std::path::Path;
use std::process::Command;

use crate::error::{Result, RoadLapseError};

/// Run tesseract over `image` and return the recognized text as lines.
pub fn recognize_lines(image: &Path) -> Result<Vec<String>> {
    let output = Command::new(crate::tools::tesseract_path())
        .arg(image)
        .arg("stdout")
        .output()
        .map_err(|e| RoadLapseError::Ocr(format!("Failed to run tesseract: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RoadLapseError::Ocr(format!("tesseract failed: {}", stderr)));
    }

    let text = String::from_utf8_lossy(&output.stdout).to_string();
    Ok(text.lines().map(|l| l.to_string()).collect())
}

/// Find the coordinate line in OCR output: the first line beginning with `N:`
/// that also contains `E:`. Latitude is the substring after `N:` up to the
/// next whitespace, longitude the substring after `E:` up to the next
/// whitespace. Returns None when no such line exists or it does not parse.
pub fn parse_coordinates(lines: &[String]) -> Option<(f64, f64)> {
    let line = lines
        .iter()
        .find(|l| l.starts_with("N:") && l.contains("E:"))?;

    let latitude: f64 = token_after(line, "N:")?.parse().ok()?;
    let longitude: f64 = token_after(line, "E:")?.parse().ok()?;
    Some((latitude, longitude))
}

fn token_after<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    let rest = &line[line.find(tag)? + tag.len()..];
    rest.split(char::is_whitespace).next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parses_coordinate_line() {
        let text = lines(&["2022/10/02 18:49", "N:35.5209 E:139.6936 other", "60km/h"]);
        assert_eq!(parse_coordinates(&text), Some((35.5209, 139.6936)));
    }

    #[test]
    fn test_signed_coordinates() {
        let text = lines(&["N:-33.8688 E:151.2093"]);
        assert_eq!(parse_coordinates(&text), Some((-33.8688, 151.2093)));
    }

    #[test]
    fn test_first_matching_line_wins() {
        let text = lines(&["N:1.0 E:2.0", "N:3.0 E:4.0"]);
        assert_eq!(parse_coordinates(&text), Some((1.0, 2.0)));
    }

    #[test]
    fn test_no_matching_line_is_unresolved() {
        // Contains E: but does not start with N:
        let text = lines(&["GPS N:35.5 E:139.6", "E:139.6"]);
        assert_eq!(parse_coordinates(&text), None);
        assert_eq!(parse_coordinates(&[]), None);
    }

    #[test]
    fn test_garbled_numbers_are_unresolved() {
        let text = lines(&["N:3S.S209 E:139.6936"]);
        assert_eq!(parse_coordinates(&text), None);
    }
}
