// External tool resolver for ffmpeg/ffprobe/tesseract
//
// Resolution order:
// 1) Environment variable override (ROADLAPSE_FFMPEG_PATH, etc.)
// 2) Sidecar next to the executable
// 3) PATH fallback

use std::env;
use std::path::PathBuf;

/// Get the directory containing the current executable
fn exe_dir() -> Option<PathBuf> {
    env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
}

/// Resolve an external tool path.
fn resolve_tool(env_key: &str, default_name: &str) -> PathBuf {
    // 1) Check environment variable override
    if let Ok(v) = env::var(env_key) {
        let p = PathBuf::from(&v);
        if p.exists() {
            return p;
        }
    }

    // Add .exe on Windows
    let mut filename = default_name.to_string();
    if cfg!(windows) && !filename.to_lowercase().ends_with(".exe") {
        filename.push_str(".exe");
    }

    // 2) Check sidecar next to executable
    if let Some(dir) = exe_dir() {
        let candidate = dir.join(&filename);
        if candidate.exists() {
            return candidate;
        }
    }

    // 3) Fall back to PATH
    PathBuf::from(default_name)
}

/// Get path to ffmpeg binary
pub fn ffmpeg_path() -> PathBuf {
    resolve_tool("ROADLAPSE_FFMPEG_PATH", "ffmpeg")
}

/// Get path to ffprobe binary
pub fn ffprobe_path() -> PathBuf {
    resolve_tool("ROADLAPSE_FFPROBE_PATH", "ffprobe")
}

/// Get path to tesseract binary
pub fn tesseract_path() -> PathBuf {
    resolve_tool("ROADLAPSE_TESSERACT_PATH", "tesseract")
}

/// Check if a tool is available at the resolved path
pub fn is_tool_available(tool: &str) -> bool {
    let path = match tool {
        "ffmpeg" => ffmpeg_path(),
        "ffprobe" => ffprobe_path(),
        "tesseract" => tesseract_path(),
        _ => return false,
    };

    if path.exists() {
        return true;
    }

    // Otherwise try running it (for PATH fallback)
    std::process::Command::new(&path)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_tool_fallback() {
        // Without env var set, should return the default name for PATH lookup
        let path = resolve_tool("ROADLAPSE_TEST_NONEXISTENT", "testcmd");
        assert_eq!(path, PathBuf::from("testcmd"));
    }

    #[test]
    fn test_env_override() {
        let temp_dir = std::env::temp_dir();
        let temp_file = temp_dir.join("roadlapse_test_tool");
        std::fs::write(&temp_file, "test").ok();

        std::env::set_var("ROADLAPSE_TEST_TOOL", temp_file.to_str().unwrap());
        let path = resolve_tool("ROADLAPSE_TEST_TOOL", "default");
        assert_eq!(path, temp_file);

        std::env::remove_var("ROADLAPSE_TEST_TOOL");
        std::fs::remove_file(&temp_file).ok();
    }
}
