use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    if !path.is_file() {
        bail!("路徑不是檔案: {}", path.display());
    }
    Ok(())
}

/// 輸出檔名補上 `.gif` 副檔名（大小寫不拘）
#[must_use]
pub fn with_gif_extension(path: &Path) -> PathBuf {
    let has_gif = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gif"));

    if has_gif {
        path.to_path_buf()
    } else {
        let mut raw = path.as_os_str().to_os_string();
        raw.push(".gif");
        PathBuf::from(raw)
    }
}

/// 檔案存在且非空
#[must_use]
pub fn is_non_empty_file(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.len() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_with_gif_extension() {
        assert_eq!(with_gif_extension(Path::new("out")), PathBuf::from("out.gif"));
        assert_eq!(with_gif_extension(Path::new("out.GIF")), PathBuf::from("out.GIF"));
        assert_eq!(
            with_gif_extension(Path::new("clip.mp4")),
            PathBuf::from("clip.mp4.gif")
        );
    }

    #[test]
    fn test_is_non_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let empty = temp_dir.path().join("empty.gif");
        let full = temp_dir.path().join("full.gif");
        std::fs::write(&empty, b"").unwrap();
        std::fs::write(&full, b"GIF89a").unwrap();

        assert!(!is_non_empty_file(&empty));
        assert!(is_non_empty_file(&full));
        assert!(!is_non_empty_file(&temp_dir.path().join("missing.gif")));
        assert!(!is_non_empty_file(temp_dir.path()));
    }

    #[test]
    fn test_validate_file_exists() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.mp4");
        std::fs::write(&file, b"x").unwrap();

        assert!(validate_file_exists(&file).is_ok());
        assert!(validate_file_exists(temp_dir.path()).is_err());
        assert!(validate_file_exists(&temp_dir.path().join("none.mp4")).is_err());
    }
}
