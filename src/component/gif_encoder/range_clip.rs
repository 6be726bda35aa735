use crate::tools::{ProcessRunner, ToolCommand, is_non_empty_file};
use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 區間預覽片段的檔名（放在快取資料夾）
pub const RANGE_CLIP_FILE_NAME: &str = "range_clip.mp4";

fn base_args(source: &Path, start_sec: f64, end_sec: f64) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-ss".to_string(),
        format!("{:.3}", start_sec.max(0.0)),
        "-t".to_string(),
        format!("{:.3}", (end_sec - start_sec).max(0.0)),
        "-i".to_string(),
        source.to_string_lossy().to_string(),
    ]
}

/// 直接複製串流，速度最快但起點會對齊到關鍵幀
fn build_copy_args(source: &Path, start_sec: f64, end_sec: f64, output: &Path) -> Vec<String> {
    let mut args = base_args(source, start_sec, end_sec);
    args.extend(
        [
            "-c",
            "copy",
            "-movflags",
            "faststart",
            "-y",
        ]
        .map(String::from),
    );
    args.push(output.to_string_lossy().to_string());
    args
}

/// 複製失敗時改用快速重新編碼
fn build_reencode_args(source: &Path, start_sec: f64, end_sec: f64, output: &Path) -> Vec<String> {
    let mut args = base_args(source, start_sec, end_sec);
    args.extend(
        [
            "-c:v",
            "libx264",
            "-preset",
            "ultrafast",
            "-crf",
            "23",
            "-c:a",
            "aac",
            "-b:a",
            "128k",
            "-movflags",
            "faststart",
            "-y",
        ]
        .map(String::from),
    );
    args.push(output.to_string_lossy().to_string());
    args
}

/// 把目前區間輸出成可直接播放的 mp4 片段
pub fn export_range_clip(
    runner: &dyn ProcessRunner,
    ffmpeg: &Path,
    source: &Path,
    start_sec: f64,
    end_sec: f64,
    output: &Path,
) -> Result<PathBuf> {
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("無法建立資料夾: {}", parent.display()))?;
    }

    let copy = ToolCommand::new(ffmpeg, build_copy_args(source, start_sec, end_sec, output));
    debug!("區間片段（串流複製）: {copy}");
    let copied = runner
        .run(&copy)
        .with_context(|| format!("無法執行 ffmpeg: {}", ffmpeg.display()))?;

    if copied.success() && is_non_empty_file(output) {
        info!("區間片段完成（串流複製）: {}", output.display());
        return Ok(output.to_path_buf());
    }

    warn!("串流複製失敗，改用重新編碼: {}", copied.diagnostics());

    let reencode = ToolCommand::new(
        ffmpeg,
        build_reencode_args(source, start_sec, end_sec, output),
    );
    debug!("區間片段（重新編碼）: {reencode}");
    let encoded = runner
        .run(&reencode)
        .with_context(|| format!("無法執行 ffmpeg: {}", ffmpeg.display()))?;

    if !encoded.success() {
        bail!("區間片段輸出失敗: {}", encoded.diagnostics());
    }
    if !is_non_empty_file(output) {
        bail!("ffmpeg 沒有產生區間片段: {}", output.display());
    }

    info!("區間片段完成（重新編碼）: {}", output.display());
    Ok(output.to_path_buf())
}
