use crate::error::{ExtractError, PreconditionError, ProbeError};
use crate::tools::ffprobe_info::{VideoInfo, get_video_info};
use crate::tools::process_runner::{ProcessRunner, SystemProcessRunner, ToolCommand};
use crate::tools::tool_locator::ToolPaths;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use walkdir::WalkDir;

/// 預覽圖尺寸
pub const PREVIEW_WIDTH: u32 = 1280;
pub const PREVIEW_HEIGHT: u32 = 720;

/// 縮圖條每張的寬度（高度依比例）
pub const STRIP_FRAME_WIDTH: u32 = 320;

/// 縮圖條檔名前綴
pub const STRIP_FRAME_PREFIX: &str = "thumb_";

/// 兩段式 seek 的前置緩衝時間（秒）
const SEEK_MARGIN: f64 = 2.0;

/// 外部的探測 / 擷取協作者
///
/// 全部是阻塞呼叫，沒有內建重試
pub trait FrameSource: Sync {
    fn probe_duration(&self, media: &Path) -> Result<f64, ProbeError>;

    /// 長度加上解析度與影格率；預設只有長度
    fn video_info(&self, media: &Path) -> Result<VideoInfo, ProbeError> {
        self.probe_duration(media).map(VideoInfo::from_duration)
    }

    fn extract_frame(&self, media: &Path, timestamp_sec: f64) -> Result<PathBuf, ExtractError>;

    /// 以固定取樣率擷取整部影片的縮圖條，回傳依時間排序的檔案
    fn extract_strip(
        &self,
        media: &Path,
        fps_sample: f64,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, ExtractError>;
}

/// 以 ffmpeg / ffprobe 子程序實作的 [`FrameSource`]
pub struct FfmpegFrameSource<R: ProcessRunner = SystemProcessRunner> {
    runner: R,
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    preview_dir: PathBuf,
}

impl FfmpegFrameSource<SystemProcessRunner> {
    pub fn new(tools: &ToolPaths, cache_dir: &Path) -> Result<Self, PreconditionError> {
        Self::with_runner(SystemProcessRunner, tools, cache_dir)
    }
}

impl<R: ProcessRunner> FfmpegFrameSource<R> {
    pub fn with_runner(
        runner: R,
        tools: &ToolPaths,
        cache_dir: &Path,
    ) -> Result<Self, PreconditionError> {
        Ok(Self {
            runner,
            ffmpeg: tools.ffmpeg()?.to_path_buf(),
            ffprobe: tools.ffprobe()?.to_path_buf(),
            preview_dir: cache_dir.join("previews"),
        })
    }

    #[must_use]
    pub fn preview_path(&self, media: &Path, timestamp_sec: f64) -> PathBuf {
        self.preview_dir.join(preview_file_name(
            media,
            SourceStamp::of(media),
            timestamp_sec,
            PREVIEW_WIDTH,
            PREVIEW_HEIGHT,
        ))
    }
}

impl<R: ProcessRunner + Sync> FrameSource for FfmpegFrameSource<R> {
    fn probe_duration(&self, media: &Path) -> Result<f64, ProbeError> {
        self.video_info(media).map(|info| info.duration_seconds)
    }

    fn video_info(&self, media: &Path) -> Result<VideoInfo, ProbeError> {
        get_video_info(&self.runner, &self.ffprobe, media)
    }

    fn extract_frame(&self, media: &Path, timestamp_sec: f64) -> Result<PathBuf, ExtractError> {
        let output_path = self.preview_path(media, timestamp_sec);

        // 同一來源（含大小與修改時間）、同一毫秒、同一解析度的預覽直接重用
        if output_path.is_file() {
            debug!("重用預覽快取: {}", output_path.display());
            return Ok(output_path);
        }

        fs::create_dir_all(&self.preview_dir)?;

        let command = ToolCommand::new(
            &self.ffmpeg,
            build_frame_args(media, timestamp_sec, &output_path),
        );
        let output = self.runner.run(&command)?;

        if !output.success() {
            return Err(ExtractError::FrameFailed {
                timestamp_sec,
                stderr: output.stderr.trim().to_string(),
            });
        }

        if !output_path.is_file() {
            return Err(ExtractError::MissingOutput(output_path));
        }

        Ok(output_path)
    }

    fn extract_strip(
        &self,
        media: &Path,
        fps_sample: f64,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, ExtractError> {
        fs::create_dir_all(output_dir)?;

        let command = ToolCommand::new(&self.ffmpeg, build_strip_args(media, fps_sample, output_dir));
        let output = self.runner.run(&command)?;

        if !output.success() {
            return Err(ExtractError::StripFailed {
                stderr: output.stderr.trim().to_string(),
            });
        }

        Ok(list_strip_frames(output_dir))
    }
}

/// 來源檔的大小與修改時間
///
/// 同路徑的檔案被替換後，舊的預覽快取不再命中
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceStamp {
    pub len: u64,
    pub modified_nanos: u128,
}

impl SourceStamp {
    /// 讀不到 metadata 時回傳全零
    #[must_use]
    pub fn of(media: &Path) -> Self {
        fs::metadata(media).map_or_else(
            |_| Self::default(),
            |meta| Self {
                len: meta.len(),
                modified_nanos: meta
                    .modified()
                    .ok()
                    .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
                    .map_or(0, |since| since.as_nanos()),
            },
        )
    }
}

/// 預覽快取檔名：以 (來源路徑, 來源大小與修改時間, 毫秒時間點, 解析度) 的雜湊為鍵
#[must_use]
pub fn preview_file_name(
    media: &Path,
    stamp: SourceStamp,
    timestamp_sec: f64,
    width: u32,
    height: u32,
) -> String {
    let millis = (timestamp_sec.max(0.0) * 1000.0).round() as u64;
    let key = format!(
        "{}|{}|{}|{millis}|{width}x{height}",
        media.to_string_lossy(),
        stamp.len,
        stamp.modified_nanos
    );
    let hash = blake3::hash(key.as_bytes()).to_hex();
    format!("preview_{}.png", &hash[..16])
}

/// 單張預覽擷取參數（兩段式 seek）
///
/// 1. `-ss` 在 `-i` 前：快速跳轉到附近的關鍵幀
/// 2. `-ss` 在 `-i` 後：解碼到目標時間點
fn build_frame_args(media: &Path, timestamp_sec: f64, output_path: &Path) -> Vec<String> {
    let timestamp_sec = timestamp_sec.max(0.0);
    let t0 = (timestamp_sec - SEEK_MARGIN).max(0.0);
    let delta = timestamp_sec - t0;

    let mut args = vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
    ];

    if t0 > 0.0 {
        args.push("-ss".to_string());
        args.push(format!("{t0:.3}"));
    }

    args.push("-i".to_string());
    args.push(media.to_string_lossy().to_string());

    if delta > 0.0 {
        args.push("-ss".to_string());
        args.push(format!("{delta:.3}"));
    }

    args.extend([
        "-frames:v".to_string(),
        "1".to_string(),
        "-an".to_string(),
        "-sn".to_string(),
        "-vf".to_string(),
        format!("scale={PREVIEW_WIDTH}:{PREVIEW_HEIGHT}:flags=lanczos"),
        "-y".to_string(),
        output_path.to_string_lossy().to_string(),
    ]);

    args
}

/// 縮圖條擷取參數：單一 ffmpeg 呼叫以 fps 濾鏡均勻取樣整部影片
fn build_strip_args(media: &Path, fps_sample: f64, output_dir: &Path) -> Vec<String> {
    let pattern = output_dir.join(format!("{STRIP_FRAME_PREFIX}%05d.png"));
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-i".to_string(),
        media.to_string_lossy().to_string(),
        "-an".to_string(),
        "-vf".to_string(),
        format!("fps={fps_sample:.6},scale={STRIP_FRAME_WIDTH}:-1:flags=lanczos"),
        "-y".to_string(),
        pattern.to_string_lossy().to_string(),
    ]
}

fn is_strip_frame(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with(STRIP_FRAME_PREFIX) && name.ends_with(".png"))
}

/// 列出資料夾內的縮圖條檔案（依檔名排序即時間順序）
#[must_use]
pub fn list_strip_frames(dir: &Path) -> Vec<PathBuf> {
    let mut frames: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| is_strip_frame(path))
        .collect();

    frames.sort();
    frames
}
