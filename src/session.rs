use crate::tools::{ToolPaths, VideoInfo};
use log::info;
use std::path::{Path, PathBuf};

/// 快取資料夾下的縮圖條子資料夾
const STRIP_DIR_NAME: &str = "timeline";

/// 目前載入的影片
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedMedia {
    pub path: PathBuf,
    pub duration_sec: f64,
    /// ffprobe 回報的解析度與影格率（可能未知）
    pub info: VideoInfo,
}

/// 一次執行期間共用的狀態：外部工具、快取位置、目前的影片
///
/// 由呼叫端建立後交給各元件，不使用全域變數
#[derive(Debug, Clone)]
pub struct Session {
    tool_dir: PathBuf,
    cache_dir: PathBuf,
    tools: ToolPaths,
    media: Option<LoadedMedia>,
}

impl Session {
    #[must_use]
    pub fn new(tool_dir: &Path, cache_dir: &Path) -> Self {
        Self::with_tools(tool_dir, cache_dir, ToolPaths::resolve(tool_dir))
    }

    #[must_use]
    pub fn with_tools(tool_dir: &Path, cache_dir: &Path, tools: ToolPaths) -> Self {
        Self {
            tool_dir: tool_dir.to_path_buf(),
            cache_dir: cache_dir.to_path_buf(),
            tools,
            media: None,
        }
    }

    /// 重新尋找 ffmpeg / ffprobe（使用者手動放入工具後）
    pub fn reprepare(&mut self) -> &ToolPaths {
        info!("重新尋找外部工具: {}", self.tool_dir.display());
        self.tools = ToolPaths::resolve(&self.tool_dir);
        &self.tools
    }

    #[must_use]
    pub const fn tools(&self) -> &ToolPaths {
        &self.tools
    }

    #[must_use]
    pub fn tool_dir(&self) -> &Path {
        &self.tool_dir
    }

    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    #[must_use]
    pub fn strip_dir(&self) -> PathBuf {
        self.cache_dir.join(STRIP_DIR_NAME)
    }

    #[must_use]
    pub const fn media(&self) -> Option<&LoadedMedia> {
        self.media.as_ref()
    }

    pub fn set_media(&mut self, path: &Path, info: VideoInfo) {
        self.media = Some(LoadedMedia {
            path: path.to_path_buf(),
            duration_sec: info.duration_seconds,
            info,
        });
    }

    pub fn clear_media(&mut self) {
        self.media = None;
    }
}
