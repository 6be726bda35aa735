use crate::error::PreconditionError;
use log::{info, warn};
use std::env;
use std::path::{Path, PathBuf};

pub const FFMPEG: &str = "ffmpeg";
pub const FFPROBE: &str = "ffprobe";

/// 已解析的外部工具路徑
///
/// 啟動時解析一次（或使用者要求重新準備時），之後視為唯讀
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolPaths {
    pub ffmpeg: Option<PathBuf>,
    pub ffprobe: Option<PathBuf>,
}

impl ToolPaths {
    /// 先找本地工具資料夾，再找 `PATH`
    #[must_use]
    pub fn resolve(tool_dir: &Path) -> Self {
        let paths = Self {
            ffmpeg: find_executable(FFMPEG, tool_dir),
            ffprobe: find_executable(FFPROBE, tool_dir),
        };

        if paths.is_ready() {
            info!("ffmpeg/ffprobe 已就緒");
        } else {
            warn!(
                "找不到外部工具: ffmpeg={:?}, ffprobe={:?}",
                paths.ffmpeg, paths.ffprobe
            );
        }

        paths
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ffmpeg.is_some() && self.ffprobe.is_some()
    }

    pub fn ffmpeg(&self) -> Result<&Path, PreconditionError> {
        existing_tool(FFMPEG, self.ffmpeg.as_deref())
    }

    pub fn ffprobe(&self) -> Result<&Path, PreconditionError> {
        existing_tool(FFPROBE, self.ffprobe.as_deref())
    }

    /// 編碼前的前置檢查：兩個工具都必須指向存在的檔案
    pub fn ensure_ready(&self) -> Result<(), PreconditionError> {
        self.ffmpeg()?;
        self.ffprobe()?;
        Ok(())
    }
}

fn existing_tool<'a>(
    tool: &'static str,
    path: Option<&'a Path>,
) -> Result<&'a Path, PreconditionError> {
    let path = path.ok_or(PreconditionError::ToolMissing { tool })?;
    if path.is_file() {
        Ok(path)
    } else {
        Err(PreconditionError::ToolNotFile {
            tool,
            path: path.to_path_buf(),
        })
    }
}

fn executable_name(name: &str) -> String {
    if cfg!(windows) {
        format!("{name}.exe")
    } else {
        name.to_string()
    }
}

#[must_use]
pub fn find_executable(name: &str, tool_dir: &Path) -> Option<PathBuf> {
    let file_name = executable_name(name);

    let local = tool_dir.join(&file_name);
    if local.is_file() {
        return Some(local);
    }

    env::var_os("PATH").and_then(|paths| {
        env::split_paths(&paths)
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
    })
}
