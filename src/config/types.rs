use crate::component::gif_encoder::EncodeOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// 最近使用的影片路徑最多保留幾筆
pub const MAX_RECENT_PATHS: usize = 10;

/// 本地 ffmpeg / ffprobe 資料夾
pub const DEFAULT_TOOL_DIR: &str = "ffmpeg-bin";

/// 預覽、縮圖條、調色盤的暫存資料夾
pub const DEFAULT_CACHE_DIR: &str = "cache";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTypeTable {
    #[serde(rename = "VIDEO_FILE")]
    pub video_file: Vec<String>,
}

impl FileTypeTable {
    #[must_use]
    pub fn video_extensions_set(&self) -> HashSet<String> {
        self.video_file
            .iter()
            .map(|ext| ext.to_lowercase())
            .collect()
    }

    #[must_use]
    pub fn is_video_file(&self, path: &Path) -> bool {
        let video_extensions = self.video_extensions_set();
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| video_extensions.contains(&format!(".{}", ext.to_lowercase())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
    #[serde(rename = "ko-KR")]
    KoKr,
}

impl Language {
    pub const ALL: [Self; 3] = [Self::EnUs, Self::ZhTw, Self::KoKr];

    /// rust-i18n 的 locale 名稱
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
            Self::KoKr => "ko-KR",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhTw => write!(f, "繁體中文"),
            Self::KoKr => write!(f, "한국어"),
        }
    }
}

/// 使用者設定（settings.json）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    pub recent_paths: Vec<String>,
    pub encode: EncodeOptions,
    /// 未設定時輸出到來源影片旁
    pub output_dir: Option<String>,
    pub tool_dir: String,
    pub cache_dir: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            recent_paths: Vec::new(),
            encode: EncodeOptions::default(),
            output_dir: None,
            tool_dir: DEFAULT_TOOL_DIR.to_string(),
            cache_dir: DEFAULT_CACHE_DIR.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub file_type_table: FileTypeTable,
    pub settings: UserSettings,
}
