use rust_i18n::t;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 畫面比例與輸出尺寸不同時的處理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// 等比縮小後補黑邊
    Letterbox,
    /// 等比放大後裁切填滿
    #[default]
    Cover,
    /// 直接拉伸
    Stretch,
}

impl ScaleMode {
    pub const ALL: [Self; 3] = [Self::Letterbox, Self::Cover, Self::Stretch];
}

impl fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Letterbox => t!("encode.scale.letterbox"),
            Self::Cover => t!("encode.scale.cover"),
            Self::Stretch => t!("encode.scale.stretch"),
        };
        write!(f, "{label}")
    }
}

/// paletteuse 的 dither 演算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DitherMode {
    #[default]
    FloydSteinberg,
    Bayer,
    None,
}

impl DitherMode {
    pub const ALL: [Self; 3] = [Self::FloydSteinberg, Self::Bayer, Self::None];

    /// ffmpeg `paletteuse=dither=` 的值
    #[must_use]
    pub const fn ffmpeg_key(self) -> &'static str {
        match self {
            Self::FloydSteinberg => "floyd_steinberg",
            Self::Bayer => "bayer",
            Self::None => "none",
        }
    }
}

impl fmt::Display for DitherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FloydSteinberg => t!("encode.dither.floyd_steinberg"),
            Self::Bayer => t!("encode.dither.bayer"),
            Self::None => t!("encode.dither.none"),
        };
        write!(f, "{label}")
    }
}

/// 取樣方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSelection {
    /// 依 fps 均勻取樣
    #[default]
    EvenSampling,
    /// 額外去除重複畫面
    DuplicateRemoval,
}

impl FrameSelection {
    pub const ALL: [Self; 2] = [Self::EvenSampling, Self::DuplicateRemoval];
}

impl fmt::Display for FrameSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::EvenSampling => t!("encode.selection.even"),
            Self::DuplicateRemoval => t!("encode.selection.dedup"),
        };
        write!(f, "{label}")
    }
}

/// GIF 輸出參數，由設定 / 介面層填入並驗證
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    pub scale_mode: ScaleMode,
    pub dither_mode: DitherMode,
    pub frame_selection: FrameSelection,
}

impl EncodeOptions {
    pub const DEFAULT_FPS: u32 = 12;
    pub const DEFAULT_WIDTH: u32 = 160;
    pub const DEFAULT_HEIGHT: u32 = 80;
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            fps: Self::DEFAULT_FPS,
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            scale_mode: ScaleMode::default(),
            dither_mode: DitherMode::default(),
            frame_selection: FrameSelection::default(),
        }
    }
}

impl fmt::Display for EncodeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} @ {} fps, {}, {}, {}",
            self.width, self.height, self.fps, self.scale_mode, self.dither_mode, self.frame_selection
        )
    }
}
