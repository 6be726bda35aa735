//! 錯誤型別
//!
//! 範圍 / 時間 / 拖曳邏輯不會回傳錯誤（自行修正）；
//! 只有外部工具呼叫與編碼流程會產生使用者可見的失敗。

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 在啟動任何外部程序之前就能判定的失敗
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("external tool `{tool}` not found")]
    ToolMissing { tool: &'static str },

    #[error("external tool `{tool}` does not exist at {}", path.display())]
    ToolNotFile { tool: &'static str, path: PathBuf },

    #[error("no media loaded")]
    NoMediaLoaded,

    #[error("media has zero duration: {}", .0.display())]
    ZeroDuration(PathBuf),

    #[error("source media does not exist: {}", .0.display())]
    SourceMissing(PathBuf),
}

/// 本地驗證失敗，不會產生任何程序副作用
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("selection length {span_sec:.3}s is outside [{min_sec}s, {max_sec}s]")]
    DurationOutOfWindow {
        span_sec: f64,
        min_sec: f64,
        max_sec: f64,
    },

    #[error("invalid time code: {0:?}")]
    InvalidTimeCode(String),
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to run ffprobe on {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ffprobe exited with {exit_code:?}: {stderr}")]
    Failed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("unparseable ffprobe output: {0:?}")]
    Unparseable(String),
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("frame extraction I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("frame extraction at {timestamp_sec:.3}s failed: {stderr}")]
    FrameFailed { timestamp_sec: f64, stderr: String },

    #[error("thumbnail strip extraction failed: {stderr}")]
    StripFailed { stderr: String },

    #[error("extractor reported success but produced no file: {}", .0.display())]
    MissingOutput(PathBuf),
}

/// 兩階段編碼流程的失敗
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to prepare output location: {0}")]
    Io(#[from] io::Error),

    #[error("failed to start ffmpeg for pass {pass}: {source}")]
    Spawn {
        pass: u8,
        #[source]
        source: io::Error,
    },

    #[error("ffmpeg failed (pass {pass}, exit {exit_code:?}): {diagnostics}")]
    PassFailed {
        pass: u8,
        exit_code: Option<i32>,
        diagnostics: String,
    },

    #[error("ffmpeg reported success but no output was written: {}", output.display())]
    SilentFailure { output: PathBuf },
}

impl PipelineError {
    /// 失敗的 pass 編號（1 或 2），非 pass 失敗時為 `None`
    #[must_use]
    pub const fn failed_pass(&self) -> Option<u8> {
        match self {
            Self::Spawn { pass, .. } | Self::PassFailed { pass, .. } => Some(*pass),
            _ => None,
        }
    }
}
