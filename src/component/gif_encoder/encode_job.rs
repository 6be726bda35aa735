use super::encode_options::EncodeOptions;
use crate::component::range_selector::DurationWindow;
use crate::error::{PipelineError, PreconditionError};
use crate::tools::with_gif_extension;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// 一次「產生 GIF」的工作內容
///
/// 建立時重新驗證長度，不信任可能過期的區間狀態
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeJob {
    id: Uuid,
    source_path: PathBuf,
    start_sec: f64,
    end_sec: f64,
    options: EncodeOptions,
    output_path: PathBuf,
    palette_path: PathBuf,
}

impl EncodeJob {
    pub fn new(
        source_path: &Path,
        start_sec: f64,
        end_sec: f64,
        options: EncodeOptions,
        output_path: &Path,
        work_dir: &Path,
        window: DurationWindow,
    ) -> Result<Self, PipelineError> {
        window.validate(end_sec - start_sec)?;

        if !source_path.is_file() {
            return Err(PreconditionError::SourceMissing(source_path.to_path_buf()).into());
        }

        let id = Uuid::new_v4();
        let palette_path = work_dir.join(format!("palette_{}.png", id.simple()));

        Ok(Self {
            id,
            source_path: source_path.to_path_buf(),
            start_sec,
            end_sec,
            options,
            output_path: with_gif_extension(output_path),
            palette_path,
        })
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    #[must_use]
    pub const fn start_sec(&self) -> f64 {
        self.start_sec
    }

    #[must_use]
    pub const fn end_sec(&self) -> f64 {
        self.end_sec
    }

    #[must_use]
    pub fn duration_sec(&self) -> f64 {
        self.end_sec - self.start_sec
    }

    #[must_use]
    pub const fn options(&self) -> &EncodeOptions {
        &self.options
    }

    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// pass 1 的調色盤暫存檔；失敗時保留供檢查
    #[must_use]
    pub fn palette_path(&self) -> &Path {
        &self.palette_path
    }
}

/// 預設輸出檔名：`<來源檔名>_<起點毫秒>_<終點毫秒>.gif`
#[must_use]
pub fn default_output_name(source_path: &Path, start_sec: f64, end_sec: f64) -> String {
    let stem = source_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let start_ms = (start_sec.max(0.0) * 1000.0).round() as u64;
    let end_ms = (end_sec.max(0.0) * 1000.0).round() as u64;
    format!("{stem}_{start_ms}_{end_ms}.gif")
}
