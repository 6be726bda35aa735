use crate::error::ExtractError;
use crate::tools::{Debouncer, FrameSource, list_strip_frames};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// 每格縮圖的最小寬度（像素）
pub const CELL_MIN_WIDTH_PX: u32 = 110;

/// 縮圖格數下限
pub const MIN_VISIBLE_CELLS: u32 = 8;

/// 最低取樣率，避免超長影片的 fps 濾鏡趨近於 0
pub const MIN_SAMPLE_FPS: f64 = 0.01;

/// 視窗縮放後重建縮圖條的安靜期
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

/// 視窗內扣掉捲軸與邊框的寬度
const VIEWPORT_PADDING_PX: u32 = 16;

/// 依可視寬度估算可放幾格縮圖
#[must_use]
pub fn visible_cells(viewport_width_px: u32) -> u32 {
    (viewport_width_px.saturating_sub(VIEWPORT_PADDING_PX) / CELL_MIN_WIDTH_PX)
        .max(MIN_VISIBLE_CELLS)
}

/// 讓整部影片剛好取出約 `cells` 張的取樣率
#[must_use]
pub fn sample_rate(cells: u32, total_duration_sec: f64) -> f64 {
    if total_duration_sec <= 0.0 || !total_duration_sec.is_finite() {
        return MIN_SAMPLE_FPS;
    }
    (f64::from(cells) / total_duration_sec).max(MIN_SAMPLE_FPS)
}

/// 整部影片的縮圖條，與目前選取的區間無關
///
/// 每次重建都是完整重做：先刪除舊圖，再以單一次擷取請求產生新圖。
#[derive(Debug)]
pub struct ThumbnailStripBuilder {
    strip_dir: PathBuf,
    frames: Vec<PathBuf>,
    cells: u32,
    resize: Debouncer<u32>,
}

impl ThumbnailStripBuilder {
    #[must_use]
    pub fn new(strip_dir: PathBuf) -> Self {
        Self {
            strip_dir,
            frames: Vec::new(),
            cells: 0,
            resize: Debouncer::new(RESIZE_DEBOUNCE),
        }
    }

    #[must_use]
    pub fn strip_dir(&self) -> &Path {
        &self.strip_dir
    }

    #[must_use]
    pub fn frames(&self) -> &[PathBuf] {
        &self.frames
    }

    /// 上一次重建使用的格數
    #[must_use]
    pub const fn cells(&self) -> u32 {
        self.cells
    }

    /// 刪除磁碟上與記憶體中的舊縮圖
    pub fn clear(&mut self) -> Result<(), ExtractError> {
        for frame in list_strip_frames(&self.strip_dir) {
            fs::remove_file(&frame)?;
        }
        self.frames.clear();
        Ok(())
    }

    pub fn rebuild(
        &mut self,
        source: &dyn FrameSource,
        media: &Path,
        total_duration_sec: f64,
        viewport_width_px: u32,
    ) -> Result<&[PathBuf], ExtractError> {
        self.clear()?;
        self.resize.cancel();

        if total_duration_sec <= 0.0 {
            debug!("影片長度為 0，略過縮圖條");
            return Ok(self.frames.as_slice());
        }

        let cells = visible_cells(viewport_width_px);
        let fps_sample = sample_rate(cells, total_duration_sec);

        debug!("重建縮圖條: {cells} 格, fps={fps_sample:.6}");
        match source.extract_strip(media, fps_sample, &self.strip_dir) {
            Ok(frames) => {
                self.frames = frames;
                self.cells = cells;
            }
            Err(err) => {
                // 沒有縮圖條；下一次縮放不論寬度都要重試
                self.cells = 0;
                return Err(err);
            }
        }
        info!("縮圖條完成，共 {} 張", self.frames.len());

        Ok(self.frames.as_slice())
    }

    pub fn on_viewport_resized(&mut self, viewport_width_px: u32) {
        self.on_viewport_resized_at(viewport_width_px, Instant::now());
    }

    pub fn on_viewport_resized_at(&mut self, viewport_width_px: u32, now: Instant) {
        self.resize.schedule_at(viewport_width_px, now);
    }

    /// 縮放停止後回傳最新的寬度；格數沒變就不需重建
    pub fn take_resize_at(&mut self, now: Instant) -> Option<u32> {
        let width = self.resize.tick_at(now)?;
        (visible_cells(width) != self.cells).then_some(width)
    }

    pub fn take_resize(&mut self) -> Option<u32> {
        self.take_resize_at(Instant::now())
    }

    #[must_use]
    pub const fn is_resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// 距離縮放安靜期結束還有多久
    #[must_use]
    pub fn resize_remaining(&self, now: Instant) -> Option<Duration> {
        self.resize.remaining(now)
    }
}
