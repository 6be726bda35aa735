use crate::component::gif_encoder::{
    EncodeJob, EncodeOptions, EncodeOutcome, EncodingPipeline, RANGE_CLIP_FILE_NAME,
    export_range_clip,
};
use crate::component::preview::{PreviewImages, PreviewScheduler, ThumbnailStripBuilder};
use crate::component::range_selector::{
    BoundedRange, DurationBadge, DurationWindow, FieldCommit, Handle, RangeDragController,
    TimeFieldSync, TrackGeometry,
};
use crate::error::{PipelineError, PreconditionError, ProbeError};
use crate::session::Session;
use crate::tools::{FrameSource, ProcessRunner};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

/// 介面層註冊的回呼；全部有預設的空實作
pub trait SelectionObserver {
    /// 區間改變（拖曳中每次移動都會呼叫）
    fn on_range_changed(&mut self, _range: &BoundedRange, _fields: &TimeFieldSync) {}

    fn on_preview_ready(&mut self, _images: &PreviewImages) {}

    fn on_strip_ready(&mut self, _frames: &[PathBuf]) {}

    fn on_probe_failed(&mut self, _error: &ProbeError) {}
}

/// 選取區間、預覽、縮圖條與編碼的組合
///
/// 所有狀態都在呼叫端的執行緒上；外部程序呼叫是同步的
pub struct Workbench {
    session: Session,
    source: Box<dyn FrameSource>,
    range: BoundedRange,
    drag: RangeDragController,
    fields: TimeFieldSync,
    previews: PreviewScheduler,
    strip: ThumbnailStripBuilder,
    observers: Vec<Box<dyn SelectionObserver>>,
    viewport_width_px: u32,
}

impl Workbench {
    #[must_use]
    pub fn new(session: Session, source: Box<dyn FrameSource>, viewport_width_px: u32) -> Self {
        let strip = ThumbnailStripBuilder::new(session.strip_dir());
        Self {
            session,
            source,
            range: BoundedRange::empty(DurationWindow::default()),
            drag: RangeDragController::new(TrackGeometry::for_widget_width(f64::from(
                viewport_width_px,
            ))),
            fields: TimeFieldSync::new(),
            previews: PreviewScheduler::default(),
            strip,
            observers: Vec::new(),
            viewport_width_px,
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn SelectionObserver>) {
        self.observers.push(observer);
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    #[must_use]
    pub const fn range(&self) -> &BoundedRange {
        &self.range
    }

    #[must_use]
    pub const fn fields(&self) -> &TimeFieldSync {
        &self.fields
    }

    #[must_use]
    pub const fn drag(&self) -> &RangeDragController {
        &self.drag
    }

    #[must_use]
    pub const fn preview_images(&self) -> &PreviewImages {
        self.previews.images()
    }

    #[must_use]
    pub fn strip_frames(&self) -> &[PathBuf] {
        self.strip.frames()
    }

    #[must_use]
    pub fn badge(&self) -> DurationBadge {
        DurationBadge::for_range(&self.range)
    }

    /// 載入影片：探測長度、重設區間、重建縮圖條
    ///
    /// 縮圖條失敗只記錄警告，不影響載入
    pub fn load_media(&mut self, path: &Path) -> Result<f64> {
        if !path.is_file() {
            return Err(PreconditionError::SourceMissing(path.to_path_buf()).into());
        }

        let media_info = match self.source.video_info(path) {
            Ok(media_info) => media_info,
            Err(err) => {
                warn!("無法取得影片長度 {}: {err}", path.display());
                for observer in &mut self.observers {
                    observer.on_probe_failed(&err);
                }
                return Err(err).with_context(|| format!("無法讀取影片: {}", path.display()));
            }
        };

        let duration = media_info.duration_seconds;
        if duration <= 0.0 {
            return Err(PreconditionError::ZeroDuration(path.to_path_buf()).into());
        }

        info!("載入影片 {} ({media_info})", path.display());
        self.session.set_media(path, media_info);
        self.range = BoundedRange::for_duration(duration, self.range.window());
        self.drag.release();
        self.previews.reset();

        match self
            .strip
            .rebuild(self.source.as_ref(), path, duration, self.viewport_width_px)
        {
            Ok(frames) => {
                for observer in &mut self.observers {
                    observer.on_strip_ready(frames);
                }
            }
            Err(err) => warn!("縮圖條產生失敗: {err}"),
        }

        self.emit_range_changed();
        Ok(duration)
    }

    /// 換片或關閉時清空狀態
    pub fn unload_media(&mut self) {
        self.session.clear_media();
        self.range = BoundedRange::empty(self.range.window());
        self.drag.release();
        self.previews.reset();
        if let Err(err) = self.strip.clear() {
            warn!("無法清除縮圖條: {err}");
        }
        self.fields.on_range_changed(&self.range);
    }

    pub fn press(&mut self, x_px: f64) {
        if self.drag.press(&mut self.range, x_px) {
            self.emit_range_changed();
        }
    }

    /// 指定把手開始拖曳，區間不變
    pub fn grab(&mut self, handle: Handle) {
        self.drag.grab(&self.range, handle);
    }

    pub fn drag_to(&mut self, x_px: f64) {
        if self.drag.drag_to(&mut self.range, x_px) {
            self.emit_range_changed();
        }
    }

    pub fn release(&mut self) {
        self.drag.release();
    }

    /// 文字欄位送出
    pub fn commit_time_fields(&mut self, start_text: &str, end_text: &str) -> FieldCommit {
        let result = self
            .fields
            .on_field_committed(&mut self.range, start_text, end_text);

        match &result {
            FieldCommit::Applied => self.emit_range_changed(),
            FieldCommit::Restored(err) => {
                debug!("還原時間欄位: {err}");
                for observer in &mut self.observers {
                    observer.on_range_changed(&self.range, &self.fields);
                }
            }
            FieldCommit::Ignored => {}
        }

        result
    }

    #[must_use]
    pub const fn viewport_width_px(&self) -> u32 {
        self.viewport_width_px
    }

    /// 視窗寬度改變；縮圖條在安靜期過後才重建，寬度沒變則不動作
    pub fn set_viewport_width(&mut self, viewport_width_px: u32) {
        if viewport_width_px == self.viewport_width_px {
            return;
        }

        debug!("視窗寬度 {} → {viewport_width_px}px", self.viewport_width_px);
        self.viewport_width_px = viewport_width_px;
        self.drag
            .set_geometry(TrackGeometry::for_widget_width(f64::from(viewport_width_px)));
        self.strip.on_viewport_resized(viewport_width_px);
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// 處理到期的預覽與縮圖條請求
    pub fn tick_at(&mut self, now: Instant) {
        let Some(media) = self.session.media().map(|m| (m.path.clone(), m.duration_sec)) else {
            return;
        };
        let (path, duration) = media;

        if let Some(refresh) = self.previews.tick_at(now, self.source.as_ref(), &path) {
            for observer in &mut self.observers {
                observer.on_preview_ready(&refresh.images);
            }
        }

        if let Some(width) = self.strip.take_resize_at(now) {
            match self
                .strip
                .rebuild(self.source.as_ref(), &path, duration, width)
            {
                Ok(frames) => {
                    for observer in &mut self.observers {
                        observer.on_strip_ready(frames);
                    }
                }
                Err(err) => warn!("縮圖條重建失敗: {err}"),
            }
        }
    }

    /// 阻塞到預覽與縮圖條的安靜期都結束再處理（互動式終端機用）
    pub fn settle(&mut self) {
        let now = Instant::now();
        let remaining = self
            .previews
            .remaining(now)
            .into_iter()
            .chain(self.strip.resize_remaining(now))
            .max();
        if let Some(remaining) = remaining {
            thread::sleep(remaining);
        }
        self.tick();
    }

    /// 以目前區間產生 GIF
    ///
    /// 執行期間持有 `&mut self`，產生完成前無法再次送出
    pub fn generate<R: ProcessRunner>(
        &mut self,
        pipeline: &EncodingPipeline<R>,
        options: EncodeOptions,
        output_path: &Path,
    ) -> Result<EncodeOutcome, PipelineError> {
        let media = self
            .session
            .media()
            .ok_or(PreconditionError::NoMediaLoaded)?;

        let job = EncodeJob::new(
            &media.path,
            self.range.lower_sec(),
            self.range.upper_sec(),
            options,
            output_path,
            self.session.cache_dir(),
            self.range.window(),
        )?;

        pipeline.execute(&job)
    }

    /// 把目前區間輸出成 mp4 片段供播放器預覽
    pub fn export_range_clip(&self, runner: &dyn ProcessRunner) -> Result<PathBuf> {
        let media = self
            .session
            .media()
            .ok_or(PreconditionError::NoMediaLoaded)?;
        let ffmpeg = self.session.tools().ffmpeg()?;
        let output = self.session.cache_dir().join(RANGE_CLIP_FILE_NAME);

        export_range_clip(
            runner,
            ffmpeg,
            &media.path,
            self.range.lower_sec(),
            self.range.upper_sec(),
            &output,
        )
    }

    fn emit_range_changed(&mut self) {
        self.fields.on_range_changed(&self.range);
        self.previews
            .notify_range_changed(self.range.lower_sec(), self.range.upper_sec());
        for observer in &mut self.observers {
            observer.on_range_changed(&self.range, &self.fields);
        }
    }
}
