use crate::error::ExtractError;
use crate::tools::{Debouncer, FrameSource};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// 區間變動到擷取預覽之間的安靜期
pub const PREVIEW_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewSide {
    Start,
    End,
}

/// 起點 / 終點最後一次成功擷取的預覽圖
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewImages {
    pub start: Option<PathBuf>,
    pub end: Option<PathBuf>,
}

/// 一次觸發的結果：更新後的預覽與各側的失敗原因
#[derive(Debug)]
pub struct PreviewRefresh {
    pub images: PreviewImages,
    pub failures: Vec<(PreviewSide, ExtractError)>,
}

impl PreviewRefresh {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 去抖動的起點 / 終點預覽排程
///
/// 拖曳中每次移動都會重設計時器，只有停下來之後的最後一個區間會真的去擷取。
/// 擷取失敗只記錄 log，保留上一張成功的圖。
#[derive(Debug)]
pub struct PreviewScheduler {
    debouncer: Debouncer<(f64, f64)>,
    images: PreviewImages,
}

impl Default for PreviewScheduler {
    fn default() -> Self {
        Self::new(PREVIEW_DEBOUNCE)
    }
}

impl PreviewScheduler {
    #[must_use]
    pub const fn new(quiet_period: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(quiet_period),
            images: PreviewImages {
                start: None,
                end: None,
            },
        }
    }

    #[must_use]
    pub const fn images(&self) -> &PreviewImages {
        &self.images
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.debouncer.remaining(now)
    }

    pub fn notify_range_changed(&mut self, lower_sec: f64, upper_sec: f64) {
        self.notify_range_changed_at(lower_sec, upper_sec, Instant::now());
    }

    pub fn notify_range_changed_at(&mut self, lower_sec: f64, upper_sec: f64, now: Instant) {
        self.debouncer.schedule_at((lower_sec, upper_sec), now);
    }

    /// 換片時清掉舊的預覽與待處理的請求
    pub fn reset(&mut self) {
        self.debouncer.cancel();
        self.images = PreviewImages::default();
    }

    pub fn tick(&mut self, source: &dyn FrameSource, media: &Path) -> Option<PreviewRefresh> {
        self.tick_at(Instant::now(), source, media)
    }

    /// 安靜期已過則擷取起點與終點兩張預覽
    pub fn tick_at(
        &mut self,
        now: Instant,
        source: &dyn FrameSource,
        media: &Path,
    ) -> Option<PreviewRefresh> {
        let (lower_sec, upper_sec) = self.debouncer.tick_at(now)?;
        debug!("擷取預覽 {lower_sec:.3}s / {upper_sec:.3}s");

        let (start, end) = rayon::join(
            || source.extract_frame(media, lower_sec),
            || source.extract_frame(media, upper_sec),
        );

        let mut failures = Vec::new();
        for (side, result) in [(PreviewSide::Start, start), (PreviewSide::End, end)] {
            match result {
                Ok(path) => match side {
                    PreviewSide::Start => self.images.start = Some(path),
                    PreviewSide::End => self.images.end = Some(path),
                },
                Err(err) => {
                    warn!("預覽擷取失敗 ({side:?}): {err}");
                    failures.push((side, err));
                }
            }
        }

        Some(PreviewRefresh {
            images: self.images.clone(),
            failures,
        })
    }
}
