use super::bounded_range::{AdjustSide, BoundedRange};
use crate::error::ValidationError;
use crate::tools::{format_time_code, parse_time_code};
use log::debug;

/// 文字欄位送出後的處理結果
#[derive(Debug, Clone, PartialEq)]
pub enum FieldCommit {
    /// 已寫回區間
    Applied,
    /// 解析失敗，欄位已還原成目前區間的文字
    Restored(ValidationError),
    /// 尚未載入影片
    Ignored,
}

/// 開始 / 結束兩個時間欄位與 [`BoundedRange`] 的雙向同步
///
/// 區間變動時只改寫欄位文字，不會觸發送出事件。
#[derive(Debug, Clone)]
pub struct TimeFieldSync {
    start_text: String,
    end_text: String,
}

impl Default for TimeFieldSync {
    fn default() -> Self {
        Self {
            start_text: format_time_code(0.0),
            end_text: format_time_code(0.0),
        }
    }
}

impl TimeFieldSync {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn start_text(&self) -> &str {
        &self.start_text
    }

    #[must_use]
    pub fn end_text(&self) -> &str {
        &self.end_text
    }

    pub fn on_range_changed(&mut self, range: &BoundedRange) {
        self.start_text = format_time_code(range.lower_sec());
        self.end_text = format_time_code(range.upper_sec());
    }

    /// 解析兩個欄位並寫回區間
    ///
    /// 可以同時調整兩端（與拖曳的平移不同），
    /// 最後一律以 `Auto` 再套用一次長度限制。
    pub fn on_field_committed(
        &mut self,
        range: &mut BoundedRange,
        start_text: &str,
        end_text: &str,
    ) -> FieldCommit {
        if !range.is_loaded() {
            return FieldCommit::Ignored;
        }

        let parsed = parse_time_code(start_text)
            .and_then(|start| parse_time_code(end_text).map(|end| (start, end)));

        let (start, end) = match parsed {
            Ok(pair) => pair,
            Err(err) => {
                debug!("時間欄位解析失敗，還原顯示: {err}");
                self.on_range_changed(range);
                return FieldCommit::Restored(err);
            }
        };

        let (lower_sec, upper_sec) = fit_into_window(range, start, end);
        range.set_seconds(lower_sec, upper_sec);
        range.apply_duration_constraints(AdjustSide::Auto);
        self.on_range_changed(range);

        FieldCommit::Applied
    }
}

/// 夾到 `[0, total]` 並把長度拉進秒數區間（離散編輯版本）
fn fit_into_window(range: &BoundedRange, start: f64, end: f64) -> (f64, f64) {
    let total = range.total_duration_sec();
    let window = range.window();

    let mut lo = start.clamp(0.0, total);
    let mut hi = end.clamp(0.0, total);

    if hi <= lo {
        hi = (lo + window.min_sec()).min(total);
    }

    let span = hi - lo;
    if span < window.min_sec() {
        hi = (lo + window.min_sec()).min(total);
    } else if span > window.max_sec() {
        if lo + window.max_sec() <= total {
            hi = lo + window.max_sec();
        } else {
            hi = total;
            lo = (hi - window.max_sec()).max(0.0);
        }
    }

    (lo, hi)
}
