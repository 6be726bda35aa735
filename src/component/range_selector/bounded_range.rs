use crate::error::ValidationError;

/// 選取區間的最短 / 最長秒數
pub const MIN_SEC: f64 = 1.0;
pub const MAX_SEC: f64 = 15.0;

/// 載入影片時的預設選取長度（秒）
pub const DEFAULT_INIT_SEC: f64 = 6.0;

/// 浮點比較容差，避免正規化來回換算後重複調整
const EPSILON: f64 = 1e-9;

/// 選取長度必須落在的秒數區間
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationWindow {
    min_sec: f64,
    max_sec: f64,
}

impl Default for DurationWindow {
    fn default() -> Self {
        Self {
            min_sec: MIN_SEC,
            max_sec: MAX_SEC,
        }
    }
}

impl DurationWindow {
    /// 參數順序顛倒時自動對調；負值視為 0
    #[must_use]
    pub fn new(min_sec: f64, max_sec: f64) -> Self {
        let a = min_sec.max(0.0);
        let b = max_sec.max(0.0);
        Self {
            min_sec: a.min(b),
            max_sec: a.max(b),
        }
    }

    #[must_use]
    pub const fn min_sec(&self) -> f64 {
        self.min_sec
    }

    #[must_use]
    pub const fn max_sec(&self) -> f64 {
        self.max_sec
    }

    #[must_use]
    pub fn contains(&self, span_sec: f64) -> bool {
        span_sec >= self.min_sec - EPSILON && span_sec <= self.max_sec + EPSILON
    }

    /// 編碼前的長度重新驗證
    pub fn validate(&self, span_sec: f64) -> Result<(), ValidationError> {
        if self.contains(span_sec) {
            Ok(())
        } else {
            Err(ValidationError::DurationOutOfWindow {
                span_sec,
                min_sec: self.min_sec,
                max_sec: self.max_sec,
            })
        }
    }

    /// 把拖曳開始時的長度夾進區間
    #[must_use]
    pub fn clamp(&self, span_sec: f64) -> f64 {
        span_sec.clamp(self.min_sec, self.max_sec)
    }
}

/// 調整長度時優先移動哪一側
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustSide {
    Start,
    End,
    Auto,
}

/// 正規化的雙把手區間 `[lower, upper] ⊆ [0, 1]`
///
/// 影片長度在載入時決定，換片前不會改變。
/// `set_range` 只保證 `0 ≤ lower ≤ upper ≤ 1`；
/// 秒數區間限制由 [`BoundedRange::apply_duration_constraints`] 另外執行。
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedRange {
    lower: f64,
    upper: f64,
    total_duration_sec: f64,
    window: DurationWindow,
}

impl Default for BoundedRange {
    fn default() -> Self {
        Self::empty(DurationWindow::default())
    }
}

impl BoundedRange {
    /// 尚未載入影片的區間，所有操作皆為 no-op
    #[must_use]
    pub const fn empty(window: DurationWindow) -> Self {
        Self {
            lower: 0.0,
            upper: 0.0,
            total_duration_sec: 0.0,
            window,
        }
    }

    /// 新載入影片：預設選取 `[0, min(DEFAULT_INIT_SEC, MAX, total)]`
    #[must_use]
    pub fn for_duration(total_duration_sec: f64, window: DurationWindow) -> Self {
        let total = if total_duration_sec.is_finite() {
            total_duration_sec.max(0.0)
        } else {
            0.0
        };
        let mut range = Self {
            total_duration_sec: total,
            ..Self::empty(window)
        };

        if total <= 0.0 {
            return range;
        }

        let mut span = DEFAULT_INIT_SEC.min(window.max_sec).min(total);
        if span < window.min_sec {
            span = total.min(window.min_sec);
        }

        range.set_range(0.0, span / total);
        range.apply_duration_constraints(AdjustSide::Auto);
        range
    }

    #[must_use]
    pub const fn lower(&self) -> f64 {
        self.lower
    }

    #[must_use]
    pub const fn upper(&self) -> f64 {
        self.upper
    }

    #[must_use]
    pub const fn total_duration_sec(&self) -> f64 {
        self.total_duration_sec
    }

    #[must_use]
    pub const fn window(&self) -> DurationWindow {
        self.window
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.total_duration_sec > 0.0
    }

    #[must_use]
    pub fn lower_sec(&self) -> f64 {
        self.lower * self.total_duration_sec
    }

    #[must_use]
    pub fn upper_sec(&self) -> f64 {
        self.upper * self.total_duration_sec
    }

    #[must_use]
    pub fn span_sec(&self) -> f64 {
        self.upper_sec() - self.lower_sec()
    }

    /// 夾到 `[0, 1]` 並確保 `upper ≥ lower`；不套用秒數限制
    pub fn set_range(&mut self, lower: f64, upper: f64) {
        if !self.is_loaded() {
            return;
        }

        let lower = clamp_unit(lower);
        let upper = clamp_unit(upper).max(lower);
        self.lower = lower;
        self.upper = upper;
    }

    /// 以秒數設定區間
    pub fn set_seconds(&mut self, lower_sec: f64, upper_sec: f64) {
        if !self.is_loaded() {
            return;
        }

        let total = self.total_duration_sec;
        self.set_range(lower_sec / total, upper_sec / total);
    }

    /// 將選取長度拉回 `[MIN_SEC, MAX_SEC]`
    ///
    /// 只用於離散編輯（文字輸入、初次載入）；連續拖曳中不可呼叫。
    /// 影片比 `MIN_SEC` 短時，目標長度退化為整部影片。
    pub fn apply_duration_constraints(&mut self, side: AdjustSide) {
        if !self.is_loaded() {
            return;
        }

        let total = self.total_duration_sec;
        let min = self.window.min_sec.min(total);
        let max = self.window.max_sec.max(min);

        let mut lo = self.lower_sec();
        let mut hi = self.upper_sec();
        let span = hi - lo;

        if span < min - EPSILON {
            let need = min - span;
            match side {
                AdjustSide::Start => {
                    let new_lo = (lo - need).max(0.0);
                    let rest = need - (lo - new_lo);
                    lo = new_lo;
                    hi = (hi + rest).min(total);
                }
                AdjustSide::End | AdjustSide::Auto => {
                    let new_hi = (hi + need).min(total);
                    let rest = need - (new_hi - hi);
                    hi = new_hi;
                    lo = (lo - rest).max(0.0);
                }
            }
        } else if span > max + EPSILON {
            let cut = span - max;
            match side {
                AdjustSide::Start => lo += cut,
                AdjustSide::End | AdjustSide::Auto => hi -= cut,
            }
        } else {
            return;
        }

        self.set_seconds(lo, hi);
    }

    /// 目前區間是否合法（含短片退化情況）
    #[must_use]
    pub fn is_legal(&self) -> bool {
        if !self.is_loaded() {
            return false;
        }

        let total = self.total_duration_sec;
        let min = self.window.min_sec.min(total);
        let span = self.span_sec();

        0.0 <= self.lower
            && self.lower <= self.upper
            && self.upper <= 1.0
            && span >= min - EPSILON
            && span <= self.window.max_sec + EPSILON
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
