use super::bounded_range::BoundedRange;
use std::fmt;

/// 建議的 GIF 長度（秒）
pub const RECOMMENDED_MIN_SEC: f64 = 3.0;
pub const RECOMMENDED_MAX_SEC: f64 = 6.0;

/// 時間欄位旁顯示的長度標籤
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationBadge {
    Empty,
    Recommended(f64),
    Outside(f64),
}

impl DurationBadge {
    #[must_use]
    pub fn for_range(range: &BoundedRange) -> Self {
        if !range.is_loaded() {
            return Self::Empty;
        }
        Self::for_span(range.span_sec())
    }

    #[must_use]
    pub fn for_span(span_sec: f64) -> Self {
        if (RECOMMENDED_MIN_SEC..=RECOMMENDED_MAX_SEC).contains(&span_sec) {
            Self::Recommended(span_sec)
        } else {
            Self::Outside(span_sec)
        }
    }

    #[must_use]
    pub const fn is_recommended(&self) -> bool {
        matches!(self, Self::Recommended(_))
    }
}

impl fmt::Display for DurationBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "--"),
            Self::Recommended(span) => write!(f, "{span:.2}s ✓"),
            Self::Outside(span) => write!(
                f,
                "{span:.2}s ({RECOMMENDED_MIN_SEC:.0}-{RECOMMENDED_MAX_SEC:.0}s)"
            ),
        }
    }
}
