use super::bounded_range::BoundedRange;
use log::trace;

/// 區間把手
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Lower,
    Upper,
}

/// 滑桿軌道的像素幾何：軌道起點與寬度
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackGeometry {
    origin_px: f64,
    width_px: f64,
}

impl TrackGeometry {
    /// 元件左右各保留的邊距
    pub const WIDGET_MARGIN_PX: f64 = 10.0;

    #[must_use]
    pub const fn new(origin_px: f64, width_px: f64) -> Self {
        Self {
            origin_px,
            width_px,
        }
    }

    /// 由元件總寬推算軌道（左右各扣掉邊距）
    #[must_use]
    pub fn for_widget_width(widget_width_px: f64) -> Self {
        Self::new(
            Self::WIDGET_MARGIN_PX,
            widget_width_px - 2.0 * Self::WIDGET_MARGIN_PX,
        )
    }

    #[must_use]
    pub const fn origin_px(&self) -> f64 {
        self.origin_px
    }

    #[must_use]
    pub const fn width_px(&self) -> f64 {
        self.width_px
    }

    #[must_use]
    pub fn x_of(&self, fraction: f64) -> f64 {
        self.origin_px + self.width_px.max(0.0) * fraction
    }

    #[must_use]
    pub fn fraction_at(&self, x_px: f64) -> f64 {
        let fraction = (x_px - self.origin_px) / self.width_px.max(1.0);
        if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        }
    }
}

/// 一次連續拖曳的狀態，放開滑鼠即銷毀
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragSession {
    active_handle: Option<Handle>,
    pinned_span_sec: Option<f64>,
}

impl DragSession {
    #[must_use]
    pub const fn active_handle(&self) -> Option<Handle> {
        self.active_handle
    }

    /// 本次拖曳固定的選取長度；第一次移動前為 `None`
    #[must_use]
    pub const fn pinned_span_sec(&self) -> Option<f64> {
        self.pinned_span_sec
    }
}

/// 把手拖曳狀態機：Idle → Dragging → Idle
///
/// 拖曳任一把手都會平移整個區間（固定長度），不會改變長度；
/// 碰到影片邊界時兩個把手一起被夾住。
#[derive(Debug, Clone)]
pub struct RangeDragController {
    geometry: TrackGeometry,
    session: DragSession,
}

impl RangeDragController {
    #[must_use]
    pub fn new(geometry: TrackGeometry) -> Self {
        Self {
            geometry,
            session: DragSession::default(),
        }
    }

    #[must_use]
    pub const fn geometry(&self) -> TrackGeometry {
        self.geometry
    }

    pub fn set_geometry(&mut self, geometry: TrackGeometry) {
        self.geometry = geometry;
    }

    #[must_use]
    pub const fn session(&self) -> &DragSession {
        &self.session
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.session.active_handle.is_some()
    }

    /// 按下：選擇像素距離較近的把手（距離相同時選 upper），並立即當作一次移動處理
    ///
    /// 回傳區間是否被更新
    pub fn press(&mut self, range: &mut BoundedRange, x_px: f64) -> bool {
        if !range.is_loaded() {
            return false;
        }

        let lower_x = self.geometry.x_of(range.lower());
        let upper_x = self.geometry.x_of(range.upper());
        let handle = if (x_px - lower_x).abs() < (x_px - upper_x).abs() {
            Handle::Lower
        } else {
            Handle::Upper
        };

        if self.session.active_handle != Some(handle) {
            self.session = DragSession {
                active_handle: Some(handle),
                pinned_span_sec: None,
            };
        }

        trace!("按下把手 {handle:?} @ {x_px:.1}px");
        self.drag_to(range, x_px)
    }

    /// 直接抓住指定的把手，不移動區間（鍵盤操作用）
    ///
    /// 長度在第一次移動時才固定，與 `press` 相同
    pub fn grab(&mut self, range: &BoundedRange, handle: Handle) -> bool {
        if !range.is_loaded() {
            return false;
        }

        trace!("抓住把手 {handle:?}");
        self.session = DragSession {
            active_handle: Some(handle),
            pinned_span_sec: None,
        };
        true
    }

    /// 移動：被拖曳的把手跟著指標，另一端維持固定長度
    ///
    /// 每次移動都完整更新區間，不合併事件
    pub fn drag_to(&mut self, range: &mut BoundedRange, x_px: f64) -> bool {
        let Some(handle) = self.session.active_handle else {
            return false;
        };
        if !range.is_loaded() {
            return false;
        }

        let window = range.window();
        let span = *self
            .session
            .pinned_span_sec
            .get_or_insert_with(|| window.clamp(range.span_sec()));

        let total = range.total_duration_sec();
        let pointer_sec = self.geometry.fraction_at(x_px) * total;
        let (lower_sec, upper_sec) = pan_window(handle, pointer_sec, span, total);

        range.set_seconds(lower_sec, upper_sec);
        true
    }

    /// 放開：結束拖曳，不再套用長度限制
    pub fn release(&mut self) {
        self.session = DragSession::default();
    }
}

/// 以被拖曳把手的位置計算平移後的區間，兩端一起夾在 `[0, total]`
fn pan_window(handle: Handle, pointer_sec: f64, span_sec: f64, total_sec: f64) -> (f64, f64) {
    match handle {
        Handle::Lower => {
            let mut lower = pointer_sec;
            let mut upper = lower + span_sec;
            if upper > total_sec {
                upper = total_sec;
                lower = (upper - span_sec).max(0.0);
            }
            (lower, upper)
        }
        Handle::Upper => {
            let mut upper = pointer_sec;
            let mut lower = upper - span_sec;
            if lower < 0.0 {
                lower = 0.0;
                upper = span_sec.min(total_sec);
            }
            (lower, upper)
        }
    }
}
