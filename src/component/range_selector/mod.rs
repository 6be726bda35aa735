mod bounded_range;
mod drag_controller;
mod duration_badge;
mod time_field_sync;

pub use bounded_range::{
    AdjustSide, BoundedRange, DEFAULT_INIT_SEC, DurationWindow, MAX_SEC, MIN_SEC,
};
pub use drag_controller::{DragSession, Handle, RangeDragController, TrackGeometry};
pub use duration_badge::{DurationBadge, RECOMMENDED_MAX_SEC, RECOMMENDED_MIN_SEC};
pub use time_field_sync::{FieldCommit, TimeFieldSync};
