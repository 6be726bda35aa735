//! 起點 / 終點預覽與整部影片的縮圖條

mod preview_scheduler;
mod thumbnail_strip;

pub use preview_scheduler::{
    PREVIEW_DEBOUNCE, PreviewImages, PreviewRefresh, PreviewScheduler, PreviewSide,
};
pub use thumbnail_strip::{
    CELL_MIN_WIDTH_PX, MIN_SAMPLE_FPS, MIN_VISIBLE_CELLS, RESIZE_DEBOUNCE, ThumbnailStripBuilder,
    sample_rate, visible_cells,
};
