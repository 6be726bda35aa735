//! 影片區間 GIF 擷取元件
//!
//! 選取區間、即時預覽、縮圖條，最後以兩階段 ffmpeg 編碼輸出

mod main;
mod range_bar;
mod workbench;

pub use main::GifMaker;
pub use range_bar::{BarCursor, KeyOutcome, RangeBar};
pub use workbench::{SelectionObserver, Workbench};
