//! 功能元件模組
//!
//! 每個子模組實現一個獨立的功能，包含主要邏輯和專用工具

pub mod gif_encoder;
pub mod gif_maker;
pub mod preview;
pub mod range_selector;

pub use gif_encoder::EncodingPipeline;
pub use gif_maker::{GifMaker, Workbench};
