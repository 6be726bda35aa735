//! GIF 編碼元件
//!
//! 以 ffmpeg 兩階段（palettegen / paletteuse）將選取區間轉成 GIF

mod encode_job;
mod encode_options;
mod filter_chain;
mod gif_command;
mod pipeline;
mod range_clip;

pub use encode_job::{EncodeJob, default_output_name};
pub use encode_options::{DitherMode, EncodeOptions, FrameSelection, ScaleMode};
pub use filter_chain::{build_filters, scale_filter};
pub use gif_command::{build_auto_commands, build_encode_command, build_palette_command};
pub use pipeline::{EncodeOutcome, EncodingPipeline};
pub use range_clip::{RANGE_CLIP_FILE_NAME, export_range_clip};
