mod debouncer;
mod ffprobe_info;
mod frame_extractor;
mod path_validator;
mod process_runner;
mod time_code;
mod tool_locator;

pub use debouncer::Debouncer;
pub use ffprobe_info::{VideoInfo, get_video_info};
pub use frame_extractor::{
    FfmpegFrameSource, FrameSource, PREVIEW_HEIGHT, PREVIEW_WIDTH, STRIP_FRAME_PREFIX,
    STRIP_FRAME_WIDTH, SourceStamp, list_strip_frames, preview_file_name,
};
pub use path_validator::{is_non_empty_file, validate_file_exists, with_gif_extension};
pub use process_runner::{ProcessOutput, ProcessRunner, SystemProcessRunner, ToolCommand};
pub use time_code::{format_time_code, parse_time_code};
pub use tool_locator::{FFMPEG, FFPROBE, ToolPaths, find_executable};
