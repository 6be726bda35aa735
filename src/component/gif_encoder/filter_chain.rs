use super::encode_options::{EncodeOptions, FrameSelection, ScaleMode};

/// 去除重複畫面並重排時間戳
const DEDUP_FILTER: &str = "mpdecimate,setpts=N/FRAME_RATE/TB";

/// 縮放濾鏡，依 [`ScaleMode`] 補邊 / 裁切 / 拉伸
#[must_use]
pub fn scale_filter(mode: ScaleMode, width: u32, height: u32) -> String {
    match mode {
        ScaleMode::Letterbox => format!(
            "scale={width}:{height}:force_original_aspect_ratio=decrease:flags=lanczos,\
             pad={width}:{height}:(ow-iw)/2:(oh-ih)/2"
        ),
        ScaleMode::Cover => format!(
            "scale={width}:{height}:force_original_aspect_ratio=increase:flags=lanczos,\
             crop={width}:{height}"
        ),
        ScaleMode::Stretch => format!("scale={width}:{height}:flags=lanczos"),
    }
}

/// 兩個 pass 共用的幾何濾鏡鏈
///
/// 調色盤統計必須來自與最終輸出完全相同的畫面，
/// 所以 pass 1 與 pass 2 都只能從這裡取得濾鏡字串。
#[must_use]
pub fn build_filters(options: &EncodeOptions) -> String {
    let mut filters = format!(
        "fps={},{}",
        options.fps.max(1),
        scale_filter(options.scale_mode, options.width.max(1), options.height.max(1))
    );

    if options.frame_selection == FrameSelection::DuplicateRemoval {
        filters.push(',');
        filters.push_str(DEDUP_FILTER);
    }

    filters
}
