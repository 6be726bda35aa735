use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

/// `S`、`M:S`、`H:M:S`；秒數可帶小數
///
/// 第一組使用 lazy `??`，只有三段時才會吃下小時欄位
static TIME_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+):)??(?:(\d+):)?(\d+(?:\.\d+)?)$").expect("Invalid regex")
});

/// 將秒數格式化為 `MM:SS.mmm`，超過一小時則為 `HH:MM:SS.mmm`
///
/// 先四捨五入到毫秒再拆分，避免出現 `00:60.000`
#[must_use]
pub fn format_time_code(seconds: f64) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}.{millis:03}")
    } else {
        format!("{minutes:02}:{secs:02}.{millis:03}")
    }
}

/// 解析時間碼文字為秒數
///
/// 空字串視為 0；分鐘欄位不限制在 59 以內（`90:00` 即 5400 秒）
pub fn parse_time_code(text: &str) -> Result<f64, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    let invalid = || ValidationError::InvalidTimeCode(text.to_string());
    let captures = TIME_CODE_REGEX.captures(trimmed).ok_or_else(invalid)?;

    let field = |index: usize| -> Result<f64, ValidationError> {
        captures
            .get(index)
            .map_or(Ok(0.0), |m| m.as_str().parse::<f64>().map_err(|_| invalid()))
    };

    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;

    let total = hours * 3600.0 + minutes * 60.0 + seconds;
    if total.is_finite() {
        Ok(total)
    } else {
        Err(invalid())
    }
}
