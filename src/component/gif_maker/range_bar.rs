use super::workbench::Workbench;
use crate::component::range_selector::{BoundedRange, DurationBadge, Handle};
use anyhow::Result;
use console::{Key, Term, style};
use rust_i18n::t;

/// 鍵盤拖曳時目前抓住的把手與指標欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarCursor {
    pub handle: Handle,
    pub pointer: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Redraw,
    Ignored,
    Finished,
}

/// 終端機上的區間滑桿
///
/// 以字元欄位模擬指標：←/→ 移動、Tab 換把手、Enter / Esc 放開
pub struct RangeBar {
    columns: usize,
}

impl RangeBar {
    pub const DEFAULT_COLUMNS: usize = 60;

    #[must_use]
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(2),
        }
    }

    /// 依終端機寬度決定欄數
    #[must_use]
    pub fn for_term(term: &Term) -> Self {
        let (_, width) = term.size();
        Self::new(usize::from(width).saturating_sub(20).min(Self::DEFAULT_COLUMNS))
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub fn column_of(&self, fraction: f64) -> usize {
        let last = self.columns - 1;
        ((fraction.clamp(0.0, 1.0) * last as f64).round() as usize).min(last)
    }

    #[must_use]
    pub fn fraction_of(&self, column: usize) -> f64 {
        column.min(self.columns - 1) as f64 / (self.columns - 1) as f64
    }

    /// `[---|=====|------]` 形式的滑桿，`^` 標出指標位置
    #[must_use]
    pub fn render(&self, range: &BoundedRange, pointer: Option<usize>) -> (String, String) {
        let lower = self.column_of(range.lower());
        let upper = self.column_of(range.upper());

        let bar: String = (0..self.columns)
            .map(|col| {
                if col == lower || col == upper {
                    '|'
                } else if col > lower && col < upper {
                    '='
                } else {
                    '-'
                }
            })
            .collect();

        let marker: String = (0..self.columns)
            .map(|col| if Some(col) == pointer { '^' } else { ' ' })
            .collect();

        (format!("[{bar}]"), format!(" {marker} "))
    }

    /// 互動拖曳，直到使用者按 Enter 或 Esc
    pub fn run(&self, term: &Term, bench: &mut Workbench) -> Result<()> {
        let Some(mut cursor) = self.begin(bench) else {
            return Ok(());
        };

        println!("{}", style(t!("gif_maker.range_bar.hint")).dim());
        self.draw(term, bench, cursor.pointer, false)?;

        loop {
            match self.handle_key(bench, &mut cursor, &term.read_key()?) {
                KeyOutcome::Redraw => self.draw(term, bench, cursor.pointer, true)?,
                KeyOutcome::Ignored => {}
                KeyOutcome::Finished => break,
            }
        }

        Ok(())
    }

    /// 抓住 lower 把手；不移動區間，第一次方向鍵才開始拖曳
    pub fn begin(&self, bench: &mut Workbench) -> Option<BarCursor> {
        if !bench.range().is_loaded() {
            return None;
        }

        bench.grab(Handle::Lower);
        Some(BarCursor {
            handle: Handle::Lower,
            pointer: self.column_of(bench.range().lower()),
        })
    }

    /// 處理一個按鍵；Enter / Esc 會放開把手
    pub fn handle_key(&self, bench: &mut Workbench, cursor: &mut BarCursor, key: &Key) -> KeyOutcome {
        let next = match key {
            Key::ArrowLeft => cursor.pointer.saturating_sub(1),
            Key::ArrowRight => (cursor.pointer + 1).min(self.columns - 1),
            Key::Home => 0,
            Key::End => self.columns - 1,
            Key::Tab => {
                bench.release();
                cursor.handle = match cursor.handle {
                    Handle::Lower => Handle::Upper,
                    Handle::Upper => Handle::Lower,
                };
                bench.grab(cursor.handle);
                cursor.pointer = match cursor.handle {
                    Handle::Lower => self.column_of(bench.range().lower()),
                    Handle::Upper => self.column_of(bench.range().upper()),
                };
                return KeyOutcome::Redraw;
            }
            Key::Enter | Key::Escape => {
                bench.release();
                return KeyOutcome::Finished;
            }
            _ => return KeyOutcome::Ignored,
        };

        if next == cursor.pointer {
            return KeyOutcome::Ignored;
        }

        cursor.pointer = next;
        bench.drag_to(self.x_of(bench, next));
        KeyOutcome::Redraw
    }

    fn x_of(&self, bench: &Workbench, column: usize) -> f64 {
        bench.drag().geometry().x_of(self.fraction_of(column))
    }

    fn draw(&self, term: &Term, bench: &Workbench, pointer: usize, redraw: bool) -> Result<()> {
        if redraw {
            term.clear_last_lines(3)?;
        }

        let (bar, marker) = self.render(bench.range(), Some(pointer));
        let badge = DurationBadge::for_range(bench.range());
        let badge = if badge.is_recommended() {
            style(badge.to_string()).green()
        } else {
            style(badge.to_string()).yellow()
        };

        term.write_line(&format!("{}", style(bar).cyan()))?;
        term.write_line(&marker)?;
        term.write_line(&format!(
            "{} → {}  {}",
            bench.fields().start_text(),
            bench.fields().end_text(),
            badge
        ))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::range_selector::DurationWindow;
    use crate::error::{ExtractError, ProbeError};
    use crate::session::Session;
    use crate::tools::{FrameSource, ToolPaths};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    struct HourLongSource;

    impl FrameSource for HourLongSource {
        fn probe_duration(&self, _media: &Path) -> Result<f64, ProbeError> {
            Ok(3600.0)
        }

        fn extract_frame(&self, _media: &Path, timestamp_sec: f64) -> Result<PathBuf, ExtractError> {
            Ok(PathBuf::from(format!("{timestamp_sec:.3}.png")))
        }

        fn extract_strip(
            &self,
            _media: &Path,
            _fps_sample: f64,
            _output_dir: &Path,
        ) -> Result<Vec<PathBuf>, ExtractError> {
            Ok(Vec::new())
        }
    }

    /// 一小時的影片，選取 [100, 101]（兩個把手落在同一欄）
    fn narrow_selection(temp_dir: &TempDir) -> Workbench {
        let session = Session::with_tools(temp_dir.path(), temp_dir.path(), ToolPaths::default());
        let mut bench = Workbench::new(session, Box::new(HourLongSource), 1020);
        let media = temp_dir.path().join("long.mp4");
        std::fs::write(&media, b"video").unwrap();
        bench.load_media(&media).unwrap();
        bench.commit_time_fields("100", "101");
        bench
    }

    fn seconds(bench: &Workbench) -> (f64, f64) {
        (bench.range().lower_sec(), bench.range().upper_sec())
    }

    #[test]
    fn test_column_mapping_round_trip() {
        let bar = RangeBar::new(61);
        assert_eq!(bar.column_of(0.0), 0);
        assert_eq!(bar.column_of(1.0), 60);
        assert_eq!(bar.column_of(0.5), 30);
        assert!((bar.fraction_of(30) - 0.5).abs() < 1e-12);
        assert_eq!(bar.column_of(bar.fraction_of(17)), 17);
    }

    #[test]
    fn test_render_marks_handles_and_selection() {
        let bar = RangeBar::new(11);
        let range = BoundedRange::for_duration(10.0, DurationWindow::default());

        let (line, marker) = bar.render(&range, Some(6));
        assert_eq!(line, "[|=====|----]");
        assert_eq!(marker, "       ^     ");
    }

    #[test]
    fn test_minimum_columns() {
        let bar = RangeBar::new(0);
        assert_eq!(bar.columns(), 2);
        assert_eq!(bar.column_of(1.0), 1);
    }

    #[test]
    fn test_open_and_confirm_leaves_range_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let mut bench = narrow_selection(&temp_dir);
        let before = seconds(&bench);
        let bar = RangeBar::new(60);

        let mut cursor = bar.begin(&mut bench).unwrap();
        assert_eq!(bench.drag().session().active_handle(), Some(Handle::Lower));
        assert_eq!(seconds(&bench), before);

        assert_eq!(bar.handle_key(&mut bench, &mut cursor, &Key::Enter), KeyOutcome::Finished);
        assert_eq!(seconds(&bench), before);
        assert!(!bench.drag().is_dragging());
    }

    #[test]
    fn test_tab_switches_handle_without_moving() {
        let temp_dir = TempDir::new().unwrap();
        let mut bench = narrow_selection(&temp_dir);
        let before = seconds(&bench);
        let bar = RangeBar::new(60);

        let mut cursor = bar.begin(&mut bench).unwrap();
        bar.handle_key(&mut bench, &mut cursor, &Key::Tab);
        assert_eq!(cursor.handle, Handle::Upper);
        assert_eq!(bench.drag().session().active_handle(), Some(Handle::Upper));
        assert_eq!(seconds(&bench), before);

        bar.handle_key(&mut bench, &mut cursor, &Key::Tab);
        assert_eq!(bench.drag().session().active_handle(), Some(Handle::Lower));
        assert_eq!(seconds(&bench), before);
    }

    #[test]
    fn test_arrow_pans_with_fixed_span() {
        let temp_dir = TempDir::new().unwrap();
        let mut bench = narrow_selection(&temp_dir);
        let bar = RangeBar::new(61);

        let mut cursor = bar.begin(&mut bench).unwrap();
        // 100 / 3600 * 60 ≈ 1.67 → 欄位 2
        assert_eq!(cursor.pointer, 2);
        assert_eq!(bar.handle_key(&mut bench, &mut cursor, &Key::ArrowRight), KeyOutcome::Redraw);

        // 欄位 3 / 60 → 180 秒
        let (lower, upper) = seconds(&bench);
        assert!((lower - 180.0).abs() < 1e-6);
        assert!((upper - lower - 1.0).abs() < 1e-6);
        assert_eq!(bench.drag().session().active_handle(), Some(Handle::Lower));

        assert_eq!(bar.handle_key(&mut bench, &mut cursor, &Key::Home), KeyOutcome::Redraw);
        assert!(bench.range().lower_sec().abs() < 1e-6);
        assert_eq!(bar.handle_key(&mut bench, &mut cursor, &Key::Home), KeyOutcome::Ignored);
    }
}
