//! 單一計時器的去抖動器
//!
//! 每次 `schedule` 都會重設計時器並覆蓋待處理的值，
//! 只有一連串事件中的最後一個會在安靜期過後被 `tick` 交出。

use log::trace;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, value: T) {
        self.schedule_at(value, Instant::now());
    }

    /// 以指定時間點為基準重設計時器（測試用）
    pub fn schedule_at(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
        trace!("debouncer 重新計時 {}ms", self.delay.as_millis());
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// 距離觸發還剩多久；沒有待處理事件時為 `None`
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, trigger_at)| trigger_at.saturating_duration_since(now))
    }

    pub fn tick(&mut self) -> Option<T> {
        self.tick_at(Instant::now())
    }

    /// 安靜期已過則取出待處理的值
    pub fn tick_at(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, trigger_at)) if now >= *trigger_at => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }
}
