// src/engine.rs
// 调度：每个 tick 读一行、解析一次、刷新一次
use std::ops::ControlFlow;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::drivers::{write_snapshot, ChartBoard, LineSource, TelemetryPipeline};

/// Periodic driver for the ingest-and-process cycle.
pub trait Scheduler {
    /// Calls `tick` every `interval` until it returns `ControlFlow::Break`
    /// or the scheduler decides to stop.
    fn every(&mut self, interval: Duration, tick: &mut dyn FnMut() -> ControlFlow<()>);
}

/// Blocking scheduler for headless runs: sleeps out the rest of each interval.
pub struct SleepScheduler {
    max_ticks: Option<u64>,
    ticks: u64,
}

impl SleepScheduler {
    pub fn new(max_ticks: Option<u64>) -> Self {
        Self { max_ticks, ticks: 0 }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Scheduler for SleepScheduler {
    fn every(&mut self, interval: Duration, tick: &mut dyn FnMut() -> ControlFlow<()>) {
        loop {
            if self.max_ticks.is_some_and(|max| self.ticks >= max) {
                break;
            }
            let started = Instant::now();
            self.ticks += 1;
            if tick().is_break() {
                break;
            }
            thread::sleep(interval.saturating_sub(started.elapsed()));
        }
    }
}

/// Tick gate for the egui frame loop, which repaints at its own pace.
pub struct FrameTicker {
    interval: Duration,
    last: Option<Instant>,
}

impl FrameTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// `true` at most once per interval.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Drives the pipeline without a window until the tick limit or end of input,
/// then flushes, closes the source and writes the optional snapshot.
pub fn run_headless<S: LineSource>(
    mut pipeline: TelemetryPipeline<S>,
    config: &AppConfig,
) -> ChartBoard {
    let mut board = ChartBoard::new();
    let mut scheduler = SleepScheduler::new(config.max_ticks);
    scheduler.every(config.poll_interval, &mut || {
        if pipeline.pump_once(&mut board) {
            let machine = pipeline.machine();
            log::debug!(
                "{} samples, marker {:?}",
                machine.len(),
                machine.marker_ms()
            );
        }
        if pipeline.is_exhausted() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    log::info!("headless run stopped after {} ticks", scheduler.ticks());
    pipeline.shutdown(&mut board);
    if let Some(path) = &config.snapshot {
        save_snapshot(&board, path);
    }
    board
}

/// Writes the PNG snapshot; failures are logged, never fatal.
pub fn save_snapshot(board: &ChartBoard, path: &std::path::Path) {
    match write_snapshot(board, path) {
        Ok(()) => log::info!("snapshot written to {}", path.display()),
        Err(err) => log::warn!("snapshot {} not written: {err}", path.display()),
    }
}
