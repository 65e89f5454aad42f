//! Background sampler that keeps the indicator in sync with playback.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use arc_swap::ArcSwap;

use super::mapper::{self, PixelRect};
use crate::media::MediaEngine;

pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Asks the rendering layer for a redraw. In the egui embedding this is
/// `Context::request_repaint`; tests use a counting closure.
pub type RepaintHandle = Arc<dyn Fn() + Send + Sync>;

/// Indicator state shared between the UI thread and the poller thread.
///
/// `offset` is the indicator's left edge in pixels, always within the track
/// bounds. While `seeking` is set the gesture state machine owns the offset
/// and a tick must not touch it.
pub struct IndicatorShared {
    pub offset: AtomicI32,
    pub seeking: AtomicBool,
    pub track: ArcSwap<PixelRect>,
}

impl IndicatorShared {
    pub fn new() -> Self {
        Self {
            offset: AtomicI32::new(0),
            seeking: AtomicBool::new(false),
            track: ArcSwap::from_pointee(PixelRect::default()),
        }
    }
}

impl Default for IndicatorShared {
    fn default() -> Self {
        Self::new()
    }
}

/// One poll tick: read the engine, map position to an offset, request a
/// redraw. A no-op while a seek session owns the indicator or while the
/// engine is unprepared.
pub fn poll_once(engine: &dyn MediaEngine, shared: &IndicatorShared, repaint: &RepaintHandle) {
    if shared.seeking.load(Ordering::Relaxed) {
        return;
    }
    let snap = engine.snapshot();
    if !snap.is_prepared {
        return;
    }
    let track = **shared.track.load();
    let percent = mapper::percent_complete(snap.position_ms, snap.duration_ms);
    shared
        .offset
        .store(mapper::percent_to_offset(percent, &track), Ordering::Relaxed);
    (repaint)();
}

struct Worker {
    running: Arc<AtomicBool>,
    wake_tx: mpsc::Sender<()>,
    handle: thread::JoinHandle<()>,
}

/// Repeating tick on its own thread with an explicit running/stopped flag.
///
/// The tick runs, then waits out the interval, so a slow tick stretches the
/// cadence instead of queueing. The first tick fires immediately on `start`.
/// Dropping the poller stops it.
pub struct PositionPoller {
    engine: Arc<dyn MediaEngine>,
    shared: Arc<IndicatorShared>,
    repaint: RepaintHandle,
    interval: Duration,
    worker: Option<Worker>,
}

impl PositionPoller {
    pub fn new(
        engine: Arc<dyn MediaEngine>,
        shared: Arc<IndicatorShared>,
        repaint: RepaintHandle,
    ) -> Self {
        Self::with_interval(engine, shared, repaint, POLL_INTERVAL)
    }

    pub fn with_interval(
        engine: Arc<dyn MediaEngine>,
        shared: Arc<IndicatorShared>,
        repaint: RepaintHandle,
        interval: Duration,
    ) -> Self {
        Self {
            engine,
            shared,
            repaint,
            interval,
            worker: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Idempotent; a second `start` on a running poller is a no-op.
    pub fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }
        let running = Arc::new(AtomicBool::new(true));
        let (wake_tx, wake_rx) = mpsc::channel::<()>();
        let engine = self.engine.clone();
        let shared = self.shared.clone();
        let repaint = self.repaint.clone();
        let flag = running.clone();
        let interval = self.interval;
        let handle = thread::spawn(move || loop {
            if !flag.load(Ordering::Relaxed) {
                break;
            }
            poll_once(engine.as_ref(), &shared, &repaint);
            match wake_rx.recv_timeout(interval) {
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                // woken for stop, or the poller itself is gone
                _ => break,
            }
        });
        self.worker = Some(Worker {
            running,
            wake_tx,
            handle,
        });
    }

    /// Idempotent. Joins the tick thread, so once `stop` returns no tick can
    /// mutate the indicator.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        worker.running.store(false, Ordering::Relaxed);
        let _ = worker.wake_tx.send(());
        let _ = worker.handle.join();
    }
}

impl Drop for PositionPoller {
    fn drop(&mut self) {
        self.stop();
    }
}
