#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use soundaffect::media::MediaEngine;
use soundaffect::signal::Signal;
use soundaffect::widget::mapper::PixelRect;
use soundaffect::widget::poller::RepaintHandle;
use soundaffect::PlayerWidget;

/// Widget bounds that lay the seek track out across pixels [100, 600].
pub const TEST_BOUNDS: PixelRect = PixelRect::new(100, 0, 600, 150);

/// Seek track produced by `TEST_BOUNDS` (top = height/3 = 50).
pub const TEST_TRACK: PixelRect = PixelRect::new(100, 50, 600, 60);

#[derive(Default)]
pub struct FakeState {
    pub prepared: bool,
    pub playing: bool,
    pub position_ms: u32,
    pub duration_ms: u32,
}

/// Scripted engine that records every control call it receives.
pub struct FakeEngine {
    pub state: Mutex<FakeState>,
    calls: Mutex<Vec<String>>,
    prepared: Signal,
    completion: Signal,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FakeState::default()),
            calls: Mutex::new(Vec::new()),
            prepared: Signal::new(),
            completion: Signal::new(),
        })
    }

    pub fn prepared_with_duration(duration_ms: u32) -> Arc<Self> {
        let engine = Self::new();
        {
            let mut st = engine.state.lock().unwrap();
            st.prepared = true;
            st.duration_ms = duration_ms;
        }
        engine
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn seek_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("seek_to"))
            .collect()
    }

    pub fn set_position_ms(&self, ms: u32) {
        self.state.lock().unwrap().position_ms = ms;
    }

    pub fn fire_prepared(&self) {
        self.prepared.emit();
    }

    pub fn fire_completion(&self) {
        self.completion.emit();
    }
}

impl MediaEngine for FakeEngine {
    fn is_prepared(&self) -> bool {
        self.state.lock().unwrap().prepared
    }

    fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    fn duration_ms(&self) -> u32 {
        self.state.lock().unwrap().duration_ms
    }

    fn position_ms(&self) -> u32 {
        self.state.lock().unwrap().position_ms
    }

    fn play(&self) {
        self.state.lock().unwrap().playing = true;
        self.calls.lock().unwrap().push("play".to_string());
    }

    fn pause(&self) {
        self.state.lock().unwrap().playing = false;
        self.calls.lock().unwrap().push("pause".to_string());
    }

    fn seek_to_ms(&self, ms: u32) {
        self.state.lock().unwrap().position_ms = ms;
        self.calls.lock().unwrap().push(format!("seek_to({ms})"));
    }

    fn load_url(&self, url: &str) {
        self.calls.lock().unwrap().push(format!("load_url({url})"));
    }

    fn load_resource(&self, bytes: &[u8]) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("load_resource({} bytes)", bytes.len()));
    }

    fn prepared(&self) -> &Signal {
        &self.prepared
    }

    fn completion(&self) -> &Signal {
        &self.completion
    }
}

pub fn counting_repaint() -> (RepaintHandle, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    let handle: RepaintHandle = Arc::new(move || {
        c.fetch_add(1, Ordering::Relaxed);
    });
    (handle, count)
}

/// Widget wired to the fake engine, laid out over `TEST_BOUNDS`.
pub fn widget_with_bounds(engine: Arc<FakeEngine>) -> (PlayerWidget, Arc<AtomicUsize>) {
    let (repaint, count) = counting_repaint();
    let mut widget = PlayerWidget::new(engine, repaint);
    widget.on_bounds_changed(TEST_BOUNDS);
    (widget, count)
}

/// Pointer-down position inside the indicator's padded hit region when the
/// indicator sits at `offset`.
pub fn notch_press_at(offset: i32) -> (f32, f32) {
    (offset as f32 + 5.0, 55.0)
}
