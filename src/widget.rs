//! Embeddable playback widget: a seek bar with play/pause/previous controls
//! kept in sync with a [`MediaEngine`](crate::media::MediaEngine).

pub mod mapper;
pub mod paint;
pub mod poller;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use egui::Color32;

use crate::media::MediaEngine;
use mapper::{PixelRect, WidgetLayout};
use poller::{IndicatorShared, PositionPoller, RepaintHandle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndicatorShape {
    Notch,
    Dot,
}

/// Visual options, the widget's attribute surface.
#[derive(Clone, Debug)]
pub struct PlayerStyle {
    pub show_prev_button: bool,
    pub show_current_time: bool,
    pub show_duration: bool,
    pub indicator_shape: IndicatorShape,
    pub seek_bar_color: Color32,
    pub indicator_color: Color32,
    pub control_color: Color32,
    pub text_color: Color32,
}

impl Default for PlayerStyle {
    fn default() -> Self {
        Self {
            show_prev_button: true,
            show_current_time: true,
            show_duration: true,
            indicator_shape: IndicatorShape::Notch,
            seek_bar_color: Color32::from_rgb(190, 190, 196),
            indicator_color: Color32::from_rgb(230, 60, 60),
            control_color: Color32::from_rgb(220, 220, 225),
            text_color: Color32::GRAY,
        }
    }
}

/// One in-flight drag of the indicator. At most one exists at a time.
#[derive(Clone, Copy, Debug)]
struct SeekSession {
    was_playing_before_seek: bool,
    #[allow(dead_code)]
    started_at_offset: i32,
}

/// The playback/widget facade.
///
/// Owns the layout rects, the seek gesture state machine and the position
/// poller. All mutation goes through the control surface below; the poller
/// only ever writes the shared indicator offset, and is suspended for the
/// whole duration of a seek session.
pub struct PlayerWidget {
    pub(crate) engine: Arc<dyn MediaEngine>,
    pub(crate) shared: Arc<IndicatorShared>,
    pub(crate) poller: PositionPoller,
    pub(crate) layout: WidgetLayout,
    pub(crate) style: PlayerStyle,
    pub(crate) repaint: RepaintHandle,
    seek: Option<SeekSession>,
    prepared_pending: Arc<AtomicBool>,
    completion_pending: Arc<AtomicBool>,
}

impl PlayerWidget {
    pub fn new(engine: Arc<dyn MediaEngine>, repaint: RepaintHandle) -> Self {
        Self::with_style(engine, repaint, PlayerStyle::default())
    }

    pub fn with_style(
        engine: Arc<dyn MediaEngine>,
        repaint: RepaintHandle,
        style: PlayerStyle,
    ) -> Self {
        let shared = Arc::new(IndicatorShared::new());
        let poller = PositionPoller::new(engine.clone(), shared.clone(), repaint.clone());

        let prepared_pending = Arc::new(AtomicBool::new(false));
        {
            let flag = prepared_pending.clone();
            let repaint = repaint.clone();
            engine.prepared().subscribe(move || {
                flag.store(true, Ordering::Relaxed);
                (repaint)();
            });
        }
        let completion_pending = Arc::new(AtomicBool::new(false));
        {
            let flag = completion_pending.clone();
            let repaint = repaint.clone();
            engine.completion().subscribe(move || {
                flag.store(true, Ordering::Relaxed);
                (repaint)();
            });
        }

        Self {
            engine,
            shared,
            poller,
            layout: WidgetLayout::default(),
            style,
            repaint,
            seek: None,
            prepared_pending,
            completion_pending,
        }
    }

    pub fn style_mut(&mut self) -> &mut PlayerStyle {
        &mut self.style
    }

    /// Current drawing positions, derived from the last seen bounds.
    pub fn layout(&self) -> &WidgetLayout {
        &self.layout
    }

    /// Indicator state, shared with the poller thread.
    pub fn indicator(&self) -> Arc<IndicatorShared> {
        self.shared.clone()
    }

    pub fn indicator_offset(&self) -> i32 {
        self.shared.offset.load(Ordering::Relaxed)
    }

    pub fn is_seeking(&self) -> bool {
        self.seek.is_some()
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    // --- control surface ---

    pub fn play(&mut self) {
        if !self.engine.is_prepared() {
            return;
        }
        self.engine.play();
        self.poller.start();
    }

    pub fn pause(&mut self) {
        if !self.engine.is_playing() {
            return;
        }
        self.engine.pause();
        self.poller.stop();
    }

    pub fn toggle_play_pause(&mut self) {
        if self.engine.is_playing() {
            self.pause();
        } else {
            self.play();
        }
        (self.repaint)();
    }

    pub fn reset(&mut self) {
        if self.engine.is_playing() {
            self.pause();
            self.engine.seek_to_ms(0);
            self.sync_indicator_from_engine();
            self.play();
        } else {
            self.engine.seek_to_ms(0);
            self.sync_indicator_from_engine();
            (self.repaint)();
        }
    }

    pub fn load_url(&self, url: &str) {
        self.engine.load_url(url);
    }

    pub fn load_resource(&self, bytes: &[u8]) {
        self.engine.load_resource(bytes);
    }

    // --- host surface ---

    /// Recompute drawing positions for a new widget rect. The indicator is
    /// clamped into the fresh track bounds.
    pub fn on_bounds_changed(&mut self, bounds: PixelRect) {
        self.layout = mapper::compute_layout(bounds, self.style.show_prev_button);
        self.shared.track.store(Arc::new(self.layout.seekbar));
        let offset = self.shared.offset.load(Ordering::Relaxed);
        self.shared.offset.store(
            mapper::clamp_offset(offset, &self.layout.seekbar),
            Ordering::Relaxed,
        );
    }

    pub fn on_pointer_down(&mut self, x: f32, y: f32) {
        if self.seek.is_some() {
            return;
        }
        let xi = x as i32;
        let yi = y as i32;
        if self.layout.play.contains(xi, yi) {
            self.toggle_play_pause();
            return;
        }
        if self.style.show_prev_button && self.layout.prev.contains(xi, yi) {
            self.reset();
            return;
        }
        let track = **self.shared.track.load();
        let offset = self.shared.offset.load(Ordering::Relaxed);
        let hit = mapper::notch_rect(offset, &track).expanded(mapper::NOTCH_TOUCH_PADDING);
        if hit.contains(xi, yi) {
            let was_playing = self.engine.is_playing();
            self.seek = Some(SeekSession {
                was_playing_before_seek: was_playing,
                started_at_offset: offset,
            });
            self.shared.seeking.store(true, Ordering::Relaxed);
            if was_playing {
                // no background tick may move the indicator while a human
                // is dragging it
                self.pause();
            }
        }
    }

    pub fn on_pointer_move(&mut self, x: f32, _y: f32) {
        if self.seek.is_none() {
            return;
        }
        let track = **self.shared.track.load();
        if !mapper::accepts_drag_x(x, &track) {
            return;
        }
        self.shared.offset.store(x.round() as i32, Ordering::Relaxed);
        (self.repaint)();
    }

    pub fn on_pointer_up(&mut self, _x: f32, _y: f32) {
        self.finish_seek();
    }

    /// A lost or cancelled pointer resolves the session exactly like a
    /// release; a session must never outlive its gesture.
    pub fn on_pointer_cancel(&mut self) {
        self.finish_seek();
    }

    /// Apply engine events published from background threads. Called once
    /// per frame by [`show`](Self::show) before anything else. While a seek
    /// session owns the indicator the events stay pending; they are applied
    /// on the first frame after the session resolves.
    pub fn process_engine_events(&mut self) {
        if self.seek.is_some() {
            return;
        }
        if self.prepared_pending.swap(false, Ordering::Relaxed) {
            self.sync_indicator_from_engine();
            (self.repaint)();
        }
        if self.completion_pending.swap(false, Ordering::Relaxed) {
            self.poller.stop();
            self.sync_indicator_from_engine();
            (self.repaint)();
        }
    }

    fn finish_seek(&mut self) {
        let Some(session) = self.seek.take() else {
            return;
        };
        self.shared.seeking.store(false, Ordering::Relaxed);
        if self.engine.is_prepared() {
            let track = **self.shared.track.load();
            let offset = self.shared.offset.load(Ordering::Relaxed);
            let target = mapper::offset_to_position_ms(offset, &track, self.engine.duration_ms());
            self.engine.seek_to_ms(target);
        }
        if session.was_playing_before_seek {
            self.play();
        }
        (self.repaint)();
    }

    fn sync_indicator_from_engine(&self) {
        let snap = self.engine.snapshot();
        let track = **self.shared.track.load();
        let percent = mapper::percent_complete(snap.position_ms, snap.duration_ms);
        self.shared
            .offset
            .store(mapper::percent_to_offset(percent, &track), Ordering::Relaxed);
    }
}
