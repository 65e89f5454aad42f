//! egui embedding: canvas allocation, pointer-event feeding and drawing.

use std::sync::atomic::Ordering;

use egui::{pos2, vec2, Align2, PointerButton, Response, Sense, Shape, Stroke, TextStyle, Ui};

use super::mapper::{self, PixelRect};
use super::{IndicatorShape, PlayerWidget};

const TIMESTAMP_MARGIN_BOTTOM: f32 = 8.0;
const NOTCH_DOT_RADIUS: f32 = 15.0;
const PAUSE_BAR_WIDTH: f32 = 6.0;

pub fn format_timestamp(ms: u32) -> String {
    let total_s = ms / 1000;
    format!("{:02}:{:02}", total_s / 60, total_s % 60)
}

impl PlayerWidget {
    /// Embed the widget: allocates its canvas, translates the response into
    /// pointer/bounds events, and paints the current state.
    pub fn show(&mut self, ui: &mut Ui) -> Response {
        self.process_engine_events();
        let avail = ui.available_size();
        let size = vec2(
            avail.x.min(mapper::DESIRED_WIDTH as f32).max(120.0),
            mapper::DESIRED_HEIGHT as f32,
        );
        let (resp, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let bounds = PixelRect::from_egui(resp.rect);
        if bounds != self.layout.bounds {
            self.on_bounds_changed(bounds);
        }
        if let Some(pos) = resp.interact_pointer_pos() {
            if resp.clicked_by(PointerButton::Primary) {
                // press and release inside the drag threshold never reports
                // as a drag, only as a click
                self.on_pointer_down(pos.x, pos.y);
                self.on_pointer_up(pos.x, pos.y);
            }
            if resp.drag_started_by(PointerButton::Primary) {
                self.on_pointer_down(pos.x, pos.y);
            }
            if resp.dragged_by(PointerButton::Primary) {
                self.on_pointer_move(pos.x, pos.y);
            }
            if resp.drag_stopped_by(PointerButton::Primary) {
                self.on_pointer_up(pos.x, pos.y);
            }
        } else if self.is_seeking() && !resp.is_pointer_button_down_on() {
            // pointer lost mid-drag
            self.on_pointer_cancel();
        }
        self.draw(ui, &painter);
        resp
    }

    fn draw(&self, ui: &Ui, painter: &egui::Painter) {
        let snap = self.engine.snapshot();
        let seekbar = self.layout.seekbar;
        let offset = self.shared.offset.load(Ordering::Relaxed);

        // timestamps above the bar
        let fid = TextStyle::Monospace.resolve(ui.style());
        if self.style.show_current_time {
            painter.text(
                pos2(
                    seekbar.left as f32,
                    seekbar.top as f32 - TIMESTAMP_MARGIN_BOTTOM,
                ),
                Align2::LEFT_BOTTOM,
                format_timestamp(self.display_position_ms(&snap, offset)),
                fid.clone(),
                self.style.text_color,
            );
        }
        if self.style.show_duration && snap.is_prepared {
            painter.text(
                pos2(
                    seekbar.right as f32,
                    seekbar.top as f32 - TIMESTAMP_MARGIN_BOTTOM,
                ),
                Align2::RIGHT_BOTTOM,
                format_timestamp(snap.duration_ms),
                fid,
                self.style.text_color,
            );
        }

        painter.rect_filled(seekbar.to_egui(), 0.0, self.style.seek_bar_color);

        let notch = mapper::notch_rect(offset, &seekbar);
        match self.style.indicator_shape {
            IndicatorShape::Notch => {
                painter.rect_filled(notch.to_egui(), 0.0, self.style.indicator_color);
            }
            IndicatorShape::Dot => {
                painter.circle_filled(
                    notch.to_egui().center(),
                    NOTCH_DOT_RADIUS,
                    self.style.indicator_color,
                );
            }
        }

        self.draw_controls(painter, snap.is_playing);
    }

    fn draw_controls(&self, painter: &egui::Painter, is_playing: bool) {
        let play = self.layout.play.to_egui();
        if is_playing {
            let bar_h = play.height();
            for side in [play.left(), play.right() - PAUSE_BAR_WIDTH] {
                painter.rect_filled(
                    egui::Rect::from_min_size(pos2(side, play.top()), vec2(PAUSE_BAR_WIDTH, bar_h)),
                    0.0,
                    self.style.control_color,
                );
            }
        } else {
            painter.add(Shape::convex_polygon(
                vec![
                    pos2(play.left(), play.top()),
                    pos2(play.right(), play.center().y),
                    pos2(play.left(), play.bottom()),
                ],
                self.style.control_color,
                Stroke::NONE,
            ));
        }

        if self.style.show_prev_button {
            let prev = self.layout.prev.to_egui();
            painter.rect_filled(
                egui::Rect::from_min_size(
                    pos2(prev.left(), prev.top()),
                    vec2(PAUSE_BAR_WIDTH, prev.height()),
                ),
                0.0,
                self.style.control_color,
            );
            painter.add(Shape::convex_polygon(
                vec![
                    pos2(prev.right(), prev.top()),
                    pos2(prev.left() + PAUSE_BAR_WIDTH + 2.0, prev.center().y),
                    pos2(prev.right(), prev.bottom()),
                ],
                self.style.control_color,
                Stroke::NONE,
            ));
        }
    }

    /// While dragging, the timestamp previews the would-be target position
    /// rather than the engine's live position.
    fn display_position_ms(&self, snap: &crate::media::PlaybackSnapshot, offset: i32) -> u32 {
        if self.is_seeking() && snap.is_prepared {
            let track = **self.shared.track.load();
            mapper::offset_to_position_ms(offset, &track, snap.duration_ms)
        } else {
            snap.position_ms
        }
    }
}
