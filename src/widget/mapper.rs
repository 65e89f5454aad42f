//! Pure mapping between time positions and seek-track pixel offsets, plus the
//! rect layout for the track, indicator and transport controls.

pub const SEEK_AND_NOTCH_THICKNESS: i32 = 10;
pub const SEEK_NOTCH_HEIGHT: i32 = 10;
/// The drawn indicator is thin; its hit region is padded this much on all
/// four sides so the drag handle stays usable on small displays.
pub const NOTCH_TOUCH_PADDING: i32 = 50;
pub const CONTROL_SIZE: i32 = 48;
pub const DESIRED_WIDTH: i32 = 500;
pub const DESIRED_HEIGHT: i32 = 200;

/// Integer pixel rectangle, used for hit testing and layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    pub fn expanded(&self, margin: i32) -> Self {
        Self {
            left: self.left - margin,
            top: self.top - margin,
            right: self.right + margin,
            bottom: self.bottom + margin,
        }
    }

    pub fn from_egui(rect: egui::Rect) -> Self {
        Self {
            left: rect.left() as i32,
            top: rect.top() as i32,
            right: rect.right() as i32,
            bottom: rect.bottom() as i32,
        }
    }

    pub fn to_egui(&self) -> egui::Rect {
        egui::Rect::from_min_max(
            egui::pos2(self.left as f32, self.top as f32),
            egui::pos2(self.right as f32, self.bottom as f32),
        )
    }
}

/// Drawing positions derived from the widget bounds; recomputed on resize.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WidgetLayout {
    pub bounds: PixelRect,
    pub seekbar: PixelRect,
    pub play: PixelRect,
    pub prev: PixelRect,
}

pub fn compute_layout(bounds: PixelRect, show_prev: bool) -> WidgetLayout {
    let seek_top = bounds.top + bounds.height() / 3;
    let seekbar = PixelRect::new(
        bounds.left,
        seek_top,
        bounds.right,
        seek_top + SEEK_AND_NOTCH_THICKNESS,
    );
    let center_left = bounds.left + bounds.width() / 2 - CONTROL_SIZE / 2;
    let center_top = bounds.top + bounds.height() / 2;
    let play = PixelRect::new(
        center_left,
        center_top,
        center_left + CONTROL_SIZE,
        center_top + CONTROL_SIZE,
    );
    let prev = if show_prev {
        let left = center_left - CONTROL_SIZE * 3 / 2;
        PixelRect::new(left, center_top, left + CONTROL_SIZE, center_top + CONTROL_SIZE)
    } else {
        PixelRect::default()
    };
    WidgetLayout {
        bounds,
        seekbar,
        play,
        prev,
    }
}

/// 0 maps to the left bound, 100 to the right; intermediate values use
/// `width/100*percent` (integer division first, matching the historical
/// pixel placement).
pub fn percent_to_offset(percent: i32, track: &PixelRect) -> i32 {
    if percent <= 0 {
        track.left
    } else if percent < 100 {
        track.left + track.width() / 100 * percent
    } else {
        track.right
    }
}

/// Completion percentage from a playback snapshot; duration 0 means no
/// progress (0%), never a division by zero.
pub fn percent_complete(position_ms: u32, duration_ms: u32) -> i32 {
    if duration_ms == 0 {
        return 0;
    }
    ((position_ms as f64 / duration_ms as f64) * 100.0).round() as i32
}

/// Time position represented by an indicator offset, rounded to the nearest
/// millisecond.
pub fn offset_to_position_ms(offset: i32, track: &PixelRect, duration_ms: u32) -> u32 {
    let width = track.width();
    if width <= 0 || duration_ms == 0 {
        return 0;
    }
    let frac = (offset - track.left) as f64 / width as f64;
    (frac * duration_ms as f64).round().clamp(0.0, duration_ms as f64) as u32
}

pub fn clamp_offset(offset: i32, track: &PixelRect) -> i32 {
    offset.max(track.left).min(track.right)
}

/// Drag updates outside the track are ignored, not clamped: a pointer left
/// of the track must not pin the indicator to a bound.
pub fn accepts_drag_x(x: f32, track: &PixelRect) -> bool {
    x >= track.left as f32 && x <= track.right as f32
}

/// The drawn indicator rect for a given offset (its left edge).
pub fn notch_rect(offset: i32, track: &PixelRect) -> PixelRect {
    PixelRect::new(
        offset,
        track.top - SEEK_NOTCH_HEIGHT,
        offset + SEEK_AND_NOTCH_THICKNESS,
        track.bottom + SEEK_NOTCH_HEIGHT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACK: PixelRect = PixelRect::new(100, 50, 600, 60);

    #[test]
    fn percent_endpoints_hit_track_bounds() {
        assert_eq!(percent_to_offset(0, &TRACK), 100);
        assert_eq!(percent_to_offset(100, &TRACK), 600);
        assert_eq!(percent_to_offset(-5, &TRACK), 100);
        assert_eq!(percent_to_offset(140, &TRACK), 600);
    }

    #[test]
    fn percent_forty_lands_at_expected_offset() {
        // width 500: 500/100*40 = 200 past the left bound
        assert_eq!(percent_to_offset(40, &TRACK), 300);
    }

    #[test]
    fn offset_maps_back_to_milliseconds() {
        assert_eq!(offset_to_position_ms(450, &TRACK, 200_000), 140_000);
        assert_eq!(offset_to_position_ms(100, &TRACK, 200_000), 0);
        assert_eq!(offset_to_position_ms(600, &TRACK, 200_000), 200_000);
    }

    #[test]
    fn zero_duration_is_zero_progress() {
        assert_eq!(percent_complete(5_000, 0), 0);
        assert_eq!(offset_to_position_ms(300, &TRACK, 0), 0);
    }

    #[test]
    fn mapping_round_trips_within_one_percent() {
        for track in [TRACK, PixelRect::new(37, 0, 540, 10)] {
            let duration_ms = 200_000;
            for percent in 0..=100 {
                let offset = percent_to_offset(percent, &track);
                let back = percent_complete(
                    offset_to_position_ms(offset, &track, duration_ms),
                    duration_ms,
                );
                assert!(
                    (back - percent).abs() <= 1,
                    "track {track:?} percent {percent} -> offset {offset} -> {back}"
                );
            }
        }
    }

    #[test]
    fn mapping_is_monotonic() {
        let mut last = i32::MIN;
        for percent in 0..=100 {
            let offset = percent_to_offset(percent, &TRACK);
            assert!(offset >= last);
            last = offset;
        }
    }

    #[test]
    fn clamp_pulls_to_nearest_bound() {
        assert_eq!(clamp_offset(50, &TRACK), 100);
        assert_eq!(clamp_offset(700, &TRACK), 600);
        assert_eq!(clamp_offset(300, &TRACK), 300);
    }

    #[test]
    fn drag_acceptance_is_strict_about_bounds() {
        assert!(!accepts_drag_x(99.9, &TRACK));
        assert!(accepts_drag_x(100.0, &TRACK));
        assert!(accepts_drag_x(600.0, &TRACK));
        assert!(!accepts_drag_x(600.1, &TRACK));
    }

    #[test]
    fn layout_centers_play_and_offsets_prev() {
        let layout = compute_layout(PixelRect::new(0, 0, 500, 200), true);
        assert_eq!(layout.seekbar, PixelRect::new(0, 66, 500, 76));
        assert_eq!(layout.play.left, 226);
        assert_eq!(layout.play.top, 100);
        assert_eq!(layout.prev.left, layout.play.left - CONTROL_SIZE * 3 / 2);
        assert_eq!(layout.prev.width(), CONTROL_SIZE);
    }

    #[test]
    fn notch_hit_region_is_uniformly_padded() {
        let notch = notch_rect(300, &TRACK);
        assert_eq!(notch, PixelRect::new(300, 40, 310, 70));
        let hit = notch.expanded(NOTCH_TOUCH_PADDING);
        assert_eq!(hit, PixelRect::new(250, -10, 360, 120));
        assert!(hit.contains(255, 0));
        assert!(!hit.contains(245, 0));
    }
}
