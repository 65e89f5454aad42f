use crate::signal::Signal;

/// One read of the engine's playback state. Never cached beyond a poll tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub is_prepared: bool,
    pub is_playing: bool,
    pub position_ms: u32,
    pub duration_ms: u32,
}

/// The playback engine the widget drives.
///
/// Queries must be cheap and non-blocking: they are issued from the UI thread
/// during pointer handling and from the poller tick. An unprepared engine
/// answers with sentinels (duration 0, position 0) rather than failing, and
/// control calls on it are no-ops.
pub trait MediaEngine: Send + Sync {
    fn is_prepared(&self) -> bool;
    fn is_playing(&self) -> bool;
    /// Track length in milliseconds, 0 if unknown.
    fn duration_ms(&self) -> u32;
    fn position_ms(&self) -> u32;
    fn play(&self);
    fn pause(&self);
    fn seek_to_ms(&self, ms: u32);
    fn load_url(&self, url: &str);
    /// Load embedded audio bytes (e.g. `include_bytes!`).
    fn load_resource(&self, bytes: &[u8]);
    /// Fired once decoded audio is installed and ready to play.
    fn prepared(&self) -> &Signal;
    /// Fired when playback runs off the end of the track.
    fn completion(&self) -> &Signal;

    fn snapshot(&self) -> PlaybackSnapshot {
        if !self.is_prepared() {
            return PlaybackSnapshot::default();
        }
        PlaybackSnapshot {
            is_prepared: true,
            is_playing: self.is_playing(),
            position_ms: self.position_ms(),
            duration_ms: self.duration_ms(),
        }
    }
}
