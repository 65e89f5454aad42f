pub mod audio;
pub mod decode;
pub mod media;
pub mod signal;
pub mod widget;

pub use audio::CpalMediaEngine;
pub use media::{MediaEngine, PlaybackSnapshot};
pub use widget::{IndicatorShape, PlayerStyle, PlayerWidget};
