use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arc_swap::ArcSwapOption;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::decode;
use crate::media::MediaEngine;
use crate::signal::Signal;

/// Decoded track samples: per-channel PCM in [-1, 1] at the output rate.
#[derive(Debug)]
pub struct AudioBuffer {
    pub channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    pub fn len(&self) -> usize {
        self.channels.get(0).map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len().max(1)
    }
}

pub struct SharedPlayback {
    pub samples: ArcSwapOption<AudioBuffer>,
    pub prepared: std::sync::atomic::AtomicBool,
    pub playing: std::sync::atomic::AtomicBool,
    pub play_pos: std::sync::atomic::AtomicUsize,
    pub out_sample_rate: u32,
    pub prepared_signal: Signal,
    pub completion_signal: Signal,
}

/// Playback engine on the default cpal output device.
///
/// Position, duration and the playing flag live in atomics shared with the
/// output callback; the callback never allocates or locks.
pub struct CpalMediaEngine {
    _stream: Option<cpal::Stream>,
    pub shared: Arc<SharedPlayback>,
}

impl CpalMediaEngine {
    fn new_shared(out_sample_rate: u32) -> Arc<SharedPlayback> {
        Arc::new(SharedPlayback {
            samples: ArcSwapOption::from(None),
            prepared: std::sync::atomic::AtomicBool::new(false),
            playing: std::sync::atomic::AtomicBool::new(false),
            play_pos: std::sync::atomic::AtomicUsize::new(0),
            out_sample_rate,
            prepared_signal: Signal::new(),
            completion_signal: Signal::new(),
        })
    }

    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("No default output device")?;
        let cfg = device
            .default_output_config()
            .context("No default output config")?;

        let shared = Self::new_shared(cfg.sample_rate());

        let stream = match cfg.sample_format() {
            cpal::SampleFormat::F32 => {
                Self::build_stream::<f32>(&device, &cfg.into(), shared.clone())?
            }
            cpal::SampleFormat::I16 => {
                Self::build_stream::<i16>(&device, &cfg.into(), shared.clone())?
            }
            cpal::SampleFormat::U16 => {
                Self::build_stream::<u16>(&device, &cfg.into(), shared.clone())?
            }
            _ => anyhow::bail!("Unsupported sample format"),
        };

        Ok(Self {
            _stream: Some(stream),
            shared,
        })
    }

    /// Engine without a device stream; transport and loading logic only.
    pub fn new_for_test() -> Self {
        Self {
            _stream: None,
            shared: Self::new_shared(48_000),
        }
    }

    fn build_stream<T>(
        device: &cpal::Device,
        cfg: &cpal::StreamConfig,
        shared: Arc<SharedPlayback>,
    ) -> Result<cpal::Stream>
    where
        T: cpal::SizedSample + cpal::FromSample<f32>,
    {
        let channels = cfg.channels as usize;
        let err_fn = |e| eprintln!("cpal stream error: {e}");
        let stream = device.build_output_stream(
            cfg,
            move |data: &mut [T], _| {
                // audio callback
                let silence = |data: &mut [T]| {
                    for s in data.iter_mut() {
                        *s = T::from_sample(0.0);
                    }
                };
                let maybe_samples = shared.samples.load();
                if !shared.playing.load(std::sync::atomic::Ordering::Relaxed) {
                    silence(data);
                    return;
                }
                let Some(samples_arc) = maybe_samples.as_ref() else {
                    silence(data);
                    return;
                };
                let samples = samples_arc.as_ref();
                let len = samples.len();
                if len == 0 {
                    silence(data);
                    return;
                }
                let src_channels = samples.channel_count();
                let mut pos = shared.play_pos.load(std::sync::atomic::Ordering::Relaxed);
                let mut finished = false;
                for frame in data.chunks_mut(channels) {
                    if pos >= len {
                        if !finished {
                            finished = true;
                            shared
                                .playing
                                .store(false, std::sync::atomic::Ordering::Relaxed);
                        }
                        for ch in frame.iter_mut() {
                            *ch = T::from_sample(0.0);
                        }
                        continue;
                    }
                    for (out_ch, out_sample) in frame.iter_mut().enumerate() {
                        let src_ch = if src_channels == 1 {
                            0
                        } else if out_ch < src_channels {
                            out_ch
                        } else {
                            src_channels - 1
                        };
                        let s = samples.channels[src_ch][pos].clamp(-1.0, 1.0);
                        *out_sample = T::from_sample(s);
                    }
                    pos += 1;
                }
                shared
                    .play_pos
                    .store(pos.min(len), std::sync::atomic::Ordering::Relaxed);
                if finished {
                    shared.completion_signal.emit();
                }
            },
            err_fn,
            None,
        )?;
        stream.play()?;
        Ok(stream)
    }

    /// Install already-decoded samples directly (bypasses the loader thread).
    pub fn set_samples_channels(&self, channels: Vec<Vec<f32>>, sample_rate: u32) {
        Self::install(
            &self.shared,
            decode::DecodedAudio {
                channels,
                sample_rate,
            },
        );
    }

    pub fn load_file(&self, path: &Path) {
        let label = path.display().to_string();
        let path = path.to_path_buf();
        self.spawn_loader(label, move || {
            let ext = path
                .extension()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string());
            let bytes = std::fs::read(&path)
                .with_context(|| format!("read audio: {}", path.display()))?;
            Ok((bytes, ext))
        });
    }

    fn install(shared: &Arc<SharedPlayback>, decoded: decode::DecodedAudio) {
        let out_sr = shared.out_sample_rate;
        let channels: Vec<Vec<f32>> = decoded
            .channels
            .iter()
            .map(|ch| decode::resample_linear(ch, decoded.sample_rate, out_sr))
            .collect();
        shared
            .playing
            .store(false, std::sync::atomic::Ordering::Relaxed);
        shared
            .play_pos
            .store(0, std::sync::atomic::Ordering::Relaxed);
        shared.samples.store(Some(Arc::new(AudioBuffer { channels })));
        shared
            .prepared
            .store(true, std::sync::atomic::Ordering::Relaxed);
        shared.prepared_signal.emit();
    }

    /// Fetch + decode off the UI thread; on failure the engine simply stays
    /// unprepared.
    fn spawn_loader(
        &self,
        label: String,
        fetch: impl FnOnce() -> Result<(Vec<u8>, Option<String>)> + Send + 'static,
    ) {
        let shared = self.shared.clone();
        std::thread::spawn(move || {
            let result =
                fetch().and_then(|(bytes, ext)| decode::decode_bytes(bytes, ext.as_deref()));
            match result {
                Ok(decoded) => Self::install(&shared, decoded),
                Err(err) => eprintln!("soundaffect: failed to load {label}: {err:#}"),
            }
        });
    }
}

fn url_extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;
    let name = path.rsplit('/').next()?;
    name.rsplit_once('.').map(|(_, ext)| ext.to_string())
}

impl MediaEngine for CpalMediaEngine {
    fn is_prepared(&self) -> bool {
        self.shared
            .prepared
            .load(std::sync::atomic::Ordering::Relaxed)
    }

    fn is_playing(&self) -> bool {
        self.shared
            .playing
            .load(std::sync::atomic::Ordering::Relaxed)
    }

    fn duration_ms(&self) -> u32 {
        match self.shared.samples.load().as_ref() {
            Some(buf) => {
                (buf.len() as u64 * 1000 / self.shared.out_sample_rate.max(1) as u64) as u32
            }
            None => 0,
        }
    }

    fn position_ms(&self) -> u32 {
        let pos = self
            .shared
            .play_pos
            .load(std::sync::atomic::Ordering::Relaxed);
        (pos as u64 * 1000 / self.shared.out_sample_rate.max(1) as u64) as u32
    }

    fn play(&self) {
        let Some(buf) = self.shared.samples.load_full() else {
            return;
        };
        // on play, if at end, rewind
        let pos = self
            .shared
            .play_pos
            .load(std::sync::atomic::Ordering::Relaxed);
        if pos >= buf.len() {
            self.shared
                .play_pos
                .store(0, std::sync::atomic::Ordering::Relaxed);
        }
        self.shared
            .playing
            .store(true, std::sync::atomic::Ordering::Relaxed);
    }

    fn pause(&self) {
        self.shared
            .playing
            .store(false, std::sync::atomic::Ordering::Relaxed);
    }

    fn seek_to_ms(&self, ms: u32) {
        let Some(buf) = self.shared.samples.load_full() else {
            return;
        };
        let pos = (ms as u64 * self.shared.out_sample_rate as u64 / 1000) as usize;
        self.shared
            .play_pos
            .store(pos.min(buf.len()), std::sync::atomic::Ordering::Relaxed);
    }

    fn load_url(&self, url: &str) {
        let url = url.to_string();
        self.spawn_loader(url.clone(), move || {
            let resp = reqwest::blocking::get(&url)
                .and_then(|r| r.error_for_status())
                .with_context(|| format!("fetch audio url: {url}"))?;
            let bytes = resp
                .bytes()
                .with_context(|| format!("read audio body: {url}"))?
                .to_vec();
            Ok((bytes, url_extension(&url)))
        });
    }

    fn load_resource(&self, bytes: &[u8]) {
        let owned = bytes.to_vec();
        self.spawn_loader("embedded resource".to_string(), move || Ok((owned, None)));
    }

    fn prepared(&self) -> &Signal {
        &self.shared.prepared_signal
    }

    fn completion(&self) -> &Signal {
        &self.shared.completion_signal
    }
}
