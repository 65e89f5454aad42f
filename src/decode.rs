use std::io::Cursor;

use anyhow::{Context, Result};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

/// Decoded PCM: per-channel samples in [-1, 1] at the source rate.
pub struct DecodedAudio {
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

pub fn decode_bytes(bytes: Vec<u8>, ext_hint: Option<&str>) -> Result<DecodedAudio> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = ext_hint {
        hint.with_extension(ext);
    }
    let probed = get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("probe media format")?;
    let mut format = probed.format;
    let track = format.default_track().context("no default track")?.clone();
    let mut decoder = get_codecs().make(&track.codec_params, &DecoderOptions::default())?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);

    let mut channels: Vec<Vec<f32>> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(err.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(err) => return Err(err.into()),
        };
        if sample_rate == 0 {
            sample_rate = decoded.spec().rate;
        }
        let ch_count = decoded.spec().channels.count().max(1);
        if channels.len() < ch_count {
            channels.resize_with(ch_count, Vec::new);
        }
        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
        buf.copy_interleaved_ref(decoded);
        for frame in buf.samples().chunks(ch_count) {
            for (ch, &v) in frame.iter().enumerate() {
                channels[ch].push(v);
            }
        }
    }
    if sample_rate == 0 {
        anyhow::bail!("unknown sample rate");
    }
    if channels.first().map(|c| c.is_empty()).unwrap_or(true) {
        anyhow::bail!("no audio frames decoded");
    }
    Ok(DecodedAudio {
        channels,
        sample_rate,
    })
}

pub fn resample_linear(samples: &[f32], in_sr: u32, out_sr: u32) -> Vec<f32> {
    if in_sr == out_sr || samples.is_empty() {
        return samples.to_vec();
    }
    if in_sr == 0 || out_sr == 0 {
        return samples.to_vec();
    }
    let ratio = out_sr as f64 / in_sr as f64;
    let out_len = ((samples.len() as f64) * ratio).ceil() as usize;
    if out_len == 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(out_len);
    let len = samples.len();
    for i in 0..out_len {
        let src_pos = (i as f64) / ratio;
        let i0 = src_pos.floor() as usize;
        if i0 >= len {
            out.push(samples[len - 1]);
            continue;
        }
        let i1 = (i0 + 1).min(len.saturating_sub(1));
        let t = (src_pos - i0 as f64).clamp(0.0, 1.0) as f32;
        out.push(samples[i0] * (1.0 - t) + samples[i1] * t);
    }
    out
}
