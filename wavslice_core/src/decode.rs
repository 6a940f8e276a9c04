use std::fs::File;
use std::path::Path;

use log::warn;
use symphonia::core::audio::{AudioBuffer, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

use crate::error::SliceError;
use crate::waveform::Waveform;

/// Decode the default track of `path` into a planar `f32` [`Waveform`] at its
/// native sample rate.
pub fn decode_file(path: &Path) -> Result<Waveform, SliceError> {
    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let probed = get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut reader = probed.format;

    let track = reader
        .default_track()
        .ok_or(SliceError::MissingDefaultTrack)?;
    if track.codec_params.codec == CODEC_TYPE_NULL {
        return Err(SliceError::UnsupportedCodec);
    }
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(SliceError::MissingSampleRate)?;
    let channel_hint = track.codec_params.channels.map_or(0, |c| c.count());
    let frame_hint = track.codec_params.n_frames.unwrap_or(0) as usize;

    let mut decoder = get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut planes: Vec<Vec<f32>> = (0..channel_hint)
        .map(|_| Vec::with_capacity(frame_hint))
        .collect();
    let mut scratch: Option<AudioBuffer<f32>> = None;

    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(err) => return Err(err.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(err)) => {
                warn!("skipping undecodable packet in '{}': {err}", path.display());
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        let spec = *decoded.spec();
        let capacity = decoded.capacity() as u64;
        let reusable = scratch
            .as_ref()
            .is_some_and(|buffer| buffer.capacity() as u64 >= capacity && *buffer.spec() == spec);
        if !reusable {
            scratch = Some(AudioBuffer::new(capacity, spec));
        }
        let buffer = scratch.get_or_insert_with(|| AudioBuffer::new(capacity, spec));
        decoded.convert(buffer);

        let channels = spec.channels.count();
        if planes.len() != channels {
            planes.resize_with(channels, Vec::new);
        }
        for (index, plane) in planes.iter_mut().enumerate() {
            plane.extend_from_slice(buffer.chan(index));
        }
    }

    Ok(Waveform::new(planes, sample_rate))
}
