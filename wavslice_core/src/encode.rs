use std::fs;
use std::path::Path;

use mp3lame_encoder::{max_required_buffer_size, Bitrate, Builder, DualPcm, FlushNoGap, Quality};

use crate::error::SliceError;
use crate::waveform::Segment;

/// Frames handed to LAME per `encode` call.
const ENCODE_BLOCK_FRAMES: usize = 1152 * 64;

/// Writes a single [`Segment`] to disk.
///
/// Implementations are shared across worker threads and must not rely on
/// per-file state.
pub trait SegmentEncoder: Sync {
    /// File extension (without the dot) of the files this encoder produces.
    fn extension(&self) -> &str;

    /// Encode `segment`, sampled at `sample_rate`, into a new file at `path`.
    fn encode(
        &self,
        segment: &Segment<'_>,
        sample_rate: u32,
        path: &Path,
    ) -> Result<(), SliceError>;
}

/// Stereo 320 kbps MP3 encoder backed by LAME.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mp3Encoder;

impl Mp3Encoder {
    fn encode_to_bytes(
        &self,
        left: &[f32],
        right: &[f32],
        sample_rate: u32,
    ) -> Result<Vec<u8>, SliceError> {
        let mut builder = Builder::new()
            .ok_or_else(|| SliceError::Encoder("failed to allocate LAME encoder".into()))?;
        builder.set_num_channels(2).map_err(build_error)?;
        builder.set_sample_rate(sample_rate).map_err(build_error)?;
        builder.set_brate(Bitrate::Kbps320).map_err(build_error)?;
        builder.set_quality(Quality::Best).map_err(build_error)?;
        let mut encoder = builder.build().map_err(build_error)?;

        let mut output = Vec::new();
        for (left, right) in left
            .chunks(ENCODE_BLOCK_FRAMES)
            .zip(right.chunks(ENCODE_BLOCK_FRAMES))
        {
            let left = to_pcm16(left);
            let right = to_pcm16(right);
            output.reserve(max_required_buffer_size(left.len()));
            encoder
                .encode_to_vec(
                    DualPcm {
                        left: &left,
                        right: &right,
                    },
                    &mut output,
                )
                .map_err(encode_error)?;
        }

        output.reserve(max_required_buffer_size(0));
        encoder
            .flush_to_vec::<FlushNoGap>(&mut output)
            .map_err(encode_error)?;
        Ok(output)
    }
}

impl SegmentEncoder for Mp3Encoder {
    fn extension(&self) -> &str {
        "mp3"
    }

    fn encode(
        &self,
        segment: &Segment<'_>,
        sample_rate: u32,
        path: &Path,
    ) -> Result<(), SliceError> {
        let [left, right] = segment.planes() else {
            return Err(SliceError::Encoder(format!(
                "expected 2 channels, got {}",
                segment.planes().len()
            )));
        };
        let bytes = self.encode_to_bytes(left, right, sample_rate)?;
        fs::write(path, bytes)?;
        Ok(())
    }
}

fn to_pcm16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16)
        .collect()
}

fn build_error(err: mp3lame_encoder::BuildError) -> SliceError {
    SliceError::Encoder(format!("invalid encoder settings: {err}"))
}

fn encode_error(err: mp3lame_encoder::EncodeError) -> SliceError {
    SliceError::Encoder(err.to_string())
}
