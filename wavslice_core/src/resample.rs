use log::debug;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::error::SliceError;
use crate::waveform::Waveform;

/// Number of input frames handed to the sinc resampler per call.
const CHUNK_FRAMES: usize = 4096;

/// Frame count after converting `frames` from `from_hz` to `to_hz`.
pub fn resampled_len(frames: usize, from_hz: u32, to_hz: u32) -> usize {
    if from_hz == 0 {
        return 0;
    }
    let scaled = frames as u128 * u128::from(to_hz);
    scaled.div_ceil(u128::from(from_hz)) as usize
}

/// Convert `waveform` to `target_rate` with a band-limited sinc filter.
///
/// A waveform already at `target_rate` is returned untouched. Otherwise the
/// result holds exactly [`resampled_len`] frames per channel, with output
/// frame `n` sampled at input time `n * source_rate / target_rate`.
pub fn resample(waveform: Waveform, target_rate: u32) -> Result<Waveform, SliceError> {
    let source_rate = waveform.sample_rate();
    if source_rate == target_rate {
        return Ok(waveform);
    }

    let channels = waveform.channels();
    let frames = waveform.frames();
    let expected = resampled_len(frames, source_rate, target_rate);
    if channels == 0 || expected == 0 {
        return Ok(Waveform::new(vec![Vec::new(); channels], target_rate));
    }

    debug!("resampling {frames} frames from {source_rate} Hz to {target_rate} Hz");

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let ratio = f64::from(target_rate) / f64::from(source_rate);
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, CHUNK_FRAMES, channels)?;

    let input = waveform.into_planes();
    let mut output: Vec<Vec<f32>> = (0..channels)
        .map(|_| Vec::with_capacity(expected + CHUNK_FRAMES))
        .collect();

    let mut position = 0;
    while output[0].len() < expected {
        let needed = resampler.input_frames_next();
        let start = position.min(frames);
        let end = (position + needed).min(frames);
        // Past the end of the input the filter is flushed with silence.
        let chunk: Vec<Vec<f32>> = input
            .iter()
            .map(|plane| {
                let mut chunk = plane[start..end].to_vec();
                chunk.resize(needed, 0.0);
                chunk
            })
            .collect();
        position += needed;

        let produced = resampler.process(&chunk, None)?;
        for (out, plane) in output.iter_mut().zip(produced) {
            out.extend_from_slice(&plane);
        }
    }

    for plane in &mut output {
        plane.truncate(expected);
    }

    Ok(Waveform::new(output, target_rate))
}
