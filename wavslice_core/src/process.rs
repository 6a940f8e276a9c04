use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::decode::decode_file;
use crate::encode::SegmentEncoder;
use crate::error::SliceError;
use crate::resample::resample;
use crate::Config;

/// Number of channels a file must have to be sliced.
pub const REQUIRED_CHANNELS: usize = 2;

/// What happened to a single input file that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file was cut into `segments` output files.
    Sliced { segments: usize },
    /// The file was left alone.
    Skipped(SkipReason),
}

/// Why a decodable file produced no output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    NotStereo { channels: usize },
    TooShort { frames: usize, required: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotStereo { channels } => {
                write!(f, "not stereo: {channels} channel(s)")
            }
            SkipReason::TooShort { frames, required } => {
                write!(f, "too short: {frames} frame(s), need {required}")
            }
        }
    }
}

/// Directory that receives the segments of `file`: the file's parent, made
/// relative to `input_root` and re-rooted under `output_root`.
pub fn output_dir_for(
    input_root: &Path,
    output_root: &Path,
    file: &Path,
) -> Result<PathBuf, SliceError> {
    let parent = file.parent().unwrap_or_else(|| Path::new(""));
    let relative = parent
        .strip_prefix(input_root)
        .map_err(|_| SliceError::OutsideInputRoot(file.to_path_buf()))?;
    Ok(output_root.join(relative))
}

/// `<base_name>_chunk<index>.<extension>`
pub fn segment_file_name(base_name: &Path, index: usize, extension: &str) -> OsString {
    let mut name = base_name.as_os_str().to_os_string();
    name.push(format!("_chunk{index}.{extension}"));
    name
}

/// Decode, resample, validate and slice one file, writing every full segment
/// through `encoder`.
///
/// Segments written before an error are left on disk.
pub fn process_file<E>(
    path: &Path,
    config: &Config,
    encoder: &E,
) -> Result<FileOutcome, SliceError>
where
    E: SegmentEncoder + ?Sized,
{
    let waveform = decode_file(path)?;
    info!(
        "'{}': sample rate {} Hz, shape [{}, {}]",
        path.display(),
        waveform.sample_rate(),
        waveform.channels(),
        waveform.frames()
    );

    let waveform = resample(waveform, config.target_sample_rate)?;

    let segment_length = config.segment_length.get();
    let reason = if waveform.channels() != REQUIRED_CHANNELS {
        Some(SkipReason::NotStereo {
            channels: waveform.channels(),
        })
    } else if waveform.frames() < segment_length {
        Some(SkipReason::TooShort {
            frames: waveform.frames(),
            required: segment_length,
        })
    } else {
        None
    };
    if let Some(reason) = reason {
        warn!("Skipping '{}' ({reason})", path.display());
        return Ok(FileOutcome::Skipped(reason));
    }

    let base_name = path
        .file_stem()
        .map(Path::new)
        .ok_or_else(|| SliceError::InvalidInputName(path.to_path_buf()))?;
    let out_dir = output_dir_for(&config.input_root, &config.output_root, path)?;
    fs::create_dir_all(&out_dir)?;

    let mut written = 0;
    for segment in waveform.segments(segment_length) {
        let target = out_dir.join(segment_file_name(
            base_name,
            segment.index(),
            encoder.extension(),
        ));
        encoder.encode(&segment, waveform.sample_rate(), &target)?;
        debug!("wrote '{}'", target.display());
        written += 1;
    }

    Ok(FileOutcome::Sliced { segments: written })
}
