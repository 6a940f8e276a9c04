use std::path::PathBuf;

use symphonia::core::errors::Error as SymphoniaError;
use thiserror::Error;

/// Errors that can occur while slicing audio files.
#[derive(Debug, Error)]
pub enum SliceError {
    /// Wrapper around errors produced by the Symphonia decoding library.
    #[error(transparent)]
    Symphonia(#[from] SymphoniaError),

    /// Wrapper around IO errors encountered while reading or writing files.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Error returned when the input root is missing or not a directory.
    #[error("input directory does not exist: {}", .0.display())]
    MissingInputDirectory(PathBuf),

    /// Error returned when the container does not expose any default track.
    #[error("input stream does not provide a default track")]
    MissingDefaultTrack,

    /// Error returned when the codec of the track cannot be handled.
    #[error("unsupported codec")]
    UnsupportedCodec,

    /// Error returned when the decoder track lacks a sample rate.
    #[error("input stream does not advertise a sample rate")]
    MissingSampleRate,

    /// The sinc resampler rejected its parameters.
    #[error("failed to construct resampler: {0}")]
    ResamplerConstruction(#[from] rubato::ResamplerConstructionError),

    /// The sinc resampler failed while processing a chunk.
    #[error("resampling failed: {0}")]
    Resample(#[from] rubato::ResampleError),

    /// The MP3 encoder could not be configured or failed to encode a segment.
    #[error("mp3 encoder error: {0}")]
    Encoder(String),

    /// Error produced when a file name cannot be derived from the input path.
    #[error("failed to derive a base name for '{}'", .0.display())]
    InvalidInputName(PathBuf),

    /// The file does not live below the configured input root.
    #[error("'{}' is not inside the input directory", .0.display())]
    OutsideInputRoot(PathBuf),

    /// The worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
