use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use log::{error, info};
use rayon::prelude::*;

mod decode;
mod discover;
mod encode;
mod error;
mod process;
mod resample;
mod waveform;

pub use decode::decode_file;
pub use discover::discover;
pub use encode::{Mp3Encoder, SegmentEncoder};
pub use error::SliceError;
pub use process::{
    output_dir_for, process_file, segment_file_name, FileOutcome, SkipReason, REQUIRED_CHANNELS,
};
pub use resample::{resample, resampled_len};
pub use waveform::{segment_ranges, Segment, Waveform};

/// Frames per output segment (about 47.5 s at 44.1 kHz).
pub const DEFAULT_SEGMENT_LENGTH: usize = 2_097_152;
/// Size of the worker pool.
pub const DEFAULT_WORKERS: usize = 20;
/// Every segment is written at this rate.
pub const TARGET_SAMPLE_RATE: u32 = 44_100;
/// Files with this extension are picked up by discovery.
pub const DEFAULT_EXTENSION: &str = "wav";

/// Configuration for a slicing run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Canonicalized directory scanned for input files.
    pub input_root: PathBuf,
    /// Directory under which the input tree is mirrored.
    pub output_root: PathBuf,
    /// Frames per segment.
    pub segment_length: NonZeroUsize,
    /// Number of files processed concurrently.
    pub workers: NonZeroUsize,
    /// Sample rate every file is converted to before slicing.
    pub target_sample_rate: u32,
    /// Extension (without the dot) of the files to process.
    pub extension: String,
}

impl Config {
    /// Construct a [`Config`] with default segment length and worker count.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<Self, SliceError> {
        Self::builder(input, output).build()
    }

    /// Start building a [`Config`] with optional overrides.
    pub fn builder<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> ConfigBuilder {
        ConfigBuilder::new(input.as_ref(), output.as_ref())
    }
}

/// Builder for [`Config`].
#[derive(Clone, Debug)]
pub struct ConfigBuilder {
    input_root: PathBuf,
    output_root: PathBuf,
    segment_length: NonZeroUsize,
    workers: NonZeroUsize,
    target_sample_rate: u32,
    extension: String,
}

impl ConfigBuilder {
    fn new(input: &Path, output: &Path) -> Self {
        Self {
            input_root: input.to_path_buf(),
            output_root: output.to_path_buf(),
            segment_length: NonZeroUsize::new(DEFAULT_SEGMENT_LENGTH)
                .unwrap_or(NonZeroUsize::MIN),
            workers: NonZeroUsize::new(DEFAULT_WORKERS).unwrap_or(NonZeroUsize::MIN),
            target_sample_rate: TARGET_SAMPLE_RATE,
            extension: DEFAULT_EXTENSION.to_owned(),
        }
    }

    /// Frames per output segment. Defaults to [`DEFAULT_SEGMENT_LENGTH`].
    pub fn segment_length(mut self, frames: NonZeroUsize) -> Self {
        self.segment_length = frames;
        self
    }

    /// Size of the worker pool. Defaults to [`DEFAULT_WORKERS`].
    pub fn workers(mut self, workers: NonZeroUsize) -> Self {
        self.workers = workers;
        self
    }

    /// Extension, without the dot, matched case-insensitively during discovery.
    /// Defaults to [`DEFAULT_EXTENSION`].
    pub fn extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.extension = extension.into();
        self
    }

    /// Finalise the configuration, canonicalizing the input root.
    ///
    /// The output root does not need to exist yet.
    pub fn build(self) -> Result<Config, SliceError> {
        if !self.input_root.is_dir() {
            return Err(SliceError::MissingInputDirectory(self.input_root));
        }
        let input_root = fs::canonicalize(&self.input_root)?;

        Ok(Config {
            input_root,
            output_root: self.output_root,
            segment_length: self.segment_length,
            workers: self.workers,
            target_sample_rate: self.target_sample_rate,
            extension: self.extension,
        })
    }
}

/// Per-run tally of file outcomes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Files that produced at least one segment.
    pub sliced: usize,
    /// Files rejected by the channel or length checks.
    pub skipped: usize,
    /// Files that hit an error.
    pub failed: usize,
    /// Segment files written across all sliced files.
    pub segments_written: usize,
}

impl Summary {
    fn from_result(result: &Result<FileOutcome, SliceError>) -> Self {
        match result {
            Ok(FileOutcome::Sliced { segments }) => Self {
                sliced: 1,
                segments_written: *segments,
                ..Self::default()
            },
            Ok(FileOutcome::Skipped(_)) => Self {
                skipped: 1,
                ..Self::default()
            },
            Err(_) => Self {
                failed: 1,
                ..Self::default()
            },
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            sliced: self.sliced + other.sliced,
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
            segments_written: self.segments_written + other.segments_written,
        }
    }

    /// Total number of files that were processed.
    pub fn files(&self) -> usize {
        self.sliced + self.skipped + self.failed
    }
}

/// Progress notifications emitted while a run is in flight.
///
/// `FileFinished` is sent from worker threads in completion order.
#[derive(Debug)]
pub enum ProgressEvent<'a> {
    Start {
        total_files: usize,
    },
    FileFinished {
        path: &'a Path,
        result: &'a Result<FileOutcome, SliceError>,
    },
    Finish {
        summary: &'a Summary,
    },
}

/// Slice every matching file under the input root into MP3 segments.
pub fn run(config: Config) -> Result<Summary, SliceError> {
    run_with_progress(config, |_| {})
}

/// Like [`run`], reporting progress through `on_event`.
pub fn run_with_progress<F>(config: Config, on_event: F) -> Result<Summary, SliceError>
where
    F: Fn(ProgressEvent<'_>) + Sync,
{
    run_with(config, &Mp3Encoder, on_event)
}

/// Discover input files, then process them on a pool of `config.workers`
/// threads, writing segments through `encoder`.
///
/// Per-file failures are logged and counted; only problems that prevent the
/// run from starting are returned as errors.
pub fn run_with<E, F>(config: Config, encoder: &E, on_event: F) -> Result<Summary, SliceError>
where
    E: SegmentEncoder + ?Sized,
    F: Fn(ProgressEvent<'_>) + Sync,
{
    let files = discover(&config.input_root, &config.extension)?;
    info!(
        "found {} .{} file(s) under '{}'",
        files.len(),
        config.extension,
        config.input_root.display()
    );

    fs::create_dir_all(&config.output_root)?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers.get())
        .thread_name(|index| format!("wavslice-worker-{index}"))
        .build()?;

    on_event(ProgressEvent::Start {
        total_files: files.len(),
    });

    let summary = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let result = process_file(path, &config, encoder);
                if let Err(err) = &result {
                    error!("Error processing {}: {err}", path.display());
                }
                on_event(ProgressEvent::FileFinished {
                    path: path.as_path(),
                    result: &result,
                });
                Summary::from_result(&result)
            })
            .reduce(Summary::default, Summary::merge)
    });

    info!(
        "processed {} file(s): {} sliced, {} skipped, {} failed, {} segment(s) written",
        summary.files(),
        summary.sliced,
        summary.skipped,
        summary.failed,
        summary.segments_written
    );
    on_event(ProgressEvent::Finish { summary: &summary });

    Ok(summary)
}
