use std::ops::Range;

/// Planar in-memory audio: one sample vector per channel, all of equal length.
#[derive(Clone, Debug, PartialEq)]
pub struct Waveform {
    planes: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl Waveform {
    /// Build a waveform from per-channel planes.
    ///
    /// Planes longer than the shortest one are truncated so that every channel
    /// reports the same frame count.
    pub fn new(mut planes: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        let frames = planes.iter().map(Vec::len).min().unwrap_or(0);
        for plane in &mut planes {
            plane.truncate(frames);
        }
        Self {
            planes,
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.planes.len()
    }

    pub fn frames(&self) -> usize {
        self.planes.first().map_or(0, Vec::len)
    }

    pub fn planes(&self) -> &[Vec<f32>] {
        &self.planes
    }

    pub fn into_planes(self) -> Vec<Vec<f32>> {
        self.planes
    }

    /// Iterate over every full segment of `segment_length` frames, in order.
    ///
    /// A trailing remainder shorter than `segment_length` is not yielded.
    pub fn segments(&self, segment_length: usize) -> impl Iterator<Item = Segment<'_>> + '_ {
        segment_ranges(self.frames(), segment_length)
            .enumerate()
            .map(move |(index, frames)| Segment {
                index,
                planes: self.planes.iter().map(|plane| &plane[frames.clone()]).collect(),
            })
    }
}

/// A borrowed run of frames cut out of a [`Waveform`].
#[derive(Debug)]
pub struct Segment<'a> {
    index: usize,
    planes: Vec<&'a [f32]>,
}

impl<'a> Segment<'a> {
    /// Zero-based position of this segment within its source file.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn planes(&self) -> &[&'a [f32]] {
        &self.planes
    }

    pub fn frames(&self) -> usize {
        self.planes.first().map_or(0, |plane| plane.len())
    }
}

/// Frame ranges of all full segments that fit in `total_frames`.
pub fn segment_ranges(
    total_frames: usize,
    segment_length: usize,
) -> impl Iterator<Item = Range<usize>> {
    let count = if segment_length == 0 {
        0
    } else {
        total_frames / segment_length
    };
    (0..count).map(move |i| i * segment_length..(i + 1) * segment_length)
}
