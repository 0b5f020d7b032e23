/*!
    Decoded frame types.

    Frame payloads are reference counted. Cloning a frame never copies
    sample or pixel bytes; it adds one more owner of the same payload.
*/

use std::sync::Arc;

use crate::{ChannelLayout, MediaType, PixelFormat, Pts, Rational, SampleFormat};

/**
    A decoded video frame.

    Contains raw pixel data in the format specified by `format`.
    The data layout depends on the pixel format. Packed formats have
    all data in a single contiguous buffer, while planar formats may
    require interpretation based on the format.
*/
#[derive(Clone, Debug)]
pub struct VideoFrame {
    /// Raw pixel data, shared between clones.
    pub data: Arc<[u8]>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel format of the data.
    pub format: PixelFormat,
    /// Presentation timestamp (None for frames without timing).
    pub pts: Option<Pts>,
    /// Time base for interpreting the PTS.
    pub time_base: Rational,
}

impl VideoFrame {
    /**
        Create a new video frame.
    */
    pub fn new(
        data: impl Into<Arc<[u8]>>,
        width: u32,
        height: u32,
        format: PixelFormat,
        pts: Option<Pts>,
        time_base: Rational,
    ) -> Self {
        Self {
            data: data.into(),
            width,
            height,
            format,
            pts,
            time_base,
        }
    }

    /**
        Returns the presentation time as a Duration, if PTS is set.
    */
    pub fn presentation_time(&self) -> Option<std::time::Duration> {
        self.pts.map(|pts| pts.to_duration(self.time_base))
    }
}

/**
    A decoded audio frame.

    Contains raw sample data in the format specified by `format`.
*/
#[derive(Clone, Debug)]
pub struct AudioFrame {
    /**
        Raw sample data as bytes, shared between clones.

        Interpret according to `format` and `channels`.
        For interleaved stereo F32: [L0, R0, L1, R1, ...]
    */
    pub data: Arc<[u8]>,
    /**
        Number of samples per channel.
    */
    pub samples: usize,
    /**
        Sample rate in Hz.
    */
    pub sample_rate: u32,
    /**
        Number of channels actually present in the data.
    */
    pub channels: u16,
    /**
        Declared speaker layout, if the producer knows one.

        When set, it must describe the same number of channels as `channels`.
    */
    pub channel_layout: Option<ChannelLayout>,
    /**
        Sample format.
    */
    pub format: SampleFormat,
    /**
        Presentation timestamp (None for frames without timing).
    */
    pub pts: Option<Pts>,
    /**
        Time base for interpreting the PTS.
    */
    pub time_base: Rational,
}

impl AudioFrame {
    /**
        Create a new audio frame.

        The channel count is taken from `layout`. An unspecified layout
        records only the count and leaves `channel_layout` empty.
    */
    pub fn new(
        data: impl Into<Arc<[u8]>>,
        samples: usize,
        sample_rate: u32,
        layout: ChannelLayout,
        format: SampleFormat,
        pts: Option<Pts>,
        time_base: Rational,
    ) -> Self {
        Self {
            data: data.into(),
            samples,
            sample_rate,
            channels: layout.channels(),
            channel_layout: (!layout.is_unspecified()).then_some(layout),
            format,
            pts,
            time_base,
        }
    }

    /**
        Returns the presentation time as a Duration, if PTS is set.
    */
    pub fn presentation_time(&self) -> Option<std::time::Duration> {
        self.pts.map(|pts| pts.to_duration(self.time_base))
    }

    /**
        Returns the duration of this frame based on sample count and rate.
    */
    pub fn duration(&self) -> std::time::Duration {
        if self.sample_rate == 0 {
            return std::time::Duration::ZERO;
        }
        std::time::Duration::from_secs_f64(self.samples as f64 / self.sample_rate as f64)
    }

    /**
        Returns true if the declared layout, when present, agrees with the
        channel count of the data.
    */
    pub fn layout_matches_channels(&self) -> bool {
        self.channel_layout
            .is_none_or(|layout| layout.channels() == self.channels)
    }

    /**
        Returns the expected data length in bytes.
    */
    pub fn expected_data_len(&self) -> usize {
        self.samples * self.channels as usize * self.format.bytes_per_sample()
    }
}

/**
    A decoded frame of either media type.

    This is the handle that moves through a filter graph. `Clone` is a
    reference clone: both handles point at the same payload.
*/
#[derive(Clone, Debug)]
pub enum Frame {
    Video(VideoFrame),
    Audio(AudioFrame),
}

impl Frame {
    /**
        Returns the media type of this frame.
    */
    pub fn media_type(&self) -> MediaType {
        match self {
            Self::Video(_) => MediaType::Video,
            Self::Audio(_) => MediaType::Audio,
        }
    }

    /**
        Returns the payload bytes.
    */
    pub fn data(&self) -> &[u8] {
        &self.payload()[..]
    }

    /**
        Returns the presentation timestamp, if set.
    */
    pub fn pts(&self) -> Option<Pts> {
        match self {
            Self::Video(frame) => frame.pts,
            Self::Audio(frame) => frame.pts,
        }
    }

    /**
        Returns the number of live handles sharing this frame's payload.
    */
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(self.payload())
    }

    /**
        Returns true if both frames share the same payload allocation.
    */
    pub fn shares_payload(&self, other: &Frame) -> bool {
        Arc::ptr_eq(self.payload(), other.payload())
    }

    pub fn as_video(&self) -> Option<&VideoFrame> {
        match self {
            Self::Video(frame) => Some(frame),
            Self::Audio(_) => None,
        }
    }

    pub fn as_audio(&self) -> Option<&AudioFrame> {
        match self {
            Self::Audio(frame) => Some(frame),
            Self::Video(_) => None,
        }
    }

    fn payload(&self) -> &Arc<[u8]> {
        match self {
            Self::Video(frame) => &frame.data,
            Self::Audio(frame) => &frame.data,
        }
    }
}

impl From<VideoFrame> for Frame {
    fn from(frame: VideoFrame) -> Self {
        Self::Video(frame)
    }
}

impl From<AudioFrame> for Frame {
    fn from(frame: AudioFrame) -> Self {
        Self::Audio(frame)
    }
}

// Frames cross thread boundaries between producers and consumers
static_assertions::assert_impl_all!(VideoFrame: Send, Sync);
static_assertions::assert_impl_all!(AudioFrame: Send, Sync);
static_assertions::assert_impl_all!(Frame: Send, Sync);
