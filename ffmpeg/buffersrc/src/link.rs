/*!
    The outgoing link: negotiated properties and the downstream hooks.
*/

use ffmpeg_types::{ChannelLayout, Frame, MediaType, PixelFormat, Rational, SampleFormat};

use crate::Result;
use crate::egress::Egress;

/**
    Properties of the link between the buffer source and the next filter.

    Filled in by [`BufferSource::config_props`](crate::BufferSource::config_props).
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkProps {
    pub media_type: MediaType,
    pub width: u32,
    pub height: u32,
    pub sample_aspect_ratio: Rational,
    pub channel_layout: Option<ChannelLayout>,
    pub time_base: Rational,
    pub frame_rate: Rational,
}

impl LinkProps {
    /**
        A link of the given media type with every property unset.
    */
    pub fn new(media_type: MediaType) -> Self {
        Self {
            media_type,
            width: 0,
            height: 0,
            sample_aspect_ratio: Rational::ZERO,
            channel_layout: None,
            time_base: Rational::ZERO,
            frame_rate: Rational::ZERO,
        }
    }
}

/**
    The single format tuple a buffer source can produce.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SupportedFormats {
    Video {
        pixel_format: PixelFormat,
    },
    Audio {
        sample_format: SampleFormat,
        sample_rate: u32,
        /// Either the configured layout or an unspecified layout with the
        /// configured channel count.
        channel_layout: ChannelLayout,
    },
}

/**
    Downstream request hook, invoked once after a `PUSH` submission.

    Implementations may pull any number of frames from `egress`. An error
    is returned to the producer unchanged.
*/
pub trait OutputLink: Send {
    fn request_frame(&mut self, egress: &mut Egress) -> Result<()>;
}

/**
    Consumer of frames delivered by the buffer source.
*/
pub trait FrameSink {
    fn filter_frame(&mut self, frame: Frame) -> Result<()>;
}

impl<F> FrameSink for F
where
    F: FnMut(Frame) -> Result<()>,
{
    fn filter_frame(&mut self, frame: Frame) -> Result<()> {
        self(frame)
    }
}

/**
    An [`OutputLink`] that answers each request by pulling one frame and
    handing it to a [`FrameSink`].
*/
#[derive(Debug, Default)]
pub struct SinkLink<S> {
    sink: S,
}

impl<S: FrameSink> SinkLink<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }
}

impl<S: FrameSink + Send> OutputLink for SinkLink<S> {
    fn request_frame(&mut self, egress: &mut Egress) -> Result<()> {
        let frame = egress.pull()?;
        self.sink.filter_frame(frame)
    }
}
