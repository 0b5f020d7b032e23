/*!
    Parameter set describing the stream a buffer source emits.
*/

use std::fmt;

use ffmpeg_types::{ChannelLayout, MediaType, PixelFormat, Rational, SampleFormat};

use crate::{Error, Result};

/**
    Video stream parameters.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoParams {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel format of every frame.
    pub pixel_format: PixelFormat,
    /// Sample (pixel) aspect ratio, zero when unknown.
    pub pixel_aspect: Rational,
    /// Free-form flags handed to a downstream scaler, if any.
    pub scaler_params: Option<String>,
}

/**
    Audio stream parameters.

    `channels` is always known. `channel_layout` is `None` when only a
    count was configured; negotiation may fill it in from the link.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioParams {
    pub sample_format: SampleFormat,
    pub sample_rate: u32,
    pub channels: u16,
    pub channel_layout: Option<ChannelLayout>,
}

impl AudioParams {
    /**
        Build audio parameters, reconciling the channel count with the layout.

        At least one of `channels` and `layout` must be given. When both
        are given they must agree. A layout with no speaker positions only
        contributes its count.
    */
    pub fn new(
        sample_format: SampleFormat,
        sample_rate: u32,
        channels: Option<u16>,
        layout: Option<ChannelLayout>,
    ) -> Result<Self> {
        let channels = channels.filter(|&c| c > 0);
        let (channels, channel_layout) = match (channels, layout) {
            (Some(count), Some(layout)) if count != layout.channels() => {
                return Err(Error::invalid_argument(format!(
                    "Mismatching channel count {count} and layout '{layout}' ({} channels)",
                    layout.channels()
                )));
            }
            (_, Some(layout)) => (
                layout.channels(),
                (!layout.is_unspecified()).then_some(layout),
            ),
            (Some(count), None) => (count, None),
            (None, None) => {
                return Err(Error::invalid_argument(
                    "Neither number of channels nor channel layout specified",
                ));
            }
        };
        Ok(Self {
            sample_format,
            sample_rate,
            channels,
            channel_layout,
        })
    }
}

/**
    Media-specific half of the parameter set.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaParams {
    Video(VideoParams),
    Audio(AudioParams),
}

/**
    Full parameter set of a buffer source.

    Fixed at initialization. Downstream sees exactly these values.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceParams {
    /// Time base of frame timestamps.
    pub time_base: Rational,
    /// Nominal frame rate, zero when unknown. Only meaningful for video.
    pub frame_rate: Rational,
    pub media: MediaParams,
}

impl SourceParams {
    /**
        Video parameters with unset frame rate and aspect ratio.
    */
    pub fn video(width: u32, height: u32, pixel_format: PixelFormat, time_base: Rational) -> Self {
        Self {
            time_base,
            frame_rate: Rational::ZERO,
            media: MediaParams::Video(VideoParams {
                width,
                height,
                pixel_format,
                pixel_aspect: Rational::ZERO,
                scaler_params: None,
            }),
        }
    }

    /**
        Audio parameters. The time base defaults to `1/sample_rate`, and
        stays unset when the sample rate is zero.

        Fails if the channel description is inconsistent.
    */
    pub fn audio(
        sample_format: SampleFormat,
        sample_rate: u32,
        channels: Option<u16>,
        layout: Option<ChannelLayout>,
    ) -> Result<Self> {
        let audio = AudioParams::new(sample_format, sample_rate, channels, layout)?;
        Ok(Self {
            time_base: default_audio_time_base(sample_rate),
            frame_rate: Rational::ZERO,
            media: MediaParams::Audio(audio),
        })
    }

    /**
        Replace the time base. A zero time base keeps the current one.
    */
    pub fn with_time_base(mut self, time_base: Rational) -> Self {
        if !time_base.is_zero() {
            self.time_base = time_base;
        }
        self
    }

    pub fn with_frame_rate(mut self, frame_rate: Rational) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /**
        Set the pixel aspect ratio. Ignored for audio.
    */
    pub fn with_pixel_aspect(mut self, pixel_aspect: Rational) -> Self {
        if let MediaParams::Video(video) = &mut self.media {
            video.pixel_aspect = pixel_aspect;
        }
        self
    }

    /**
        Set the scaler parameters. Ignored for audio.
    */
    pub fn with_scaler_params(mut self, scaler_params: impl Into<String>) -> Self {
        if let MediaParams::Video(video) = &mut self.media {
            video.scaler_params = Some(scaler_params.into());
        }
        self
    }

    pub fn media_type(&self) -> MediaType {
        match self.media {
            MediaParams::Video(_) => MediaType::Video,
            MediaParams::Audio(_) => MediaType::Audio,
        }
    }

    pub fn as_video(&self) -> Option<&VideoParams> {
        match &self.media {
            MediaParams::Video(video) => Some(video),
            MediaParams::Audio(_) => None,
        }
    }

    pub fn as_audio(&self) -> Option<&AudioParams> {
        match &self.media {
            MediaParams::Audio(audio) => Some(audio),
            MediaParams::Video(_) => None,
        }
    }
}

/// `1/sample_rate`, or unset when the rate is zero or out of range.
pub(crate) fn default_audio_time_base(sample_rate: u32) -> Rational {
    i32::try_from(sample_rate)
        .ok()
        .filter(|&rate| rate > 0)
        .map_or(Rational::ZERO, |rate| Rational::new(1, rate))
}

/**
    One-line summary in the style of the init log.
*/
impl fmt::Display for SourceParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.media {
            MediaParams::Video(v) => write!(
                f,
                "w:{} h:{} pixfmt:{} tb:{} fr:{} sar:{} sws_param:{}",
                v.width,
                v.height,
                v.pixel_format,
                self.time_base,
                self.frame_rate,
                v.pixel_aspect,
                v.scaler_params.as_deref().unwrap_or(""),
            ),
            MediaParams::Audio(a) => {
                write!(
                    f,
                    "tb:{} samplefmt:{} samplerate:{} chlayout:",
                    self.time_base, a.sample_format, a.sample_rate
                )?;
                match a.channel_layout {
                    Some(layout) => write!(f, "{layout}"),
                    None => write!(f, "{} channels", a.channels),
                }
            }
        }
    }
}
