/*!
    Shared types for the ffmpeg crate ecosystem.

    This crate defines the vocabulary of the ecosystem: the types that cross crate
    boundaries. It has no dependency on FFmpeg, making it lightweight and enabling
    consumers to depend on it without pulling in FFmpeg bindings.

    # Core Types

    - [`Rational`] - Rational numbers for time bases, frame rates and aspect ratios
    - [`Pts`] - Timestamps in time_base units
    - [`VideoFrame`], [`AudioFrame`] and [`Frame`] - Decoded, reference-counted frames
    - [`MediaType`] - Video or audio

    # Format Types

    - [`PixelFormat`] - Video pixel formats
    - [`SampleFormat`] - Audio sample formats
    - [`ChannelLayout`] - Audio channel layouts

    # Error Handling

    - [`Error`] and [`Result`] - Errors from parsing format descriptions
*/

mod error;
mod format;
mod frame;
mod media;
mod rational;
mod timestamp;

pub use error::{Error, Result};
pub use format::{ChannelLayout, PixelFormat, SampleFormat};
pub use frame::{AudioFrame, Frame, VideoFrame};
pub use media::MediaType;
pub use rational::Rational;
pub use timestamp::Pts;
