/*!
    Buffer source stage for filter graphs.

    A buffer source is the ingress node of a filter graph. Application code
    submits decoded frames, downstream filters pull them in submission
    order. Two flavors exist: `buffer` for video and `abuffer` for audio.

    # Example

    ```
    use ffmpeg_buffersrc::{BufferSource, BufferSrcFlags};
    use ffmpeg_types::{Frame, PixelFormat, Rational, VideoFrame};

    let mut source = BufferSource::video("320:240:0:1:25:1:1").unwrap();

    let frame = VideoFrame::new(
        vec![0u8; 320 * 240 * 3 / 2],
        320,
        240,
        PixelFormat::Yuv420p,
        None,
        Rational::new(1, 25),
    );
    let mut slot = Some(Frame::from(frame));
    source.submit(&mut slot, BufferSrcFlags::NONE).unwrap();
    assert!(slot.is_none());

    source.send_eof().unwrap();
    assert!(source.pull().is_ok());
    assert!(source.pull().unwrap_err().is_eof());
    ```

    # Modules

    - [`BufferSource`] - The stage itself: submit, pull and link negotiation
    - [`SourceParams`] - Stream parameters, parsed from filter arguments
    - [`BufferSrcFlags`] - Submission flags
    - [`Egress`] and [`OutputLink`] - The consumer side and push hooks
*/

mod egress;
mod error;
mod filter;
mod flags;
mod link;
mod options;
mod params;
mod queue;
mod source;

pub use egress::{Egress, SourceState};
pub use error::{Error, Result};
pub use filter::{ABUFFER, BUFFER, FilterDescriptor};
pub use flags::BufferSrcFlags;
pub use link::{FrameSink, LinkProps, OutputLink, SinkLink, SupportedFormats};
pub use options::{parse_audio_args, parse_pixel_format, parse_video_args, parse_video_size};
pub use params::{AudioParams, MediaParams, SourceParams, VideoParams};
pub use queue::FrameQueue;
pub use source::BufferSource;
