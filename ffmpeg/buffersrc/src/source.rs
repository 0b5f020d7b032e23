/*!
    The buffer source stage.
*/

use ffmpeg_types::{AudioFrame, ChannelLayout, Frame, MediaType, VideoFrame};
use tracing::{debug, error, info, trace};

use crate::egress::{Egress, SourceState};
use crate::filter::FilterDescriptor;
use crate::flags::BufferSrcFlags;
use crate::link::{FrameSink, LinkProps, OutputLink, SupportedFormats};
use crate::options::{parse_audio_args, parse_video_args};
use crate::params::{AudioParams, MediaParams, SourceParams, VideoParams};
use crate::{Error, Result};

/// How many video parameter changes are reported before going quiet.
const WARNING_LIMIT: u32 = 100;

/**
    Ingress node of a filter graph.

    A producer submits frames, a consumer pulls them. Nothing happens in
    between: the source has no worker and never blocks. Pulling from an
    empty source returns [`Error::Again`] while the stream is live and
    [`Error::Eof`] once it has ended and every queued frame was pulled.

    Not internally synchronized. Callers that submit and pull from
    different threads must hold a lock across each call.
*/
pub struct BufferSource {
    descriptor: &'static FilterDescriptor,
    params: SourceParams,
    // Layout inherited from the output link when none was configured
    negotiated_layout: Option<ChannelLayout>,
    egress: Egress,
    warnings_remaining: u32,
    output: Option<Box<dyn OutputLink>>,
}

impl BufferSource {
    /**
        Create a source emitting the stream described by `params`.
    */
    pub fn new(params: SourceParams) -> Self {
        let descriptor = FilterDescriptor::for_media_type(params.media_type());
        debug!(filter = descriptor.name, "{params}");
        Self {
            descriptor,
            params,
            negotiated_layout: None,
            egress: Egress::new(),
            warnings_remaining: WARNING_LIMIT,
            output: None,
        }
    }

    /**
        Create a video source from `buffer` filter arguments.
    */
    pub fn video(args: &str) -> Result<Self> {
        let params = parse_video_args(args).inspect_err(|e| error!(filter = "buffer", "{e}"))?;
        Ok(Self::new(params))
    }

    /**
        Create an audio source from `abuffer` filter arguments.
    */
    pub fn audio(args: &str) -> Result<Self> {
        let params = parse_audio_args(args).inspect_err(|e| error!(filter = "abuffer", "{e}"))?;
        Ok(Self::new(params))
    }

    /**
        Create a source by filter name, `buffer` or `abuffer`.
    */
    pub fn from_filter(name: &str, args: &str) -> Result<Self> {
        let descriptor = FilterDescriptor::find(name)
            .ok_or_else(|| Error::invalid_argument(format!("No such filter: '{name}'")))?;
        match descriptor.media_type {
            MediaType::Video => Self::video(args),
            MediaType::Audio => Self::audio(args),
        }
    }

    /**
        Attach the downstream request hook used by `PUSH` submissions,
        returning the previous one.
    */
    pub fn set_output(&mut self, output: Box<dyn OutputLink>) -> Option<Box<dyn OutputLink>> {
        self.output.replace(output)
    }

    /**
        Submit a frame, or signal end of stream with an empty slot.

        Without [`BufferSrcFlags::KEEP_REF`] the frame is moved out of
        `frame`, leaving `None`. With it, a reference clone is queued and
        `frame` is left as is. On any error before the frame is queued,
        `frame` is untouched.

        Once end of stream was signalled, every further frame is rejected.
        With [`BufferSrcFlags::PUSH`], the output link is asked for one
        frame after queueing and its error, if any, is returned; the frame
        stays queued in that case.
    */
    pub fn submit(&mut self, frame: &mut Option<Frame>, flags: BufferSrcFlags) -> Result<()> {
        let Some(incoming) = frame.take() else {
            self.egress.activate();
            self.egress.mark_eof();
            debug!(filter = self.descriptor.name, queued = self.egress.queued(), "end of stream");
            return Ok(());
        };

        if let Err(e) = self.admit(&incoming, flags) {
            *frame = Some(incoming);
            return Err(e);
        }

        let keep_ref = flags.contains(BufferSrcFlags::KEEP_REF);
        let queued = if keep_ref {
            frame.insert(incoming).clone()
        } else {
            incoming
        };

        if let Err(rejected) = self.egress.enqueue(queued) {
            if !keep_ref {
                *frame = Some(rejected);
            }
            error!(filter = self.descriptor.name, "failed to grow frame queue");
            return Err(Error::OutOfMemory);
        }
        trace!(filter = self.descriptor.name, queued = self.egress.queued(), "frame queued");

        if flags.contains(BufferSrcFlags::PUSH) {
            match self.output.as_mut() {
                Some(output) => output.request_frame(&mut self.egress)?,
                None => debug!(filter = self.descriptor.name, "push requested without an output link"),
            }
        }
        Ok(())
    }

    /**
        Decide whether a frame may enter the queue. Video parameter changes
        are logged and accepted; everything else that is off is rejected.
    */
    fn admit(&mut self, frame: &Frame, flags: BufferSrcFlags) -> Result<()> {
        if frame
            .as_audio()
            .is_some_and(|audio| !audio.layout_matches_channels())
        {
            error!(
                filter = self.descriptor.name,
                "Layout indicates a different number of channels than actually present"
            );
            return Err(Error::invalid_argument(
                "channel layout does not match the frame's channel count",
            ));
        }

        if self.egress.is_eof() {
            error!(filter = self.descriptor.name, "frame submitted after end of stream");
            return Err(Error::invalid_argument("frame submitted after end of stream"));
        }

        self.egress.activate();
        self.check_format(frame, !flags.contains(BufferSrcFlags::NO_CHECK_FORMAT))
    }

    /**
        Queue a reference clone of `frame`, leaving the caller's frame valid.

        Equivalent to [`submit`](Self::submit) with
        [`BufferSrcFlags::KEEP_REF`].
    */
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.submit(&mut Some(frame.clone()), BufferSrcFlags::KEEP_REF)
    }

    /**
        Move `frame` into the queue. An empty slot signals end of stream.

        Equivalent to [`submit`](Self::submit) with no flags.
    */
    pub fn add_frame(&mut self, frame: &mut Option<Frame>) -> Result<()> {
        self.submit(frame, BufferSrcFlags::NONE)
    }

    /**
        Signal end of stream.
    */
    pub fn send_eof(&mut self) -> Result<()> {
        self.submit(&mut None, BufferSrcFlags::NONE)
    }

    /**
        Take the next frame. See [`Egress::pull`].
    */
    pub fn pull(&mut self) -> Result<Frame> {
        self.egress.pull()
    }

    /**
        Pull the next frame and deliver it to `sink`.
    */
    pub fn request_frame(&mut self, sink: &mut dyn FrameSink) -> Result<()> {
        let frame = self.egress.pull()?;
        sink.filter_frame(frame)
    }

    /**
        Queue depth, or [`Error::Eof`] once the stream has ended and drained.
    */
    pub fn poll_frame(&self) -> Result<usize> {
        self.egress.poll()
    }

    /**
        Number of pulls that found the queue empty before end of stream.
    */
    pub fn failed_requests(&self) -> u64 {
        self.egress.failed_requests()
    }

    /**
        The one format tuple this source produces.

        Audio sources without a known layout report an unspecified layout
        with the configured channel count.
    */
    pub fn query_formats(&self) -> SupportedFormats {
        match &self.params.media {
            MediaParams::Video(video) => SupportedFormats::Video {
                pixel_format: video.pixel_format,
            },
            MediaParams::Audio(audio) => SupportedFormats::Audio {
                sample_format: audio.sample_format,
                sample_rate: audio.sample_rate,
                channel_layout: self
                    .channel_layout()
                    .unwrap_or(ChannelLayout::unspecified(audio.channels)),
            },
        }
    }

    /**
        Publish the parameter set onto the output link.

        Video copies size and aspect ratio. Audio without a configured
        layout adopts the link's layout; otherwise the link adopts ours.
        Both copy the time base and frame rate.
    */
    pub fn config_props(&mut self, link: &mut LinkProps) -> Result<()> {
        if link.media_type != self.media_type() {
            error!(
                filter = self.descriptor.name,
                link = %link.media_type,
                "output link has the wrong media type"
            );
            return Err(Error::invalid_argument(format!(
                "cannot configure a {} link from a {} source",
                link.media_type,
                self.media_type()
            )));
        }

        match &self.params.media {
            MediaParams::Video(video) => {
                link.width = video.width;
                link.height = video.height;
                link.sample_aspect_ratio = video.pixel_aspect;
            }
            MediaParams::Audio(audio) => match self.channel_layout() {
                Some(layout) => link.channel_layout = Some(layout),
                None => {
                    if let Some(layout) = link.channel_layout {
                        if layout.channels() != audio.channels {
                            return Err(Error::invalid_argument(format!(
                                "link layout '{layout}' does not carry {} channels",
                                audio.channels
                            )));
                        }
                        self.negotiated_layout = (!layout.is_unspecified()).then_some(layout);
                    }
                }
            },
        }

        link.time_base = self.params.time_base;
        link.frame_rate = self.params.frame_rate;
        Ok(())
    }

    pub fn params(&self) -> &SourceParams {
        &self.params
    }

    pub fn descriptor(&self) -> &'static FilterDescriptor {
        self.descriptor
    }

    pub fn media_type(&self) -> MediaType {
        self.descriptor.media_type
    }

    /**
        The effective audio layout: configured, else negotiated.
    */
    pub fn channel_layout(&self) -> Option<ChannelLayout> {
        self.params
            .as_audio()
            .and_then(|audio| audio.channel_layout)
            .or(self.negotiated_layout)
    }

    pub fn state(&self) -> SourceState {
        self.egress.state()
    }

    pub fn queued(&self) -> usize {
        self.egress.queued()
    }

    pub fn is_eof(&self) -> bool {
        self.egress.is_eof()
    }

    /**
        How many more video parameter changes will be logged.
    */
    pub fn warnings_remaining(&self) -> u32 {
        self.warnings_remaining
    }

    /**
        The media kind must always match. Parameter comparison only runs
        when `compare` is set.
    */
    fn check_format(&mut self, frame: &Frame, compare: bool) -> Result<()> {
        match (&self.params.media, frame) {
            (MediaParams::Video(_), Frame::Video(_)) | (MediaParams::Audio(_), Frame::Audio(_))
                if !compare =>
            {
                Ok(())
            }
            (MediaParams::Video(params), Frame::Video(frame)) => {
                if video_changed(params, frame) && self.warnings_remaining > 0 {
                    self.warnings_remaining -= 1;
                    info!(
                        filter = self.descriptor.name,
                        width = frame.width,
                        height = frame.height,
                        format = %frame.format,
                        "Changing frame properties on the fly is not supported by all filters."
                    );
                }
                Ok(())
            }
            (MediaParams::Audio(params), Frame::Audio(frame)) => {
                if audio_changed(params, self.channel_layout(), frame) {
                    error!(
                        filter = self.descriptor.name,
                        sample_rate = frame.sample_rate,
                        format = %frame.format,
                        "Changing frame properties on the fly is not supported."
                    );
                    return Err(Error::invalid_argument(
                        "audio frame parameters differ from the configured stream",
                    ));
                }
                Ok(())
            }
            (_, frame) => {
                error!(
                    filter = self.descriptor.name,
                    frame = %frame.media_type(),
                    "frame media type does not match the source"
                );
                Err(Error::invalid_argument(format!(
                    "{} frame submitted to a {} source",
                    frame.media_type(),
                    self.media_type()
                )))
            }
        }
    }
}

fn video_changed(params: &VideoParams, frame: &VideoFrame) -> bool {
    params.width != frame.width
        || params.height != frame.height
        || params.pixel_format != frame.format
}

fn audio_changed(params: &AudioParams, layout: Option<ChannelLayout>, frame: &AudioFrame) -> bool {
    let expected = layout.unwrap_or(ChannelLayout::unspecified(params.channels));
    let actual = frame
        .channel_layout
        .unwrap_or(ChannelLayout::unspecified(frame.channels));
    params.sample_format != frame.format || params.sample_rate != frame.sample_rate || expected != actual
}

impl Drop for BufferSource {
    fn drop(&mut self) {
        let released = self.egress.release();
        trace!(filter = self.descriptor.name, released, "buffer source released");
    }
}

impl std::fmt::Debug for BufferSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferSource")
            .field("filter", &self.descriptor.name)
            .field("params", &self.params)
            .field("egress", &self.egress)
            .field("warnings_remaining", &self.warnings_remaining)
            .field("has_output", &self.output.is_some())
            .finish()
    }
}

static_assertions::assert_impl_all!(BufferSource: Send);
