use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use ffmpeg_buffersrc::{
    BufferSource, BufferSrcFlags, Egress, Error, LinkProps, OutputLink, Result, SinkLink,
    SourceParams, SourceState, SupportedFormats,
};
use ffmpeg_types::{
    AudioFrame, ChannelLayout, Frame, MediaType, PixelFormat, Pts, Rational, SampleFormat,
    VideoFrame,
};

fn video_frame(width: u32, height: u32, format: PixelFormat, pts: i64) -> Frame {
    VideoFrame::new(
        vec![0u8; (width * height) as usize],
        width,
        height,
        format,
        Some(Pts(pts)),
        Rational::new(1, 25),
    )
    .into()
}

fn audio_frame(sample_rate: u32, layout: ChannelLayout, format: SampleFormat, pts: i64) -> Frame {
    let samples = 64;
    let len = samples * layout.channels() as usize * format.bytes_per_sample();
    AudioFrame::new(
        vec![0u8; len],
        samples,
        sample_rate,
        layout,
        format,
        Some(Pts(pts)),
        Rational::new(1, sample_rate as i32),
    )
    .into()
}

fn video_source() -> BufferSource {
    BufferSource::video("video_size=320x240:pix_fmt=yuv420p:time_base=1/25").unwrap()
}

fn audio_source() -> BufferSource {
    BufferSource::audio("sample_rate=48000:sample_fmt=s16:channel_layout=stereo").unwrap()
}

/// Counts requests and reports that nothing was consumed.
struct CountingLink {
    calls: Arc<AtomicUsize>,
}

impl OutputLink for CountingLink {
    fn request_frame(&mut self, _egress: &mut Egress) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::Again)
    }
}

#[test]
fn video_frames_come_out_in_order() {
    let mut source = video_source();
    for pts in 0..3 {
        let mut slot = Some(video_frame(320, 240, PixelFormat::Yuv420p, pts));
        source.submit(&mut slot, BufferSrcFlags::NONE).unwrap();
        assert!(slot.is_none());
    }
    assert_eq!(source.queued(), 3);

    for pts in 0..3 {
        assert_eq!(source.pull().unwrap().pts(), Some(Pts(pts)));
    }
    assert!(matches!(source.pull(), Err(Error::Again)));
    assert_eq!(source.failed_requests(), 1);

    source.submit(&mut None, BufferSrcFlags::NONE).unwrap();
    assert!(matches!(source.pull(), Err(Error::Eof)));
}

#[test]
fn audio_sample_rate_change_leaves_queue_empty() {
    let mut source = BufferSource::audio("sample_fmt=s16:sample_rate=48000:channels=2").unwrap();
    let mut slot = Some(audio_frame(44100, ChannelLayout::unspecified(2), SampleFormat::S16, 0));
    let err = source.submit(&mut slot, BufferSrcFlags::NONE).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(source.queued(), 0);
    assert_eq!(source.failed_requests(), 0);
}

#[test]
fn eof_drains_then_terminates() {
    let mut source = audio_source();
    source
        .add_frame(&mut Some(audio_frame(48000, ChannelLayout::STEREO, SampleFormat::S16, 0)))
        .unwrap();
    source.send_eof().unwrap();
    assert_eq!(source.state(), SourceState::EofPending);
    assert_eq!(source.poll_frame().unwrap(), 1);

    assert!(source.pull().is_ok());
    assert!(matches!(source.poll_frame(), Err(Error::Eof)));
    assert!(matches!(source.pull(), Err(Error::Eof)));
    assert!(matches!(source.pull(), Err(Error::Eof)));
    assert_eq!(source.state(), SourceState::Terminated);
    assert_eq!(source.failed_requests(), 0);
}

#[test]
fn submit_after_eof_is_rejected_and_slot_kept() {
    let mut source = video_source();
    source.send_eof().unwrap();

    let mut slot = Some(video_frame(320, 240, PixelFormat::Yuv420p, 0));
    let err = source.submit(&mut slot, BufferSrcFlags::NONE).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(slot.is_some());
    assert_eq!(source.queued(), 0);

    // A second end of stream is harmless
    source.send_eof().unwrap();
    assert!(source.is_eof());
}

#[test]
fn failed_requests_only_grow() {
    let mut source = video_source();
    let mut last = source.failed_requests();
    for pts in 0..4 {
        let _ = source.pull();
        assert!(source.failed_requests() >= last);
        last = source.failed_requests();
        source
            .write_frame(&video_frame(320, 240, PixelFormat::Yuv420p, pts))
            .unwrap();
        source.pull().unwrap();
        assert_eq!(source.failed_requests(), last);
    }
    assert_eq!(last, 4);
}

#[test]
fn move_submission_keeps_one_reference() {
    let mut source = video_source();
    let frame = video_frame(320, 240, PixelFormat::Yuv420p, 0);
    assert_eq!(frame.ref_count(), 1);

    let mut slot = Some(frame);
    source.submit(&mut slot, BufferSrcFlags::NONE).unwrap();
    assert!(slot.is_none());

    let pulled = source.pull().unwrap();
    assert_eq!(pulled.ref_count(), 1);
}

#[test]
fn keep_ref_twice_shares_the_payload() {
    let mut source = video_source();
    let mut slot = Some(video_frame(320, 240, PixelFormat::Yuv420p, 7));

    source.submit(&mut slot, BufferSrcFlags::KEEP_REF).unwrap();
    source.submit(&mut slot, BufferSrcFlags::KEEP_REF).unwrap();

    let caller = slot.take().unwrap();
    assert_eq!(caller.ref_count(), 3);

    let first = source.pull().unwrap();
    let second = source.pull().unwrap();
    assert!(first.shares_payload(&caller));
    assert!(second.shares_payload(&caller));
    assert_eq!(first.pts(), Some(Pts(7)));

    drop(first);
    drop(second);
    assert_eq!(caller.ref_count(), 1);
}

#[test]
fn write_frame_leaves_caller_frame_valid() {
    let mut source = audio_source();
    let frame = audio_frame(48000, ChannelLayout::STEREO, SampleFormat::S16, 0);
    source.write_frame(&frame).unwrap();
    assert_eq!(frame.ref_count(), 2);
    drop(source);
    assert_eq!(frame.ref_count(), 1);
}

#[test]
fn audio_rejects_any_parameter_change() {
    let mut source = audio_source();
    let changed = [
        audio_frame(44100, ChannelLayout::STEREO, SampleFormat::S16, 0),
        audio_frame(48000, ChannelLayout::STEREO, SampleFormat::F32, 0),
        audio_frame(48000, ChannelLayout::MONO, SampleFormat::S16, 0),
        audio_frame(48000, ChannelLayout::unspecified(2), SampleFormat::S16, 0),
    ];
    for frame in changed {
        let mut slot = Some(frame);
        let err = source.submit(&mut slot, BufferSrcFlags::NONE).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(slot.is_some());
    }
    assert_eq!(source.queued(), 0);

    let mut slot = Some(audio_frame(48000, ChannelLayout::STEREO, SampleFormat::S16, 1));
    source.submit(&mut slot, BufferSrcFlags::NONE).unwrap();
    assert_eq!(source.queued(), 1);
}

#[test]
fn audio_change_accepted_without_format_check() {
    let mut source = audio_source();
    let mut slot = Some(audio_frame(44100, ChannelLayout::MONO, SampleFormat::U8, 0));
    source
        .submit(&mut slot, BufferSrcFlags::NO_CHECK_FORMAT)
        .unwrap();
    assert_eq!(source.queued(), 1);
}

#[test]
fn audio_layout_must_match_data_channels() {
    let mut source = audio_source();
    let Frame::Audio(mut frame) = audio_frame(48000, ChannelLayout::STEREO, SampleFormat::S16, 0)
    else {
        unreachable!()
    };
    frame.channels = 3;

    let mut slot = Some(Frame::Audio(frame));
    let err = source
        .submit(&mut slot, BufferSrcFlags::NO_CHECK_FORMAT)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(slot.is_some());
}

#[test]
fn count_only_audio_accepts_unlabelled_frames() {
    let mut source = BufferSource::audio("sample_rate=8000:sample_fmt=flt:channels=2").unwrap();
    assert_eq!(source.channel_layout(), None);

    source
        .write_frame(&audio_frame(8000, ChannelLayout::unspecified(2), SampleFormat::F32, 0))
        .unwrap();
    let labelled = audio_frame(8000, ChannelLayout::STEREO, SampleFormat::F32, 1);
    assert!(source.write_frame(&labelled).is_err());
}

#[test]
fn video_changes_are_tolerated() {
    let mut source = video_source();
    assert_eq!(source.warnings_remaining(), 100);

    source
        .write_frame(&video_frame(640, 480, PixelFormat::Yuv420p, 0))
        .unwrap();
    source
        .write_frame(&video_frame(320, 240, PixelFormat::Rgb24, 1))
        .unwrap();
    assert_eq!(source.warnings_remaining(), 98);

    source
        .write_frame(&video_frame(320, 240, PixelFormat::Yuv420p, 2))
        .unwrap();
    assert_eq!(source.warnings_remaining(), 98);
    assert_eq!(source.queued(), 3);
}

#[test]
fn video_warning_budget_runs_out_quietly() {
    let mut source = video_source();
    for pts in 0..150 {
        source
            .write_frame(&video_frame(16, 16, PixelFormat::Gray8, pts))
            .unwrap();
    }
    assert_eq!(source.warnings_remaining(), 0);
    assert_eq!(source.queued(), 150);
}

#[test]
fn media_kind_mismatch_is_rejected() {
    let mut video = video_source();
    let mut slot = Some(audio_frame(48000, ChannelLayout::STEREO, SampleFormat::S16, 0));
    assert!(video.submit(&mut slot, BufferSrcFlags::NONE).is_err());
    assert!(video.submit(&mut slot, BufferSrcFlags::NO_CHECK_FORMAT).is_err());
    assert!(slot.is_some());
    assert_eq!(video.queued(), 0);

    let mut audio = audio_source();
    assert!(
        audio
            .write_frame(&video_frame(320, 240, PixelFormat::Yuv420p, 0))
            .is_err()
    );
}

#[test]
fn push_asks_the_link_once_and_propagates_its_error() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut source = video_source();
    source.set_output(Box::new(CountingLink {
        calls: Arc::clone(&calls),
    }));

    let mut slot = Some(video_frame(320, 240, PixelFormat::Yuv420p, 0));
    let err = source.submit(&mut slot, BufferSrcFlags::PUSH).unwrap_err();
    assert!(err.is_again());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(slot.is_none());
    assert_eq!(source.queued(), 1);

    source
        .submit(
            &mut Some(video_frame(320, 240, PixelFormat::Yuv420p, 1)),
            BufferSrcFlags::NONE,
        )
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn push_through_sink_link_delivers_immediately() {
    let delivered = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&delivered);
    let mut source = video_source();
    source.set_output(Box::new(SinkLink::new(move |_frame: Frame| -> Result<()> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })));

    for pts in 0..3 {
        let mut slot = Some(video_frame(320, 240, PixelFormat::Yuv420p, pts));
        source
            .submit(&mut slot, BufferSrcFlags::PUSH | BufferSrcFlags::KEEP_REF)
            .unwrap();
        assert!(slot.is_some());
    }
    assert_eq!(delivered.load(Ordering::SeqCst), 3);
    assert_eq!(source.queued(), 0);
}

#[test]
fn push_without_link_only_queues() {
    let mut source = video_source();
    let mut slot = Some(video_frame(320, 240, PixelFormat::Yuv420p, 0));
    source.submit(&mut slot, BufferSrcFlags::PUSH).unwrap();
    assert_eq!(source.queued(), 1);
}

#[test]
fn request_frame_delivers_to_sink() {
    let mut source = video_source();
    source
        .write_frame(&video_frame(320, 240, PixelFormat::Yuv420p, 3))
        .unwrap();

    let mut seen = Vec::new();
    let mut sink = |frame: Frame| -> Result<()> {
        seen.push(frame.pts());
        Ok(())
    };
    source.request_frame(&mut sink).unwrap();
    assert!(source.request_frame(&mut sink).unwrap_err().is_again());
    assert_eq!(seen, vec![Some(Pts(3))]);
}

#[test]
fn state_moves_forward() {
    let mut source = video_source();
    assert_eq!(source.state(), SourceState::Configured);
    let _ = source.poll_frame();
    assert_eq!(source.state(), SourceState::Configured);

    source
        .write_frame(&video_frame(320, 240, PixelFormat::Yuv420p, 0))
        .unwrap();
    assert_eq!(source.state(), SourceState::Active);

    source.send_eof().unwrap();
    assert_eq!(source.state(), SourceState::EofPending);
    source.pull().unwrap();
    assert_eq!(source.state(), SourceState::EofPending);
    let _ = source.pull();
    assert_eq!(source.state(), SourceState::Terminated);
}

#[test]
fn video_config_props_fill_the_link() {
    let mut source = BufferSource::video(
        "video_size=hd720:pix_fmt=rgb24:time_base=1/90000:frame_rate=30000/1001:pixel_aspect=1/1",
    )
    .unwrap();
    let mut link = LinkProps::new(MediaType::Video);
    source.config_props(&mut link).unwrap();

    assert_eq!((link.width, link.height), (1280, 720));
    assert_eq!(link.sample_aspect_ratio, Rational::new(1, 1));
    assert_eq!(link.time_base, Rational::new(1, 90000));
    assert_eq!(link.frame_rate, Rational::new(30000, 1001));
    assert_eq!(
        source.query_formats(),
        SupportedFormats::Video {
            pixel_format: PixelFormat::Rgb24
        }
    );
}

#[test]
fn config_props_rejects_wrong_link_type() {
    let mut source = video_source();
    let mut link = LinkProps::new(MediaType::Audio);
    assert!(matches!(
        source.config_props(&mut link),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn audio_config_props_publishes_configured_layout() {
    let mut source = audio_source();
    let mut link = LinkProps::new(MediaType::Audio);
    source.config_props(&mut link).unwrap();
    assert_eq!(link.channel_layout, Some(ChannelLayout::STEREO));
    assert_eq!(link.time_base, Rational::new(1, 48000));
}

#[test]
fn audio_inherits_layout_from_link() {
    let mut source = BufferSource::audio("sample_rate=48000:sample_fmt=s16:channels=6").unwrap();
    assert_eq!(
        source.query_formats(),
        SupportedFormats::Audio {
            sample_format: SampleFormat::S16,
            sample_rate: 48000,
            channel_layout: ChannelLayout::unspecified(6),
        }
    );

    let mut link = LinkProps::new(MediaType::Audio);
    link.channel_layout = Some(ChannelLayout::FIVE_POINT_ONE);
    source.config_props(&mut link).unwrap();
    assert_eq!(source.channel_layout(), Some(ChannelLayout::FIVE_POINT_ONE));

    // Frames must now carry the negotiated layout
    source
        .write_frame(&audio_frame(48000, ChannelLayout::FIVE_POINT_ONE, SampleFormat::S16, 0))
        .unwrap();
    assert!(
        source
            .write_frame(&audio_frame(48000, ChannelLayout::unspecified(6), SampleFormat::S16, 1))
            .is_err()
    );
}

#[test]
fn audio_link_layout_with_other_count_is_rejected() {
    let mut source = BufferSource::audio("sample_rate=48000:sample_fmt=s16:channels=6").unwrap();
    let mut link = LinkProps::new(MediaType::Audio);
    link.channel_layout = Some(ChannelLayout::STEREO);
    assert!(source.config_props(&mut link).is_err());
    assert_eq!(source.channel_layout(), None);
}

#[test]
fn sources_by_filter_name() {
    let video = BufferSource::from_filter("buffer", "320:240:yuv420p:1:25:1:1").unwrap();
    assert_eq!(video.media_type(), MediaType::Video);
    assert_eq!(video.descriptor().name, "buffer");

    let audio =
        BufferSource::from_filter("abuffer", "sample_rate=44100:sample_fmt=fltp:channels=1")
            .unwrap();
    assert_eq!(audio.media_type(), MediaType::Audio);
    assert_eq!(audio.channel_layout(), None);
    assert_eq!(audio.params().time_base, Rational::new(1, 44100));

    assert!(BufferSource::from_filter("nullsrc", "").is_err());
}

#[test]
fn defaults_fill_in_missing_arguments() {
    let video = BufferSource::video("time_base=1/25:frame_rate=25").unwrap();
    let params = video.params().as_video().unwrap();
    assert_eq!((params.width, params.height), (0, 0));
    assert_eq!(params.pixel_format.code(), 0);

    let mut audio = BufferSource::audio("sample_fmt=s16:channels=2").unwrap();
    assert_eq!(audio.params().as_audio().unwrap().sample_rate, 0);
    assert!(audio.params().time_base.is_zero());
    assert_eq!(
        audio.query_formats(),
        SupportedFormats::Audio {
            sample_format: SampleFormat::S16,
            sample_rate: 0,
            channel_layout: ChannelLayout::unspecified(2),
        }
    );

    let mut link = LinkProps::new(MediaType::Audio);
    audio.config_props(&mut link).unwrap();
    assert!(link.time_base.is_zero());
}

#[test]
fn write_frame_keeps_the_callers_reference() {
    let mut source = video_source();
    let frame = video_frame(320, 240, PixelFormat::Yuv420p, 4);
    source.write_frame(&frame).unwrap();
    source.write_frame(&frame).unwrap();
    assert_eq!(frame.ref_count(), 3);

    let pulled = source.pull().unwrap();
    assert!(pulled.shares_payload(&frame));
    assert_eq!(pulled.pts(), Some(Pts(4)));
}

#[test]
fn built_from_params() {
    let params = SourceParams::video(64, 48, PixelFormat::Nv12, Rational::new(1, 30))
        .with_frame_rate(Rational::new(30, 1));
    let mut source = BufferSource::new(params);
    source
        .write_frame(&video_frame(64, 48, PixelFormat::Nv12, 0))
        .unwrap();
    assert_eq!(source.warnings_remaining(), 100);
}

#[test]
fn bad_arguments_fail_construction() {
    assert!(BufferSource::video("").is_err());
    assert!(BufferSource::video("320:240:yuv420p").is_err());
    assert!(BufferSource::video("video_size=320x240:bogus=1").is_err());
    assert!(BufferSource::audio("sample_rate=48000:channels=2").is_err());
    assert!(BufferSource::audio("sample_rate=48000:sample_fmt=s16").is_err());
    assert!(
        BufferSource::audio("sample_rate=48000:sample_fmt=s16:channels=1:channel_layout=stereo")
            .is_err()
    );
}
