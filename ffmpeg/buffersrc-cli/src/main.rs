use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use ffmpeg_buffersrc::{
    BufferSource, BufferSrcFlags, Error, FilterDescriptor, LinkProps, MediaParams, SinkLink,
};
use ffmpeg_types::{AudioFrame, ChannelLayout, Frame, Pts, VideoFrame};

const SAMPLES_PER_FRAME: usize = 1024;

#[derive(Parser, Debug)]
#[command(name = "bufsrc")]
#[command(about = "Feed synthetic frames through a buffer source and report what comes out")]
struct Args {
    /// Source filter: buffer (video) or abuffer (audio)
    #[arg(short, long, default_value = "buffer")]
    filter: String,

    /// Filter arguments, e.g. "video_size=320x240:pix_fmt=yuv420p:time_base=1/25"
    #[arg(short, long)]
    args: String,

    /// Number of frames to submit
    #[arg(short = 'n', long, default_value = "10")]
    frames: u32,

    /// Keep the producer's reference when submitting
    #[arg(long)]
    keep_ref: bool,

    /// Ask the output link for a frame after every submission
    #[arg(long)]
    push: bool,

    /// Skip frame parameter validation
    #[arg(long)]
    no_check_format: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn flags(&self) -> BufferSrcFlags {
        let mut flags = BufferSrcFlags::NONE;
        if self.keep_ref {
            flags |= BufferSrcFlags::KEEP_REF;
        }
        if self.push {
            flags |= BufferSrcFlags::PUSH;
        }
        if self.no_check_format {
            flags |= BufferSrcFlags::NO_CHECK_FORMAT;
        }
        flags
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let descriptor = FilterDescriptor::find(&args.filter)
        .with_context(|| format!("unknown filter '{}'", args.filter))?;
    info!("{}: {}", descriptor.name, descriptor.description);

    let mut source = BufferSource::from_filter(descriptor.name, &args.args)
        .with_context(|| format!("failed to initialize {}", descriptor.name))?;

    let mut link = LinkProps::new(descriptor.media_type);
    source.config_props(&mut link)?;
    debug!(?link, formats = ?source.query_formats(), "output link configured");

    let pushed = Arc::new(AtomicUsize::new(0));
    if args.push {
        let counter = Arc::clone(&pushed);
        let sink = move |frame: Frame| -> ffmpeg_buffersrc::Result<()> {
            debug!(pts = ?frame.pts(), "pushed downstream");
            counter.fetch_add(1, Ordering::Relaxed);
            Ok(())
        };
        source.set_output(Box::new(SinkLink::new(sink)));
    }

    let flags = args.flags();
    for index in 0..args.frames {
        let mut slot = Some(synthesize(&source, index));
        match source.submit(&mut slot, flags) {
            Ok(()) => {}
            Err(Error::Again) => warn!(index, "downstream had nothing to take"),
            Err(e) => return Err(e).context(format!("submitting frame {index}")),
        }
    }
    source.send_eof()?;

    let mut pulled = 0usize;
    let mut sink = |frame: Frame| -> ffmpeg_buffersrc::Result<()> {
        debug!(pts = ?frame.pts(), refs = frame.ref_count(), "pulled");
        pulled += 1;
        Ok(())
    };
    loop {
        match source.request_frame(&mut sink) {
            Ok(()) => {}
            Err(Error::Eof) => break,
            Err(e) => bail!("unexpected error while draining: {e}"),
        }
    }

    println!("filter:          {}", descriptor.name);
    println!("parameters:      {}", source.params());
    println!("submitted:       {}", args.frames);
    println!("pushed:          {}", pushed.load(Ordering::Relaxed));
    println!("pulled:          {pulled}");
    println!("failed requests: {}", source.failed_requests());
    println!("state:           {:?}", source.state());
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/**
    Build a blank frame matching the source's parameters.
*/
fn synthesize(source: &BufferSource, index: u32) -> Frame {
    let params = source.params();
    let pts = Some(Pts(i64::from(index)));

    match &params.media {
        MediaParams::Video(video) => {
            let bits = video.width as usize * video.height as usize
                * video.pixel_format.bits_per_pixel() as usize;
            VideoFrame::new(
                vec![0u8; bits.div_ceil(8)],
                video.width,
                video.height,
                video.pixel_format,
                pts,
                params.time_base,
            )
            .into()
        }
        MediaParams::Audio(audio) => {
            let layout = source
                .channel_layout()
                .unwrap_or(ChannelLayout::unspecified(audio.channels));
            let len = SAMPLES_PER_FRAME
                * audio.channels as usize
                * audio.sample_format.bytes_per_sample();
            AudioFrame::new(
                vec![0u8; len],
                SAMPLES_PER_FRAME,
                audio.sample_rate,
                layout,
                audio.sample_format,
                pts.map(|Pts(i)| Pts(i * SAMPLES_PER_FRAME as i64)),
                params.time_base,
            )
            .into()
        }
    }
}
