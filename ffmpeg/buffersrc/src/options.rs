/*!
    Parsing of `buffer` and `abuffer` initialization arguments.

    Option strings are `key=value` pairs separated by `:`. The video source
    also accepts the positional form `W:H:pix_fmt:tb_num:tb_den:par_num:par_den`.
*/

use ffmpeg_types::{ChannelLayout, PixelFormat, Rational, SampleFormat};

use crate::params::{AudioParams, MediaParams, SourceParams, VideoParams, default_audio_time_base};
use crate::{Error, Result};

const VIDEO_KEYS: &[&str] = &[
    "time_base",
    "frame_rate",
    "video_size",
    "pix_fmt",
    "pixel_aspect",
    "sws_param",
];

const AUDIO_KEYS: &[&str] = &[
    "time_base",
    "sample_rate",
    "sample_fmt",
    "channels",
    "channel_layout",
];

const POSITIONAL_FIELDS: usize = 7;

/**
    Parsed `key=value` list. Later occurrences of a key win.
*/
struct OptionList<'a> {
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> OptionList<'a> {
    fn parse(args: &'a str, known: &[&str]) -> Result<Self> {
        let mut pairs = Vec::new();
        for pair in args.split(':').filter(|p| !p.trim().is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                Error::invalid_argument(format!(
                    "Missing key or no key/value separator found after key '{pair}'"
                ))
            })?;
            let key = key.trim();
            if !known.contains(&key) {
                return Err(Error::invalid_argument(format!("Option '{key}' not found")));
            }
            pairs.push((key, value.trim()));
        }
        Ok(Self { pairs })
    }

    fn get(&self, key: &str) -> Option<&'a str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    fn parse_with<T>(&self, key: &str, f: impl FnOnce(&str) -> Result<T>) -> Result<Option<T>> {
        self.get(key).map(f).transpose()
    }
}

/**
    Parse the arguments of the video `buffer` source.

    A `=` before the first `:` selects the `key=value` form; anything else
    is read as the seven positional fields.
*/
pub fn parse_video_args(args: &str) -> Result<SourceParams> {
    let args = args.trim();
    if args.is_empty() {
        return Err(Error::invalid_argument("Arguments required"));
    }

    let colon = args.find(':');
    let equal = args.find('=');
    match equal {
        Some(eq) if colon.is_none_or(|c| eq < c) => parse_video_key_values(args),
        _ => parse_video_positional(args),
    }
}

fn parse_video_key_values(args: &str) -> Result<SourceParams> {
    let options = OptionList::parse(args, VIDEO_KEYS)?;

    // Unset size is 0x0; unset pixel format is code 0
    let (width, height) = options
        .parse_with("video_size", parse_video_size)?
        .unwrap_or((0, 0));
    let pixel_format = options
        .parse_with("pix_fmt", parse_pixel_format)?
        .unwrap_or(PixelFormat::ALL[0]);

    Ok(SourceParams {
        time_base: options.parse_with("time_base", parse_rational)?.unwrap_or_default(),
        frame_rate: options.parse_with("frame_rate", parse_rational)?.unwrap_or_default(),
        media: MediaParams::Video(VideoParams {
            width,
            height,
            pixel_format,
            pixel_aspect: options
                .parse_with("pixel_aspect", parse_rational)?
                .unwrap_or_default(),
            scaler_params: options.get("sws_param").map(str::to_owned),
        }),
    })
}

fn parse_video_positional(args: &str) -> Result<SourceParams> {
    let fields: Vec<&str> = args.split(':').map(str::trim).collect();
    if fields.len() != POSITIONAL_FIELDS {
        return Err(Error::invalid_argument(format!(
            "Expected {POSITIONAL_FIELDS} arguments, but {} found in '{args}'",
            fields.len()
        )));
    }

    let dimension = |s: &str, what: &str| {
        s.parse::<u32>()
            .map_err(|_| Error::invalid_argument(format!("Invalid {what} '{s}' in '{args}'")))
    };
    let integer = |s: &str, what: &str| {
        s.parse::<i64>()
            .map_err(|_| Error::invalid_argument(format!("Invalid {what} '{s}' in '{args}'")))
    };
    let ratio = |num: &str, den: &str, what: &str| -> Result<Rational> {
        Rational::reduced(integer(num, what)?, integer(den, what)?)
            .ok_or_else(|| Error::invalid_argument(format!("Invalid {what} {num}/{den}")))
    };

    Ok(SourceParams {
        time_base: ratio(fields[3], fields[4], "time base")?,
        frame_rate: Rational::ZERO,
        media: MediaParams::Video(VideoParams {
            width: dimension(fields[0], "width")?,
            height: dimension(fields[1], "height")?,
            pixel_format: parse_pixel_format(fields[2])?,
            pixel_aspect: ratio(fields[5], fields[6], "pixel aspect")?,
            scaler_params: None,
        }),
    })
}

/**
    Parse the arguments of the audio `abuffer` source (`key=value` only).
*/
pub fn parse_audio_args(args: &str) -> Result<SourceParams> {
    let options = OptionList::parse(args.trim(), AUDIO_KEYS)?;

    let sample_format = match options.get("sample_fmt") {
        Some(name) => SampleFormat::from_name(name)
            .ok_or_else(|| Error::invalid_argument(format!("Invalid sample format '{name}'")))?,
        None => return Err(Error::invalid_argument("Invalid sample format '(null)'")),
    };
    let sample_rate = options
        .parse_with("sample_rate", |s| parse_unsigned(s, "sample rate"))?
        .unwrap_or(0);
    let channels = options
        .parse_with("channels", |s| parse_unsigned(s, "channel count"))?
        .map(u16::try_from)
        .transpose()
        .map_err(|_| Error::invalid_argument("Channel count out of range"))?;
    let layout = options.parse_with("channel_layout", |s| {
        ChannelLayout::from_name(s)
            .ok_or_else(|| Error::invalid_argument(format!("Invalid channel layout '{s}'")))
    })?;

    let audio = AudioParams::new(sample_format, sample_rate, channels, layout)?;

    let time_base = match options.parse_with("time_base", parse_rational)? {
        Some(tb) if !tb.is_zero() => tb,
        _ => default_audio_time_base(sample_rate),
    };

    Ok(SourceParams {
        time_base,
        frame_rate: Rational::ZERO,
        media: MediaParams::Audio(audio),
    })
}

/**
    Resolve a pixel format from its name or its decimal code.
*/
pub fn parse_pixel_format(s: &str) -> Result<PixelFormat> {
    PixelFormat::from_name(s)
        .or_else(|| s.parse::<i64>().ok().and_then(PixelFormat::from_code))
        .ok_or_else(|| Error::invalid_argument(format!("Invalid pixel format string '{s}'")))
}

/**
    Parse `WxH` or a standard size abbreviation such as `vga` or `hd720`.
*/
pub fn parse_video_size(s: &str) -> Result<(u32, u32)> {
    const ABBREVIATIONS: &[(&str, u32, u32)] = &[
        ("ntsc", 720, 480),
        ("pal", 720, 576),
        ("qntsc", 352, 240),
        ("qpal", 352, 288),
        ("sqcif", 128, 96),
        ("qcif", 176, 144),
        ("cif", 352, 288),
        ("4cif", 704, 576),
        ("qqvga", 160, 120),
        ("qvga", 320, 240),
        ("vga", 640, 480),
        ("svga", 800, 600),
        ("xga", 1024, 768),
        ("sxga", 1280, 1024),
        ("hd480", 852, 480),
        ("hd720", 1280, 720),
        ("hd1080", 1920, 1080),
        ("2k", 2048, 1080),
        ("uhd2160", 3840, 2160),
        ("4k", 4096, 2160),
    ];

    if let Some(&(_, w, h)) = ABBREVIATIONS.iter().find(|(name, _, _)| *name == s) {
        return Ok((w, h));
    }

    let invalid = || Error::invalid_argument(format!("Invalid video size '{s}'"));
    let (w, h) = s.split_once(['x', 'X']).ok_or_else(invalid)?;
    let w: u32 = w.parse().map_err(|_| invalid())?;
    let h: u32 = h.parse().map_err(|_| invalid())?;
    if w == 0 || h == 0 {
        return Err(invalid());
    }
    Ok((w, h))
}

fn parse_rational(s: &str) -> Result<Rational> {
    s.parse::<Rational>().map_err(Error::from)
}

fn parse_unsigned(s: &str, what: &str) -> Result<u32> {
    s.parse::<u32>()
        .map_err(|_| Error::invalid_argument(format!("Invalid {what} '{s}'")))
}
