/*!
    Pixel format, sample format and channel layout types.
*/

use std::fmt;
use std::str::FromStr;

use crate::Error;

/**
    Video pixel formats.

    This is a subset of formats commonly encountered in media pipelines.
    Not all FFmpeg pixel formats are represented. Each format has a stable
    numeric code, its position in [`PixelFormat::ALL`].
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    /// Planar YUV 4:2:0, 12bpp (most common video format)
    Yuv420p,
    /// Packed YUV 4:2:2, 16bpp, Y0 Cb Y1 Cr
    Yuyv422,
    /// Packed RGB, 24bpp
    Rgb24,
    /// Packed BGR, 24bpp
    Bgr24,
    /// Planar YUV 4:2:2, 16bpp
    Yuv422p,
    /// Planar YUV 4:4:4, 24bpp
    Yuv444p,
    /// Planar YUV 4:1:0, 9bpp
    Yuv410p,
    /// Planar YUV 4:1:1, 12bpp
    Yuv411p,
    /// Grayscale, 8bpp
    Gray8,
    /// Semi-planar YUV 4:2:0, 12bpp (common hardware decoder output)
    Nv12,
    /// Semi-planar YUV 4:2:0 with swapped chroma, 12bpp
    Nv21,
    /// Packed ARGB, 32bpp
    Argb,
    /// Packed RGBA, 32bpp
    Rgba,
    /// Packed ABGR, 32bpp
    Abgr,
    /// Packed BGRA, 32bpp
    Bgra,
    /// Planar YUV 4:2:0, 10-bit little-endian (HDR content)
    Yuv420p10,
}

impl PixelFormat {
    /// Every known pixel format, in code order.
    pub const ALL: [Self; 16] = [
        Self::Yuv420p,
        Self::Yuyv422,
        Self::Rgb24,
        Self::Bgr24,
        Self::Yuv422p,
        Self::Yuv444p,
        Self::Yuv410p,
        Self::Yuv411p,
        Self::Gray8,
        Self::Nv12,
        Self::Nv21,
        Self::Argb,
        Self::Rgba,
        Self::Abgr,
        Self::Bgra,
        Self::Yuv420p10,
    ];

    /**
        Returns the canonical lowercase name, as used in filter arguments.
    */
    pub const fn name(self) -> &'static str {
        match self {
            Self::Yuv420p => "yuv420p",
            Self::Yuyv422 => "yuyv422",
            Self::Rgb24 => "rgb24",
            Self::Bgr24 => "bgr24",
            Self::Yuv422p => "yuv422p",
            Self::Yuv444p => "yuv444p",
            Self::Yuv410p => "yuv410p",
            Self::Yuv411p => "yuv411p",
            Self::Gray8 => "gray",
            Self::Nv12 => "nv12",
            Self::Nv21 => "nv21",
            Self::Argb => "argb",
            Self::Rgba => "rgba",
            Self::Abgr => "abgr",
            Self::Bgra => "bgra",
            Self::Yuv420p10 => "yuv420p10le",
        }
    }

    /**
        Look up a pixel format by its canonical name.
    */
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /**
        Returns the stable numeric code of this format.
    */
    pub const fn code(self) -> u32 {
        self as u32
    }

    /**
        Look up a pixel format by numeric code. Out-of-range codes yield `None`.
    */
    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    /**
        Returns the number of bits per pixel for this format.

        For planar formats, this is the average bits per pixel.
    */
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            Self::Gray8 => 8,
            Self::Yuv410p => 9,
            Self::Yuv420p | Self::Yuv411p | Self::Nv12 | Self::Nv21 => 12,
            Self::Yuv420p10 => 15, // 10 bits * 1.5 planes average
            Self::Yuv422p | Self::Yuyv422 => 16,
            Self::Rgb24 | Self::Bgr24 | Self::Yuv444p => 24,
            Self::Argb | Self::Rgba | Self::Abgr | Self::Bgra => 32,
        }
    }

    /**
        Returns true if this is a planar format.
    */
    pub const fn is_planar(self) -> bool {
        match self {
            Self::Yuv420p
            | Self::Yuv422p
            | Self::Yuv444p
            | Self::Yuv410p
            | Self::Yuv411p
            | Self::Yuv420p10 => true,
            Self::Nv12 | Self::Nv21 => true, // semi-planar counts as planar
            Self::Yuyv422
            | Self::Gray8
            | Self::Argb
            | Self::Rgba
            | Self::Abgr
            | Self::Bgra
            | Self::Rgb24
            | Self::Bgr24 => false,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .ok_or_else(|| Error::unsupported_format(format!("unknown pixel format '{s}'")))
    }
}

/**
    Audio sample formats.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SampleFormat {
    /// Unsigned 8-bit integer
    U8,
    /// Signed 16-bit integer
    S16,
    /// Signed 32-bit integer
    S32,
    /// 32-bit floating point, range [-1.0, 1.0]
    F32,
    /// 64-bit floating point
    F64,
    /// Unsigned 8-bit integer, planar
    U8p,
    /// Signed 16-bit integer, planar
    S16p,
    /// Signed 32-bit integer, planar
    S32p,
    /// 32-bit floating point, planar
    F32p,
    /// 64-bit floating point, planar
    F64p,
}

impl SampleFormat {
    /// Every known sample format.
    pub const ALL: [Self; 10] = [
        Self::U8,
        Self::S16,
        Self::S32,
        Self::F32,
        Self::F64,
        Self::U8p,
        Self::S16p,
        Self::S32p,
        Self::F32p,
        Self::F64p,
    ];

    /**
        Returns the canonical name (`s16`, `fltp`, ...).
    */
    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::S16 => "s16",
            Self::S32 => "s32",
            Self::F32 => "flt",
            Self::F64 => "dbl",
            Self::U8p => "u8p",
            Self::S16p => "s16p",
            Self::S32p => "s32p",
            Self::F32p => "fltp",
            Self::F64p => "dblp",
        }
    }

    /**
        Look up a sample format by its canonical name.
    */
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /**
        Returns the number of bytes per sample.
    */
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            Self::U8 | Self::U8p => 1,
            Self::S16 | Self::S16p => 2,
            Self::S32 | Self::S32p | Self::F32 | Self::F32p => 4,
            Self::F64 | Self::F64p => 8,
        }
    }

    /**
        Returns true if this is a floating-point format.
    */
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64 | Self::F32p | Self::F64p)
    }

    /**
        Returns true if each channel is stored in its own plane.
    */
    pub const fn is_planar(self) -> bool {
        matches!(
            self,
            Self::U8p | Self::S16p | Self::S32p | Self::F32p | Self::F64p
        )
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SampleFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .ok_or_else(|| Error::unsupported_format(format!("unknown sample format '{s}'")))
    }
}

/**
    Audio channel layout.

    A layout is a bitmask of speaker positions. A layout with an empty
    mask but a known channel count is "unspecified": it only says how many
    channels there are, not where they go.
*/
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelLayout {
    mask: u64,
    channels: u16,
}

const FRONT_LEFT: u64 = 0x1;
const FRONT_RIGHT: u64 = 0x2;
const FRONT_CENTER: u64 = 0x4;
const LOW_FREQUENCY: u64 = 0x8;
const BACK_LEFT: u64 = 0x10;
const BACK_RIGHT: u64 = 0x20;
const BACK_CENTER: u64 = 0x100;
const SIDE_LEFT: u64 = 0x200;
const SIDE_RIGHT: u64 = 0x400;

impl ChannelLayout {
    pub const MONO: Self = Self::from_mask(FRONT_CENTER);
    pub const STEREO: Self = Self::from_mask(FRONT_LEFT | FRONT_RIGHT);
    pub const STEREO_LFE: Self = Self::from_mask(Self::STEREO.mask | LOW_FREQUENCY);
    pub const SURROUND: Self = Self::from_mask(Self::STEREO.mask | FRONT_CENTER);
    pub const QUAD: Self = Self::from_mask(Self::STEREO.mask | BACK_LEFT | BACK_RIGHT);
    pub const FOUR_POINT_ZERO: Self = Self::from_mask(Self::SURROUND.mask | BACK_CENTER);
    pub const FIVE_POINT_ZERO: Self =
        Self::from_mask(Self::SURROUND.mask | SIDE_LEFT | SIDE_RIGHT);
    pub const FIVE_POINT_ONE: Self = Self::from_mask(Self::FIVE_POINT_ZERO.mask | LOW_FREQUENCY);
    pub const SIX_POINT_ONE: Self = Self::from_mask(Self::FIVE_POINT_ONE.mask | BACK_CENTER);
    pub const SEVEN_POINT_ONE: Self =
        Self::from_mask(Self::FIVE_POINT_ONE.mask | BACK_LEFT | BACK_RIGHT);

    const NAMED: [(&'static str, Self); 10] = [
        ("mono", Self::MONO),
        ("stereo", Self::STEREO),
        ("2.1", Self::STEREO_LFE),
        ("3.0", Self::SURROUND),
        ("quad", Self::QUAD),
        ("4.0", Self::FOUR_POINT_ZERO),
        ("5.0", Self::FIVE_POINT_ZERO),
        ("5.1", Self::FIVE_POINT_ONE),
        ("6.1", Self::SIX_POINT_ONE),
        ("7.1", Self::SEVEN_POINT_ONE),
    ];

    /**
        Create a layout from a speaker bitmask.
    */
    pub const fn from_mask(mask: u64) -> Self {
        Self {
            mask,
            channels: mask.count_ones() as u16,
        }
    }

    /**
        Create an unspecified layout that only records a channel count.
    */
    pub const fn unspecified(channels: u16) -> Self {
        Self { mask: 0, channels }
    }

    /**
        Returns the conventional layout for a channel count, if there is one.
    */
    pub const fn default_for_channels(channels: u16) -> Option<Self> {
        match channels {
            1 => Some(Self::MONO),
            2 => Some(Self::STEREO),
            3 => Some(Self::SURROUND),
            4 => Some(Self::QUAD),
            5 => Some(Self::FIVE_POINT_ZERO),
            6 => Some(Self::FIVE_POINT_ONE),
            7 => Some(Self::SIX_POINT_ONE),
            8 => Some(Self::SEVEN_POINT_ONE),
            _ => None,
        }
    }

    /**
        Parse a layout description.

        Accepts a layout name (`stereo`, `5.1`, ...), a hexadecimal mask
        (`0x3`), a channel count with a `c` suffix (`2c`), or a bare
        decimal channel count. Counts map to the conventional layout for
        that count, or to an unspecified layout when there is none.
    */
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Some((_, layout)) = Self::NAMED.iter().find(|(n, _)| *n == name) {
            return Some(*layout);
        }
        if let Some(hex) = name.strip_prefix("0x").or_else(|| name.strip_prefix("0X")) {
            let mask = u64::from_str_radix(hex, 16).ok()?;
            return (mask != 0).then(|| Self::from_mask(mask));
        }
        let count = name
            .strip_suffix(" channels")
            .or_else(|| name.strip_suffix('c'))
            .unwrap_or(name);
        let count: u16 = count.parse().ok()?;
        if count == 0 {
            return None;
        }
        Some(Self::default_for_channels(count).unwrap_or(Self::unspecified(count)))
    }

    /**
        Returns the speaker bitmask, zero when unspecified.
    */
    pub const fn mask(self) -> u64 {
        self.mask
    }

    /**
        Returns the number of channels.
    */
    pub const fn channels(self) -> u16 {
        self.channels
    }

    /**
        Returns true if this layout carries a count but no speaker positions.
    */
    pub const fn is_unspecified(self) -> bool {
        self.mask == 0
    }

    /**
        Returns the conventional name of this layout, if it has one.
    */
    pub fn name(self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(_, layout)| *layout == self)
            .map(|(name, _)| *name)
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None if self.is_unspecified() => write!(f, "{} channels", self.channels),
            None => write!(f, "0x{:x}", self.mask),
        }
    }
}

impl FromStr for ChannelLayout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .ok_or_else(|| Error::unsupported_format(format!("unknown channel layout '{s}'")))
    }
}

impl fmt::Debug for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChannelLayout({self})")
    }
}
