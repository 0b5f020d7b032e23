/*!
    Submission flags.
*/

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/**
    Flags accepted by [`BufferSource::submit`](crate::BufferSource::submit).

    Bit values are part of the public interface and never change.
    Bit `2` is reserved and unused.
*/
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BufferSrcFlags(u32);

impl BufferSrcFlags {
    /// No flags: take ownership, check format, do not push.
    pub const NONE: Self = Self(0);
    /// Skip the parameter consistency check against the configured stream.
    pub const NO_CHECK_FORMAT: Self = Self(1);
    /// After enqueueing, invoke the downstream request once.
    pub const PUSH: Self = Self(4);
    /// Leave the caller's frame in place and queue a reference clone instead.
    pub const KEEP_REF: Self = Self(8);

    const KNOWN: u32 = Self::NO_CHECK_FORMAT.0 | Self::PUSH.0 | Self::KEEP_REF.0;

    /**
        Returns the raw bit value.
    */
    pub const fn bits(self) -> u32 {
        self.0
    }

    /**
        Create flags from raw bits, rejecting unknown bits.
    */
    pub const fn from_bits(bits: u32) -> Option<Self> {
        if bits & !Self::KNOWN != 0 {
            None
        } else {
            Some(Self(bits))
        }
    }

    /**
        Returns true if every bit in `other` is set in `self`.
    */
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for BufferSrcFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for BufferSrcFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for BufferSrcFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Self::NO_CHECK_FORMAT, "NO_CHECK_FORMAT"),
            (Self::PUSH, "PUSH"),
            (Self::KEEP_REF, "KEEP_REF"),
        ];
        let mut set = names.iter().filter(|(flag, _)| self.contains(*flag));
        match set.next() {
            None => f.write_str("NONE"),
            Some((_, first)) => {
                f.write_str(first)?;
                for (_, name) in set {
                    write!(f, " | {name}")?;
                }
                Ok(())
            }
        }
    }
}
