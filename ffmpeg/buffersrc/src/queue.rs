/*!
    FIFO of frame handles between the producer and consumer sides.
*/

use std::collections::VecDeque;

use ffmpeg_types::Frame;

/**
    First-in-first-out queue of frames.

    Grows on demand with no capacity limit. Growth is fallible: a push
    that cannot allocate hands the frame back instead of aborting.
    Not synchronized; the owning stage serializes access.
*/
#[derive(Debug, Default)]
pub struct FrameQueue {
    frames: VecDeque<Frame>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /**
        Append a frame at the tail.

        Returns the frame back if the queue could not grow.
    */
    pub fn push(&mut self, frame: Frame) -> Result<(), Frame> {
        if self.frames.try_reserve(1).is_err() {
            return Err(frame);
        }
        self.frames.push_back(frame);
        Ok(())
    }

    /**
        Remove the frame at the head, if any.
    */
    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop_front()
    }

    /**
        Drop every queued frame and release the storage.

        Returns how many frames were released.
    */
    pub fn clear(&mut self) -> usize {
        let released = self.frames.len();
        self.frames = VecDeque::new();
        released
    }
}
