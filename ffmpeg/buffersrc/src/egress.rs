/*!
    Consumer side of the buffer source: queue, end-of-stream state and
    the failed request counter.
*/

use ffmpeg_types::Frame;
use tracing::trace;

use crate::queue::FrameQueue;
use crate::{Error, Result};

/**
    Lifecycle state of a buffer source.

    Transitions only move forward: `Configured` → `Active` → `EofPending`
    → `Terminated`. Construction is initialization, so there is no
    uninitialized state.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceState {
    /// Initialized, nothing submitted or pulled yet.
    Configured,
    /// At least one submit or pull has happened.
    Active,
    /// End of stream was signalled; queued frames may remain.
    EofPending,
    /// End of stream was signalled and reported to the consumer.
    Terminated,
}

/**
    The queue and end-of-stream bookkeeping, as seen by the consumer.

    Downstream links receive a mutable reference to this when a `PUSH`
    submission asks them to request a frame.
*/
#[derive(Debug)]
pub struct Egress {
    queue: FrameQueue,
    state: SourceState,
    failed_requests: u64,
}

impl Egress {
    pub(crate) fn new() -> Self {
        Self {
            queue: FrameQueue::new(),
            state: SourceState::Configured,
            failed_requests: 0,
        }
    }

    /**
        Take the frame at the head of the queue.

        Returns [`Error::Eof`] once the queue is drained after end of
        stream, and [`Error::Again`] when the queue is empty but the
        stream is still live. Each `Again` bumps the failed request count.
    */
    pub fn pull(&mut self) -> Result<Frame> {
        self.activate();
        if let Some(frame) = self.queue.pop() {
            return Ok(frame);
        }
        if self.is_eof() {
            self.state = SourceState::Terminated;
            return Err(Error::Eof);
        }
        self.failed_requests += 1;
        trace!(failed_requests = self.failed_requests, "pull on empty buffer source");
        Err(Error::Again)
    }

    /**
        Non-destructive probe: the queue depth, or [`Error::Eof`] when the
        queue is empty and the stream has ended.
    */
    pub fn poll(&self) -> Result<usize> {
        if self.queue.is_empty() && self.is_eof() {
            return Err(Error::Eof);
        }
        Ok(self.queue.len())
    }

    /// Number of frames currently queued.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Number of pulls that found the queue empty before end of stream.
    pub fn failed_requests(&self) -> u64 {
        self.failed_requests
    }

    pub fn state(&self) -> SourceState {
        self.state
    }

    pub fn is_eof(&self) -> bool {
        self.state >= SourceState::EofPending
    }

    pub(crate) fn activate(&mut self) {
        if self.state == SourceState::Configured {
            self.state = SourceState::Active;
        }
    }

    pub(crate) fn mark_eof(&mut self) {
        if self.state < SourceState::EofPending {
            self.state = SourceState::EofPending;
        }
    }

    pub(crate) fn enqueue(&mut self, frame: Frame) -> std::result::Result<(), Frame> {
        self.queue.push(frame)
    }

    pub(crate) fn release(&mut self) -> usize {
        self.queue.clear()
    }
}
