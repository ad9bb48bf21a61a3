use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ria_vision_core::FramePair;

#[derive(Debug, Default)]
struct SlotState {
    latest: Option<Arc<FramePair>>,
    dirty: bool,
    published: u64,
    dropped: u64,
}

/// Single "latest frame" slot shared between capture and the decision cycle.
///
/// There is no queue: a frame published before the previous one was taken
/// replaces it and is counted as dropped. Replacement and consumption happen
/// under one short critical section, so a reader never sees a half-written
/// pair.
#[derive(Debug, Default)]
pub struct FrameSlot {
    state: Mutex<SlotState>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the latest frame and mark the slot dirty.
    pub fn publish(&self, frame: FramePair) {
        let frame = Arc::new(frame);
        let mut state = self.lock();
        if state.dirty {
            state.dropped += 1;
        }
        state.latest = Some(frame);
        state.dirty = true;
        state.published += 1;
    }

    /// Take a snapshot of the latest frame if it has not been consumed yet.
    pub fn take(&self) -> Option<Arc<FramePair>> {
        let mut state = self.lock();
        if !state.dirty {
            return None;
        }
        state.dirty = false;
        state.latest.clone()
    }

    /// Latest frame regardless of the dirty flag.
    pub fn latest(&self) -> Option<Arc<FramePair>> {
        self.lock().latest.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.lock().dirty
    }

    pub fn published(&self) -> u64 {
        self.lock().published
    }

    /// Frames overwritten before any cycle consumed them.
    pub fn dropped(&self) -> u64 {
        self.lock().dropped
    }
}
