use crate::error::SimError;
use crate::process::Pid;

/// Contents of an occupied frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameEntry {
    pub pid: Pid,
    pub page: u32,
    /// Logical tick at which the frame was allocated.
    pub allocated_at: u64,
}

/// Fixed-size frame table. Pure resource ledger: tracks which frame holds
/// which (process, page) pair, no replacement logic.
#[derive(Debug)]
pub struct PhysicalMemory {
    frames: Vec<Option<FrameEntry>>,
}

impl PhysicalMemory {
    pub fn new(total_frames: usize) -> Self {
        PhysicalMemory {
            frames: vec![None; total_frames],
        }
    }

    pub fn total_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> Option<&FrameEntry> {
        self.frames.get(index).and_then(|f| f.as_ref())
    }

    /// Claim the first free frame for (pid, page).
    ///
    /// The caller must have evicted first when memory is full; `OutOfMemory`
    /// here means that precondition was broken.
    pub fn allocate_frame(&mut self, pid: Pid, page: u32, now: u64) -> Result<usize, SimError> {
        let index = self
            .frames
            .iter()
            .position(|f| f.is_none())
            .ok_or(SimError::OutOfMemory)?;
        self.frames[index] = Some(FrameEntry { pid, page, allocated_at: now });
        Ok(index)
    }

    /// Release a frame. No-op when the slot is already free.
    pub fn free_frame(&mut self, index: usize) {
        if let Some(slot) = self.frames.get_mut(index) {
            *slot = None;
        }
    }

    pub fn is_full(&self) -> bool {
        self.frames.iter().all(|f| f.is_some())
    }

    pub fn used_frames(&self) -> usize {
        self.frames.iter().filter(|f| f.is_some()).count()
    }

    pub fn free_frames(&self) -> usize {
        self.frames.len() - self.used_frames()
    }

    /// Fraction of frames occupied, in [0, 1].
    pub fn utilization(&self) -> f64 {
        self.used_frames() as f64 / self.frames.len() as f64
    }
}
