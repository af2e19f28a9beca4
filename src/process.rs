use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{
    KB, MAX_BURST_TIME, MAX_PROCESS_SIZE_KB, MIN_BURST_TIME, MIN_PROCESS_SIZE_KB, PAGE_SIZE,
};
use crate::error::SimError;

/// Monotonic process identifier. Identity only; never affects scheduling
/// or eviction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid(pub u32);

impl std::fmt::Display for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    New,
    Ready,
    Running,
    Waiting,
    Terminated,
}

/// A simulated process: CPU demand plus the page stream it touches while
/// running, one page per simulated time unit.
#[derive(Debug, Clone)]
pub struct Process {
    pub pid: Pid,
    pub name: String,
    pub burst_time: u32,
    pub remaining_time: u32,
    pub size_kb: usize,
    pub page_count: u32,
    /// page_number -> frame index, present only while the page is resident.
    pub page_table: HashMap<u32, usize>,
    pub state: ProcessState,
    access_sequence: Vec<u32>,
    cursor: usize,
}

impl Process {
    /// Create a process with a deterministically generated access sequence.
    ///
    /// Fails with `InvalidParameter` when burst time or size fall outside the
    /// documented bounds. The sequence is seeded from (pid, burst, size), so
    /// a fixed input set always replays the identical page stream.
    pub fn new(pid: Pid, name: &str, burst_time: u32, size_kb: usize) -> Result<Self, SimError> {
        if !(MIN_BURST_TIME..=MAX_BURST_TIME).contains(&burst_time) {
            return Err(SimError::InvalidParameter(format!(
                "burst time {} outside [{}, {}]",
                burst_time, MIN_BURST_TIME, MAX_BURST_TIME
            )));
        }
        if !(MIN_PROCESS_SIZE_KB..=MAX_PROCESS_SIZE_KB).contains(&size_kb) {
            return Err(SimError::InvalidParameter(format!(
                "process size {}KB outside [{}KB, {}KB]",
                size_kb, MIN_PROCESS_SIZE_KB, MAX_PROCESS_SIZE_KB
            )));
        }

        let page_count = ((size_kb * KB).div_ceil(PAGE_SIZE)) as u32;
        let access_sequence = generate_access_sequence(pid, burst_time, size_kb, page_count);

        Ok(Process {
            pid,
            name: name.to_string(),
            burst_time,
            remaining_time: burst_time,
            size_kb,
            page_count,
            page_table: HashMap::new(),
            state: ProcessState::New,
            access_sequence,
            cursor: 0,
        })
    }

    /// Replace the generated access sequence with an explicit one.
    ///
    /// The sequence must have exactly one entry per burst unit and may only
    /// name pages the process owns.
    pub fn with_access_sequence(mut self, sequence: Vec<u32>) -> Result<Self, SimError> {
        if sequence.len() != self.burst_time as usize {
            return Err(SimError::InvalidParameter(format!(
                "access sequence length {} does not match burst time {}",
                sequence.len(),
                self.burst_time
            )));
        }
        if let Some(&page) = sequence.iter().find(|&&p| p >= self.page_count) {
            return Err(SimError::InvalidParameter(format!(
                "access sequence names page {} but process has {} pages",
                page, self.page_count
            )));
        }
        self.access_sequence = sequence;
        Ok(self)
    }

    /// Next page in the access stream; advances the cursor.
    pub fn next_page_access(&mut self) -> Result<u32, SimError> {
        match self.access_sequence.get(self.cursor) {
            Some(&page) => {
                self.cursor += 1;
                Ok(page)
            }
            None => Err(SimError::SequenceExhausted {
                pid: self.pid,
                burst_time: self.burst_time,
            }),
        }
    }

    /// Reduce remaining burst time, clamped at zero.
    pub fn decrement_remaining(&mut self, units: u32) {
        self.remaining_time = self.remaining_time.saturating_sub(units);
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_time == 0
    }

    pub fn access_sequence(&self) -> &[u32] {
        &self.access_sequence
    }
}

/// Generate a page access sequence with locality of reference: 70% of
/// accesses stay on the current page or a neighbour, 30% jump uniformly.
fn generate_access_sequence(pid: Pid, burst_time: u32, size_kb: usize, page_count: u32) -> Vec<u32> {
    let seed = ((pid.0 as u64) << 40) ^ ((burst_time as u64) << 20) ^ (size_kb as u64);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut current: u32 = 0;
    (0..burst_time)
        .map(|_| {
            if page_count > 1 && rng.gen_range(0.0..1.0) < 0.7 {
                let lo = current.saturating_sub(1);
                let hi = (current + 1).min(page_count - 1);
                current = rng.gen_range(lo..=hi);
            } else {
                current = rng.gen_range(0..page_count);
            }
            current
        })
        .collect()
}
