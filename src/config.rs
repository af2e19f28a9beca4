use crate::error::SimError;

pub const KB: usize = 1024;

/// 4KB pages; frame size equals page size.
pub const PAGE_SIZE: usize = 4 * KB;

pub const MIN_BURST_TIME: u32 = 1;
pub const MAX_BURST_TIME: u32 = 30;

pub const MIN_PROCESS_SIZE_KB: usize = 1;
pub const MAX_PROCESS_SIZE_KB: usize = 32;

pub const MIN_FRAMES: usize = 4;
pub const MAX_FRAMES: usize = 32;
pub const DEFAULT_FRAMES: usize = 16;

pub const MIN_TIME_QUANTUM: u32 = 1;
pub const MAX_TIME_QUANTUM: u32 = 10;
pub const DEFAULT_TIME_QUANTUM: u32 = 3;

/// CPU scheduling discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuAlgorithm {
    Fcfs,
    RoundRobin,
}

impl std::fmt::Display for CpuAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CpuAlgorithm::Fcfs => write!(f, "FCFS"),
            CpuAlgorithm::RoundRobin => write!(f, "RR"),
        }
    }
}

/// Page replacement discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementAlgorithm {
    Fifo,
    Lru,
}

impl std::fmt::Display for ReplacementAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplacementAlgorithm::Fifo => write!(f, "FIFO"),
            ReplacementAlgorithm::Lru => write!(f, "LRU"),
        }
    }
}

/// Validated CPU scheduler configuration.
#[derive(Debug, Clone, Copy)]
pub struct CpuConfig {
    pub algorithm: CpuAlgorithm,
    pub time_quantum: u32,
}

impl CpuConfig {
    pub fn new(algorithm: CpuAlgorithm, time_quantum: u32) -> Result<Self, SimError> {
        if !(MIN_TIME_QUANTUM..=MAX_TIME_QUANTUM).contains(&time_quantum) {
            return Err(SimError::InvalidParameter(format!(
                "time quantum {} outside [{}, {}]",
                time_quantum, MIN_TIME_QUANTUM, MAX_TIME_QUANTUM
            )));
        }
        Ok(CpuConfig { algorithm, time_quantum })
    }
}

impl Default for CpuConfig {
    fn default() -> Self {
        CpuConfig {
            algorithm: CpuAlgorithm::Fcfs,
            time_quantum: DEFAULT_TIME_QUANTUM,
        }
    }
}

/// Validated memory manager configuration.
#[derive(Debug, Clone, Copy)]
pub struct MemoryConfig {
    pub total_frames: usize,
    pub algorithm: ReplacementAlgorithm,
}

impl MemoryConfig {
    pub fn new(total_frames: usize, algorithm: ReplacementAlgorithm) -> Result<Self, SimError> {
        if !(MIN_FRAMES..=MAX_FRAMES).contains(&total_frames) {
            return Err(SimError::InvalidParameter(format!(
                "frame count {} outside [{}, {}]",
                total_frames, MIN_FRAMES, MAX_FRAMES
            )));
        }
        Ok(MemoryConfig { total_frames, algorithm })
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        MemoryConfig {
            total_frames: DEFAULT_FRAMES,
            algorithm: ReplacementAlgorithm::Fifo,
        }
    }
}
