use thiserror::Error;

use crate::process::Pid;

/// Simulation error taxonomy.
///
/// `InvalidParameter` is the only error a correctly written caller can see;
/// it is raised at setup time, before a simulation starts. The remaining
/// variants signal internal invariant breaks: the scheduling and fault paths
/// are built so that they never occur, and the test suite asserts as much.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("no free frame available (eviction must precede allocation)")]
    OutOfMemory,

    #[error("process {pid} requested a page access beyond its {burst_time}-unit sequence")]
    SequenceExhausted { pid: Pid, burst_time: u32 },

    #[error("replacement policy asked for a victim with no resident pages")]
    NoVictimAvailable,
}
