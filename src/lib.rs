pub mod config;
pub mod error;
pub mod memory;
pub mod memory_manager;
pub mod process;
pub mod replacement;
pub mod scheduler;
pub mod simulation;

// Re-export commonly used items for convenience
pub use config::{CpuAlgorithm, CpuConfig, MemoryConfig, ReplacementAlgorithm, PAGE_SIZE};
pub use error::SimError;
pub use memory_manager::{AccessOutcome, MemoryManager, MemoryStats, PageAccess};
pub use process::{Pid, Process, ProcessState};
pub use scheduler::{CpuScheduler, TraceEvent};
pub use simulation::{run_simulation, ProcessStats, SimulationReport};
