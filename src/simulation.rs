use std::collections::HashSet;

use crate::config::{CpuConfig, MemoryConfig};
use crate::error::SimError;
use crate::memory_manager::{MemoryManager, MemoryStats};
use crate::process::{Pid, Process, ProcessState};
use crate::scheduler::{CpuScheduler, TraceEvent};

/// Per-process timing, recorded in completion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessStats {
    pub pid: Pid,
    pub name: String,
    pub burst_time: u32,
    pub completion_time: u64,
    pub turnaround_time: u64,
    pub waiting_time: u64,
}

/// Everything a presentation layer needs from one simulation run.
///
/// The trace is materialized, so it can be iterated any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub per_process: Vec<ProcessStats>,
    pub memory: MemoryStats,
    pub context_switches: u64,
    pub total_time: u64,
    trace: Vec<TraceEvent>,
}

impl SimulationReport {
    pub fn trace(&self) -> &[TraceEvent] {
        &self.trace
    }

    pub fn events(&self) -> impl Iterator<Item = &TraceEvent> {
        self.trace.iter()
    }

    pub fn average_waiting_time(&self) -> f64 {
        if self.per_process.is_empty() {
            0.0
        } else {
            let total: u64 = self.per_process.iter().map(|p| p.waiting_time).sum();
            total as f64 / self.per_process.len() as f64
        }
    }

    pub fn average_turnaround_time(&self) -> f64 {
        if self.per_process.is_empty() {
            0.0
        } else {
            let total: u64 = self.per_process.iter().map(|p| p.turnaround_time).sum();
            total as f64 / self.per_process.len() as f64
        }
    }
}

/// Run a complete simulation: every process is driven to termination, its
/// page stream resolved against the memory manager one unit at a time.
///
/// All processes arrive at tick 0 in the order given; that order defines the
/// FCFS/RR queue discipline. For a fixed input set and fixed algorithms the
/// resulting trace is fully deterministic.
pub fn run_simulation(
    mut processes: Vec<Process>,
    cpu_config: CpuConfig,
    memory_config: MemoryConfig,
) -> Result<SimulationReport, SimError> {
    let mut seen = HashSet::new();
    for process in &processes {
        if !seen.insert(process.pid) {
            return Err(SimError::InvalidParameter(format!(
                "duplicate process id {}",
                process.pid
            )));
        }
    }

    let mut mm = MemoryManager::new(&memory_config);
    let mut scheduler = CpuScheduler::new(cpu_config);
    for idx in 0..processes.len() {
        scheduler.admit(idx, &mut processes);
    }

    let trace = scheduler.run(&mut processes, &mut mm)?;

    debug_assert!(
        processes
            .iter()
            .all(|p| p.state == ProcessState::Terminated && p.remaining_time == 0),
        "scheduler left a process unfinished"
    );

    let per_process = scheduler
        .completions()
        .iter()
        .map(|completion| {
            let process = processes
                .iter()
                .find(|p| p.pid == completion.pid)
                .expect("completion for unknown process");
            // All processes arrive at tick 0.
            let turnaround = completion.completion_time;
            ProcessStats {
                pid: process.pid,
                name: process.name.clone(),
                burst_time: process.burst_time,
                completion_time: completion.completion_time,
                turnaround_time: turnaround,
                waiting_time: turnaround - process.burst_time as u64,
            }
        })
        .collect();

    Ok(SimulationReport {
        per_process,
        memory: mm.stats(),
        context_switches: scheduler.context_switches(),
        total_time: scheduler.time(),
        trace,
    })
}
