use std::collections::VecDeque;

use log::{debug, info};

use crate::config::{CpuAlgorithm, CpuConfig};
use crate::error::SimError;
use crate::memory_manager::{AccessOutcome, MemoryManager};
use crate::process::{Pid, Process, ProcessState};

/// One executed time unit: which process ran and what its page access did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEvent {
    pub time: u64,
    pub pid: Pid,
    pub page: u32,
    pub outcome: AccessOutcome,
    pub frame: usize,
}

/// Recorded when a process reaches `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub pid: Pid,
    pub completion_time: u64,
}

/// Drives process execution order and forwards each simulated unit's page
/// access to the memory manager.
///
/// The scheduler holds indices into the caller's process table rather than
/// the processes themselves; the table is passed into every step so the
/// memory manager can reach any process during eviction.
#[derive(Debug)]
pub struct CpuScheduler {
    config: CpuConfig,
    ready: VecDeque<usize>,
    current: Option<usize>,
    quantum_left: u32,
    time: u64,
    last_dispatched: Option<Pid>,
    context_switches: u64,
    completions: Vec<Completion>,
}

impl CpuScheduler {
    pub fn new(config: CpuConfig) -> Self {
        CpuScheduler {
            config,
            ready: VecDeque::new(),
            current: None,
            quantum_left: 0,
            time: 0,
            last_dispatched: None,
            context_switches: 0,
            completions: Vec::new(),
        }
    }

    /// Move a process into the ready queue. Queue position is strict arrival
    /// order; it defines the policy behavior for both FCFS and RR.
    pub fn admit(&mut self, idx: usize, processes: &mut [Process]) {
        processes[idx].state = ProcessState::Ready;
        self.ready.push_back(idx);
    }

    pub fn is_complete(&self) -> bool {
        self.current.is_none() && self.ready.is_empty()
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn context_switches(&self) -> u64 {
        self.context_switches
    }

    pub fn completions(&self) -> &[Completion] {
        &self.completions
    }

    /// Execute one simulated time unit.
    ///
    /// Dispatches a process if the CPU is idle, runs its next page access,
    /// then handles completion or quantum expiry. Returns `None` once every
    /// admitted process has terminated.
    pub fn step(
        &mut self,
        processes: &mut [Process],
        mm: &mut MemoryManager,
    ) -> Result<Option<TraceEvent>, SimError> {
        let idx = match self.current {
            Some(idx) => idx,
            None => match self.ready.pop_front() {
                Some(idx) => {
                    self.dispatch(idx, processes);
                    idx
                }
                None => return Ok(None),
            },
        };

        let page = processes[idx].next_page_access()?;
        let access = mm.access_page(processes, idx, page, self.time)?;
        processes[idx].decrement_remaining(1);

        let event = TraceEvent {
            time: self.time,
            pid: access.pid,
            page,
            outcome: access.outcome,
            frame: access.frame,
        };
        self.time += 1;
        self.quantum_left = self.quantum_left.saturating_sub(1);

        if processes[idx].is_finished() {
            self.complete(idx, processes, mm);
        } else if self.config.algorithm == CpuAlgorithm::RoundRobin && self.quantum_left == 0 {
            debug!("{} preempted, quantum expired", processes[idx].pid);
            processes[idx].state = ProcessState::Ready;
            // Re-arrival at the tail, behind everything already waiting.
            self.ready.push_back(idx);
            self.current = None;
        }

        Ok(Some(event))
    }

    /// Run every admitted process to termination, collecting the trace.
    pub fn run(
        &mut self,
        processes: &mut [Process],
        mm: &mut MemoryManager,
    ) -> Result<Vec<TraceEvent>, SimError> {
        let mut trace = Vec::new();
        while let Some(event) = self.step(processes, mm)? {
            trace.push(event);
        }
        Ok(trace)
    }

    fn dispatch(&mut self, idx: usize, processes: &mut [Process]) {
        let pid = processes[idx].pid;
        processes[idx].state = ProcessState::Running;
        self.current = Some(idx);
        self.quantum_left = self.config.time_quantum;

        // A switch is a process-to-process transition; a lone process
        // re-entering the CPU does not count.
        if let Some(prev) = self.last_dispatched {
            if prev != pid {
                self.context_switches += 1;
            }
        }
        self.last_dispatched = Some(pid);
        debug!("dispatched {} at t={}", pid, self.time);
    }

    fn complete(&mut self, idx: usize, processes: &mut [Process], mm: &mut MemoryManager) {
        processes[idx].state = ProcessState::Terminated;
        self.completions.push(Completion {
            pid: processes[idx].pid,
            completion_time: self.time,
        });
        mm.deallocate_process(&mut processes[idx]);
        self.current = None;
        info!("{} terminated at t={}", processes[idx].pid, self.time);
    }
}
