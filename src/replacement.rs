use std::collections::VecDeque;

use crate::config::ReplacementAlgorithm;
use crate::error::SimError;
use crate::process::Pid;

/// A resident page, identified across processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRef {
    pub pid: Pid,
    pub page: u32,
}

/// Page replacement policy as an explicit tagged variant.
///
/// FIFO keeps resident pages in arrival order and evicts the head; LRU keeps
/// a recency ordering updated on every access and evicts the least recently
/// used entry. The tracked set always equals the set of resident pages across
/// all processes sharing the policy instance.
#[derive(Debug)]
pub enum ReplacementPolicy {
    Fifo(VecDeque<PageRef>),
    Lru(Vec<PageRef>),
}

impl ReplacementPolicy {
    pub fn new(algorithm: ReplacementAlgorithm) -> Self {
        match algorithm {
            ReplacementAlgorithm::Fifo => ReplacementPolicy::Fifo(VecDeque::new()),
            ReplacementAlgorithm::Lru => ReplacementPolicy::Lru(Vec::new()),
        }
    }

    pub fn algorithm(&self) -> ReplacementAlgorithm {
        match self {
            ReplacementPolicy::Fifo(_) => ReplacementAlgorithm::Fifo,
            ReplacementPolicy::Lru(_) => ReplacementAlgorithm::Lru,
        }
    }

    /// Record an access, hit or fault.
    ///
    /// FIFO arrival order is fixed: a page already tracked stays where it is,
    /// a new page joins the tail. LRU moves the page to the most recently
    /// used position unconditionally.
    pub fn record_access(&mut self, pid: Pid, page: u32) {
        let entry = PageRef { pid, page };
        match self {
            ReplacementPolicy::Fifo(queue) => {
                if !queue.contains(&entry) {
                    queue.push_back(entry);
                }
            }
            ReplacementPolicy::Lru(order) => {
                if let Some(pos) = order.iter().position(|e| *e == entry) {
                    order.remove(pos);
                }
                order.push(entry);
            }
        }
    }

    /// Choose and remove the eviction victim.
    ///
    /// Must only be called when no free frame exists; an empty tracked set at
    /// that point is an internal invariant break.
    pub fn select_victim(&mut self) -> Result<PageRef, SimError> {
        match self {
            ReplacementPolicy::Fifo(queue) => queue.pop_front().ok_or(SimError::NoVictimAvailable),
            ReplacementPolicy::Lru(order) => {
                if order.is_empty() {
                    Err(SimError::NoVictimAvailable)
                } else {
                    Ok(order.remove(0))
                }
            }
        }
    }

    /// Remove an entry during explicit cleanup, without treating the removal
    /// as a victim choice.
    pub fn remove_entry(&mut self, pid: Pid, page: u32) {
        let entry = PageRef { pid, page };
        match self {
            ReplacementPolicy::Fifo(queue) => queue.retain(|e| *e != entry),
            ReplacementPolicy::Lru(order) => order.retain(|e| *e != entry),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ReplacementPolicy::Fifo(queue) => queue.len(),
            ReplacementPolicy::Lru(order) => order.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, pid: Pid, page: u32) -> bool {
        let entry = PageRef { pid, page };
        match self {
            ReplacementPolicy::Fifo(queue) => queue.contains(&entry),
            ReplacementPolicy::Lru(order) => order.contains(&entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(pid: u32, page: u32) -> PageRef {
        PageRef { pid: Pid(pid), page }
    }

    #[test]
    fn test_fifo_evicts_in_arrival_order() {
        let mut policy = ReplacementPolicy::new(ReplacementAlgorithm::Fifo);
        policy.record_access(Pid(0), 1);
        policy.record_access(Pid(0), 2);
        policy.record_access(Pid(1), 0);

        assert_eq!(policy.select_victim().unwrap(), page(0, 1));
        assert_eq!(policy.select_victim().unwrap(), page(0, 2));
        assert_eq!(policy.select_victim().unwrap(), page(1, 0));
    }

    #[test]
    fn test_fifo_hit_does_not_reorder() {
        let mut policy = ReplacementPolicy::new(ReplacementAlgorithm::Fifo);
        policy.record_access(Pid(0), 1);
        policy.record_access(Pid(0), 2);
        // Re-access of a tracked page leaves arrival order unchanged.
        policy.record_access(Pid(0), 1);

        assert_eq!(policy.len(), 2);
        assert_eq!(policy.select_victim().unwrap(), page(0, 1));
    }

    #[test]
    fn test_lru_reorders_on_access() {
        let mut policy = ReplacementPolicy::new(ReplacementAlgorithm::Lru);
        policy.record_access(Pid(0), 1);
        policy.record_access(Pid(0), 2);
        policy.record_access(Pid(0), 3);
        // Touch page 1: page 2 becomes least recently used.
        policy.record_access(Pid(0), 1);

        assert_eq!(policy.select_victim().unwrap(), page(0, 2));
        assert_eq!(policy.select_victim().unwrap(), page(0, 3));
        assert_eq!(policy.select_victim().unwrap(), page(0, 1));
    }

    #[test]
    fn test_no_victim_when_empty() {
        for alg in [ReplacementAlgorithm::Fifo, ReplacementAlgorithm::Lru] {
            let mut policy = ReplacementPolicy::new(alg);
            assert_eq!(policy.algorithm(), alg);
            assert!(policy.is_empty());
            assert_eq!(policy.select_victim(), Err(SimError::NoVictimAvailable));
        }
    }

    #[test]
    fn test_remove_entry_is_not_a_victim_choice() {
        let mut policy = ReplacementPolicy::new(ReplacementAlgorithm::Fifo);
        policy.record_access(Pid(0), 1);
        policy.record_access(Pid(1), 1);
        policy.record_access(Pid(0), 2);

        // Removing the head via cleanup shifts the victim to the next entry.
        policy.remove_entry(Pid(0), 1);
        assert!(!policy.contains(Pid(0), 1));
        assert_eq!(policy.select_victim().unwrap(), page(1, 1));
    }

    #[test]
    fn test_entries_are_distinct_per_process() {
        let mut policy = ReplacementPolicy::new(ReplacementAlgorithm::Lru);
        policy.record_access(Pid(0), 5);
        policy.record_access(Pid(1), 5);
        assert_eq!(policy.len(), 2);

        policy.remove_entry(Pid(0), 5);
        assert!(policy.contains(Pid(1), 5));
        assert!(!policy.contains(Pid(0), 5));
    }
}
