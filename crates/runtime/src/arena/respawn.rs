//! Deferred respawns.
//!
//! Removal schedules a respawn at `now + delay`; the arena drains ready
//! entries at the start of every tick.

use game_core::AgentId;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingRespawn {
    pub agent: AgentId,
    pub ready_at: f32,
}

#[derive(Clone, Debug, Default)]
pub struct RespawnQueue {
    pending: Vec<PendingRespawn>,
}

impl RespawnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `agent`. Returns `false` if it is already waiting.
    pub fn schedule(&mut self, agent: AgentId, ready_at: f32) -> bool {
        if self.contains(agent) {
            return false;
        }
        self.pending.push(PendingRespawn { agent, ready_at });
        true
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.pending.iter().any(|p| p.agent == agent)
    }

    /// Removes and returns every entry due at `now`, earliest first.
    pub fn pop_ready(&mut self, now: f32) -> Vec<AgentId> {
        let mut ready: Vec<PendingRespawn> = Vec::new();
        self.pending.retain(|p| {
            if p.ready_at <= now {
                ready.push(*p);
                false
            } else {
                true
            }
        });
        ready.sort_by(|a, b| a.ready_at.total_cmp(&b.ready_at).then(a.agent.cmp(&b.agent)));
        ready.into_iter().map(|p| p.agent).collect()
    }

    pub fn pending(&self) -> &[PendingRespawn] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_wait_for_their_time() {
        let mut queue = RespawnQueue::new();
        assert!(queue.schedule(AgentId(2), 3.0));
        assert!(queue.schedule(AgentId(1), 1.0));

        assert!(queue.pop_ready(0.5).is_empty());
        assert_eq!(queue.pop_ready(1.0), vec![AgentId(1)]);
        assert_eq!(queue.pop_ready(10.0), vec![AgentId(2)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn agent_is_queued_at_most_once() {
        let mut queue = RespawnQueue::new();
        assert!(queue.schedule(AgentId(4), 2.0));
        assert!(!queue.schedule(AgentId(4), 0.5));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_ready(5.0), vec![AgentId(4)]);
        assert!(queue.pop_ready(5.0).is_empty());
    }
}
