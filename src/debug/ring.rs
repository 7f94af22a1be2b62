use crate::ecs::components::{BehaviorState, SharkId, TransitionReason};

/// One applied state transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub id: SharkId,
    pub from: BehaviorState,
    pub to: BehaviorState,
    pub reason: TransitionReason,
    /// Simulation clock seconds.
    pub at: f64,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            id: SharkId(0),
            from: BehaviorState::Patrol,
            to: BehaviorState::Patrol,
            reason: TransitionReason::Respawn,
            at: 0.0,
        }
    }
}

/// Most recent transitions, oldest overwritten first. Pre-allocated, no
/// heap allocs after init.
pub struct TransitionHistory {
    buf: Vec<Transition>,
    head: usize,
    len: usize,
    total: u64,
}

impl TransitionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![Transition::default(); capacity.max(1)],
            head: 0,
            len: 0,
            total: 0,
        }
    }

    pub fn push(&mut self, transition: Transition) {
        let cap = self.buf.len();
        self.buf[self.head] = transition;
        self.head = (self.head + 1) % cap;
        self.len = (self.len + 1).min(cap);
        self.total += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Transitions recorded since creation, including overwritten ones.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn latest(&self) -> Option<&Transition> {
        if self.len == 0 {
            return None;
        }
        let cap = self.buf.len();
        Some(&self.buf[(self.head + cap - 1) % cap])
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        let cap = self.buf.len();
        let start = (self.head + cap - self.len) % cap;
        (0..self.len).map(move |i| &self.buf[(start + i) % cap])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(to: BehaviorState, at: f64) -> Transition {
        Transition {
            to,
            at,
            ..Transition::default()
        }
    }

    #[test]
    fn keeps_newest_when_full() {
        let mut history = TransitionHistory::new(2);
        history.push(t(BehaviorState::Seeking, 1.0));
        history.push(t(BehaviorState::Attacking, 2.0));
        history.push(t(BehaviorState::Eating, 3.0));

        let order: Vec<_> = history.iter().map(|t| t.to).collect();
        assert_eq!(order, vec![BehaviorState::Attacking, BehaviorState::Eating]);
        assert_eq!(history.latest().map(|t| t.at), Some(3.0));
        assert_eq!(history.total(), 3);
    }
}
