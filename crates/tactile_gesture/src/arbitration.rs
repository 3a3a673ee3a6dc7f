//! Arbitration between recognizers sharing a region
//!
//! Two relations are supported:
//!
//! - *simultaneous*: a symmetric pair whose members may both be Active
//! - *wait-for*: the waiter may only begin while the awaited recognizer is
//!   Idle or already resolved
//!
//! Any pair not declared simultaneous is exclusive. The graph only stores
//! relations; the region supplies the recognizer states to evaluate them.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::error::{GestureError, Result};
use crate::recognizer::{RecognizerId, RecognizerState};

#[derive(Clone, Debug, Default)]
pub struct ArbitrationGraph {
    simultaneous: FxHashSet<(RecognizerId, RecognizerId)>,
    wait_for: FxHashMap<RecognizerId, SmallVec<[RecognizerId; 2]>>,
}

fn pair(a: RecognizerId, b: RecognizerId) -> (RecognizerId, RecognizerId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl ArbitrationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `a` and `b` to be Active at the same time
    pub fn allow_simultaneous(&mut self, a: RecognizerId, b: RecognizerId) -> Result<()> {
        if a == b {
            return Err(GestureError::SelfRelation);
        }
        if self.waits_on(a, b) || self.waits_on(b, a) {
            return Err(GestureError::ConflictingRelation);
        }
        self.simultaneous.insert(pair(a, b));
        Ok(())
    }

    /// Keep `waiter` from beginning while `awaited` is in progress
    pub fn require_wait_for(&mut self, waiter: RecognizerId, awaited: RecognizerId) -> Result<()> {
        if waiter == awaited {
            return Err(GestureError::SelfRelation);
        }
        if self.are_simultaneous(waiter, awaited) || self.waits_on(awaited, waiter) {
            return Err(GestureError::ConflictingRelation);
        }
        let list = self.wait_for.entry(waiter).or_default();
        if !list.contains(&awaited) {
            list.push(awaited);
        }
        Ok(())
    }

    pub fn are_simultaneous(&self, a: RecognizerId, b: RecognizerId) -> bool {
        self.simultaneous.contains(&pair(a, b))
    }

    /// Recognizers `waiter` waits for
    pub fn awaited_by(&self, waiter: RecognizerId) -> &[RecognizerId] {
        self.wait_for
            .get(&waiter)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    fn waits_on(&self, waiter: RecognizerId, awaited: RecognizerId) -> bool {
        self.awaited_by(waiter).contains(&awaited)
    }

    /// Whether `id` may leave Idle given the current states of its peers
    pub fn may_begin(
        &self,
        id: RecognizerId,
        state_of: impl Fn(RecognizerId) -> Option<RecognizerState>,
    ) -> bool {
        self.awaited_by(id).iter().all(|&awaited| {
            state_of(awaited).map_or(true, |state| !state.is_in_progress())
        })
    }

    /// Whether `id` may become Active given the current states of its peers
    ///
    /// Denied while any peer not declared simultaneous is Active. Wait-for
    /// relations are not consulted here.
    pub fn may_activate(
        &self,
        id: RecognizerId,
        peers: impl IntoIterator<Item = (RecognizerId, RecognizerState)>,
    ) -> bool {
        peers.into_iter().all(|(peer, state)| {
            if peer == id {
                return true;
            }
            state != RecognizerState::Active || self.are_simultaneous(id, peer)
        })
    }
}
