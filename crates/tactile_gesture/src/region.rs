//! Gesture regions
//!
//! A [`GestureRegion`] owns the recognizers attached to one view, the
//! arbitration graph relating them and the per-activation contexts. It
//! applies the transitions each sample asks for, subject to arbitration,
//! and reports them to a [`GestureHandler`].

use slotmap::{SecondaryMap, SlotMap};
use smallvec::SmallVec;

use crate::arbitration::ArbitrationGraph;
use crate::context::GestureContext;
use crate::error::{GestureError, Result};
use crate::input::{TouchPhase, TouchSample};
use crate::recognizer::{GestureKind, GestureRecognizer, Intent, RecognizerId, RecognizerState};

/// The update that triggered a callback
#[derive(Clone, Copy, Debug)]
pub struct GestureEvent<'a> {
    pub recognizer: RecognizerId,
    pub kind: GestureKind,
    pub sample: &'a TouchSample,
}

/// Receives recognizer transitions
///
/// Only `on_start` may write baselines into the context.
#[allow(unused_variables)]
pub trait GestureHandler {
    /// Idle -> Began
    fn on_start(&mut self, event: &GestureEvent<'_>, ctx: &mut GestureContext) {}

    /// Activation and every update while Active
    fn on_active(&mut self, event: &GestureEvent<'_>, ctx: &GestureContext) {}

    /// Active -> Ended
    fn on_end(&mut self, event: &GestureEvent<'_>, ctx: &GestureContext) {}

    /// Cancelled, out-competed or failed after beginning
    fn on_cancel(&mut self, event: &GestureEvent<'_>, ctx: &GestureContext) {}
}

impl GestureHandler for () {}

/// Recognizers attached to a single view
#[derive(Debug)]
pub struct GestureRegion {
    name: String,
    recognizers: SlotMap<RecognizerId, GestureRecognizer>,
    order: SmallVec<[RecognizerId; 4]>,
    graph: ArbitrationGraph,
    contexts: SecondaryMap<RecognizerId, GestureContext>,
}

impl GestureRegion {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            recognizers: SlotMap::with_key(),
            order: SmallVec::new(),
            graph: ArbitrationGraph::new(),
            contexts: SecondaryMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach a recognizer; declaration order is dispatch order
    pub fn add(&mut self, recognizer: GestureRecognizer) -> RecognizerId {
        let id = self.recognizers.insert(recognizer);
        self.order.push(id);
        id
    }

    /// Allow two recognizers of this region to be Active together
    pub fn allow_simultaneous(&mut self, a: RecognizerId, b: RecognizerId) -> Result<()> {
        self.ensure_known(a)?;
        self.ensure_known(b)?;
        self.graph.allow_simultaneous(a, b)
    }

    /// Declare every pair in `ids` mutually simultaneous
    pub fn allow_simultaneous_all(&mut self, ids: &[RecognizerId]) -> Result<()> {
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                self.allow_simultaneous(a, b)?;
            }
        }
        Ok(())
    }

    /// Keep `waiter` from beginning while `awaited` is in progress
    pub fn require_wait_for(&mut self, waiter: RecognizerId, awaited: RecognizerId) -> Result<()> {
        self.ensure_known(waiter)?;
        self.ensure_known(awaited)?;
        self.graph.require_wait_for(waiter, awaited)
    }

    fn ensure_known(&self, id: RecognizerId) -> Result<()> {
        if self.recognizers.contains_key(id) {
            Ok(())
        } else {
            Err(GestureError::UnknownRecognizer {
                id,
                region: self.name.clone(),
            })
        }
    }

    pub fn graph(&self) -> &ArbitrationGraph {
        &self.graph
    }

    pub fn recognizer(&self, id: RecognizerId) -> Option<&GestureRecognizer> {
        self.recognizers.get(id)
    }

    pub fn state(&self, id: RecognizerId) -> Option<RecognizerState> {
        self.recognizers.get(id).map(GestureRecognizer::state)
    }

    /// Live context of a recognizer that has begun and not yet resolved
    pub fn context(&self, id: RecognizerId) -> Option<&GestureContext> {
        self.contexts.get(id)
    }

    /// Recognizer ids in declaration order
    pub fn order(&self) -> &[RecognizerId] {
        &self.order
    }

    /// First recognizer of the given kind
    pub fn find(&self, kind: GestureKind) -> Option<RecognizerId> {
        self.order
            .iter()
            .copied()
            .find(|&id| self.recognizers[id].kind() == kind)
    }

    /// Feed a sample to a single recognizer
    pub fn dispatch<H>(&mut self, id: RecognizerId, sample: &TouchSample, handler: &mut H)
    where
        H: GestureHandler + ?Sized,
    {
        if !self.recognizers.contains_key(id) {
            tracing::warn!("{}: sample for unknown recognizer {:?}", self.name, id);
            return;
        }
        self.process(id, sample, handler);
        self.expire_taps(sample.timestamp_ms, handler);
    }

    /// Feed a sample to every recognizer in declaration order
    pub fn dispatch_all<H>(&mut self, sample: &TouchSample, handler: &mut H)
    where
        H: GestureHandler + ?Sized,
    {
        for i in 0..self.order.len() {
            let id = self.order[i];
            self.process(id, sample, handler);
        }
        self.expire_taps(sample.timestamp_ms, handler);
    }

    /// Fail pending taps whose duration budget ran out by `now_ms`
    ///
    /// Samples already enforce the budget; this covers a finger held
    /// still with no updates arriving.
    pub fn poll_timeouts<H>(&mut self, now_ms: f64, handler: &mut H)
    where
        H: GestureHandler + ?Sized,
    {
        self.expire_taps(now_ms, handler);
    }

    /// Cancel everything in progress and return all recognizers to Idle
    pub fn reset<H>(&mut self, handler: &mut H)
    where
        H: GestureHandler + ?Sized,
    {
        let now = self
            .contexts
            .values()
            .map(GestureContext::began_at_ms)
            .fold(0.0, f64::max);
        let sample = TouchSample::cancelled(now);
        for i in 0..self.order.len() {
            let id = self.order[i];
            if self.recognizers[id].state().is_in_progress() {
                self.finish(id, RecognizerState::Cancelled, &sample, handler);
            }
            self.recognizers[id].reset();
        }
        self.contexts.clear();
    }

    fn process<H>(&mut self, id: RecognizerId, sample: &TouchSample, handler: &mut H)
    where
        H: GestureHandler + ?Sized,
    {
        let Some(recognizer) = self.recognizers.get_mut(id) else {
            return;
        };
        if sample.phase == TouchPhase::Began && recognizer.state().is_terminal() {
            recognizer.reset();
        }

        match recognizer.intent(sample) {
            Intent::Ignore => {
                tracing::trace!(
                    "{}: {} ignores {:?} in {:?}",
                    self.name,
                    recognizer.kind().name(),
                    sample.phase,
                    recognizer.state()
                );
            }
            Intent::Begin => self.begin(id, sample, handler),
            Intent::Activate => {
                self.activate(id, sample, handler);
            }
            Intent::Update => self.deliver_active(id, sample, handler),
            Intent::End => self.finish(id, RecognizerState::Ended, sample, handler),
            Intent::Commit => {
                if self.activate(id, sample, handler) {
                    self.finish(id, RecognizerState::Ended, sample, handler);
                } else {
                    self.finish(id, RecognizerState::Failed, sample, handler);
                }
            }
            Intent::Fail => self.finish(id, RecognizerState::Failed, sample, handler),
            Intent::Cancel => self.finish(id, RecognizerState::Cancelled, sample, handler),
        }
    }

    fn begin<H>(&mut self, id: RecognizerId, sample: &TouchSample, handler: &mut H)
    where
        H: GestureHandler + ?Sized,
    {
        let recognizers = &self.recognizers;
        let allowed = self
            .graph
            .may_begin(id, |other| recognizers.get(other).map(GestureRecognizer::state));

        let recognizer = &mut self.recognizers[id];
        let kind = recognizer.kind();
        if !allowed {
            recognizer.set_state(RecognizerState::Failed);
            tracing::debug!("{}: {} denied by wait-for", self.name, kind.name());
            return;
        }

        recognizer.mark_began(sample.timestamp_ms);
        tracing::debug!("{}: {} began", self.name, kind.name());

        let mut ctx = GestureContext::new(id, kind, sample.timestamp_ms);
        let event = GestureEvent {
            recognizer: id,
            kind,
            sample,
        };
        handler.on_start(&event, &mut ctx);
        self.contexts.insert(id, ctx);
    }

    /// Began -> Active if arbitration allows; out-competes exclusive peers
    fn activate<H>(&mut self, id: RecognizerId, sample: &TouchSample, handler: &mut H) -> bool
    where
        H: GestureHandler + ?Sized,
    {
        let recognizers = &self.recognizers;
        let peers = self
            .order
            .iter()
            .map(|&peer| (peer, recognizers[peer].state()));
        if !self.graph.may_activate(id, peers) {
            tracing::trace!(
                "{}: {} held back by an active peer",
                self.name,
                self.recognizers[id].kind().name()
            );
            return false;
        }

        self.recognizers[id].set_state(RecognizerState::Active);
        tracing::debug!("{}: {} active", self.name, self.recognizers[id].kind().name());

        let losers: SmallVec<[RecognizerId; 4]> = self
            .order
            .iter()
            .copied()
            .filter(|&peer| {
                peer != id
                    && self.recognizers[peer].state() == RecognizerState::Began
                    && !self.graph.are_simultaneous(id, peer)
            })
            .collect();
        for peer in losers {
            self.finish(peer, RecognizerState::Cancelled, sample, handler);
        }

        self.deliver_active(id, sample, handler);
        true
    }

    fn deliver_active<H>(&mut self, id: RecognizerId, sample: &TouchSample, handler: &mut H)
    where
        H: GestureHandler + ?Sized,
    {
        let Some(ctx) = self.contexts.get(id) else {
            return;
        };
        let event = GestureEvent {
            recognizer: id,
            kind: ctx.kind(),
            sample,
        };
        handler.on_active(&event, ctx);
    }

    /// Move to a terminal state, report it and drop the context
    fn finish<H>(
        &mut self,
        id: RecognizerId,
        state: RecognizerState,
        sample: &TouchSample,
        handler: &mut H,
    ) where
        H: GestureHandler + ?Sized,
    {
        let recognizer = &mut self.recognizers[id];
        recognizer.set_state(state);
        tracing::debug!("{}: {} -> {:?}", self.name, recognizer.kind().name(), state);

        let Some(ctx) = self.contexts.remove(id) else {
            return;
        };
        let event = GestureEvent {
            recognizer: id,
            kind: ctx.kind(),
            sample,
        };
        match state {
            RecognizerState::Ended => handler.on_end(&event, &ctx),
            _ => handler.on_cancel(&event, &ctx),
        }
    }

    fn expire_taps<H>(&mut self, now_ms: f64, handler: &mut H)
    where
        H: GestureHandler + ?Sized,
    {
        let expired: SmallVec<[RecognizerId; 2]> = self
            .order
            .iter()
            .copied()
            .filter(|&id| {
                let recognizer = &self.recognizers[id];
                recognizer.kind() == GestureKind::Tap
                    && recognizer.state() == RecognizerState::Began
                    && recognizer.tap_expired(now_ms)
            })
            .collect();

        if expired.is_empty() {
            return;
        }
        let sample = TouchSample::new(TouchPhase::Active, now_ms);
        for id in expired {
            self.finish(id, RecognizerState::Failed, &sample, handler);
        }
    }
}
