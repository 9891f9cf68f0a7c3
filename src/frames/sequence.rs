use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rayon::prelude::*;

use crate::assets::PreparedImage;
use crate::assets::loader::AssetLoader;
use crate::foundation::error::{ScrollyteError, ScrollyteResult};
use crate::foundation::events::{Listeners, Subscription};
use crate::frames::manifest::FrameManifest;

/// Load state of one sampled frame slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// Request issued (or not yet issued) and not settled.
    Pending,
    /// Decoded and drawable.
    Loaded,
    /// Failed; terminal for this slot only.
    Errored,
}

/// Payload of the one-shot ready notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadyEvent {
    /// Sequence label.
    pub label: String,
    /// Slots that loaded.
    pub loaded: usize,
    /// Slots that failed.
    pub errored: usize,
}

/// What a renderer should do for a requested slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameChoice {
    /// Draw this slot (the requested one, or the nearest lower loaded slot).
    Draw(usize),
    /// The requested slot is still decoding; keep the previous visual.
    Hold,
    /// Nothing usable at or below the requested slot; draw nothing.
    Nothing,
}

enum Slot {
    Pending,
    Loaded(PreparedImage),
    Errored,
}

struct SequenceState {
    slots: Vec<Slot>,
    outstanding: usize,
    issued: bool,
    ready: bool,
    torn_down: bool,
}

struct Shared {
    label: String,
    paths: Vec<String>,
    source_indices: Vec<u32>,
    state: RefCell<SequenceState>,
    ready: Listeners<ReadyEvent>,
}

/// A sampled frame sequence and its per-slot load state.
///
/// Created from a [`FrameManifest`]; populated by concurrently issued loads that settle in any
/// order; becomes immutable once every slot has settled, at which point the ready notification
/// fires exactly once. Clones share the same state.
#[derive(Clone)]
pub struct FrameSequence {
    shared: Rc<Shared>,
}

impl FrameSequence {
    /// Build an unloaded sequence from a manifest.
    pub fn new(label: impl Into<String>, manifest: &FrameManifest) -> ScrollyteResult<Self> {
        let paths = manifest.sampled_paths()?;
        let source_indices = manifest.sample_indices();
        let n = paths.len();
        Ok(Self {
            shared: Rc::new(Shared {
                label: label.into(),
                paths,
                source_indices,
                state: RefCell::new(SequenceState {
                    slots: (0..n).map(|_| Slot::Pending).collect(),
                    outstanding: n,
                    issued: false,
                    ready: false,
                    torn_down: false,
                }),
                ready: Listeners::new(),
            }),
        })
    }

    /// Sequence label used in logs and events.
    pub fn label(&self) -> &str {
        &self.shared.label
    }

    /// Number of sampled slots.
    pub fn len(&self) -> usize {
        self.shared.paths.len()
    }

    /// Return `true` for a sequence without slots.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Asset path of every slot.
    pub fn paths(&self) -> &[String] {
        &self.shared.paths
    }

    /// 1-based source frame index of every slot.
    pub fn source_indices(&self) -> &[u32] {
        &self.shared.source_indices
    }

    /// `true` once every slot has settled.
    pub fn is_ready(&self) -> bool {
        self.shared.state.borrow().ready
    }

    /// Load state of slot `i`.
    pub fn state(&self, i: usize) -> Option<LoadState> {
        let st = self.shared.state.borrow();
        st.slots.get(i).map(|s| match s {
            Slot::Pending => LoadState::Pending,
            Slot::Loaded(_) => LoadState::Loaded,
            Slot::Errored => LoadState::Errored,
        })
    }

    /// Number of loaded slots.
    pub fn loaded_count(&self) -> usize {
        let st = self.shared.state.borrow();
        st.slots
            .iter()
            .filter(|s| matches!(s, Slot::Loaded(_)))
            .count()
    }

    /// Number of errored slots.
    pub fn errored_count(&self) -> usize {
        let st = self.shared.state.borrow();
        st.slots.iter().filter(|s| matches!(s, Slot::Errored)).count()
    }

    /// Decoded image of slot `i`, if loaded.
    pub fn frame(&self, i: usize) -> Option<PreparedImage> {
        let st = self.shared.state.borrow();
        match st.slots.get(i)? {
            Slot::Loaded(img) => Some(img.clone()),
            _ => None,
        }
    }

    /// Subscribe to the ready notification.
    ///
    /// Subscribing after the sequence became ready invokes `f` once, immediately; the returned
    /// subscription is then already inert.
    pub fn on_ready(&self, mut f: impl FnMut(&ReadyEvent) + 'static) -> Subscription {
        let late = {
            let st = self.shared.state.borrow();
            st.ready.then(|| self.ready_event(&st))
        };
        match late {
            Some(ev) => {
                f(&ev);
                Subscription::inert()
            }
            None => self.shared.ready.subscribe(f),
        }
    }

    /// Issue every slot request at once, returning one ticket per slot.
    ///
    /// Tickets may be completed in any order. Completing a ticket after the sequence was torn
    /// down or dropped is a no-op.
    pub fn begin_load(&self) -> ScrollyteResult<Vec<LoadTicket>> {
        {
            let mut st = self.shared.state.borrow_mut();
            if st.torn_down {
                return Err(ScrollyteError::validation(format!(
                    "sequence '{}' was torn down",
                    self.shared.label
                )));
            }
            if st.issued {
                return Err(ScrollyteError::validation(format!(
                    "sequence '{}' loads were already issued",
                    self.shared.label
                )));
            }
            st.issued = true;
        }

        tracing::debug!(
            sequence = %self.shared.label,
            slots = self.len(),
            "issuing frame loads"
        );

        let weak = Rc::downgrade(&self.shared);
        Ok(self
            .shared
            .paths
            .iter()
            .enumerate()
            .map(|(slot, path)| LoadTicket {
                slot,
                path: path.clone(),
                shared: weak.clone(),
            })
            .collect())
    }

    /// Fetch and decode every slot concurrently through `loader`, then settle them.
    ///
    /// Individual failures are logged and mark their slot errored; they never fail the call.
    pub fn load_with(&self, loader: &dyn AssetLoader) -> ScrollyteResult<()> {
        let tickets = self.begin_load()?;
        let results: Vec<ScrollyteResult<PreparedImage>> = self
            .shared
            .paths
            .par_iter()
            .map(|p| loader.load(p))
            .collect();
        for (ticket, result) in tickets.into_iter().zip(results) {
            ticket.complete(result);
        }
        Ok(())
    }

    /// Pick what to draw for slot `i` (clamped into range).
    ///
    /// Loaded slots draw themselves; pending slots hold the previous visual; errored slots fall
    /// back to the nearest lower loaded slot, or nothing.
    pub fn choose(&self, i: usize) -> FrameChoice {
        let st = self.shared.state.borrow();
        if st.slots.is_empty() {
            return FrameChoice::Nothing;
        }
        let i = i.min(st.slots.len() - 1);
        match st.slots[i] {
            Slot::Loaded(_) => FrameChoice::Draw(i),
            Slot::Pending => FrameChoice::Hold,
            Slot::Errored => st.slots[..i]
                .iter()
                .rposition(|s| matches!(s, Slot::Loaded(_)))
                .map_or(FrameChoice::Nothing, FrameChoice::Draw),
        }
    }

    /// Release decoded frames; later load completions are ignored and ready never fires.
    pub fn teardown(&self) {
        let mut st = self.shared.state.borrow_mut();
        if st.torn_down {
            return;
        }
        st.torn_down = true;
        for slot in st.slots.iter_mut() {
            *slot = Slot::Pending;
        }
        tracing::debug!(sequence = %self.shared.label, "sequence torn down");
    }

    /// `true` after [`FrameSequence::teardown`].
    pub fn is_torn_down(&self) -> bool {
        self.shared.state.borrow().torn_down
    }

    fn ready_event(&self, st: &SequenceState) -> ReadyEvent {
        ready_event(&self.shared.label, st)
    }
}

impl std::fmt::Debug for FrameSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSequence")
            .field("label", &self.shared.label)
            .field("len", &self.len())
            .field("ready", &self.is_ready())
            .finish()
    }
}

fn ready_event(label: &str, st: &SequenceState) -> ReadyEvent {
    let loaded = st
        .slots
        .iter()
        .filter(|s| matches!(s, Slot::Loaded(_)))
        .count();
    let errored = st.slots.iter().filter(|s| matches!(s, Slot::Errored)).count();
    ReadyEvent {
        label: label.to_owned(),
        loaded,
        errored,
    }
}

/// One outstanding slot request.
pub struct LoadTicket {
    slot: usize,
    path: String,
    shared: Weak<Shared>,
}

impl LoadTicket {
    /// Slot this ticket settles.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Asset path to fetch.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Settle the slot. Returns `false` when the result was discarded because the sequence is
    /// gone or torn down.
    pub fn complete(self, result: ScrollyteResult<PreparedImage>) -> bool {
        let Some(shared) = self.shared.upgrade() else {
            return false;
        };

        let fire = {
            let mut st = shared.state.borrow_mut();
            if st.torn_down {
                return false;
            }
            if !matches!(st.slots[self.slot], Slot::Pending) {
                return false;
            }
            st.slots[self.slot] = match result {
                Ok(img) => Slot::Loaded(img),
                Err(e) => {
                    tracing::warn!(
                        sequence = %shared.label,
                        slot = self.slot,
                        path = %self.path,
                        error = %e,
                        "frame failed to load"
                    );
                    Slot::Errored
                }
            };
            st.outstanding -= 1;
            if st.outstanding == 0 {
                st.ready = true;
                Some(ready_event(&shared.label, &st))
            } else {
                None
            }
        };

        if let Some(ev) = fire {
            tracing::debug!(
                sequence = %ev.label,
                loaded = ev.loaded,
                errored = ev.errored,
                "sequence ready"
            );
            shared.ready.emit(&ev);
        }
        true
    }
}

impl std::fmt::Debug for LoadTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadTicket")
            .field("slot", &self.slot)
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frames/sequence.rs"]
mod tests;
