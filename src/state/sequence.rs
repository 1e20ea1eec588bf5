use std::collections::HashMap;

use crate::state::content::ContentKind;

/// A slot that receives results of asynchronous work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Resolved URL for a content kind.
    Payload(ContentKind),
    /// Processed logo image.
    Logo,
}

/// Proof that a piece of async work was started; only the latest ticket per slot may commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket {
    slot: Slot,
    seq: u64,
}

impl Ticket {
    /// Slot this ticket writes to.
    pub fn slot(self) -> Slot {
        self.slot
    }

    /// Monotonic sequence number within the slot.
    pub fn seq(self) -> u64 {
        self.seq
    }
}

/// Issues per-slot monotonic sequence numbers.
#[derive(Clone, Debug, Default)]
pub(crate) struct SlotSequencer {
    issued: HashMap<Slot, u64>,
}

impl SlotSequencer {
    pub(crate) fn issue(&mut self, slot: Slot) -> Ticket {
        let seq = self.issued.entry(slot).or_insert(0);
        *seq += 1;
        Ticket { slot, seq: *seq }
    }

    pub(crate) fn is_latest(&self, ticket: Ticket) -> bool {
        self.issued.get(&ticket.slot).copied() == Some(ticket.seq)
    }

    /// Retire every outstanding ticket for `slot`.
    pub(crate) fn invalidate(&mut self, slot: Slot) {
        let _ = self.issue(slot);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/sequence.rs"]
mod tests;
