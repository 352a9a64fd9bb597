//! Request sequencing for list fetches.
//!
//! Every fetch is stamped with a [`RequestSeq`] taken from a monotonically
//! increasing counter. Responses can come back in any order; only the one
//! belonging to the most recently issued request is allowed to settle.
//! Anything older is superseded and must be dropped by the caller.

use std::fmt;

/// Issuance number of a list request. Higher means issued later.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(u64);

impl RequestSeq {
    /// Create a sequence number from a raw value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestSeq({})", self.0)
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out request numbers and decides which response may be applied.
///
/// Last-writer-wins by issuance order, not arrival order.
#[derive(Debug, Clone, Default)]
pub struct SequenceGate {
    /// Most recently issued value (0 = nothing issued yet).
    latest: u64,
    /// Whether the latest request is still waiting for its response.
    outstanding: bool,
}

impl SequenceGate {
    /// Create a gate with nothing issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next request number. Supersedes every earlier one.
    pub fn issue(&mut self) -> RequestSeq {
        self.latest += 1;
        self.outstanding = true;
        RequestSeq(self.latest)
    }

    /// The most recently issued request, if any.
    pub fn latest(&self) -> Option<RequestSeq> {
        (self.latest > 0).then_some(RequestSeq(self.latest))
    }

    /// Whether the latest request has not settled yet.
    pub fn outstanding(&self) -> bool {
        self.outstanding
    }

    /// Whether `seq` is the most recently issued request.
    pub fn is_latest(&self, seq: RequestSeq) -> bool {
        seq.0 == self.latest && self.latest > 0
    }

    /// Try to settle the response for `seq`.
    ///
    /// Returns `true` exactly once for the latest request; superseded or
    /// already-settled responses return `false` and must be dropped.
    pub fn settle(&mut self, seq: RequestSeq) -> bool {
        if self.is_latest(seq) && self.outstanding {
            self.outstanding = false;
            true
        } else {
            false
        }
    }
}
