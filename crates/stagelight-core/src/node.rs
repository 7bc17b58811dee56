#![forbid(unsafe_code)]

//! Host node identifiers.

use serde::{Deserialize, Serialize};

/// Opaque handle to a node owned by the host document.
///
/// The session never owns node lifetimes; it only compares handles for
/// identity. A handle whose node has been removed stays a valid value but
/// no longer resolves in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Raw index.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}
