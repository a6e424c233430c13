//! Tab references.

use serde::{Deserialize, Serialize};

use crate::ids::{DocumentId, TabId};

/// A tab open in one pane.
///
/// The tab refers to its document by id only; content lives in the external
/// document store. `is_active` is owned by the panel tree and rewritten on
/// every mutation, so values supplied by callers are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabRef {
    pub id: TabId,
    pub document_id: DocumentId,
    #[serde(default)]
    pub is_dirty: bool,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub is_active: bool,
}

impl TabRef {
    /// A clean, unlocked, inactive tab.
    #[must_use]
    pub const fn new(id: TabId, document_id: DocumentId) -> Self {
        Self {
            id,
            document_id,
            is_dirty: false,
            is_locked: false,
            is_active: false,
        }
    }

    /// Builder: mark the tab as locked.
    #[must_use]
    pub const fn locked(mut self) -> Self {
        self.is_locked = true;
        self
    }
}
