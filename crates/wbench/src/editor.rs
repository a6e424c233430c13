//! Code-editor surface binding.

use serde::Serialize;
use wbench_layout::{DocumentId, TabRef};

use crate::document::DocumentStore;

/// What the editor surface of one pane should display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorBinding {
    pub id: DocumentId,
    pub content: String,
    pub language: String,
    /// Locked tabs are shown read-only.
    pub readonly: bool,
}

impl EditorBinding {
    /// Bind `tab` to its document, if the store still has it.
    #[must_use]
    pub fn for_tab(store: &dyn DocumentStore, tab: &TabRef) -> Option<Self> {
        let document = store.get_document(tab.document_id)?;
        Some(Self {
            id: document.id,
            content: document.content.clone(),
            language: document.language.clone(),
            readonly: tab.is_locked,
        })
    }
}
