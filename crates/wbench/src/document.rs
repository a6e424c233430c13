//! Document store boundary.
//!
//! Tabs refer to documents by [`DocumentId`] only; content, language and the
//! dirty flag live behind [`DocumentStore`]. [`MemoryDocumentStore`] is the
//! in-process implementation used by tests and by hosts without persistence.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wbench_layout::{DocumentId, IdAllocator};

/// Initial content for a new document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentInit {
    pub content: String,
    pub language: String,
}

impl DocumentInit {
    #[must_use]
    pub fn new(content: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            language: language.into(),
        }
    }
}

/// A stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    pub content: String,
    pub language: String,
    #[serde(default)]
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("document {id} not found")]
    NotFound { id: DocumentId },

    #[error("document id space exhausted")]
    IdsExhausted,
}

/// Key-value document storage keyed by document id.
pub trait DocumentStore {
    fn create_document(&mut self, name: &str, init: DocumentInit) -> Result<DocumentId, DocumentError>;

    fn get_document(&self, id: DocumentId) -> Option<&Document>;

    /// Replace the content and mark the document dirty.
    fn update_document_content(&mut self, id: DocumentId, content: &str) -> Result<(), DocumentError>;

    /// Clear the dirty flag after the host persisted the document.
    fn mark_saved(&mut self, id: DocumentId) -> Result<(), DocumentError>;
}

/// In-memory store with deterministic ids.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    ids: IdAllocator<DocumentId>,
    documents: BTreeMap<DocumentId, Document>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn document_mut(&mut self, id: DocumentId) -> Result<&mut Document, DocumentError> {
        self.documents
            .get_mut(&id)
            .ok_or(DocumentError::NotFound { id })
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn create_document(&mut self, name: &str, init: DocumentInit) -> Result<DocumentId, DocumentError> {
        let id = self
            .ids
            .allocate()
            .map_err(|_| DocumentError::IdsExhausted)?;
        let _ = self.documents.insert(
            id,
            Document {
                id,
                name: name.to_owned(),
                content: init.content,
                language: init.language,
                dirty: false,
            },
        );
        Ok(id)
    }

    fn get_document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    fn update_document_content(&mut self, id: DocumentId, content: &str) -> Result<(), DocumentError> {
        let document = self.document_mut(id)?;
        if document.content != content {
            content.clone_into(&mut document.content);
            document.dirty = true;
        }
        Ok(())
    }

    fn mark_saved(&mut self, id: DocumentId) -> Result<(), DocumentError> {
        self.document_mut(id)?.dirty = false;
        Ok(())
    }
}
