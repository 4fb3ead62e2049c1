use super::DocumentStore;
use crate::error::Result;
use crate::model::Document;
use parking_lot::Mutex;

/// Keeps the document in memory. Used by command tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    doc: Mutex<Document>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: Document) -> Self {
        Self {
            doc: Mutex::new(doc),
        }
    }
}

impl DocumentStore for InMemoryStore {
    fn load(&self) -> Result<Document> {
        Ok(self.doc.lock().clone())
    }

    fn save(&self, doc: &Document) -> Result<()> {
        *self.doc.lock() = doc.clone();
        Ok(())
    }

    fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Document) -> Result<T>,
    {
        let mut guard = self.doc.lock();
        // Mutate a copy so a failing closure leaves the stored document untouched.
        let mut doc = guard.clone();
        let out = f(&mut doc)?;
        *guard = doc;
        Ok(out)
    }
}
