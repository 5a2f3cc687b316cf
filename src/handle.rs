use std::fmt;
use std::sync::Arc;

use crate::traits::DatabaseDriver;

/// Identifier the engine client assigns to a connection, statement or cursor.
pub type HandleId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Connection,
    Statement,
    Cursor,
}

/// An owned engine resource. Dropping it releases the resource exactly once.
pub(crate) struct NativeHandle {
    id: HandleId,
    kind: HandleKind,
    driver: Arc<dyn DatabaseDriver>,
}

impl NativeHandle {
    pub(crate) fn new(id: HandleId, kind: HandleKind, driver: Arc<dyn DatabaseDriver>) -> Self {
        Self { id, kind, driver }
    }

    pub(crate) fn id(&self) -> HandleId {
        self.id
    }
}

impl Drop for NativeHandle {
    fn drop(&mut self) {
        tracing::trace!(handle = self.id, kind = ?self.kind, "Releasing native handle");
        self.driver.release(self.id, self.kind);
    }
}

impl fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeHandle")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}
