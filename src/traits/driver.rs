use std::fmt;

use async_trait::async_trait;

use crate::error::{NativeError, Result};
use crate::handle::{HandleId, HandleKind};
use crate::types::{BindParam, CommitMode, RawQueryResult, SqlValue};

/// Arguments for opening a connection through the engine client.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    pub username: String,
    pub password: String,
    /// Connect string; empty defers to the client's ambient configuration.
    pub connect_string: String,
    /// Client character set. `None` when unset, never an empty string.
    pub charset: Option<String>,
    pub persistent: bool,
}

impl fmt::Debug for ConnectRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("connect_string", &self.connect_string)
            .field("charset", &self.charset)
            .field("persistent", &self.persistent)
            .finish()
    }
}

/// Trait for engine client bindings.
///
/// Implementations wrap a vendor client library's calling conventions:
/// connections, parsed statements, cursors, named bind slots and commit modes.
/// Every call blocks the caller's logical thread until the engine answers;
/// the adapter never issues two calls concurrently on one connection.
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Open a connection. Persistent connections may be reused by the client.
    async fn connect(&self, request: &ConnectRequest) -> Result<HandleId>;

    /// Parse SQL text into a new statement handle.
    async fn parse(&self, conn: HandleId, sql: &str) -> Result<HandleId>;

    /// Allocate a new cursor handle on the connection.
    async fn new_cursor(&self, conn: HandleId) -> Result<HandleId>;

    /// Bind a named slot on a statement.
    async fn bind(&self, stmt: HandleId, param: &BindParam) -> Result<()>;

    /// Set the number of rows fetched per round trip.
    async fn set_prefetch(&self, stmt: HandleId, rows: u32) -> Result<()>;

    /// Execute a statement or cursor under the given commit mode.
    async fn execute(&self, stmt: HandleId, mode: CommitMode) -> std::result::Result<(), NativeError>;

    /// Fetch every remaining row of an executed statement or cursor.
    async fn fetch_all(&self, stmt: HandleId) -> Result<RawQueryResult>;

    /// Read the value an OUT bind slot received during execution.
    async fn out_value(&self, stmt: HandleId, name: &str) -> Result<Option<SqlValue>>;

    /// Number of rows touched by the last execution of the statement.
    async fn affected_rows(&self, stmt: HandleId) -> u64;

    async fn commit(&self, conn: HandleId) -> Result<()>;

    async fn rollback(&self, conn: HandleId) -> Result<()>;

    /// Free-form server banner, e.g. `Oracle Database 19c ... Release 19.0.0.0.0 - Production`.
    async fn server_version(&self, conn: HandleId) -> Option<String>;

    /// Error recorded against a handle. `None` asks for the last handle-less
    /// error, such as a failed connect.
    fn native_error(&self, handle: Option<HandleId>) -> Option<NativeError>;

    /// Free a handle. Releasing an unknown handle is a no-op.
    fn release(&self, handle: HandleId, kind: HandleKind);
}
