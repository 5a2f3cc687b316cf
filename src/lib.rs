//! orars - A driver adapter for Oracle-style relational engines
//!
//! Binds connection, statement, transaction, stored procedure and schema
//! operations to an engine client library exposed through [`DatabaseDriver`].
//!
//! # Example
//! ```ignore
//! use orars::{ConnectionConfig, OraRsClient};
//!
//! let client = OraRsClient::with_driver(driver);
//! let mut conn = client
//!     .connect(
//!         ConnectionConfig::new()
//!             .hostname("db.example.com")
//!             .port(1521)
//!             .database("orcl")
//!             .username("scott")
//!             .password("tiger"),
//!     )
//!     .await?;
//!
//! conn.begin_transaction();
//! conn.execute(&orars::clauses::with_row_id_returning(
//!     "INSERT INTO users (name) VALUES ('Alice')",
//! ))
//! .await?;
//! let id = conn.insert_id().await;
//! conn.commit().await;
//!
//! let columns = conn.field_data("users").await?;
//! ```

pub mod builders;
pub mod clauses;
pub mod config;
pub mod connection;
pub mod drivers;
pub mod error;
pub mod handle;
pub mod traits;
pub mod types;

mod client;

// Re-export main types for convenient access
pub use client::OraRsClient;
pub use config::ConnectionConfig;
pub use connection::{Connection, ExecuteOutcome};
pub use error::{NativeError, OraRsError, Result};
pub use handle::{HandleId, HandleKind};
pub use traits::{ConnectRequest, DatabaseDriver};
pub use types::{
    BindParam, BindType, ColumnData, CommitMode, ForeignKeyData, IndexData, IndexType,
    QueryResult, RawQueryResult, Row, SqlValue, TransactionState,
};
