//! The connection adapter.
//!
//! A [`Connection`] owns one engine connection and, at most, one statement
//! and one cursor handle on it. Every operation awaits the engine client
//! before returning; nothing runs concurrently on a connection.

mod execute;
mod identity;
mod procedure;
mod schema;

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::builders::dsn;
use crate::config::ConnectionConfig;
use crate::error::{NativeError, OraRsError, Result};
use crate::handle::{HandleId, HandleKind, NativeHandle};
use crate::traits::{ConnectRequest, DatabaseDriver};
use crate::types::TransactionState;

pub use execute::ExecuteOutcome;

/// A connection to one database through a [`DatabaseDriver`].
pub struct Connection {
    driver: Arc<dyn DatabaseDriver>,
    config: ConnectionConfig,
    connect_string: Option<String>,
    // Released in declaration order: cursor, statement, connection.
    cursor: Option<NativeHandle>,
    statement: Option<NativeHandle>,
    conn: Option<NativeHandle>,
    transaction: TransactionState,
    /// Cleared by a stored procedure call for the one execute that reuses its
    /// parsed statement; every execute sets it again.
    reparse: bool,
    version: Option<String>,
    last_row_id: Option<String>,
    last_insert_table: Option<String>,
}

impl Connection {
    /// Create an unconnected connection. Nothing is sent to the engine until
    /// [`connect`](Self::connect) or [`initialize`](Self::initialize).
    pub fn new(driver: Arc<dyn DatabaseDriver>, config: ConnectionConfig) -> Self {
        Self {
            driver,
            config,
            connect_string: None,
            cursor: None,
            statement: None,
            conn: None,
            transaction: TransactionState::default(),
            reparse: true,
            version: None,
            last_row_id: None,
            last_insert_table: None,
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Returns the connect string handed to the client, resolving it on first use.
    ///
    /// A pre-set `dsn` is kept when it matches a recognized grammar; otherwise
    /// the string is derived from hostname, port and database.
    pub fn connect_string(&mut self) -> &str {
        let config = &self.config;
        self.connect_string.get_or_insert_with(|| {
            match config.dsn.as_deref().filter(|d| dsn::is_valid_dsn(d)) {
                Some(preset) => preset.to_string(),
                None => dsn::resolve(&config.hostname, config.port, &config.database)
                    .into_connect_string(),
            }
        })
    }

    /// Forget the resolved connect string so the next connect derives it again.
    pub fn reset_connect_string(&mut self) {
        self.connect_string = None;
    }

    /// Open a connection, releasing any handles held from a previous one.
    pub async fn connect(&mut self, persistent: bool) -> Result<HandleId> {
        self.close();

        let request = ConnectRequest {
            username: self.config.username.clone(),
            password: self.config.password.clone(),
            connect_string: self.connect_string().to_string(),
            charset: self.config.effective_charset(),
            persistent,
        };

        tracing::debug!(
            connect_string = %request.connect_string,
            username = %request.username,
            charset = ?request.charset,
            persistent,
            "Connecting"
        );

        let id = self.driver.connect(&request).await.map_err(|e| {
            tracing::error!(error = %e, "Connection failed");
            e
        })?;

        self.conn = Some(NativeHandle::new(
            id,
            HandleKind::Connection,
            Arc::clone(&self.driver),
        ));
        Ok(id)
    }

    /// Connect with the configured persistence unless already connected.
    pub async fn initialize(&mut self) -> Result<()> {
        if self.conn.is_none() {
            self.connect(self.config.persistent).await?;
        }
        Ok(())
    }

    /// Does nothing. Connections dropped by the server after an idle timeout
    /// are not re-established here; callers reconnect explicitly.
    pub async fn reconnect(&mut self) {}

    /// Release the cursor, then the statement, then the connection.
    /// Handles that were never allocated are skipped.
    pub fn close(&mut self) {
        drop(self.cursor.take());
        drop(self.statement.take());
        drop(self.conn.take());
    }

    /// Engine version number such as `19.0.0.0.0`, or an empty string when the
    /// engine does not report one. Memoized after the first successful lookup.
    pub async fn version(&mut self) -> String {
        if let Some(version) = &self.version {
            return version.clone();
        }
        if let Err(e) = self.initialize().await {
            tracing::debug!(error = %e, "Version unavailable");
            return String::new();
        }
        let Some(conn) = self.connection_id() else {
            return String::new();
        };

        let banner = self.driver.server_version(conn).await;
        match banner.as_deref().and_then(parse_release) {
            Some(version) => {
                self.version = Some(version.clone());
                version
            }
            None => String::new(),
        }
    }

    /// Configured database, or the engine's default tablespace when none is set.
    pub async fn database(&mut self) -> String {
        if !self.config.database.is_empty() {
            return self.config.database.clone();
        }
        if self.initialize().await.is_err() {
            return String::new();
        }

        match self.query("SELECT DEFAULT_TABLESPACE FROM USER_USERS").await {
            Ok(Some(result)) => result
                .single_row()
                .ok()
                .and_then(|row| {
                    row.get_str("DEFAULT_TABLESPACE")
                        .ok()
                        .flatten()
                        .map(str::to_string)
                })
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// Last engine error, checking the cursor, statement and connection in that
    /// order and then the client's handle-less error. Empty when none is set.
    pub fn error(&self) -> NativeError {
        [&self.cursor, &self.statement, &self.conn]
            .into_iter()
            .flatten()
            .find_map(|handle| self.driver.native_error(Some(handle.id())))
            .or_else(|| self.driver.native_error(None))
            .unwrap_or_default()
    }

    pub fn connection_id(&self) -> Option<HandleId> {
        self.conn.as_ref().map(NativeHandle::id)
    }

    pub fn statement_id(&self) -> Option<HandleId> {
        self.statement.as_ref().map(NativeHandle::id)
    }

    pub fn cursor_id(&self) -> Option<HandleId> {
        self.cursor.as_ref().map(NativeHandle::id)
    }

    fn require_connection(&self) -> Result<HandleId> {
        self.connection_id().ok_or(OraRsError::NotConnected)
    }

    fn own(&self, id: HandleId, kind: HandleKind) -> NativeHandle {
        NativeHandle::new(id, kind, Arc::clone(&self.driver))
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

/// Extracts `x.y.z` from a banner containing `Release x.y.z`.
fn parse_release(banner: &str) -> Option<String> {
    static RELEASE: OnceLock<Regex> = OnceLock::new();
    let release = RELEASE.get_or_init(|| {
        Regex::new(r"Release\s(\d+(?:\.\d+)+)")
            .unwrap_or_else(|e| panic!("invalid release pattern: {e}"))
    });
    release
        .captures(banner)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release() {
        assert_eq!(
            parse_release("Oracle Database 19c Enterprise Edition Release 19.0.0.0.0 - Production")
                .as_deref(),
            Some("19.0.0.0.0")
        );
        assert_eq!(
            parse_release("Oracle Database 11g Release 11.2.0.4.0 - 64bit Production").as_deref(),
            Some("11.2.0.4.0")
        );
        assert_eq!(parse_release("Release 19"), None);
        assert_eq!(parse_release("garbage"), None);
    }
}
