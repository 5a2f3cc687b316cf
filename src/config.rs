//! Connection configuration.
//!
//! The embedding framework loads these values from wherever it keeps them;
//! this crate only defines the recognized options.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Options recognized by a [`Connection`](crate::Connection).
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Host name, or a complete connect descriptor.
    pub hostname: String,
    pub port: Option<u16>,
    /// Service name, instance name or descriptor.
    pub database: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Client character set; left unset to use the client default.
    pub charset: Option<String>,
    /// Open persistent connections on `initialize`.
    pub persistent: bool,
    /// Return execution failures as errors instead of reporting them as failed outcomes.
    pub strict: bool,
    pub table_prefix: String,
    /// Pre-set connect string. Used as-is when it matches a recognized grammar.
    pub dsn: Option<String>,
}

impl ConnectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    pub fn dsn(mut self, dsn: impl Into<String>) -> Self {
        self.dsn = Some(dsn.into());
        self
    }

    /// Charset to hand to the client. An empty charset counts as unset.
    pub(crate) fn effective_charset(&self) -> Option<String> {
        self.charset.as_deref().filter(|c| !c.is_empty()).map(str::to_string)
    }
}

// Prevent password from being displayed in debug output
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("charset", &self.charset)
            .field("persistent", &self.persistent)
            .field("strict", &self.strict)
            .field("table_prefix", &self.table_prefix)
            .field("dsn", &self.dsn)
            .finish()
    }
}
