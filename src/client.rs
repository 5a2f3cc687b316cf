use std::sync::Arc;

use crate::config::ConnectionConfig;
use crate::connection::Connection;
use crate::error::Result;
use crate::traits::DatabaseDriver;

/// Main entry point for orars.
/// Holds the engine driver and hands out independent connections.
pub struct OraRsClient {
    driver: Arc<dyn DatabaseDriver>,
}

impl OraRsClient {
    /// Create a client on top of an engine driver.
    ///
    /// # Example
    /// ```ignore
    /// let client = OraRsClient::with_driver(Arc::new(MyOciDriver::new()));
    /// let mut conn = client.connect(config).await?;
    /// ```
    pub fn with_driver(driver: Arc<dyn DatabaseDriver>) -> Self {
        Self { driver }
    }

    /// Create an unconnected connection for the given configuration.
    pub fn connection(&self, config: ConnectionConfig) -> Connection {
        Connection::new(Arc::clone(&self.driver), config)
    }

    /// Create a connection and open it with the configured persistence.
    pub async fn connect(&self, config: ConnectionConfig) -> Result<Connection> {
        let mut connection = self.connection(config);
        connection.initialize().await?;
        Ok(connection)
    }
}
