use crate::clauses::returning::{self, ROW_ID_BIND, ROW_ID_MAX_LENGTH};
use crate::error::{NativeError, OraRsError, Result};
use crate::handle::{HandleId, HandleKind};
use crate::types::{BindParam, QueryResult, SqlValue, TransactionState};

use super::Connection;

/// Rows fetched per round trip.
const PREFETCH_ROWS: u32 = 1000;

/// Result of executing a statement outside strict mode.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecuteOutcome {
    Executed,
    /// The engine rejected the statement.
    Failed(NativeError),
}

impl ExecuteOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecuteOutcome::Executed)
    }
}

/// Drops trailing terminators, which plain statements must not carry.
/// Anonymous blocks keep exactly one.
pub(crate) fn normalize_statement(sql: &str) -> String {
    let trimmed = sql.trim_end().trim_end_matches(';');
    let head = trimmed.trim_start();
    let is_block = ["BEGIN", "DECLARE"].iter().any(|keyword| {
        head.get(..keyword.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(keyword))
    });

    if is_block {
        format!("{trimmed};")
    } else {
        trimmed.to_string()
    }
}

impl Connection {
    /// Execute a statement under the current commit mode.
    ///
    /// Engine failures come back as [`ExecuteOutcome::Failed`], or as
    /// [`OraRsError::Execution`] in strict mode.
    pub async fn execute(&mut self, sql: &str) -> Result<ExecuteOutcome> {
        self.execute_with_binds(sql, &[]).await
    }

    /// Execute a statement after binding the given slots.
    ///
    /// Client failures while parsing, binding or reading OUT slots are
    /// handled like a rejected statement.
    pub async fn execute_with_binds(
        &mut self,
        sql: &str,
        binds: &[BindParam],
    ) -> Result<ExecuteOutcome> {
        let reparse = std::mem::replace(&mut self.reparse, true);
        let conn = self.require_connection()?;

        match self.run_statement(conn, sql, binds, reparse).await {
            Err(err) => self.client_failed(err),
            outcome => outcome,
        }
    }

    async fn run_statement(
        &mut self,
        conn: HandleId,
        sql: &str,
        binds: &[BindParam],
        reparse: bool,
    ) -> Result<ExecuteOutcome> {
        let sql = normalize_statement(sql);
        let mode = self.transaction.commit_mode();
        tracing::trace!(sql = %sql, mode = ?mode, "Executing statement");

        self.last_row_id = None;
        self.last_insert_table = None;

        if reparse {
            let stmt = self.driver.parse(conn, &sql).await?;
            self.statement = Some(self.own(stmt, HandleKind::Statement));
        }
        let stmt = self
            .statement_id()
            .ok_or_else(|| OraRsError::Driver("no parsed statement to execute".to_string()))?;

        for bind in binds {
            self.driver.bind(stmt, bind).await?;
        }

        let captures_row_id = returning::captures_row_id(&sql);
        if captures_row_id {
            self.driver
                .bind(stmt, &BindParam::row_id(ROW_ID_BIND, ROW_ID_MAX_LENGTH))
                .await?;
        }

        self.driver.set_prefetch(stmt, PREFETCH_ROWS).await?;

        if let Err(err) = self.driver.execute(stmt, mode).await {
            return self.execution_failed(err);
        }

        if captures_row_id {
            self.last_row_id = self
                .driver
                .out_value(stmt, ROW_ID_BIND)
                .await?
                .and_then(|value| value.as_str().map(str::to_string));
            self.last_insert_table = returning::insert_target_table(&sql);
        }
        Ok(ExecuteOutcome::Executed)
    }

    /// Logs the failure; strict mode turns it into an error.
    pub(super) fn execution_failed(&self, err: NativeError) -> Result<ExecuteOutcome> {
        tracing::error!(code = %err.code, message = %err.message, "Statement execution failed");
        if self.config.strict {
            Err(OraRsError::Execution(err))
        } else {
            Ok(ExecuteOutcome::Failed(err))
        }
    }

    /// Client errors count as execution failures, reported with the engine's
    /// error for the current handles when it has one. Other errors pass through.
    pub(super) fn client_failed(&self, err: OraRsError) -> Result<ExecuteOutcome> {
        match err {
            OraRsError::Driver(message) => {
                let native = self.error();
                let native = if native.is_empty() {
                    NativeError::new("", message)
                } else {
                    native
                };
                self.execution_failed(native)
            }
            other => Err(other),
        }
    }

    /// Execute a statement and fetch its rows. `None` when the engine rejected it.
    pub async fn query(&mut self, sql: &str) -> Result<Option<QueryResult>> {
        self.query_with_binds(sql, &[]).await
    }

    pub async fn query_with_binds(
        &mut self,
        sql: &str,
        binds: &[BindParam],
    ) -> Result<Option<QueryResult>> {
        if let ExecuteOutcome::Failed(_) = self.execute_with_binds(sql, binds).await? {
            return Ok(None);
        }
        match self.fetch().await {
            Ok(result) => Ok(Some(result)),
            Err(err) => self.client_failed(err).map(|_| None),
        }
    }

    /// Fetch the remaining rows of the current statement.
    pub async fn fetch(&mut self) -> Result<QueryResult> {
        let stmt = self
            .statement_id()
            .ok_or_else(|| OraRsError::Driver("no statement to fetch from".to_string()))?;
        Ok(QueryResult::from_raw(self.driver.fetch_all(stmt).await?))
    }

    /// Rows touched by the last statement; 0 when there is none.
    pub async fn affected_rows(&self) -> u64 {
        match self.statement_id() {
            Some(stmt) => self.driver.affected_rows(stmt).await,
            None => 0,
        }
    }

    /// Allocate a new cursor handle, releasing the previous one.
    pub async fn cursor(&mut self) -> Result<HandleId> {
        let conn = self.require_connection()?;
        let cursor = self.driver.new_cursor(conn).await?;
        self.cursor = Some(self.own(cursor, HandleKind::Cursor));
        Ok(cursor)
    }

    /// Value an OUT bind slot of the current statement received.
    pub async fn out_value(&self, name: &str) -> Result<Option<SqlValue>> {
        match self.statement_id() {
            Some(stmt) => self.driver.out_value(stmt, name).await,
            None => Ok(None),
        }
    }

    pub fn transaction_state(&self) -> TransactionState {
        self.transaction
    }

    /// Start a transaction. Takes effect on the next execute; nothing is sent to the engine.
    pub fn begin_transaction(&mut self) -> bool {
        self.transaction = TransactionState::Pending;
        true
    }

    /// Commit pending work. The connection is back in auto-commit afterwards,
    /// whether or not the commit succeeded.
    pub async fn commit(&mut self) -> bool {
        let outcome = match self.require_connection() {
            Ok(conn) => self.driver.commit(conn).await,
            Err(e) => Err(e),
        };
        self.transaction = TransactionState::AutoCommit;

        outcome
            .map_err(|e| tracing::warn!(error = %e, "Commit failed"))
            .is_ok()
    }

    /// Roll back pending work. The connection is back in auto-commit afterwards,
    /// whether or not the rollback succeeded.
    pub async fn rollback(&mut self) -> bool {
        let outcome = match self.require_connection() {
            Ok(conn) => self.driver.rollback(conn).await,
            Err(e) => Err(e),
        };
        self.transaction = TransactionState::AutoCommit;

        outcome
            .map_err(|e| tracing::warn!(error = %e, "Rollback failed"))
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_statement() {
        assert_eq!(normalize_statement("SELECT 1 FROM dual;"), "SELECT 1 FROM dual");
        assert_eq!(normalize_statement("SELECT 1 FROM dual;;  "), "SELECT 1 FROM dual");
        assert_eq!(normalize_statement("SELECT 1 FROM dual"), "SELECT 1 FROM dual");
    }

    #[test]
    fn test_normalize_block_keeps_terminator() {
        assert_eq!(
            normalize_statement("BEGIN pkg.run(:a); END"),
            "BEGIN pkg.run(:a); END;"
        );
        assert_eq!(
            normalize_statement("  begin null; end;;"),
            "  begin null; end;"
        );
        assert_eq!(
            normalize_statement("DECLARE x NUMBER; BEGIN x := 1; END;"),
            "DECLARE x NUMBER; BEGIN x := 1; END;"
        );
    }

    #[test]
    fn test_outcome_is_success() {
        assert!(ExecuteOutcome::Executed.is_success());
        assert!(!ExecuteOutcome::Failed(NativeError::new("1", "boom")).is_success());
    }
}
