use crate::builders::ProcedureCall;
use crate::error::Result;
use crate::handle::{HandleId, HandleKind};
use crate::types::{BindParam, BindValue, QueryResult};

use super::{Connection, ExecuteOutcome};

impl Connection {
    /// Call `package.procedure` with the given parameters.
    ///
    /// Every parameter typed [`BindType::Cursor`](crate::types::BindType::Cursor)
    /// is bound to a cursor handle (the connection's own unless one is given); the
    /// rows of that cursor are returned. Without a cursor parameter the
    /// statement's rows are returned, which for a procedure call is usually
    /// none. `None` when the engine rejected the call.
    pub async fn stored_procedure(
        &mut self,
        package: &str,
        procedure: &str,
        params: &[BindParam],
    ) -> Result<Option<QueryResult>> {
        let call = ProcedureCall::new(package, procedure, params)?;
        let conn = self.require_connection()?;
        let sql = call.build_sql();
        tracing::debug!(
            package,
            procedure,
            params = params.len(),
            has_cursor = call.has_cursor(),
            "Calling stored procedure"
        );

        match self.run_procedure(conn, &call, &sql).await {
            Err(err) => self.client_failed(err).map(|_| None),
            result => result,
        }
    }

    async fn run_procedure(
        &mut self,
        conn: HandleId,
        call: &ProcedureCall<'_>,
        sql: &str,
    ) -> Result<Option<QueryResult>> {
        let stmt = self.driver.parse(conn, sql).await?;
        self.statement = Some(self.own(stmt, HandleKind::Statement));

        let mut out_cursor = None;
        for param in call.params() {
            if !param.is_cursor() {
                self.driver.bind(stmt, param).await?;
                continue;
            }

            let cursor = match param.value {
                BindValue::Cursor(Some(cursor)) => cursor,
                _ => self.ensure_cursor().await?,
            };
            out_cursor.get_or_insert(cursor);
            let param = BindParam {
                value: BindValue::Cursor(Some(cursor)),
                ..param.clone()
            };
            self.driver.bind(stmt, &param).await?;
        }

        // Parsed and bound above; the execute must reuse this statement.
        self.reparse = false;
        if let ExecuteOutcome::Failed(_) = self.execute(sql).await? {
            return Ok(None);
        }

        let source = match out_cursor {
            Some(cursor) => {
                let mode = self.transaction.commit_mode();
                if let Err(err) = self.driver.execute(cursor, mode).await {
                    self.execution_failed(err)?;
                    return Ok(None);
                }
                cursor
            }
            None => stmt,
        };

        let raw = self.driver.fetch_all(source).await?;
        Ok(Some(QueryResult::from_raw(raw)))
    }

    async fn ensure_cursor(&mut self) -> Result<HandleId> {
        match self.cursor_id() {
            Some(cursor) => Ok(cursor),
            None => self.cursor().await,
        }
    }
}
