use crate::error::Result;
use crate::types::{quote_identifier, BindParam, BindType, ColumnData, IndexData, IndexType};

use super::Connection;

/// The first single-column primary key whose column is numeric.
fn numeric_primary_key<'a>(indexes: &'a [IndexData], columns: &[ColumnData]) -> Option<&'a str> {
    indexes
        .iter()
        .filter(|index| index.index_type == IndexType::Primary && index.fields.len() == 1)
        .map(|index| index.fields[0].as_str())
        .find(|field| {
            columns
                .iter()
                .any(|column| column.name == *field && column.is_numeric())
        })
}

impl Connection {
    /// Primary key value of the row inserted by the last statement carrying the
    /// row identifier returning clause.
    ///
    /// Returns 0 when no row identifier was captured, when the target table has
    /// no single-column numeric primary key, or when the lookup fails. The
    /// captured identifier is consumed by this call.
    pub async fn insert_id(&mut self) -> u64 {
        let (Some(row_id), Some(table)) = (self.last_row_id.take(), self.last_insert_table.take())
        else {
            return 0;
        };

        match self.resolve_insert_id(&row_id, &table).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, table = %table, "Could not resolve inserted row id");
                0
            }
        }
    }

    async fn resolve_insert_id(&mut self, row_id: &str, table: &str) -> Result<u64> {
        let indexes = self.index_data(table).await?;
        let columns = self.field_data(table).await?;

        let Some(primary_key) = numeric_primary_key(&indexes, &columns) else {
            tracing::debug!(table, "No numeric single-column primary key");
            return Ok(0);
        };

        let target = self.catalog_table(table);
        let sql = format!(
            "SELECT {} SEQ FROM {} WHERE ROWID = :row_ref",
            quote_identifier(primary_key),
            target.quoted()
        );
        let binds = [BindParam::new(":row_ref", row_id).with_type(BindType::RowId)];

        let id = self
            .query_with_binds(&sql, &binds)
            .await?
            .and_then(|result| result.single_row().ok())
            .and_then(|row| row.get_i64("SEQ").ok().flatten())
            .and_then(|id| u64::try_from(id).ok())
            .unwrap_or(0);
        Ok(id)
    }
}
