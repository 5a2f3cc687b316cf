use crate::error::{OraRsError, Result};
use crate::types::{
    BindParam, ColumnData, ForeignKeyData, IndexData, QualifiedTable, QueryResult,
};

use super::{Connection, ExecuteOutcome};

const FIELD_DATA_SQL: &str = "SELECT COLUMN_NAME, DATA_TYPE, CHAR_LENGTH, DATA_PRECISION, \
DATA_LENGTH, DATA_DEFAULT, NULLABLE \
FROM ALL_TAB_COLUMNS \
WHERE OWNER = :owner AND TABLE_NAME = :table_name \
ORDER BY COLUMN_ID";

const INDEX_DATA_SQL: &str = "SELECT AIC.INDEX_NAME, AC.CONSTRAINT_TYPE, AIC.COLUMN_NAME \
FROM ALL_IND_COLUMNS AIC \
LEFT JOIN ALL_CONSTRAINTS AC \
ON AIC.INDEX_NAME = AC.CONSTRAINT_NAME \
AND AIC.TABLE_NAME = AC.TABLE_NAME \
AND AIC.TABLE_OWNER = AC.OWNER \
WHERE AIC.TABLE_OWNER = :owner AND AIC.TABLE_NAME = :table_name \
ORDER BY AC.CONSTRAINT_TYPE, AIC.INDEX_NAME, AIC.COLUMN_POSITION";

const FOREIGN_KEY_DATA_SQL: &str = "SELECT ACC.CONSTRAINT_NAME, ACC.TABLE_NAME, ACC.COLUMN_NAME, \
CCU.TABLE_NAME FOREIGN_TABLE_NAME, ACCU.COLUMN_NAME FOREIGN_COLUMN_NAME \
FROM ALL_CONS_COLUMNS ACC \
JOIN ALL_CONSTRAINTS AC \
ON ACC.OWNER = AC.OWNER AND ACC.CONSTRAINT_NAME = AC.CONSTRAINT_NAME \
JOIN ALL_CONSTRAINTS CCU \
ON AC.R_OWNER = CCU.OWNER AND AC.R_CONSTRAINT_NAME = CCU.CONSTRAINT_NAME \
JOIN ALL_CONS_COLUMNS ACCU \
ON ACCU.CONSTRAINT_NAME = CCU.CONSTRAINT_NAME \
AND ACCU.POSITION = ACC.POSITION \
AND ACCU.TABLE_NAME = CCU.TABLE_NAME \
WHERE AC.CONSTRAINT_TYPE = 'R' AND ACC.OWNER = :owner AND ACC.TABLE_NAME = :table_name";

const LIST_TABLES_SQL: &str = "SELECT \"TABLE_NAME\" FROM \"USER_TABLES\"";

const LIST_COLUMNS_SQL: &str = "SELECT COLUMN_NAME FROM ALL_TAB_COLUMNS \
WHERE OWNER = :owner AND TABLE_NAME = :table_name \
ORDER BY COLUMN_ID";

const DISABLE_FOREIGN_KEY_CHECKS_SQL: &str = "BEGIN
  FOR c IN
  (SELECT c.owner, c.table_name, c.constraint_name
   FROM user_constraints c, user_tables t
   WHERE c.table_name = t.table_name
   AND c.status = 'ENABLED'
   AND c.constraint_type = 'R'
   AND t.iot_type IS NULL
   ORDER BY c.constraint_type DESC)
  LOOP
    dbms_utility.exec_ddl_statement('alter table \"' || c.owner || '\".\"' || c.table_name || '\" disable constraint \"' || c.constraint_name || '\"');
  END LOOP;
END;";

const ENABLE_FOREIGN_KEY_CHECKS_SQL: &str = "BEGIN
  FOR c IN
  (SELECT c.owner, c.table_name, c.constraint_name
   FROM user_constraints c, user_tables t
   WHERE c.table_name = t.table_name
   AND c.status = 'DISABLED'
   AND c.constraint_type = 'R'
   AND t.iot_type IS NULL
   ORDER BY c.constraint_type DESC)
  LOOP
    dbms_utility.exec_ddl_statement('alter table \"' || c.owner || '\".\"' || c.table_name || '\" enable constraint \"' || c.constraint_name || '\"');
  END LOOP;
END;";

/// Escape character used in LIKE patterns.
const LIKE_ESCAPE: char = '!';

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '!' | '%' | '_') {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

fn table_binds(table: &QualifiedTable) -> [BindParam; 2] {
    [
        BindParam::new(":owner", table.owner.as_str()),
        BindParam::new(":table_name", table.name.as_str()),
    ]
}

impl Connection {
    /// Columns of `table` (`owner.table`, or a table owned by the connecting user).
    /// The table prefix is applied unless the name already carries it.
    pub async fn field_data(&mut self, table: &str) -> Result<Vec<ColumnData>> {
        let table = self.catalog_table(table);
        let result = self
            .catalog_query(FIELD_DATA_SQL, &table_binds(&table), "Failed to get field data.")
            .await?;

        result
            .rows_ref()
            .iter()
            .map(ColumnData::from_catalog_row)
            .collect()
    }

    /// Indexes of `table`, one descriptor per index.
    pub async fn index_data(&mut self, table: &str) -> Result<Vec<IndexData>> {
        let table = self.catalog_table(table);
        let result = self
            .catalog_query(INDEX_DATA_SQL, &table_binds(&table), "Failed to get index data.")
            .await?;

        IndexData::group_catalog_rows(result.rows_ref())
    }

    /// Referential constraints declared on `table`.
    pub async fn foreign_key_data(&mut self, table: &str) -> Result<Vec<ForeignKeyData>> {
        let table = self.catalog_table(table);
        let result = self
            .catalog_query(
                FOREIGN_KEY_DATA_SQL,
                &table_binds(&table),
                "Failed to get foreign key data.",
            )
            .await?;

        result
            .rows_ref()
            .iter()
            .map(ForeignKeyData::from_catalog_row)
            .collect()
    }

    /// Tables owned by the connecting user, optionally limited to the table prefix.
    pub async fn list_tables(&mut self, prefix_limit: bool) -> Result<Vec<String>> {
        let prefix = &self.config.table_prefix;
        let (sql, binds) = if prefix_limit && !prefix.is_empty() {
            (
                format!("{LIST_TABLES_SQL} WHERE \"TABLE_NAME\" LIKE :prefix ESCAPE '{LIKE_ESCAPE}'"),
                vec![BindParam::new(":prefix", format!("{}%", escape_like(prefix)))],
            )
        } else {
            (LIST_TABLES_SQL.to_string(), Vec::new())
        };

        let result = self
            .catalog_query(&sql, &binds, "Failed to list tables.")
            .await?;
        Ok(single_column(&result, "TABLE_NAME"))
    }

    /// Column names of `table`, with the table prefix applied.
    pub async fn list_columns(&mut self, table: &str) -> Result<Vec<String>> {
        let table = self.catalog_table(table);

        let result = self
            .catalog_query(LIST_COLUMNS_SQL, &table_binds(&table), "Failed to list columns.")
            .await?;
        Ok(single_column(&result, "COLUMN_NAME"))
    }

    /// Disable every enabled referential constraint on the user's tables.
    pub async fn disable_foreign_key_checks(&mut self) -> Result<ExecuteOutcome> {
        self.execute(DISABLE_FOREIGN_KEY_CHECKS_SQL).await
    }

    /// Re-enable every disabled referential constraint on the user's tables.
    pub async fn enable_foreign_key_checks(&mut self) -> Result<ExecuteOutcome> {
        self.execute(ENABLE_FOREIGN_KEY_CHECKS_SQL).await
    }

    /// Resolves `owner.table` or a bare table against the connecting user,
    /// with the table prefix applied.
    pub(super) fn catalog_table(&self, table: &str) -> QualifiedTable {
        let mut table = QualifiedTable::parse(table, &self.config.username);
        table.apply_prefix(&self.config.table_prefix);
        table
    }

    /// Runs a catalog query. A failed query is always an error, strict mode or
    /// not, since an empty result would be indistinguishable from "no metadata".
    async fn catalog_query(
        &mut self,
        sql: &str,
        binds: &[BindParam],
        failure: &str,
    ) -> Result<QueryResult> {
        match self.query_with_binds(sql, binds).await {
            Ok(Some(result)) => Ok(result),
            Err(OraRsError::NotConnected) => Err(OraRsError::NotConnected),
            Ok(None) | Err(_) => Err(OraRsError::SchemaQuery(failure.to_string())),
        }
    }
}

fn single_column(result: &QueryResult, column: &str) -> Vec<String> {
    result
        .rows_ref()
        .iter()
        .filter_map(|row| row.get_str(column).ok().flatten())
        .map(str::to_string)
        .collect()
}
