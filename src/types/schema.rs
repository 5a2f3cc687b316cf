//! Descriptors assembled from catalog rows.
//!
//! Each descriptor has an explicit mapping function from the catalog row shape
//! it is read from. Descriptors are built fresh for every introspection call.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Row;

/// A column of a table, from `ALL_TAB_COLUMNS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnData {
    pub name: String,
    /// Engine type tag, e.g. `NUMBER` or `VARCHAR2`.
    pub data_type: String,
    pub max_length: Option<i64>,
    /// Default expression. A NOT NULL column without a default reports `Some("")`.
    pub default: Option<String>,
    pub nullable: bool,
}

impl ColumnData {
    /// Maps a row with `COLUMN_NAME, DATA_TYPE, CHAR_LENGTH, DATA_PRECISION,
    /// DATA_LENGTH, DATA_DEFAULT, NULLABLE`.
    pub fn from_catalog_row(row: &Row) -> Result<Self> {
        let char_length = row.get_i64("CHAR_LENGTH")?;
        let max_length = match char_length {
            Some(len) if len > 0 => Some(len),
            _ => row
                .get_i64("DATA_PRECISION")?
                .or(row.get_i64("DATA_LENGTH")?),
        };

        let nullable = row.get_str("NULLABLE")? == Some("Y");
        let default = match row.get_str("DATA_DEFAULT")? {
            Some(value) => Some(value.to_string()),
            None if !nullable => Some(String::new()),
            None => None,
        };

        Ok(Self {
            name: row.get_str("COLUMN_NAME")?.unwrap_or_default().to_string(),
            data_type: row.get_str("DATA_TYPE")?.unwrap_or_default().to_string(),
            max_length,
            default,
            nullable,
        })
    }

    /// Returns true for the engine's integral numeric types.
    pub fn is_numeric(&self) -> bool {
        matches!(self.data_type.as_str(), "NUMBER" | "INTEGER")
    }
}

/// Classification of an index by the constraint backing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndexType {
    Primary,
    Unique,
    Index,
}

impl IndexType {
    /// `P` is a primary key, `U` a unique constraint, anything else a plain index.
    pub fn from_constraint_type(constraint_type: Option<&str>) -> Self {
        match constraint_type {
            Some("P") => IndexType::Primary,
            Some("U") => IndexType::Unique,
            _ => IndexType::Index,
        }
    }
}

/// An index with its columns in catalog position order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexData {
    pub name: String,
    pub index_type: IndexType,
    pub fields: Vec<String>,
}

impl IndexData {
    /// Groups `INDEX_NAME, CONSTRAINT_TYPE, COLUMN_NAME` rows into one descriptor
    /// per index, in the order each index is first seen.
    pub fn group_catalog_rows(rows: &[Row]) -> Result<Vec<Self>> {
        let mut indexes: Vec<IndexData> = Vec::new();

        for row in rows {
            let name = row.get_str("INDEX_NAME")?.unwrap_or_default();
            let column = row.get_str("COLUMN_NAME")?.unwrap_or_default().to_string();

            if let Some(existing) = indexes.iter_mut().find(|index| index.name == name) {
                existing.fields.push(column);
                continue;
            }

            indexes.push(IndexData {
                name: name.to_string(),
                index_type: IndexType::from_constraint_type(row.get_str("CONSTRAINT_TYPE")?),
                fields: vec![column],
            });
        }

        Ok(indexes)
    }
}

/// A referential constraint column pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyData {
    pub constraint_name: String,
    pub table_name: String,
    pub column_name: String,
    pub foreign_table_name: String,
    pub foreign_column_name: String,
}

impl ForeignKeyData {
    /// Maps a row with `CONSTRAINT_NAME, TABLE_NAME, COLUMN_NAME,
    /// FOREIGN_TABLE_NAME, FOREIGN_COLUMN_NAME`.
    pub fn from_catalog_row(row: &Row) -> Result<Self> {
        let text = |column: &str| -> Result<String> {
            Ok(row.get_str(column)?.unwrap_or_default().to_string())
        };

        Ok(Self {
            constraint_name: text("CONSTRAINT_NAME")?,
            table_name: text("TABLE_NAME")?,
            column_name: text("COLUMN_NAME")?,
            foreign_table_name: text("FOREIGN_TABLE_NAME")?,
            foreign_column_name: text("FOREIGN_COLUMN_NAME")?,
        })
    }
}
