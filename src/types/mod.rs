mod bind;
mod row;
mod schema;
mod sql_value;
mod table_name;
mod transaction;

pub use bind::{BindParam, BindType, BindValue};
pub use row::{QueryResult, RawQueryResult, Row};
pub use schema::{ColumnData, ForeignKeyData, IndexData, IndexType};
pub use sql_value::SqlValue;
pub use table_name::{quote_identifier, QualifiedTable};
pub use transaction::{CommitMode, TransactionState};
