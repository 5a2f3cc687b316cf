pub mod returning;

pub use returning::{with_row_id_returning, RETURNING_ROW_ID, ROW_ID_BIND};
