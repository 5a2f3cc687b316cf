mod driver;

pub use driver::{ConnectRequest, DatabaseDriver};
