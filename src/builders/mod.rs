pub mod dsn;
mod procedure;

pub use dsn::{DsnGrammar, DsnOutcome};
pub use procedure::ProcedureCall;
