/// Commit mode a statement is executed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitMode {
    /// Commit on successful execution.
    AutoCommit,
    /// Leave the work pending until an explicit commit or rollback.
    NoAutoCommit,
}

/// Transaction state of a connection.
///
/// `AutoCommit --begin--> Pending --commit|rollback--> AutoCommit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionState {
    #[default]
    AutoCommit,
    Pending,
}

impl TransactionState {
    pub fn commit_mode(self) -> CommitMode {
        match self {
            TransactionState::AutoCommit => CommitMode::AutoCommit,
            TransactionState::Pending => CommitMode::NoAutoCommit,
        }
    }
}
