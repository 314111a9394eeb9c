use thiserror::Error;

/// Failures while obtaining or validating the dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to fetch dataset: {0}")]
    Fetch(#[from] std::io::Error),
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("entity uses the reserved id `{0}`")]
    ReservedId(String),
    #[error("duplicate entity id `{0}`")]
    DuplicateId(String),
}

/// Rejected navigation actions. Interaction paths swallow these; programmatic
/// callers get them back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no node with id `{0}`")]
    UnknownNode(String),
    #[error("node `{0}` has no children")]
    NotExpandable(String),
    #[error("already at the overview")]
    AtOverview,
    #[error("dataset is not loaded")]
    NotLoaded,
}
