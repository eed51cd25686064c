/// World entities and catalog rows are keyed by caller-chosen text ids
/// (`"player"`, `"forest_a12f"`, `"lighter"`).
pub type EntityId = String;

/// Item instances are uuid-keyed.
pub type ItemId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
