pub mod dashboard_model;
pub mod dashboard_service;
pub mod snapshot_store;

pub use dashboard_model::*;
pub use dashboard_service::*;
pub use snapshot_store::SnapshotStore;
