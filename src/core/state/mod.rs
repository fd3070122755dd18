// Job status snapshots and their persistence

pub mod manager;
pub mod status;
pub mod storage;

pub use manager::StateManager;
pub use status::JobStatus;
pub use storage::{FileStatusStorage, MemoryStatusStorage, StatusStorage};
