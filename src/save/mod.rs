//! Save/load system
//!
//! Handles key-value storage backends and the player data store.

pub mod storage;
pub mod file_storage;
pub mod snapshot;
pub mod store;

pub use storage::{KeyValueStorage, MemoryStorage, StorageError};
pub use file_storage::{default_data_dir, FileStorage};
pub use snapshot::DataSnapshot;
pub use store::{
    unix_millis, Clock, PlayerDataStore, RecordGroup, StorageKeys, StoreError, UnknownRecordGroup,
    DEFAULT_KEY_PREFIX,
};
