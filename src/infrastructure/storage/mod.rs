mod azure_backend;
mod backend_factory;
mod drive_backend;
mod in_memory_backend;
mod local_backend;
mod object_folder;

pub use azure_backend::{AZURE_SCHEME, AzureStorageBackend};
pub use backend_factory::StorageBackendFactory;
pub use drive_backend::{DRIVE_SCHEME, DriveStorageBackend};
pub use in_memory_backend::{InMemoryStorageBackend, MEMORY_SCHEME};
pub use local_backend::{LOCAL_SCHEME, LocalStorageBackend};
