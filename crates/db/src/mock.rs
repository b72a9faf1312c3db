pub mod memory;
pub mod repositories;

pub use memory::MemoryBackend;
pub use repositories::MockBackend;
