pub mod memory;
pub mod output;
pub mod real;
pub mod traits;
pub mod walker;

// Re-export I/O traits for convenient access
pub use memory::MemoryFileSystem;
pub use output::Reporter;
pub use real::RealFileSystem;
pub use traits::FileSystem;
pub use walker::{normalize, TreeWalker};
