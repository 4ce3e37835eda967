pub mod batch_processor;
pub mod buffer_pool;
pub mod file_loader;
pub mod mime;
pub mod monitor;
pub mod retry;
pub mod sanitizer;
pub mod uploader;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch_processor::BatchProcessor;
pub use buffer_pool::BufferPool;
pub use monitor::ProcessMemoryProbe;
