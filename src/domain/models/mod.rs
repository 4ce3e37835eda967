pub mod batch;
pub mod buffer;
pub mod file;
pub mod security;
