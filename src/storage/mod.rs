//! Storage backends serving the REST resources the client talks to

pub mod in_memory;

pub use in_memory::InMemoryBackend;
