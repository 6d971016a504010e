// file: src/cache/mod.rs
// description: seen-paper cache module exports
// reference: internal module structure

mod store;

pub use store::{SeenSet, SeenStore};
