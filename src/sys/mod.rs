pub mod runtime;
pub mod watcher;
