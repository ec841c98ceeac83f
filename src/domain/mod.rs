pub mod sky;
pub mod snapshot;
