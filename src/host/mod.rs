pub mod events;
pub mod feed;
pub mod freshness;
pub mod session;
pub mod state;
pub mod viewport;
