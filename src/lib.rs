pub mod channel;
pub mod engine;
pub mod model;
pub mod player;
pub mod protocol;
pub mod search;
pub mod timer;
