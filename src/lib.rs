// Library target: the measurement engine, the history store and the text
// generators. The terminal host in main.rs drives these through `Session`.

pub mod config;
pub mod engine;
pub mod generator;
pub mod session;
pub mod store;
