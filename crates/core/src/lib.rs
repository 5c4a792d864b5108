#![forbid(unsafe_code)]

pub mod library;
pub mod model;
pub mod selection;
pub mod time;

pub use time::Clock;
