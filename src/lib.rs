pub mod calendar;
pub mod config;
pub mod storage;
pub mod todo;
pub mod utils;
