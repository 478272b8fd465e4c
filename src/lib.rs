pub mod blog;
pub mod config;
pub mod storage;
pub mod visitor;
