pub mod config;
pub mod options;
pub mod process;
pub mod storage;
