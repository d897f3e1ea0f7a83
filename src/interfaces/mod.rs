pub mod cli;
pub mod task;
