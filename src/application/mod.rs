pub mod import;
pub mod service;
pub mod settings;
pub mod translate;
