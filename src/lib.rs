//! Offline string translation for disassembled programs.
//!
//! Strings selected in a program document are passed one by one to the
//! `argos-translate` executable and the results are written back as
//! translation annotations inside a single document transaction.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod presentation;
pub mod state;
