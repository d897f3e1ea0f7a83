pub mod argos;

pub use argos::ArgosTranslator;
