pub mod annotator;
pub mod payment;
pub mod ports;
pub mod reader;
pub mod session;
