//! Recognizer implementations that don't need a real platform capability

pub mod mock;
pub mod noop;

pub use mock::{MockConfig, MockHandle, MockOp, MockRecognizer};
pub use noop::UnsupportedRecognizer;
