pub mod clock;
pub mod error;
pub mod phase;
pub mod shutdown;

pub use clock::*;
pub use error::*;
pub use phase::*;
pub use shutdown::*;
