pub mod chain;
pub mod driver;
pub mod events;
pub mod network;

// Common algorithm traits
pub use self::driver::{InstantDriver, MoveAck, MoveDriver, MoveRequest};
pub use self::events::{NullObserver, ProgressEvent, ProgressObserver};
