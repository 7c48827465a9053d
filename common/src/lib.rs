pub mod events;

pub use events::{EventType, WalletEvent};
