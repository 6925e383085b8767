//! Realtime synchronization engine
//!
//! The wire protocol shared by every connected client and the router that
//! applies validated commands to the board store.

pub mod protocol;
pub mod router;

pub use protocol::*;
pub use router::{MessageRouter, Routed};
