//! # Parley
//!
//! A multi-room chat coordination service. Clients join named rooms and
//! get the history so far, post messages, and send heartbeats. Everything
//! lives in memory for the life of the process.
//!
//! The workspace is layered:
//!
//! ```text
//! parley-transport  (WebSocket frames)
//!     → parley-protocol  (Request / Response, JSON)
//!         → ChatCoordinator  (validation, this crate)
//!             → parley-room      (RoomStore: per-room locked history)
//!             → parley-presence  (PresenceTracker: last heartbeat per user)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parley::prelude::*;
//!
//! # async fn start() -> Result<(), ParleyError> {
//! let server = ParleyServerBuilder::new().bind("0.0.0.0:50051").build().await?;
//! server.run().await
//! # }
//! ```
//!
//! The coordinator can also be used in-process without any networking:
//!
//! ```rust
//! use parley::ChatCoordinator;
//!
//! let chat = ChatCoordinator::default();
//! assert!(chat.join("alice", "general").unwrap().is_empty());
//! chat.send_message("alice", "hi", "general").unwrap();
//! assert_eq!(chat.join("bob", "general").unwrap().len(), 1);
//! ```

mod coordinator;
mod error;
mod handler;
mod server;

pub use coordinator::ChatCoordinator;
pub use error::ParleyError;
pub use server::{ParleyServer, ParleyServerBuilder};

pub mod prelude {
    //! Everything needed to run a server or talk to one.
    pub use crate::{ChatCoordinator, ParleyError, ParleyServer, ParleyServerBuilder};
    pub use parley_presence::PresenceConfig;
    pub use parley_protocol::{
        Call, ChatMessage, Presence, Reply, Request, Response, RoomSummary, Timestamp,
    };
    pub use parley_room::StoreConfig;
}
