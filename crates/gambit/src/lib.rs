//! # Gambit
//!
//! Authoritative session and turn-synchronization server for two-seat,
//! alternating-turn board games.
//!
//! The first connection takes White, the second Black, and everyone after
//! that watches. The server owns the one game position: clients submit
//! moves, a [`RulesOracle`](gambit_table::RulesOracle) judges them, and
//! every accepted move is broadcast to all connections in the same order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gambit::prelude::*;
//!
//! // Implement RulesOracle for your game, then:
//! // let server = GambitServer::builder()
//! //     .bind("0.0.0.0:3000")
//! //     .build::<MyRules>(start_position)
//! //     .await?;
//! // server.run().await
//! ```

mod error;
mod handler;
mod server;

pub use error::GambitError;
pub use server::{GambitServer, GambitServerBuilder};

/// Everything needed to implement a rules oracle and run a server.
pub mod prelude {
    pub use crate::{GambitError, GambitServer, GambitServerBuilder};
    pub use gambit_protocol::{
        ClientEnvelope, ClientEvent, MoveRequest, MoveSubmission,
        ParticipantId, Rejection, Role, RoleLabel, ServerEnvelope,
        ServerEvent,
    };
    pub use gambit_table::{
        IllegalMove, Outcome, RulesOracle, TableConfig, TableHandle,
        TableSnapshot,
    };
}
