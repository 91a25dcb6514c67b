//! `GambitServer` builder and server loop.
//!
//! This is the entry point for running a Gambit table server. It ties
//! together all the layers: transport → protocol → table.

use std::sync::Arc;

use gambit_protocol::{Codec, JsonCodec};
use gambit_table::{RulesOracle, TableConfig, TableHandle, spawn_table};
use gambit_transport::{Transport, WebSocketTransport};

use crate::GambitError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The table
/// handle is the only path to the game session; there is no lock here.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) table: TableHandle,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Gambit server.
///
/// # Example
///
/// ```rust,ignore
/// use gambit::prelude::*;
///
/// let server = GambitServer::builder()
///     .bind("0.0.0.0:3000")
///     .build::<MyRules>(MyRules::start())
///     .await?;
/// server.run().await
/// ```
pub struct GambitServerBuilder {
    bind_addr: String,
    table_config: TableConfig,
}

impl GambitServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            table_config: TableConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the table configuration.
    pub fn table_config(mut self, config: TableConfig) -> Self {
        self.table_config = config;
        self
    }

    /// Binds the listener and starts the table at `start`.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build<G: RulesOracle>(
        self,
        start: G::Position,
    ) -> Result<GambitServer<JsonCodec>, GambitError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let table = spawn_table::<G>(start, self.table_config);

        let state = Arc::new(ServerState {
            table,
            codec: JsonCodec,
        });

        Ok(GambitServer { transport, state })
    }
}

impl Default for GambitServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Gambit server with its table running.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GambitServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl GambitServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> GambitServerBuilder {
        GambitServerBuilder::new()
    }
}

impl<C: Codec> GambitServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Returns a handle to the table, for inspection or shutdown.
    pub fn table(&self) -> TableHandle {
        self.state.table.clone()
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task for each accepted connection. Runs until the
    /// process is terminated.
    pub async fn run(mut self) -> Result<(), GambitError> {
        tracing::info!(
            addr = ?self.transport.local_addr().ok(),
            "Gambit server running"
        );

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
