use crate::server::connection_handler::{HandlerConfig, handle_connection};
use crate::store::LocationStore;
use std::io;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServerState {
    Stopped,
    Running(SocketAddr),
}

#[derive(Debug)]
struct RunningServer {
    local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    accept_task: JoinHandle<()>,
}

/// Accepts device connections and hands each one to its own connection handler task.
#[derive(Debug)]
pub struct LocationServer {
    store: LocationStore,
    config: HandlerConfig,
    running: Mutex<Option<RunningServer>>,
}

impl LocationServer {
    pub fn new(store: LocationStore, config: HandlerConfig) -> Self {
        LocationServer {
            store,
            config,
            running: Mutex::new(None),
        }
    }

    /// Binds `host:port` and starts accepting in the background. Returns the bound address once listening.
    #[instrument(skip(self))]
    pub async fn start(&self, host: &str, port: u16) -> Result<SocketAddr, ServerError> {
        let mut running = self.running.lock().await;
        if let Some(server) = running.as_ref().filter(|server| !server.accept_task.is_finished()) {
            warn!("⚠️ Server is already running on {}", server.local_addr);
            return Err(ServerError::AlreadyRunning(server.local_addr));
        }

        info!("🚀 Starting server on {}:{}...", host, port);
        let bind_error = |source: io::Error| ServerError::Bind {
            address: format!("{}:{}", host, port),
            source,
        };
        let listener = TcpListener::bind((host, port)).await.map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let accept_task = tokio::spawn(accept_loop(listener, local_addr, shutdown_rx, self.store.clone(), self.config.clone()));

        *running = Some(RunningServer {
            local_addr,
            shutdown_tx,
            accept_task,
        });
        info!("🚀 Starting server on {}:{}... OK, listening on {}", host, port, local_addr);

        Ok(local_addr)
    }

    /// Stops accepting and releases the listening socket. Handlers that are still running are left to finish.
    #[instrument(skip(self))]
    pub async fn stop(&self) {
        let mut running = self.running.lock().await;
        let Some(server) = running.take() else {
            debug!("Server is not running, nothing to stop");
            return;
        };

        info!("🛑 Stopping server on {}...", server.local_addr);
        // Fails only when the accept loop already ended by itself
        server.shutdown_tx.send(()).unwrap_or_default();
        if let Err(e) = server.accept_task.await {
            error!("❌ Accept loop failed: {}", e);
        }
        info!("🛑 Stopping server on {}... OK", server.local_addr);
    }

    pub async fn state(&self) -> ServerState {
        match self.running.lock().await.as_ref() {
            Some(server) if !server.accept_task.is_finished() => ServerState::Running(server.local_addr),
            _ => ServerState::Stopped,
        }
    }
}

#[instrument(skip_all, fields(address = %local_addr))]
async fn accept_loop(
    listener: TcpListener,
    local_addr: SocketAddr,
    mut shutdown_rx: oneshot::Receiver<()>,
    store: LocationStore,
    config: HandlerConfig,
) {
    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                debug!("Received stop signal");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((socket, address)) => {
                    debug!(%address, "🔌 Accepted connection");
                    tokio::spawn(handle_connection(socket, address, store.clone(), config.clone()));
                }
                Err(e) => {
                    error!("❌ Failed to accept connection, stopping: {}", e);
                    break;
                }
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("could not start server on {address}: {source}")]
    Bind { address: String, source: io::Error },
    #[error("server is already running on {0}")]
    AlreadyRunning(SocketAddr),
}
