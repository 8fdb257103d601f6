//! Server lifecycle - binding, running and stopping the HTTP server.

use std::io;
use std::net::TcpListener;

use actix_web::dev::{Server, ServerHandle};
use actix_web::{App, HttpServer, web};
use tokio::task::JoinHandle;
use tracing_actix_web::TracingLogger;

use crate::config::AppConfig;
use crate::handlers;
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

/// A bound, not yet running, HTTP server.
pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Bind the listener and build the server. A configured port of `0`
    /// picks a free port; see [`Application::port`].
    pub fn build(config: &AppConfig, state: AppState) -> io::Result<Self> {
        let listener = TcpListener::bind((config.host.as_str(), config.port))?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            App::new()
                .wrap(TracingLogger::default())
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new(state.clone()))
                .configure(handlers::configure_routes)
        })
        .listen(listener)?
        .run();

        tracing::info!("Listening on {}:{}", config.host, port);
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run in the current task until the server shuts down (e.g. on SIGINT).
    pub async fn run_until_stopped(self) -> io::Result<()> {
        self.server.await
    }

    /// Run on a background task and return a handle that can stop it.
    pub fn start(self) -> RunningServer {
        let handle = self.server.handle();
        let task = tokio::spawn(self.server);

        RunningServer {
            port: self.port,
            handle,
            task,
        }
    }
}

/// A server running on a background task.
pub struct RunningServer {
    port: u16,
    handle: ServerHandle,
    task: JoinHandle<io::Result<()>>,
}

impl RunningServer {
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Stop accepting connections, let in-flight requests finish, and wait
    /// for the server task to exit.
    pub async fn stop(self) -> io::Result<()> {
        tracing::info!(port = self.port, "Stopping server");
        self.handle.stop(true).await;
        self.task.await.map_err(io::Error::other)?
    }
}
