//! # Echo Server - Entry Point
//! src/main.rs
//!
//! Solo se sale del loop con Ctrl-C, así que el proceso termina siempre con
//! código 1: por error de arranque o por interrupción.

use echo_server::config::Config;
use echo_server::diagnostics;
use echo_server::server::{Listener, Server, Shutdown};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    let config = Config::new();

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(&config.log_level),
    };
    fmt().with_env_filter(env_filter).with_target(false).init();

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    info!(
        address = %config.address(),
        backlog = config.backlog,
        max_request_bytes = config.max_request_bytes,
        server_name = %config.server_name,
        "Configuration loaded"
    );

    let listener = match Listener::open(config.address(), config.backlog) {
        Ok(listener) => listener,
        Err(e) => {
            error!("{}", e);
            diagnostics::report(e.stage(), e.os_code());
            return ExitCode::FAILURE;
        }
    };

    let shutdown = match Shutdown::new(&listener) {
        Ok(shutdown) => shutdown,
        Err(e) => {
            error!(error = %e, "could not resolve listener address");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = shutdown.install() {
        error!(error = %e, "could not install Ctrl-C handler");
        return ExitCode::FAILURE;
    }

    let stats = Server::new(config).run(listener, &shutdown);
    info!(served = stats.total(), "Sockets closed");

    ExitCode::FAILURE
}
