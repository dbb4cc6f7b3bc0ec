//! Defines helpers for logging

use std::{error::Error, fmt::Display};
pub use tracing_subscriber::{filter::LevelFilter, fmt::format::Format};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

pub mod helpers;

/// Possible errors that occur when setting up telemetry
#[derive(Debug)]
pub enum TelemetrySetupError {
    /// Error emitted when the log filter directives cannot be parsed
    Filter(String),
    /// Error emitted when a global subscriber is already installed
    AlreadyInitialized(String),
}

impl Error for TelemetrySetupError {}
impl Display for TelemetrySetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Initialize a logger at the given log level
pub fn setup_system_logger(level: LevelFilter) {
    tracing_subscriber::fmt().event_format(Format::default().pretty()).with_max_level(level).init();
}

/// A builder for configuring telemetry
pub struct TelemetryBuilder {
    /// The subscriber layers to add to the telemetry stack
    layers: Vec<Box<dyn Layer<Registry> + Send + Sync + 'static>>,
    /// The level used when `RUST_LOG` does not specify one
    default_level: LevelFilter,
    /// Extra filter directives, e.g. `contracts_client=debug`
    directives: Vec<String>,
}

impl Default for TelemetryBuilder {
    fn default() -> Self {
        Self { layers: Vec::new(), default_level: LevelFilter::INFO, directives: Vec::new() }
    }
}

impl TelemetryBuilder {
    /// Add a subscriber layer to the telemetry builder
    fn with_layer<L: Layer<Registry> + Send + Sync>(mut self, layer: L) -> Self {
        self.layers.push(layer.boxed());
        self
    }

    /// Configure logging, emitting JSON lines when `json` is set
    pub fn with_logging(self, json: bool) -> Self {
        if json {
            self.with_layer(fmt::layer().json().with_current_span(true))
        } else {
            self.with_layer(fmt::layer().pretty())
        }
    }

    /// Set the level used when the environment does not override it
    pub fn with_default_level(mut self, level: LevelFilter) -> Self {
        self.default_level = level;
        self
    }

    /// Add a filter directive on top of the environment's
    pub fn with_directive(mut self, directive: &str) -> Self {
        self.directives.push(directive.to_string());
        self
    }

    /// Build the env filter from the default level and configured directives
    fn build_filter(&self) -> Result<EnvFilter, TelemetrySetupError> {
        let mut filter = EnvFilter::builder()
            .with_default_directive(self.default_level.into())
            .from_env_lossy();
        for directive in self.directives.iter() {
            let parsed =
                directive.parse().map_err(|e| TelemetrySetupError::Filter(format!("{e}")))?;
            filter = filter.add_directive(parsed);
        }

        Ok(filter)
    }

    /// Initialize the global subscriber with the configured telemetry layers
    pub fn build(self) -> Result<(), TelemetrySetupError> {
        let filter = self.build_filter()?;
        let layers = self.layers.with_filter(filter);
        tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .map_err(|e| TelemetrySetupError::AlreadyInitialized(e.to_string()))
    }
}

/// Configures logging for a binary
pub fn configure_telemetry(
    json_logs: bool,
    default_level: LevelFilter,
) -> Result<(), TelemetrySetupError> {
    TelemetryBuilder::default()
        .with_logging(json_logs)
        .with_default_level(default_level)
        .build()
}
