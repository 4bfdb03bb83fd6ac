//! Core orchestration layer for mdpage.

pub mod diff;
pub mod fs;
mod ops;

pub use ops::{
    CheckOptions, CheckOutcome, OperationError, Operations, RenderMode, RenderOptions,
    RenderOutcome, RenderStatus,
};

use mdpage_config::{Config, LoadOptions};

/// Entry point for higher-level consumers (CLI, bench).
pub struct MdPage {
    ops: Operations,
}

impl MdPage {
    /// Bootstrap the engine from already-loaded configuration.
    pub fn bootstrap(config: Config) -> Self {
        Self {
            ops: Operations::new(config),
        }
    }

    /// Load layered configuration and bootstrap from it.
    pub fn load(options: LoadOptions) -> Result<Self, OperationError> {
        let config = Config::load(options)?;
        Ok(Self::bootstrap(config))
    }

    /// Access the operation bundle.
    pub fn operations(&self) -> &Operations {
        &self.ops
    }
}
