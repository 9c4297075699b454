//! Builder for configured VM instances

use crate::vm::{VMConfig, VM};
use anyhow::{bail, Result};
use exprvm_core::MemberDirectory;
use std::sync::Arc;

/// Builder for creating VM instances
#[derive(Default)]
pub struct VMBuilder {
    directory: Option<Arc<dyn MemberDirectory>>,
    config: VMConfig,
}

impl VMBuilder {
    /// Create a new VM builder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the member directory calls are dispatched to
    pub fn with_directory(mut self, directory: Arc<dyn MemberDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: VMConfig) -> Self {
        self.config = config;
        self
    }

    /// Bound the operand stack
    pub fn with_max_stack_depth(mut self, depth: usize) -> Self {
        self.config.max_stack_depth = depth;
        self
    }

    /// Enable trace mode
    pub fn with_trace(mut self) -> Self {
        self.config.trace = true;
        self
    }

    /// Build the VM instance
    pub fn build(self) -> Result<VM> {
        let Some(directory) = self.directory else {
            bail!("VM requires a member directory");
        };
        if self.config.max_stack_depth == 0 {
            bail!("max_stack_depth must be at least 1");
        }
        Ok(VM::with_config(directory, self.config))
    }
}
