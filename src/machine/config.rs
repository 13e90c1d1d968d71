//! Machine configuration.

/// Default number of transitions kept in a machine's history.
pub const DEFAULT_HISTORY_LIMIT: usize = 32;

/// Options fixed at machine construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachineConfig {
    label: Option<String>,
    history_limit: usize,
}

impl MachineConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> MachineConfigBuilder {
        MachineConfigBuilder::new()
    }

    /// Name attached to this machine's log events.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Maximum number of transitions kept in history. `0` disables it.
    pub fn history_limit(&self) -> usize {
        self.history_limit
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            label: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Builder for [`MachineConfig`].
///
/// # Example
///
/// ```rust
/// use statecraft::MachineConfig;
///
/// let config = MachineConfig::builder()
///     .label("player")
///     .history_limit(8)
///     .build();
///
/// assert_eq!(config.label(), Some("player"));
/// assert_eq!(config.history_limit(), 8);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MachineConfigBuilder {
    config: MachineConfig,
}

impl MachineConfigBuilder {
    /// Create a builder holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label attached to log events.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = Some(label.into());
        self
    }

    /// Set the maximum history length.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = limit;
        self
    }

    /// Disable transition history entirely.
    pub fn without_history(self) -> Self {
        self.history_limit(0)
    }

    /// Finish the configuration.
    pub fn build(self) -> MachineConfig {
        self.config
    }
}
