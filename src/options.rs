//! Configuration options for [`ContextConfig`](crate::ContextConfig).

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// What happens when a component type is bound a second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum RebindPolicy {
    /// The new binding replaces the old one, keeping its position
    #[default]
    Replace,
    /// The second bind fails with [`DiError::AlreadyBound`](crate::DiError::AlreadyBound)
    Reject,
}

/// Options fixed when a [`ContextConfig`](crate::ContextConfig) is created.
///
/// ```rust
/// use ferrous_inject::{ContextConfig, ContextOptions, RebindPolicy};
///
/// let config = ContextConfig::with_options(ContextOptions::new().with_rebind(RebindPolicy::Reject));
/// assert_eq!(config.options().rebind, RebindPolicy::Reject);
/// ```
///
/// With the `config` feature the options can also be loaded from JSON, see
/// [`from_json`](ContextOptions::from_json).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContextOptions {
    pub rebind: RebindPolicy,
}

impl ContextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rebind(mut self, rebind: RebindPolicy) -> Self {
        self.rebind = rebind;
        self
    }

    /// Parses options from JSON. Missing keys keep their defaults.
    ///
    /// ```rust
    /// use ferrous_inject::{ContextOptions, RebindPolicy};
    ///
    /// let options = ContextOptions::from_json(r#"{ "rebind": "reject" }"#)?;
    /// assert_eq!(options.rebind, RebindPolicy::Reject);
    /// # Ok::<(), serde_json::Error>(())
    /// ```
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes options to compact JSON.
    #[cfg(feature = "config")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
