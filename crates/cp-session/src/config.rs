//! Configuration for a game session host.

/// Configuration for a [`crate::Session`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Days without activity before a game is purged.
    pub retention_days: i64,
    /// Command prefix for games that have not set their own.
    pub default_prefix: String,
    /// RNG seed for reproducible rolls; entropy when `None`.
    pub seed: Option<u64>,
    /// Whether best total / best effect is suggested when a game has no `best` option.
    pub suggest_best: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            retention_days: 180,
            default_prefix: "$".to_string(),
            seed: None,
            suggest_best: true,
        }
    }
}

impl SessionConfig {
    /// Set the retention window (at least one day).
    pub fn with_retention_days(mut self, days: i64) -> Self {
        self.retention_days = days.max(1);
        self
    }

    /// Set the default command prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.default_prefix = prefix.into();
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the default for best total / best effect suggestions.
    pub fn with_suggest_best(mut self, on: bool) -> Self {
        self.suggest_best = on;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.retention_days, 180);
        assert_eq!(cfg.default_prefix, "$");
        assert!(cfg.seed.is_none());
        assert!(cfg.suggest_best);
    }

    #[test]
    fn builder_methods() {
        let cfg = SessionConfig::default()
            .with_seed(9)
            .with_prefix("!")
            .with_retention_days(30)
            .with_suggest_best(false);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.default_prefix, "!");
        assert_eq!(cfg.retention_days, 30);
        assert!(!cfg.suggest_best);
    }

    #[test]
    fn retention_clamped() {
        let cfg = SessionConfig::default().with_retention_days(0);
        assert_eq!(cfg.retention_days, 1);
    }
}
