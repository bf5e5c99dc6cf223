//! # Error Types
//!
//! ##
//!
//! This module contains an error type that groups together the more specific errors a terminal
//! host can run into while loading bindings, registering actions and reading keys.
use keydispatch::{KeyError, RegistryError};

pub use crate::config::ConfigError;

/// Wrapper for the various errors that a host may want to combine.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum HostError {
    /// Failure while loading configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Failure while registering actions.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Failure while parsing keys.
    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    /// Failure during Input/Output.
    #[error("Input/Output Error: {0}")]
    IOError(#[from] std::io::Error),
}

/// Common result type for terminal hosts.
pub type HostResult<V> = Result<V, HostError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use keydispatch::{ActionRegistry, KeySequence, ResolvedAction};

    fn register_twice() -> HostResult<()> {
        let mut registry = ActionRegistry::new();

        registry.register("a", 0, vec![ResolvedAction::command("dup", |_| ())])?;
        registry.register("b", 0, vec![ResolvedAction::command("dup", |_| ())])?;

        Ok(())
    }

    fn load_bad_keys() -> HostResult<()> {
        let config = Config::from_toml_str(
            "[[bindings]]\nmode = \"normal\"\nkeys = \"Ctrl+\"\naction = \"a\"\n",
        )?;
        let _ = config.bindings()?;

        Ok(())
    }

    fn parse_keys() -> HostResult<KeySequence> {
        Ok("".parse::<KeySequence>()?)
    }

    #[test]
    fn test_conversions() {
        let err = register_twice().unwrap_err();
        assert!(matches!(err, HostError::Registry(RegistryError::DuplicateAction(_))));
        assert_eq!(err.to_string(), "Registry error: Duplicate action id: \"dup\"");

        let err = load_bad_keys().unwrap_err();
        assert!(matches!(err, HostError::Config(ConfigError::InvalidKeys { .. })));
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid keys \"Ctrl+\": Invalid key step: \"Ctrl+\""
        );

        let err = parse_keys().unwrap_err();
        assert!(matches!(err, HostError::Key(KeyError::EmptySequence)));
    }
}
