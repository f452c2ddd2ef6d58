//! Command handler registry
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation for handler dispatch

use std::collections::HashMap;
use std::sync::Arc;

use super::handler::BotCommandHandler;
use super::handlers::{InfoHandler, MemoryHandler};

/// Registry mapping command names to handlers
///
/// Multiple command names can map to the same handler if they share logic.
#[derive(Clone)]
pub struct CommandRegistry {
    handlers: HashMap<&'static str, Arc<dyn BotCommandHandler>>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registry with every built-in command
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(InfoHandler));
        registry.register(Arc::new(MemoryHandler));
        registry
    }

    /// Register a handler for its declared command names
    pub fn register(&mut self, handler: Arc<dyn BotCommandHandler>) {
        for name in handler.command_names() {
            self.handlers.insert(*name, Arc::clone(&handler));
        }
    }

    /// Get handler for a command name
    pub fn get(&self, name: &str) -> Option<Arc<dyn BotCommandHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered command names
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::CommandContext;
    use crate::commands::handler::{IncomingMessage, ReplySink};
    use anyhow::Result;
    use async_trait::async_trait;

    struct MockHandler {
        names: &'static [&'static str],
    }

    #[async_trait]
    impl BotCommandHandler for MockHandler {
        fn command_names(&self) -> &'static [&'static str] {
            self.names
        }

        async fn handle(
            &self,
            _ctx: Arc<CommandContext>,
            _sink: &dyn ReplySink,
            _msg: &IncomingMessage,
            _name: &str,
        ) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_register_multiple_names() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(MockHandler {
            names: &["ping", "pong"],
        }));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("ping"));
        assert!(registry.contains("pong"));
        assert!(registry.get("other").is_none());
    }

    #[test]
    fn test_defaults_cover_builtin_commands() {
        let registry = CommandRegistry::with_defaults();
        for name in ["start", "help", "status", "clear", "memory"] {
            assert!(registry.contains(name), "missing /{name}");
        }
    }
}
