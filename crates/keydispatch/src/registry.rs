//! # Action registry
//!
//! ## Overview
//!
//! Components contribute their actions to an [ActionRegistry] when they're mounted, and remove
//! them again when they're torn down. The registry then produces the [ActionMap] handed to
//! [dispatch](crate::dispatch()) on each key press.
//!
//! Action ids must be unique across every live contribution. Registering an id that is already
//! present fails with [RegistryError::DuplicateAction], rather than letting one component's
//! action silently replace another's.
//!
//! ```
//! use keydispatch::{ActionRegistry, RegistryError, ResolvedAction};
//!
//! let mut registry = ActionRegistry::new();
//! let viewer = registry
//!     .register("viewer", 0, vec![ResolvedAction::command("viewer.close", |_| ())])
//!     .unwrap();
//!
//! let err = registry
//!     .register("palette", 10, vec![ResolvedAction::command("viewer.close", |_| ())])
//!     .unwrap_err();
//! assert_eq!(err, RegistryError::DuplicateAction("viewer.close".into()));
//!
//! assert!(registry.action_map().contains_key("viewer.close"));
//! registry.unregister(viewer);
//! assert!(registry.action_map().is_empty());
//! ```
use std::collections::HashSet;

use tracing::{debug, error};

use crate::action::{ActionMap, ResolvedAction};

/// Errors returned when contributing actions.
#[derive(thiserror::Error, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum RegistryError {
    /// An action id was registered more than once.
    #[error("Duplicate action id: {0:?}")]
    DuplicateAction(String),
}

/// Handle for removing a contribution from an [ActionRegistry].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RegistrationId(u64);

struct Registration {
    id: RegistrationId,
    contributor: String,
    priority: i32,
    actions: Vec<ResolvedAction>,
}

/// A single action along with the ordering information of the contribution it came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegistryEntry<'a> {
    /// Name of the component that contributed this action.
    pub contributor: &'a str,

    /// Priority of the contribution; higher priorities are listed first.
    pub priority: i32,

    /// Position of the contribution among all registrations, oldest first.
    pub registration_order: u64,

    /// Position of the action within its contribution.
    pub action_order: usize,

    /// The action itself.
    pub action: &'a ResolvedAction,
}

/// Tracks the actions contributed by currently mounted components.
#[derive(Default)]
pub struct ActionRegistry {
    registrations: Vec<Registration>,
    next: u64,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Contribute a list of actions.
    ///
    /// Nothing is registered if any of the ids is already present, either in another live
    /// contribution or earlier in `actions`.
    pub fn register<C: Into<String>>(
        &mut self,
        contributor: C,
        priority: i32,
        actions: Vec<ResolvedAction>,
    ) -> Result<RegistrationId, RegistryError> {
        let contributor = contributor.into();
        let mut seen = HashSet::new();

        for action in actions.iter() {
            let id = action.id();

            if !seen.insert(id) || self.contains(id) {
                error!(
                    target: "keydispatch",
                    contributor = %contributor,
                    action = id,
                    "duplicate action id"
                );

                return Err(RegistryError::DuplicateAction(id.to_string()));
            }
        }

        let id = RegistrationId(self.next);
        self.next += 1;

        debug!(
            target: "keydispatch",
            contributor = %contributor,
            actions = actions.len(),
            "registered actions"
        );

        self.registrations.push(Registration { id, contributor, priority, actions });

        return Ok(id);
    }

    /// Remove a contribution, returning whether it was still registered.
    pub fn unregister(&mut self, id: RegistrationId) -> bool {
        let before = self.registrations.len();

        self.registrations.retain(|r| r.id != id);

        return self.registrations.len() != before;
    }

    /// Whether an action with the given id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Look up a registered action.
    pub fn get(&self, id: &str) -> Option<&ResolvedAction> {
        self.registrations
            .iter()
            .flat_map(|r| r.actions.iter())
            .find(|action| action.id() == id)
    }

    /// The number of registered actions.
    pub fn len(&self) -> usize {
        self.registrations.iter().map(|r| r.actions.len()).sum()
    }

    /// Whether no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// List every registered action, ordered by priority (highest first), then by when it was
    /// registered, and then by its position within its contribution.
    pub fn entries(&self) -> Vec<RegistryEntry<'_>> {
        let mut entries = self
            .registrations
            .iter()
            .flat_map(|r| {
                r.actions.iter().enumerate().map(move |(action_order, action)| {
                    RegistryEntry {
                        contributor: r.contributor.as_str(),
                        priority: r.priority,
                        registration_order: r.id.0,
                        action_order,
                        action,
                    }
                })
            })
            .collect::<Vec<_>>();

        entries.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(a.registration_order.cmp(&b.registration_order))
                .then(a.action_order.cmp(&b.action_order))
        });

        return entries;
    }

    /// Build the lookup table used for dispatching.
    pub fn action_map(&self) -> ActionMap {
        self.registrations
            .iter()
            .flat_map(|r| r.actions.iter())
            .map(|action| (action.id().to_string(), action.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! cmd {
        ($id: expr) => {
            ResolvedAction::command($id, |_| ())
        };
    }

    fn ids(registry: &ActionRegistry) -> Vec<&str> {
        registry.entries().into_iter().map(|e| e.action.id()).collect()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ActionRegistry::new();
        assert_eq!(registry.is_empty(), true);

        registry.register("viewer", 0, vec![cmd!("viewer.close"), cmd!("viewer.next")]).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.contains("viewer.next"), true);
        assert_eq!(registry.get("viewer.close").map(ResolvedAction::id), Some("viewer.close"));
        assert_eq!(registry.get("palette.close"), None);

        let map = registry.action_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map["viewer.next"].id(), "viewer.next");
    }

    #[test]
    fn test_duplicate_across_contributors() {
        let mut registry = ActionRegistry::new();

        registry.register("viewer", 0, vec![cmd!("viewer.close")]).unwrap();

        let err = registry.register("palette", 5, vec![cmd!("palette.open"), cmd!("viewer.close")]);
        assert_eq!(err, Err(RegistryError::DuplicateAction("viewer.close".into())));

        // Nothing from the failed contribution was registered.
        assert_eq!(registry.contains("palette.open"), false);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_within_contribution() {
        let mut registry = ActionRegistry::new();

        let err = registry.register("viewer", 0, vec![cmd!("viewer.close"), cmd!("viewer.close")]);
        assert_eq!(err, Err(RegistryError::DuplicateAction("viewer.close".into())));
        assert_eq!(registry.is_empty(), true);
    }

    #[test]
    fn test_unregister_frees_ids() {
        let mut registry = ActionRegistry::new();

        let id = registry.register("viewer", 0, vec![cmd!("viewer.close")]).unwrap();
        assert_eq!(registry.unregister(id), true);
        assert_eq!(registry.unregister(id), false);
        assert_eq!(registry.is_empty(), true);

        // The id can be contributed again once its owner is gone.
        let again = registry.register("viewer", 0, vec![cmd!("viewer.close")]).unwrap();
        assert_ne!(again, id);
        assert_eq!(registry.contains("viewer.close"), true);
    }

    #[test]
    fn test_entries_order() {
        let mut registry = ActionRegistry::new();

        registry.register("global", 0, vec![cmd!("global.a"), cmd!("global.b")]).unwrap();
        registry.register("palette", 10, vec![cmd!("palette.b"), cmd!("palette.a")]).unwrap();
        registry.register("viewer", 0, vec![cmd!("viewer.a")]).unwrap();
        registry.register("toast", -1, vec![cmd!("toast.a")]).unwrap();

        assert_eq!(ids(&registry), vec![
            "palette.b",
            "palette.a",
            "global.a",
            "global.b",
            "viewer.a",
            "toast.a",
        ]);

        let entries = registry.entries();
        assert_eq!(entries[1].contributor, "palette");
        assert_eq!(entries[1].action_order, 1);
        assert_eq!(entries[4].registration_order, 2);
    }
}
