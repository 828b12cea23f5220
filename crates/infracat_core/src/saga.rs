//! Sequenced writes across independent providers.
//!
//! Providers share no transaction. A [`WriteSaga`] runs its steps in order and
//! stops at the first failure; steps that already ran stay committed. The
//! failure report names the failed step and every completed one so the
//! caller can inspect or repair the partial state.

use infracat_entities::Entity;
use infracat_storage::{EntityProvider, StorageError, StorageResult};
use thiserror::Error;
use tracing::{debug, warn};

type Step<'a> = Box<dyn FnOnce() -> StorageResult<()> + 'a>;

/// A saga stopped at a failing step.
#[derive(Debug, Error)]
#[error("{saga} failed at step {failed_step} (completed: {completed:?}): {source}")]
pub struct SagaFailure {
    /// Name of the saga.
    pub saga: &'static str,
    /// Name of the step that failed.
    pub failed_step: &'static str,
    /// Steps that completed before the failure, in order.
    pub completed: Vec<&'static str>,
    /// The step's error.
    #[source]
    pub source: StorageError,
}

/// An ordered list of named write steps.
///
/// # Example
///
/// ```rust
/// use infracat_core::saga::{replace, WriteSaga};
/// use infracat_entities::{Password, User};
/// use infracat_storage::{EntityProvider, PasswordStore, UserStore};
///
/// let users = UserStore::in_memory();
/// let passwords = PasswordStore::in_memory();
///
/// let done = WriteSaga::new("create user")
///     .step("user", || replace(&users, User::new("ada", "Ada", "ada@example.com")))
///     .step("password", || replace(&passwords, Password::new("ada", "hash")))
///     .run()
///     .unwrap();
///
/// assert_eq!(done, vec!["user", "password"]);
/// assert!(passwords.exists("ada"));
/// ```
pub struct WriteSaga<'a> {
    name: &'static str,
    steps: Vec<(&'static str, Step<'a>)>,
}

impl<'a> WriteSaga<'a> {
    /// Creates an empty saga.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    /// Appends a step.
    #[must_use]
    pub fn step<F>(mut self, name: &'static str, f: F) -> Self
    where
        F: FnOnce() -> StorageResult<()> + 'a,
    {
        self.steps.push((name, Box::new(f)));
        self
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the saga has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs every step in order and returns the completed step names.
    ///
    /// # Errors
    ///
    /// Returns a [`SagaFailure`] for the first failing step. Earlier steps
    /// are not undone and later steps do not run.
    pub fn run(self) -> Result<Vec<&'static str>, SagaFailure> {
        let mut completed = Vec::with_capacity(self.steps.len());
        for (step, f) in self.steps {
            if let Err(source) = f() {
                warn!(saga = self.name, step, ?completed, error = %source, "Saga stopped");
                return Err(SagaFailure {
                    saga: self.name,
                    failed_step: step,
                    completed,
                    source,
                });
            }
            debug!(saga = self.name, step, "Saga step done");
            completed.push(step);
        }
        Ok(completed)
    }
}

impl std::fmt::Debug for WriteSaga<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let steps: Vec<_> = self.steps.iter().map(|(name, _)| *name).collect();
        f.debug_struct("WriteSaga")
            .field("name", &self.name)
            .field("steps", &steps)
            .finish()
    }
}

/// Stores `value`, deleting any value with the same identifier first.
///
/// The delete and the add are two calls; a failing add leaves the identifier
/// absent.
///
/// # Errors
///
/// Returns the provider's error from the delete or the add.
pub fn replace<T, P>(provider: &P, value: T) -> StorageResult<()>
where
    T: Entity,
    P: EntityProvider<T> + ?Sized,
{
    if provider.exists(value.id()) {
        provider.delete(value.id())?;
    }
    provider.add(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use infracat_entities::Network;
    use infracat_storage::{ErrorKind, NetworkStore};
    use std::cell::Cell;

    #[test]
    fn runs_steps_in_order() {
        let order = Cell::new(0);
        let done = WriteSaga::new("ordered")
            .step("first", || {
                assert_eq!(order.replace(1), 0);
                Ok(())
            })
            .step("second", || {
                assert_eq!(order.replace(2), 1);
                Ok(())
            })
            .run()
            .unwrap();

        assert_eq!(done, vec!["first", "second"]);
        assert_eq!(order.get(), 2);
    }

    #[test]
    fn stops_at_first_failure_without_rollback() {
        let store = NetworkStore::in_memory();
        let third_ran = Cell::new(false);

        let failure = WriteSaga::new("partial")
            .step("add", || store.add(Network::new("n1", "lab")))
            .step("retrieve", || store.retrieve("ghost").map(|_| ()))
            .step("never", || {
                third_ran.set(true);
                Ok(())
            })
            .run()
            .unwrap_err();

        assert_eq!(failure.failed_step, "retrieve");
        assert_eq!(failure.completed, vec!["add"]);
        assert_eq!(failure.source.kind(), ErrorKind::NotFound);
        assert!(!third_ran.get());
        assert!(store.exists("n1"));
    }

    #[test]
    fn empty_saga_succeeds() {
        let saga = WriteSaga::new("empty");
        assert!(saga.is_empty());
        assert!(saga.run().unwrap().is_empty());
    }

    #[test]
    fn replace_overwrites_existing() {
        let store = NetworkStore::in_memory();
        replace(&store, Network::new("n1", "before")).unwrap();
        replace(&store, Network::new("n1", "after")).unwrap();

        assert_eq!(store.retrieve("n1").unwrap().name, "after");
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
