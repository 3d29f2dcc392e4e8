use std::collections::HashMap;

use crate::env::SharedEnv;
use crate::error::Error;
use crate::policy::SharedPolicy;

type EnvFactory = Box<dyn Fn() -> SharedEnv>;
type PolicyFactory = Box<dyn Fn() -> SharedPolicy>;

/// Factory registry used by [`crate::Task::load`] to rebuild collaborators
/// from their persisted kind names.
///
/// Each factory produces a blank component; the loader then restores its
/// snapshot on top.
#[derive(Default)]
pub struct Registry {
    envs: HashMap<String, EnvFactory>,
    policies: HashMap<String, PolicyFactory>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an environment factory under its kind name.
    pub fn register_env<F>(&mut self, kind: &str, factory: F)
    where
        F: Fn() -> SharedEnv + 'static,
    {
        self.envs.insert(kind.to_string(), Box::new(factory));
    }

    /// Register a policy factory under its kind name.
    pub fn register_policy<F>(&mut self, kind: &str, factory: F)
    where
        F: Fn() -> SharedPolicy + 'static,
    {
        self.policies.insert(kind.to_string(), Box::new(factory));
    }

    /// Build a blank environment of the given kind.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownKind`] when no factory is registered.
    pub fn build_env(&self, kind: &str) -> Result<SharedEnv, Error> {
        self.envs
            .get(kind)
            .map(|factory| factory())
            .ok_or_else(|| Error::UnknownKind {
                role: "environment",
                kind: kind.to_string(),
            })
    }

    /// Build a blank policy of the given kind.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownKind`] when no factory is registered.
    pub fn build_policy(&self, kind: &str) -> Result<SharedPolicy, Error> {
        self.policies
            .get(kind)
            .map(|factory| factory())
            .ok_or_else(|| Error::UnknownKind {
                role: "policy",
                kind: kind.to_string(),
            })
    }
}
