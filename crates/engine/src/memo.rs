use std::collections::HashMap;
use std::rc::Rc;

use crate::env::SharedEnv;
use crate::policy::{SharedModel, SharedPolicy};

/// Identity-preserving memo table for deep duplication.
///
/// Keys are the pointer identities of the original shared handles. An object
/// referenced from several places is duplicated exactly once per memo; every
/// later request for the same original returns the one duplicate. The memo is
/// always passed explicitly through nested `duplicate` calls, one fresh memo
/// per top-level duplication pass.
#[derive(Default)]
pub struct CloneMemo {
    envs: HashMap<usize, SharedEnv>,
    policies: HashMap<usize, SharedPolicy>,
    models: HashMap<usize, SharedModel>,
}

impl CloneMemo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Duplicate an environment, or return the duplicate already made for it.
    pub fn clone_env(&mut self, env: &SharedEnv) -> SharedEnv {
        let key = Rc::as_ptr(env).cast::<()>() as usize;
        if let Some(existing) = self.envs.get(&key) {
            return Rc::clone(existing);
        }
        let duplicate = env.borrow().duplicate(self);
        self.envs.insert(key, Rc::clone(&duplicate));
        duplicate
    }

    /// Duplicate a policy, or return the duplicate already made for it.
    pub fn clone_policy(&mut self, policy: &SharedPolicy) -> SharedPolicy {
        let key = Rc::as_ptr(policy).cast::<()>() as usize;
        if let Some(existing) = self.policies.get(&key) {
            return Rc::clone(existing);
        }
        let duplicate = policy.borrow().duplicate(self);
        self.policies.insert(key, Rc::clone(&duplicate));
        duplicate
    }

    /// Duplicate a learning model, or return the duplicate already made.
    pub fn clone_model(&mut self, model: &SharedModel) -> SharedModel {
        let key = Rc::as_ptr(model).cast::<()>() as usize;
        if let Some(existing) = self.models.get(&key) {
            return Rc::clone(existing);
        }
        let duplicate = model.borrow().duplicate();
        self.models.insert(key, Rc::clone(&duplicate));
        duplicate
    }
}
