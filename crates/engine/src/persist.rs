//! On-disk persistence for tasks.
//!
//! A task serializes to a [`TaskRecord`]: the kind name and snapshot of the
//! environment, the same for each policy in order, and the outcome flags.
//! Both directions use the same JSON text format.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::registry::Registry;
use crate::task::Task;

/// Persisted form of one collaborator.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub kind: String,
    pub state: serde_json::Value,
}

/// Persisted form of a whole task.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskRecord {
    pub environment: ComponentRecord,
    pub policies: Vec<ComponentRecord>,
    pub done: bool,
    pub succeeded: bool,
}

impl Task {
    /// Serialize the task (environment, policies and flags) to `path`.
    ///
    /// # Errors
    ///
    /// Propagates snapshot and I/O failures unchanged.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let environment = {
            let env = self.environment();
            let env = env.borrow();
            ComponentRecord {
                kind: env.kind().to_string(),
                state: env.snapshot()?,
            }
        };

        let mut policies = Vec::with_capacity(self.policies().len());
        for policy in self.policies() {
            let policy = policy.borrow();
            policies.push(ComponentRecord {
                kind: policy.kind().to_string(),
                state: policy.snapshot()?,
            });
        }

        let record = TaskRecord {
            environment,
            policies,
            done: self.is_finished(),
            succeeded: self.has_succeeded(),
        };

        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &record)?;
        Ok(())
    }

    /// Rebuild a previously saved task from `path`.
    ///
    /// Components are constructed through the registry's factories and their
    /// snapshots restored on top, then the task is re-validated through
    /// [`Task::new`].
    ///
    /// # Errors
    ///
    /// [`Error::UnknownKind`] for unregistered components; otherwise
    /// propagates restore, validation and I/O failures unchanged.
    pub fn load(path: &Path, registry: &Registry) -> Result<Task, Error> {
        let file = File::open(path)?;
        let record: TaskRecord = serde_json::from_reader(BufReader::new(file))?;

        let env = registry.build_env(&record.environment.kind)?;
        env.borrow_mut().restore(record.environment.state)?;

        let mut policies = Vec::with_capacity(record.policies.len());
        for entry in record.policies {
            let policy = registry.build_policy(&entry.kind)?;
            policy.borrow_mut().restore(entry.state)?;
            policies.push(policy);
        }

        let mut task = Task::new(env, policies)?;
        task.restore_flags(record.done, record.succeeded);
        Ok(task)
    }
}
