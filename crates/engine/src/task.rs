use std::fmt;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use crate::env::{SharedEnv, SimulatorInfo, WorldInfo};
use crate::error::Error;
use crate::memo::CloneMemo;
use crate::policy::{SharedModel, SharedPolicy};
use crate::spaces::{ActionSpace, RewardRange, StateSpace};

/// How per-policy termination reports fold into the task's `done` flag.
///
/// With several policies the environment reports termination once per policy
/// within a single step; the rule decides which reports count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminationRule {
    /// Done as soon as any policy's report says so.
    #[default]
    AnyPolicy,
    /// Only the report observed for the last policy counts.
    LastPolicy,
}

/// Ordered policy collection accepted by [`Task::new`].
///
/// Converts from a single policy or from any sequence of policies, so both
/// `Task::new(env, policy)` and `Task::new(env, vec![p1, p2])` read
/// naturally.
pub struct PolicyGroup(Vec<SharedPolicy>);

impl From<SharedPolicy> for PolicyGroup {
    fn from(policy: SharedPolicy) -> Self {
        Self(vec![policy])
    }
}

impl From<Vec<SharedPolicy>> for PolicyGroup {
    fn from(policies: Vec<SharedPolicy>) -> Self {
        Self(policies)
    }
}

impl FromIterator<SharedPolicy> for PolicyGroup {
    fn from_iter<I: IntoIterator<Item = SharedPolicy>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Either a single value or one value per policy.
///
/// Accessors that report something per policy collapse to the bare value in
/// the common single-policy case. The union is explicit so callers match on
/// the shape instead of guessing it.
#[derive(Debug, Clone, PartialEq)]
pub enum PerPolicy<T> {
    Single(T),
    Each(Vec<T>),
}

impl<T> PerPolicy<T> {
    /// Collapse a per-policy vector: one element becomes `Single`.
    #[must_use]
    pub fn from_values(mut values: Vec<T>) -> Self {
        if values.len() == 1 {
            Self::Single(values.remove(0))
        } else {
            Self::Each(values)
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Each(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The bare value, if this is the collapsed single-policy shape.
    pub fn into_single(self) -> Option<T> {
        match self {
            Self::Single(value) => Some(value),
            Self::Each(_) => None,
        }
    }

    /// Uniform vector view regardless of shape.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Single(value) => vec![value],
            Self::Each(values) => values,
        }
    }
}

/// Episode execution settings for [`Task::run`].
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Number of steps to run; unbounded when `None`.
    pub num_steps: Option<u64>,
    /// Pacing sleep between steps.
    pub step_delay: Duration,
    /// Stop as soon as the task reports done.
    pub stop_when_done: bool,
    /// Render the environment while stepping.
    pub render: bool,
    /// Ask policies for their deterministic action.
    pub deterministic: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            num_steps: None,
            step_delay: Duration::ZERO,
            stop_when_done: false,
            render: false,
            deterministic: true,
        }
    }
}

impl RunConfig {
    #[must_use]
    pub fn with_num_steps(mut self, num_steps: u64) -> Self {
        self.num_steps = Some(num_steps);
        self
    }

    #[must_use]
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    #[must_use]
    pub fn with_stop_when_done(mut self, stop: bool) -> Self {
        self.stop_when_done = stop;
        self
    }

    #[must_use]
    pub fn with_render(mut self, render: bool) -> Self {
        self.render = render;
        self
    }

    #[must_use]
    pub fn with_deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }
}

/// Binds one environment to one or more policies and drives their stepwise
/// interaction.
///
/// The task is the only component that schedules anything: it resets both
/// sides, asks each policy for an action on the environment's current state,
/// feeds the action to the environment and accounts the resulting rewards.
/// It holds shared references to its collaborators and never constructs or
/// destroys them.
pub struct Task {
    env: SharedEnv,
    policies: Vec<SharedPolicy>,
    done: bool,
    succeeded: bool,
    termination: TerminationRule,
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("done", &self.done)
            .field("succeeded", &self.succeeded)
            .field("termination", &self.termination)
            .field("policies", &self.policies.len())
            .finish_non_exhaustive()
    }
}

impl Task {
    /// Bind an environment and at least one policy.
    ///
    /// Validates the collaborators at the boundary: the environment must
    /// expose a non-empty state space and every policy must observe exactly
    /// that many dimensions. Neither side is reset or otherwise touched.
    ///
    /// # Errors
    ///
    /// [`Error::NoPolicies`], [`Error::EmptyStateSpace`] or
    /// [`Error::StateDimMismatch`] naming the offending policy.
    pub fn new(environment: SharedEnv, policies: impl Into<PolicyGroup>) -> Result<Self, Error> {
        let PolicyGroup(policies) = policies.into();
        if policies.is_empty() {
            return Err(Error::NoPolicies);
        }

        let env_dim = environment.borrow().states().dim();
        if env_dim == 0 {
            let kind = environment.borrow().kind().to_string();
            return Err(Error::EmptyStateSpace { kind });
        }

        for (index, policy) in policies.iter().enumerate() {
            let policy_dim = policy.borrow().states().dim();
            if policy_dim != env_dim {
                return Err(Error::StateDimMismatch {
                    index,
                    policy_dim,
                    env_dim,
                });
            }
        }

        Ok(Self {
            env: environment,
            policies,
            done: false,
            succeeded: false,
            termination: TerminationRule::default(),
        })
    }

    /// Override how per-policy termination reports fold into `done`.
    #[must_use]
    pub fn with_termination_rule(mut self, rule: TerminationRule) -> Self {
        self.termination = rule;
        self
    }

    /// Reset the task: clear the outcome flags, then reset the environment
    /// and every policy in order. The environment's fresh observation is
    /// discarded here.
    ///
    /// # Errors
    ///
    /// Never fails by itself; propagates collaborator failures unchanged.
    pub fn reset(&mut self) -> Result<(), Error> {
        self.done = false;
        self.succeeded = false;
        self.env.borrow_mut().reset()?;
        for policy in &self.policies {
            policy.borrow_mut().reset();
        }
        Ok(())
    }

    /// Perform one step: each policy in order acts on the environment's
    /// current state and its action is fed to the environment.
    ///
    /// Returns one reward per policy, in policy order.
    ///
    /// # Errors
    ///
    /// The first failure raised by a policy's `act` or the environment's
    /// `step` aborts the step and propagates unchanged.
    pub fn step(&mut self, deterministic: bool, render: bool) -> Result<Vec<f32>, Error> {
        if render {
            self.env.borrow_mut().render();
        } else {
            self.env.borrow_mut().hide();
        }

        let mut rewards = Vec::with_capacity(self.policies.len());
        let mut any_done = false;
        let mut last_done = false;
        for policy in &self.policies {
            let state = self.env.borrow().observe();
            let action = policy.borrow_mut().act(&state, deterministic)?;
            let transition = self.env.borrow_mut().step(&action)?;
            any_done |= transition.done;
            last_done = transition.done;
            rewards.push(transition.reward);
        }

        self.done = match self.termination {
            TerminationRule::AnyPolicy => any_done,
            TerminationRule::LastPolicy => last_done,
        };
        Ok(rewards)
    }

    /// Reset and run the stepping loop, accumulating rewards per policy.
    ///
    /// Stops when the step counter reaches `cfg.num_steps` (if bounded) or,
    /// with `stop_when_done`, as soon as the task reports done. Sleeps
    /// `step_delay` between iterations as pacing.
    ///
    /// Returns the accumulated reward: the bare scalar for a single policy,
    /// the per-policy vector otherwise.
    ///
    /// # Errors
    ///
    /// Propagates the first collaborator failure raised while resetting or
    /// stepping; the episode is abandoned at that point.
    pub fn run(&mut self, cfg: &RunConfig) -> Result<PerPolicy<f32>, Error> {
        let mut totals = vec![0.0_f32; self.policies.len()];
        self.reset()?;

        for t in 0_u64.. {
            if let Some(limit) = cfg.num_steps {
                if t >= limit {
                    break;
                }
            }
            let rewards = self.step(cfg.deterministic, cfg.render)?;
            for (total, reward) in totals.iter_mut().zip(&rewards) {
                *total += reward;
            }
            if cfg.stop_when_done && self.done {
                break;
            }
            if !cfg.step_delay.is_zero() {
                thread::sleep(cfg.step_delay);
            }
        }

        Ok(PerPolicy::from_values(totals))
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.done
    }

    #[must_use]
    pub fn has_succeeded(&self) -> bool {
        self.succeeded
    }

    #[must_use]
    pub fn has_failed(&self) -> bool {
        !self.succeeded
    }

    /// Record the task-specific outcome. The engine never calls this itself;
    /// scenario variants do, based on their own success criteria.
    pub fn set_succeeded(&mut self, succeeded: bool) {
        self.succeeded = succeeded;
    }

    #[must_use]
    pub fn termination_rule(&self) -> TerminationRule {
        self.termination
    }

    #[must_use]
    pub fn environment(&self) -> SharedEnv {
        Rc::clone(&self.env)
    }

    #[must_use]
    pub fn policies(&self) -> &[SharedPolicy] {
        &self.policies
    }

    #[must_use]
    pub fn get_policy(&self, index: usize) -> Option<SharedPolicy> {
        self.policies.get(index).map(Rc::clone)
    }

    #[must_use]
    pub fn learning_models(&self) -> Vec<SharedModel> {
        self.policies.iter().map(|p| p.borrow().model()).collect()
    }

    #[must_use]
    pub fn get_learning_model(&self, index: usize) -> Option<SharedModel> {
        self.policies.get(index).map(|p| p.borrow().model())
    }

    /// The policy, collapsed to the bare handle when there is exactly one.
    #[must_use]
    pub fn policy(&self) -> PerPolicy<SharedPolicy> {
        PerPolicy::from_values(self.policies.iter().map(Rc::clone).collect())
    }

    /// Per-policy action spaces, collapsed for a single policy.
    #[must_use]
    pub fn actions(&self) -> PerPolicy<ActionSpace> {
        PerPolicy::from_values(self.policies.iter().map(|p| p.borrow().actions()).collect())
    }

    /// Per-policy learning models, collapsed for a single policy.
    #[must_use]
    pub fn learning_model(&self) -> PerPolicy<SharedModel> {
        PerPolicy::from_values(self.learning_models())
    }

    /// Pass-through view of the environment's reward definition.
    #[must_use]
    pub fn rewards(&self) -> RewardRange {
        self.env.borrow().rewards()
    }

    /// Pass-through view of the environment's state definition.
    #[must_use]
    pub fn states(&self) -> StateSpace {
        self.env.borrow().states()
    }

    #[must_use]
    pub fn world(&self) -> WorldInfo {
        self.env.borrow().world()
    }

    #[must_use]
    pub fn simulator(&self) -> SimulatorInfo {
        self.env.borrow().simulator()
    }

    /// New task bound to the same environment and policy references. Outcome
    /// flags start fresh, as construction leaves them.
    #[must_use]
    pub fn shallow_clone(&self) -> Self {
        Self {
            env: Rc::clone(&self.env),
            policies: self.policies.iter().map(Rc::clone).collect(),
            done: false,
            succeeded: false,
            termination: self.termination,
        }
    }

    /// New task bound to duplicates of the environment and every policy.
    ///
    /// All duplication goes through `memo`, so collaborators referenced from
    /// several places (including across tasks cloned with the same memo)
    /// come out as one shared duplicate rather than disconnected copies.
    #[must_use]
    pub fn deep_clone(&self, memo: &mut CloneMemo) -> Self {
        let env = memo.clone_env(&self.env);
        let policies = self
            .policies
            .iter()
            .map(|policy| memo.clone_policy(policy))
            .collect();
        Self {
            env,
            policies,
            done: false,
            succeeded: false,
            termination: self.termination,
        }
    }

    pub(crate) fn restore_flags(&mut self, done: bool, succeeded: bool) {
        self.done = done;
        self.succeeded = succeeded;
    }
}
