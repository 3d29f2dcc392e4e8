/// Errors surfaced by the orchestration core.
///
/// Construction-validation variants name the missing capability; collaborator
/// faults carry the collaborator's own message and propagate unchanged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("a task needs at least one policy")]
    NoPolicies,

    #[error("environment `{kind}` exposes an empty state space")]
    EmptyStateSpace { kind: String },

    #[error(
        "policy #{index} observes {policy_dim} state dimensions but the environment exposes {env_dim}"
    )]
    StateDimMismatch {
        index: usize,
        policy_dim: usize,
        env_dim: usize,
    },

    #[error("no {role} registered under kind `{kind}`")]
    UnknownKind { role: &'static str, kind: String },

    #[error("environment fault: {0}")]
    Env(String),

    #[error("policy fault: {0}")]
    Policy(String),

    #[error("model fault: {0}")]
    Model(String),

    #[error("snapshot encoding: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
