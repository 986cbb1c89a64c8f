/// Errors that can occur during a descent fit.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("no custom loss or zero constraint is registered")]
    NoObjective,

    #[error("objective became non-finite at iteration {iter}")]
    Diverged { iter: usize },
}
