//! Confirmation gate for store mutations
//!
//! Every mutating store call asks the gate before touching the file. A
//! vetoed call returns no result and no error.

/// Decides whether a mutation may proceed
pub trait ShouldProcess {
    /// `target` is the repository name, `action` a short description
    fn should_process(&self, target: &str, action: &str) -> bool;
}

/// Gate that never vetoes
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysProceed;

impl ShouldProcess for AlwaysProceed {
    fn should_process(&self, _target: &str, _action: &str) -> bool {
        true
    }
}

impl<F> ShouldProcess for F
where
    F: Fn(&str, &str) -> bool,
{
    fn should_process(&self, target: &str, action: &str) -> bool {
        self(target, action)
    }
}
