//! Agent loop state management
//!
//! Tracks one task execution: `Idle → Iterating → {Terminated, Exhausted, Failed}`.

use std::fmt;

/// How a task execution ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Termination predicate returned true
    Terminated { iterations: usize },
    /// Iteration budget used up without terminating
    Exhausted { iterations: usize },
    /// An iteration raised an error; the loop was abandoned
    Failed { iterations: usize, error: String },
}

impl TaskOutcome {
    /// Model invocations attempted (including a failed one)
    pub fn iterations(&self) -> usize {
        match self {
            TaskOutcome::Terminated { iterations }
            | TaskOutcome::Exhausted { iterations }
            | TaskOutcome::Failed { iterations, .. } => *iterations,
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, TaskOutcome::Terminated { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TaskOutcome::Failed { .. })
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskOutcome::Terminated { iterations } => {
                write!(f, "terminated after {} iteration(s)", iterations)
            }
            TaskOutcome::Exhausted { iterations } => {
                write!(f, "exhausted {} iteration(s)", iterations)
            }
            TaskOutcome::Failed { iterations, error } => {
                write!(f, "failed on iteration {}: {}", iterations, error)
            }
        }
    }
}

/// State of the agent iteration loop
#[derive(Debug, Clone)]
pub struct AgentLoopState {
    /// Iterations started so far
    pub iteration: usize,
    /// Maximum allowed iterations
    pub max_iterations: usize,
    /// Set once the loop stops early
    pub outcome: Option<TaskOutcome>,
}

impl AgentLoopState {
    /// Create a new loop state with the given budget
    pub fn new(max_iterations: usize) -> Self {
        Self {
            iteration: 0,
            max_iterations,
            outcome: None,
        }
    }

    /// Check if the loop should continue
    pub fn should_continue(&self) -> bool {
        self.iteration < self.max_iterations && self.outcome.is_none()
    }

    /// Start the next iteration
    pub fn next_iteration(&mut self) {
        self.iteration += 1;
    }

    /// Stop successfully
    pub fn terminate(&mut self) {
        self.outcome = Some(TaskOutcome::Terminated {
            iterations: self.iteration,
        });
    }

    /// Stop on error
    pub fn fail(&mut self, error: impl fmt::Display) {
        self.outcome = Some(TaskOutcome::Failed {
            iterations: self.iteration,
            error: error.to_string(),
        });
    }

    /// Final outcome; a loop that never stopped early is exhausted
    pub fn into_outcome(self) -> TaskOutcome {
        self.outcome.unwrap_or(TaskOutcome::Exhausted {
            iterations: self.iteration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_state_new() {
        let state = AgentLoopState::new(10);
        assert_eq!(state.iteration, 0);
        assert_eq!(state.max_iterations, 10);
        assert!(state.outcome.is_none());
    }

    #[test]
    fn test_should_continue() {
        let mut state = AgentLoopState::new(2);
        assert!(state.should_continue());

        state.next_iteration();
        assert!(state.should_continue());

        state.next_iteration();
        assert!(!state.should_continue()); // Reached budget
        assert_eq!(state.into_outcome(), TaskOutcome::Exhausted { iterations: 2 });
    }

    #[test]
    fn test_terminate_stops_loop() {
        let mut state = AgentLoopState::new(5);
        state.next_iteration();
        state.terminate();

        assert!(!state.should_continue());
        assert_eq!(state.into_outcome(), TaskOutcome::Terminated { iterations: 1 });
    }

    #[test]
    fn test_fail_records_error() {
        let mut state = AgentLoopState::new(5);
        state.next_iteration();
        state.next_iteration();
        state.fail("API error (400): bad request");

        let outcome = state.into_outcome();
        assert!(outcome.is_failed());
        assert_eq!(outcome.iterations(), 2);
        assert!(outcome.to_string().contains("bad request"));
    }

    #[test]
    fn test_zero_budget() {
        let state = AgentLoopState::new(0);
        assert!(!state.should_continue());
        assert_eq!(state.into_outcome(), TaskOutcome::Exhausted { iterations: 0 });
    }
}
