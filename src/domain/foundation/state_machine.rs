//! State machine trait for stage enums.
//!
//! Gives dialog stages a uniform way to describe and validate their
//! transitions.

use super::ValidationError;

/// Trait for enums that represent state machines.
///
/// Implementors define which transitions are legal and get a validated
/// `transition_to` for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for IntakeStage {
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Start => vec![GotFirstName],
///             GotFirstName => vec![GotLastName],
///             // ...
///             HandedOff => vec![],
///         }
///     }
/// }
///
/// let next = IntakeStage::Start.transition_to(IntakeStage::GotFirstName)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Leg {
        Ringing,
        Answered,
        Completed,
    }

    impl StateMachine for Leg {
        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Leg::Ringing => vec![Leg::Answered, Leg::Completed],
                Leg::Answered => vec![Leg::Completed],
                Leg::Completed => vec![],
            }
        }
    }

    #[test]
    fn transition_to_follows_valid_transitions() {
        assert_eq!(Leg::Ringing.transition_to(Leg::Answered), Ok(Leg::Answered));
        assert!(Leg::Answered.transition_to(Leg::Ringing).is_err());
    }

    #[test]
    fn terminal_state_has_no_exits() {
        assert!(Leg::Completed.is_terminal());
        assert!(!Leg::Ringing.is_terminal());
    }
}
