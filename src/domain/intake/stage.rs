//! Dialog progress as a state machine.

use serde::{Deserialize, Serialize};

use super::IntakeField;
use crate::domain::foundation::StateMachine;

/// Where a call stands in the intake dialog.
///
/// Progress is never held in memory between callbacks. It is derived from
/// the stored record (see [`CallRecord::stage`](super::CallRecord::stage)),
/// so any process instance reaches the same answer from the store alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStage {
    Start,
    GotFirstName,
    GotLastName,
    GotAge,
    GotResidency,
    HandedOff,
}

impl IntakeStage {
    /// Stage reached once `field` has been answered.
    pub fn after(field: IntakeField) -> Self {
        match field {
            IntakeField::FirstName => IntakeStage::GotFirstName,
            IntakeField::LastName => IntakeStage::GotLastName,
            IntakeField::Age => IntakeStage::GotAge,
            IntakeField::Residency => IntakeStage::GotResidency,
        }
    }

    /// The field this stage is waiting for, if any.
    pub fn awaiting(&self) -> Option<IntakeField> {
        match self {
            IntakeStage::Start => Some(IntakeField::FirstName),
            IntakeStage::GotFirstName => Some(IntakeField::LastName),
            IntakeStage::GotLastName => Some(IntakeField::Age),
            IntakeStage::GotAge => Some(IntakeField::Residency),
            IntakeStage::GotResidency | IntakeStage::HandedOff => None,
        }
    }
}

impl StateMachine for IntakeStage {
    fn valid_transitions(&self) -> Vec<Self> {
        use IntakeStage::*;
        match self {
            Start => vec![GotFirstName],
            GotFirstName => vec![GotLastName],
            GotLastName => vec![GotAge],
            // The residency step hands off even when its answer was not
            // stored.
            GotAge => vec![GotResidency, HandedOff],
            GotResidency => vec![HandedOff],
            HandedOff => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_advance_one_field_at_a_time() {
        let mut stage = IntakeStage::Start;
        for field in IntakeField::all() {
            assert_eq!(stage.awaiting(), Some(*field));
            stage = stage.transition_to(IntakeStage::after(*field)).unwrap();
        }
        assert_eq!(stage, IntakeStage::GotResidency);
        assert_eq!(stage.awaiting(), None);
    }

    #[test]
    fn cannot_skip_a_question() {
        assert!(IntakeStage::Start
            .transition_to(IntakeStage::GotLastName)
            .is_err());
        assert!(IntakeStage::GotFirstName
            .transition_to(IntakeStage::HandedOff)
            .is_err());
    }

    #[test]
    fn handoff_reachable_without_stored_residency() {
        assert!(IntakeStage::GotAge.can_transition_to(&IntakeStage::HandedOff));
        assert!(IntakeStage::GotResidency.can_transition_to(&IntakeStage::HandedOff));
    }

    #[test]
    fn handed_off_is_terminal() {
        assert!(IntakeStage::HandedOff.is_terminal());
        assert!(!IntakeStage::GotResidency.is_terminal());
    }
}
