use crate::requests::models::RequestStatus;

/// Rules for moving an update request through its lifecycle
pub struct StatusMachine;

impl StatusMachine {
    /// Check if a status transition is valid
    ///
    /// # Valid Transitions
    /// - Pending → Approved, Rejected
    /// - Approved → (terminal)
    /// - Rejected → (terminal)
    pub fn is_valid_transition(from: RequestStatus, to: RequestStatus) -> bool {
        matches!(
            (from, to),
            (RequestStatus::Pending, RequestStatus::Approved)
                | (RequestStatus::Pending, RequestStatus::Rejected)
        )
    }

    /// Attempt to transition, returning the target status or an error message.
    pub fn transition(from: RequestStatus, to: RequestStatus) -> Result<RequestStatus, String> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(format!("Invalid status transition from {} to {}", from, to))
        }
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn request_status_strategy() -> impl Strategy<Value = RequestStatus> {
        prop_oneof![
            Just(RequestStatus::Pending),
            Just(RequestStatus::Approved),
            Just(RequestStatus::Rejected),
        ]
    }

    /// Only Pending has outgoing transitions; decided requests never move.
    #[test]
    fn prop_decided_states_are_terminal() {
        proptest!(|(
            from in request_status_strategy(),
            to in request_status_strategy()
        )| {
            if from != RequestStatus::Pending {
                prop_assert!(
                    !StatusMachine::is_valid_transition(from, to),
                    "No transition should be allowed from {} to {}",
                    from,
                    to
                );
            }
        });
    }

    /// transition() and is_valid_transition() agree on every pair.
    #[test]
    fn prop_transition_consistency() {
        proptest!(|(
            from in request_status_strategy(),
            to in request_status_strategy()
        )| {
            let is_valid = StatusMachine::is_valid_transition(from, to);
            let result = StatusMachine::transition(from, to);

            if is_valid {
                prop_assert_eq!(result.unwrap(), to);
            } else {
                prop_assert!(result.is_err());
            }
        });
    }
}
