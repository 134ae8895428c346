//! The request status state machine.
//!
//! ```text
//! Pending ──> Approved ──> Ready
//!    │
//!    └──────> Declined
//! ```
//!
//! `Declined` and `Ready` are terminal, there are no self-loops, and nothing
//! returns to `Pending`.

use storage::Status;

/// Whether the state machine permits moving from `current` to `target`.
pub fn transition_allowed(current: Status, target: Status) -> bool {
    matches!(
        (current, target),
        (Status::Pending, Status::Approved)
            | (Status::Pending, Status::Declined)
            | (Status::Approved, Status::Ready)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Status; 4] = [
        Status::Pending,
        Status::Approved,
        Status::Declined,
        Status::Ready,
    ];

    #[test]
    fn exactly_three_pairs_are_legal() {
        let legal: Vec<_> = ALL
            .iter()
            .flat_map(|&from| ALL.iter().map(move |&to| (from, to)))
            .filter(|&(from, to)| transition_allowed(from, to))
            .collect();
        assert_eq!(
            legal,
            vec![
                (Status::Pending, Status::Approved),
                (Status::Pending, Status::Declined),
                (Status::Approved, Status::Ready),
            ]
        );
    }

    #[test]
    fn no_self_loops() {
        for status in ALL {
            assert!(!transition_allowed(status, status));
        }
    }

    #[test]
    fn terminal_states_have_no_exit() {
        for target in ALL {
            assert!(!transition_allowed(Status::Declined, target));
            assert!(!transition_allowed(Status::Ready, target));
        }
    }
}
