use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SwapRequest;

/// Lifecycle state of a swap request.
///
/// Legal moves are `pending -> accepted -> completed` and `pending -> rejected`.
/// `rejected` and `completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
}

impl SwapStatus {
    pub const ALL: [SwapStatus; 4] = [
        Self::Pending,
        Self::Accepted,
        Self::Rejected,
        Self::Completed,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    #[must_use]
    pub const fn can_transition_to(self, next: SwapStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted)
                | (Self::Pending, Self::Rejected)
                | (Self::Accepted, Self::Completed)
        )
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }
}

impl FromStr for SwapStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown swap status: {s}"))
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status change requested by one of the participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapAction {
    Accept,
    Reject,
    Complete,
}

impl SwapAction {
    #[must_use]
    pub const fn target(self) -> SwapStatus {
        match self {
            Self::Accept => SwapStatus::Accepted,
            Self::Reject => SwapStatus::Rejected,
            Self::Complete => SwapStatus::Completed,
        }
    }

    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Complete => "complete",
        }
    }

    /// Accept and reject belong to the recipient; either side may complete.
    #[must_use]
    pub const fn allowed_for(self, role: SwapRole) -> bool {
        match self {
            Self::Accept | Self::Reject => matches!(role, SwapRole::Requested),
            Self::Complete => true,
        }
    }
}

/// Which side of a swap request a user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapRole {
    Requester,
    Requested,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    NotParticipant,
    WrongRole { action: SwapAction },
    Illegal { from: SwapStatus, to: SwapStatus },
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotParticipant => f.write_str("not a participant in this swap request"),
            Self::WrongRole { action } => {
                write!(f, "only the requested user can {} a swap request", action.verb())
            }
            Self::Illegal { from, to } => {
                write!(f, "cannot move a swap request from {from} to {to}")
            }
        }
    }
}

impl std::error::Error for TransitionError {}

impl SwapRequest {
    #[must_use]
    pub fn role_of(&self, user_id: &str) -> Option<SwapRole> {
        if self.requester_id == user_id {
            Some(SwapRole::Requester)
        } else if self.requested_user_id == user_id {
            Some(SwapRole::Requested)
        } else {
            None
        }
    }

    /// Returns the other participant, or `None` if `user_id` is not part of the swap.
    #[must_use]
    pub fn counterpart(&self, user_id: &str) -> Option<&str> {
        match self.role_of(user_id)? {
            SwapRole::Requester => Some(&self.requested_user_id),
            SwapRole::Requested => Some(&self.requester_id),
        }
    }

    /// Validates `action` by `actor` against the current status and returns the new status.
    pub fn apply(&self, action: SwapAction, actor: &str) -> Result<SwapStatus, TransitionError> {
        let role = self.role_of(actor).ok_or(TransitionError::NotParticipant)?;
        if !action.allowed_for(role) {
            return Err(TransitionError::WrongRole { action });
        }
        let next = action.target();
        if !self.status.can_transition_to(next) {
            return Err(TransitionError::Illegal {
                from: self.status,
                to: next,
            });
        }
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn request(status: SwapStatus) -> SwapRequest {
        SwapRequest {
            id: "req-1".to_string(),
            requester_id: "alice".to_string(),
            requested_user_id: "bob".to_string(),
            offered_skill_id: "skill-a".to_string(),
            wanted_skill_id: "skill-b".to_string(),
            message: None,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_legal_transitions() {
        use SwapStatus::*;
        for from in SwapStatus::ALL {
            for to in SwapStatus::ALL {
                let expected = matches!(
                    (from, to),
                    (Pending, Accepted) | (Pending, Rejected) | (Accepted, Completed)
                );
                assert_eq!(from.can_transition_to(to), expected, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(SwapStatus::Rejected.is_terminal());
        assert!(SwapStatus::Completed.is_terminal());
        assert!(!SwapStatus::Pending.is_terminal());
        assert!(!SwapStatus::Accepted.is_terminal());
    }

    #[test]
    fn test_recipient_accepts_pending() {
        let req = request(SwapStatus::Pending);
        assert_eq!(req.apply(SwapAction::Accept, "bob"), Ok(SwapStatus::Accepted));
        assert_eq!(req.apply(SwapAction::Reject, "bob"), Ok(SwapStatus::Rejected));
    }

    #[test]
    fn test_requester_cannot_accept_own_request() {
        let req = request(SwapStatus::Pending);
        assert_eq!(
            req.apply(SwapAction::Accept, "alice"),
            Err(TransitionError::WrongRole {
                action: SwapAction::Accept
            })
        );
    }

    #[test]
    fn test_outsider_is_rejected() {
        let req = request(SwapStatus::Accepted);
        assert_eq!(
            req.apply(SwapAction::Complete, "mallory"),
            Err(TransitionError::NotParticipant)
        );
    }

    #[test]
    fn test_either_side_completes_accepted_swap() {
        let req = request(SwapStatus::Accepted);
        assert_eq!(req.apply(SwapAction::Complete, "alice"), Ok(SwapStatus::Completed));
        assert_eq!(req.apply(SwapAction::Complete, "bob"), Ok(SwapStatus::Completed));
    }

    #[test]
    fn test_cannot_complete_pending_or_reopen_rejected() {
        let pending = request(SwapStatus::Pending);
        assert!(matches!(
            pending.apply(SwapAction::Complete, "alice"),
            Err(TransitionError::Illegal { .. })
        ));

        let rejected = request(SwapStatus::Rejected);
        assert!(matches!(
            rejected.apply(SwapAction::Accept, "bob"),
            Err(TransitionError::Illegal { .. })
        ));
    }

    #[test]
    fn test_counterpart() {
        let req = request(SwapStatus::Completed);
        assert_eq!(req.counterpart("alice"), Some("bob"));
        assert_eq!(req.counterpart("bob"), Some("alice"));
        assert_eq!(req.counterpart("carol"), None);
    }
}
