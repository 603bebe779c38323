//! Error taxonomy for action validation.

/// Why an action failed validation.
///
/// These never escape the dispatcher as `Err` — every failure is resolved
/// locally into an [`Applied`](crate::Applied) outcome (an explanatory
/// broadcast for resource/occupancy failures, silence for index/zone
/// failures). The enum exists so zone and player helpers can report
/// *which* precondition broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The acting user has no player runtime in this room.
    #[error("unknown user")]
    UnknownUser,

    /// An index points outside the zone it targets.
    #[error("index out of range")]
    IndexOutOfRange,

    /// A placement targeted a slot that already holds a card.
    #[error("slot occupied")]
    SlotOccupied,

    /// The declared cost exceeds the player's current mana.
    #[error("insufficient resource")]
    InsufficientResource,

    /// The zone/placement combination is not valid for this action.
    #[error("invalid zone")]
    InvalidZone,
}

impl ActionError {
    /// Occupancy and resource failures earn the actor an explanatory
    /// broadcast; the rest are treated as client bugs and stay silent.
    pub fn is_explained(self) -> bool {
        matches!(self, Self::SlotOccupied | Self::InsufficientResource)
    }
}
