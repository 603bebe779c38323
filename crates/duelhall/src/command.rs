//! The wire-facing inbound command union.
//!
//! A transport adapter decodes client frames into this enum and hands
//! them to [`Engine::handle`](crate::Engine::handle). Identities are
//! assumed already authenticated by the layer that did the decoding.

use duelhall_match::Action;
use duelhall_protocol::{DeckId, RoomId, SeatLabel, UserId};
use serde::{Deserialize, Serialize};

/// Everything a client can ask the engine to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientCommand {
    /// Subscribe to a room, as player-to-be or spectator.
    Join {
        room_id: RoomId,
        user_id: UserId,
        username: String,
        spectate: bool,
    },

    /// Claim one of the two seats.
    BindSeat {
        room_id: RoomId,
        user_id: UserId,
        username: String,
        seat: SeatLabel,
    },

    /// Lock in a deck by catalog id.
    SelectDeck {
        room_id: RoomId,
        user_id: UserId,
        username: String,
        deck_id: DeckId,
        deck_name: String,
        hero_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        champion: Option<String>,
    },

    /// A game action for the room's dispatcher.
    DispatchAction {
        room_id: RoomId,
        user_id: UserId,
        action: Action,
    },

    /// Explicit disconnect.
    Leave { room_id: RoomId, user_id: UserId },
}

#[cfg(test)]
mod tests {
    use duelhall_match::Action;

    use super::*;

    #[test]
    fn test_command_tags_are_camel_case() {
        let cmd = ClientCommand::BindSeat {
            room_id: RoomId::new("r1"),
            user_id: UserId::new("u1"),
            username: "alice".into(),
            seat: SeatLabel::A,
        };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["type"], "bindSeat");
        assert_eq!(json["seat"], "A");
    }

    #[test]
    fn test_dispatch_action_round_trip() {
        let cmd = ClientCommand::DispatchAction {
            room_id: RoomId::new("r1"),
            user_id: UserId::new("u1"),
            action: Action::Draw,
        };
        let bytes = serde_json::to_vec(&cmd).unwrap();
        let back: ClientCommand = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(cmd, back);
    }

    #[test]
    fn test_join_decodes_from_client_json() {
        let json = r#"{
            "type": "join",
            "room_id": "r1",
            "user_id": "u1",
            "username": "alice",
            "spectate": false
        }"#;
        let cmd: ClientCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(cmd, ClientCommand::Join { spectate: false, .. }));
    }
}
