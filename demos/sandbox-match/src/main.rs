//! Drives a complete two-player match in-process and prints the event
//! stream, standing in for two game clients and a spectator. Useful for
//! eyeballing the engine without a transport layer.
//!
//! ```text
//! cargo run -p sandbox-match
//! ```

use std::sync::Arc;

use duelhall::prelude::*;
use tokio::sync::mpsc::{self, UnboundedReceiver};

fn demo_deck(faction: &str) -> Vec<CardSpec> {
    (0..12)
        .map(|n| CardSpec {
            name: format!("{faction} recruit {n}"),
            cost: (n % 4) as i32,
            attack: 1 + (n % 3) as i32,
            health: 1 + (n % 2) as i32,
            effect: String::new(),
            faction: faction.to_string(),
        })
        .collect()
}

/// Forwards one client's events to the log, tagged with who saw them.
fn watch(name: &'static str, mut rx: UnboundedReceiver<ServerEvent>) {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                ServerEvent::LogEvent { message, .. } => {
                    tracing::info!(client = name, "log: {message}");
                }
                ServerEvent::StateSnapshot { room } => {
                    tracing::debug!(
                        client = name,
                        phase = %room.match_state.phase,
                        round = room.match_state.round,
                        "snapshot"
                    );
                }
                ServerEvent::SeatAvailability { seats, .. } => {
                    tracing::info!(client = name, free = seats.len(), "seat offer");
                }
                ServerEvent::DeckContents { cards } => {
                    tracing::info!(client = name, cards = cards.len(), "deck contents (private)");
                }
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), DuelhallError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let catalog = FixedCatalog::new()
        .with_deck(DeckId("ember".into()), demo_deck("Ember"))
        .with_deck(DeckId("tide".into()), demo_deck("Tide"));
    let engine = Engine::new(Arc::new(MemoryStore::new()), catalog);

    let room = RoomId::new("demo-room");
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");

    let (tx_a, rx_a) = mpsc::unbounded_channel();
    let (tx_b, rx_b) = mpsc::unbounded_channel();
    let (tx_s, rx_s) = mpsc::unbounded_channel();
    watch("alice", rx_a);
    watch("bob", rx_b);
    watch("spectator", rx_s);

    // Join, seat, and lock decks — the engine starts the match on the
    // second lock.
    engine.join(room.clone(), alice.clone(), "alice".into(), false, tx_a).await?;
    engine.join(room.clone(), bob.clone(), "bob".into(), false, tx_b).await?;
    engine.join(room.clone(), UserId::new("sam"), "sam".into(), true, tx_s).await?;
    engine.bind_seat(room.clone(), alice.clone(), "alice".into(), SeatLabel::A).await?;
    engine.bind_seat(room.clone(), bob.clone(), "bob".into(), SeatLabel::B).await?;
    engine
        .select_deck(
            room.clone(),
            alice.clone(),
            "alice".into(),
            DeckRequest {
                deck_id: DeckId("ember".into()),
                deck_name: "Ember Rush".into(),
                hero_name: "Pyra".into(),
                champion: None,
            },
        )
        .await?;
    engine
        .select_deck(
            room.clone(),
            bob.clone(),
            "bob".into(),
            DeckRequest {
                deck_id: DeckId("tide".into()),
                deck_name: "Tide Wall".into(),
                hero_name: "Maren".into(),
                champion: None,
            },
        )
        .await?;

    // A few turns of play from both sides.
    for user in [&alice, &bob] {
        engine
            .dispatch(
                room.clone(),
                user.clone(),
                Action::PlayCard {
                    hand_index: 0,
                    area: SlotArea::Battlefield,
                    slot: 0,
                    cost: -1,
                },
            )
            .await?;
    }
    engine.dispatch(room.clone(), alice.clone(), Action::RollDice { sides: 20 }).await?;
    engine.dispatch(room.clone(), alice.clone(), Action::EndTurn).await?;
    engine.dispatch(room.clone(), bob.clone(), Action::EndTurn).await?;
    engine.dispatch(room.clone(), alice.clone(), Action::SearchDeck).await?;

    // Alice drops and comes back; her board survives.
    engine.leave(room.clone(), alice.clone()).await?;
    let (tx_a2, rx_a2) = mpsc::unbounded_channel();
    watch("alice-reconnected", rx_a2);
    engine.join(room.clone(), alice.clone(), "alice".into(), false, tx_a2).await?;

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    tracing::info!(rooms = engine.live_room_count().await, "demo finished");
    Ok(())
}
