//! Plays one random game of electric chair against the in-memory store.
//!
//! Run with `RUST_LOG=debug cargo run -p simulate` to see every transition.

use denki::prelude::*;
use rand::seq::IndexedRandom;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn pick_chair(room: &GameRoom) -> Option<u32> {
    let chairs: Vec<u32> = room.remaining_chairs.iter().copied().collect();
    chairs.choose(&mut rand::rng()).copied()
}

fn name_of(room: &GameRoom, id: PlayerId) -> &str {
    room.player(id).map_or("?", |p| p.name.as_str())
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), DenkiError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let service = GameService::builder().build_in_memory();
    let room = service.create_room().await?;
    let room_id = room.id;

    let (alice, _) = service.join(room_id, "alice").await?;

    let mut updates = service.subscribe(room_id, alice).await?;
    tokio::spawn(async move {
        while let Some(room) = updates.recv().await {
            tracing::debug!(version = room.version, "room updated");
        }
    });

    let (bob, _) = service.join(room_id, "bob").await?;
    service.ready(room_id, alice).await?;
    let mut room = service.ready(room_id, bob).await?;

    while room.winner.is_none() {
        let Some(round) = room.round.clone() else {
            break;
        };
        let Some(defender) = room.defender_id() else {
            break;
        };
        let (Some(electric), Some(seat)) = (pick_chair(&room), pick_chair(&room)) else {
            break;
        };

        service.select_electric_chair(room_id, defender, electric).await?;
        service.sit(room_id, round.attacker_id, seat).await?;
        room = service.activate(room_id, defender).await?;

        let attacker = room.player(round.attacker_id);
        tracing::info!(
            "{} {}: {} sits on {seat}, {} with {} points",
            round.turn,
            round.count,
            name_of(&room, round.attacker_id),
            room.round
                .as_ref()
                .and_then(|r| r.result.status)
                .map_or_else(String::new, |s| s.to_string()),
            attacker.map_or(0, |p| p.point),
        );

        service.confirm(room_id, alice).await?;
        room = service.confirm(room_id, bob).await?;
    }

    match room.winner {
        Some(Winner::Player(id)) => tracing::info!("{} wins", name_of(&room, id)),
        Some(Winner::Draw) => tracing::info!("draw"),
        None => tracing::warn!("game stopped without a winner"),
    }
    for player in &room.players {
        tracing::info!(
            "{}: {} points, {} shocks",
            player.name,
            player.point,
            player.shocked_count
        );
    }

    Ok(())
}
