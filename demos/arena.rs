//! # Example: Arena
//!
//! A player, an enemy and a scoreboard that never reference each other. The
//! player raises `PlayerScored` on a channel owned by a [`Hub`]; listeners come
//! and go while a fake frame loop runs.
//!
//! ## Flow
//! ```text
//! frame loop ──► Player::update() ──► hub.channel::<PlayerScored>().publish(..)
//!                                           ├─► LogWriter      (tracing)
//!                                           ├─► Scoreboard     (weak, counts)
//!                                           └─► Enemy          (scoped guard, gone after frame 3)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example arena --features logging
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use evchannel::{
    Envelope, EventChannel, Handle, HandlerError, Hub, HubConfig, LogWriter, Subscription,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EntityId(u32);

#[derive(Debug, Clone)]
struct Player {
    id: EntityId,
    name: &'static str,
    points: u32,
}

/// Fired whenever a player scores; carries a snapshot of the player.
type PlayerScored = Envelope<EntityId, Player>;

impl Player {
    fn update(&mut self, frame: u32, on_scored: &EventChannel<PlayerScored>) {
        if frame % 2 == 0 {
            return;
        }
        self.points += 10;
        match on_scored.publish_from(self.id, self.clone()) {
            Ok(report) if !report.is_clean() => {
                tracing::warn!(failures = report.failures.len(), "some listeners failed");
            }
            Ok(_) => {}
            Err(e) => tracing::error!(error = %e, "publish aborted"),
        }
    }
}

#[derive(Default)]
struct Scoreboard {
    total: AtomicU32,
}

impl Handle<PlayerScored> for Scoreboard {
    fn on_event(&self, ev: &PlayerScored) -> Result<(), HandlerError> {
        let total = self.total.fetch_add(1, Ordering::Relaxed) + 1;
        println!(
            "[scoreboard] {} ({:?}) now has {} points; {} goals so far",
            ev.payload.name, ev.source, ev.payload.points, total
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "scoreboard"
    }
}

struct Enemy {
    name: &'static str,
    _on_scored: Subscription<PlayerScored>,
}

impl Enemy {
    fn spawn(name: &'static str, on_scored: &EventChannel<PlayerScored>) -> Self {
        let sub = on_scored.subscribe_scoped(evchannel::HandlerFn::arc(
            name,
            move |ev: &PlayerScored| {
                println!("[{name}] grr, {} scored again", ev.payload.name);
                Ok::<_, HandlerError>(())
            },
        ));
        println!("[{name}] spawned");
        Self {
            name,
            _on_scored: sub,
        }
    }
}

impl Drop for Enemy {
    fn drop(&mut self) {
        println!("[{}] destroyed", self.name);
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let hub = Arc::new(Hub::new(HubConfig::default()));
    let on_scored = hub.channel::<PlayerScored>();

    on_scored.subscribe(Arc::new(LogWriter::labeled("player_scored")));
    let board = Arc::new(Scoreboard::default());
    on_scored.subscribe_weak(&board);

    let mut player = Player {
        id: EntityId(1),
        name: "hero",
        points: 0,
    };
    let mut enemy = Some(Enemy::spawn("goblin", &on_scored));

    for frame in 1..=6 {
        println!("-- frame {frame} ({} listeners)", on_scored.len());
        player.update(frame, &on_scored);
        if frame == 3 {
            enemy = None;
        }
    }
    drop(enemy);

    println!("scoreboard total: {}", board.total.load(Ordering::Relaxed));
    println!("channels torn down: {}", hub.shutdown());
}
