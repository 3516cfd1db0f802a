use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;

use vanguard_core::{GameError, GameId, GameState, PieceKind, PlayerId};
use vanguard_runtime::repository::Result as RepositoryResult;
use vanguard_runtime::{
    ActionId, ActionRecord, ErrorClass, GameMetadata, GameRepository, InMemoryGameRepository,
    Runtime, RuntimeConfig, RuntimeError,
};

/// In-memory store whose `load` of one game waits until the gate is released.
struct GatedRepository {
    inner: InMemoryGameRepository,
    gated: GameId,
    gate: Mutex<()>,
    entered: Notify,
}

impl GatedRepository {
    fn new(gated: GameId) -> Self {
        Self {
            inner: InMemoryGameRepository::new(),
            gated,
            gate: Mutex::new(()),
            entered: Notify::new(),
        }
    }
}

impl GameRepository for GatedRepository {
    fn create(&self, state: &GameState) -> RepositoryResult<GameMetadata> {
        self.inner.create(state)
    }

    fn load(&self, id: &GameId) -> RepositoryResult<Option<GameState>> {
        if *id == self.gated {
            self.entered.notify_one();
            let _open = self.gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        self.inner.load(id)
    }

    fn save(&self, id: &GameId, state: &GameState) -> RepositoryResult<()> {
        self.inner.save(id, state)
    }

    fn append_history(&self, id: &GameId, record: &ActionRecord) -> RepositoryResult<()> {
        self.inner.append_history(id, record)
    }

    fn commit(&self, id: &GameId, record: &ActionRecord) -> RepositoryResult<()> {
        self.inner.commit(id, record)
    }

    fn history(&self, id: &GameId) -> RepositoryResult<Vec<ActionRecord>> {
        self.inner.history(id)
    }

    fn metadata(&self, id: &GameId) -> RepositoryResult<Option<GameMetadata>> {
        self.inner.metadata(id)
    }

    fn list(&self) -> RepositoryResult<Vec<GameMetadata>> {
        self.inner.list()
    }

    fn delete(&self, id: &GameId) -> RepositoryResult<bool> {
        self.inner.delete(id)
    }
}

fn standard_deck() -> Vec<PieceKind> {
    let mut deck = vec![PieceKind::Colonel; 4];
    deck.extend([PieceKind::Infantryman; 9]);
    deck.extend([PieceKind::Scout; 6]);
    deck
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_full_mailbox_rejects_without_stalling_other_games() {
    println!("\n════════════════════════════════════════════════════════");
    println!("  VANGUARD - Backlogged Game Isolation");
    println!("════════════════════════════════════════════════════════\n");

    let slow = GameId::new("slow");
    let fast = GameId::new("fast");
    let repository = Arc::new(GatedRepository::new(slow.clone()));
    repository
        .create(&GameState::new(slow.clone(), PlayerId::Player1))
        .expect("seed slow game");
    repository
        .create(&GameState::new(fast.clone(), PlayerId::Player2))
        .expect("seed fast game");

    let config = RuntimeConfig {
        command_buffer_size: 1,
        ..RuntimeConfig::default()
    };
    let runtime = Runtime::builder()
        .config(config)
        .repository(repository.clone())
        .build()
        .await
        .expect("runtime should start");
    let handle = runtime.handle();

    let gate = repository.gate.lock().expect("gate");

    // The slow game's worker picks this up and blocks inside `load`.
    let in_flight = tokio::spawn({
        let handle = handle.clone();
        let slow = slow.clone();
        async move { handle.get_game(&slow).await }
    });
    repository.entered.notified().await;

    // Fills the one-slot mailbox; the caller gives up waiting for the reply.
    let queued = tokio::time::timeout(Duration::from_millis(200), handle.get_game(&slow)).await;
    assert!(queued.is_err(), "second request should still be queued");

    let err = handle.get_game(&slow).await.expect_err("mailbox is full");
    assert!(matches!(err, RuntimeError::GameBusy(ref id) if *id == slow));
    assert_eq!(err.class(), ErrorClass::Conflict);
    assert_eq!(err.error_code(), "GAME_BUSY");
    println!("✓ Backlogged game rejects with {}", err.error_code());

    let other = tokio::time::timeout(Duration::from_secs(2), async {
        handle
            .select_deck(&fast, PlayerId::Player1, standard_deck())
            .await
            .expect("other game accepts commands");
        assert!(handle.game_exists(&slow).await.expect("exists"));
        assert_eq!(handle.list_games().await.expect("list").len(), 2);
        handle.create_game().await.expect("create while backlogged");
    })
    .await;
    assert!(other.is_ok(), "other games must not wait on the backlog");
    println!("✓ Other games stay responsive");

    drop(gate);
    let state = in_flight
        .await
        .expect("task should not panic")
        .expect("blocked request completes");
    assert_eq!(state.id, slow);
    handle.get_game(&slow).await.expect("slow game drains");

    drop(handle);
    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn test_idle_workers_are_evicted_and_respawned() {
    let config = RuntimeConfig {
        worker_idle_timeout: Duration::from_millis(20),
        ..RuntimeConfig::default()
    };
    let runtime = Runtime::builder()
        .config(config)
        .build()
        .await
        .expect("runtime should start");
    let handle = runtime.handle();

    let game_id = handle.create_game().await.expect("create game").id;
    handle
        .select_deck(&game_id, PlayerId::Player1, standard_deck())
        .await
        .expect("first deck");

    // Long enough for the worker to shut down more than once over.
    tokio::time::sleep(Duration::from_millis(150)).await;

    handle
        .select_deck(&game_id, PlayerId::Player2, standard_deck())
        .await
        .expect("a fresh worker picks the game up");
    tokio::time::sleep(Duration::from_millis(150)).await;

    let ids: Vec<_> = handle
        .get_game_history(&game_id)
        .await
        .expect("history")
        .into_iter()
        .map(|record| record.id)
        .collect();
    assert_eq!(ids, vec![ActionId(1), ActionId(2)]);

    handle.delete_game(&game_id).await.expect("delete after eviction");
    assert!(!handle.game_exists(&game_id).await.expect("exists"));

    drop(handle);
    runtime.shutdown().await.expect("shutdown");
}
