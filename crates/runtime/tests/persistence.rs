use vanguard_core::{Action, GameError, GameId, Phase, PieceKind, PlayerId};
use vanguard_runtime::{
    ActionId, Event, LifecycleEvent, Runtime, RuntimeConfig, RuntimeError, RuntimeHandle,
    StorageConfig, Topic,
};

fn standard_deck() -> Vec<PieceKind> {
    let mut deck = vec![PieceKind::Colonel; 4];
    deck.extend([PieceKind::Infantryman; 9]);
    deck.extend([PieceKind::Scout; 6]);
    deck
}

/// Plays the opening through `startGame` and one `endTurn`.
async fn play_opening(handle: &RuntimeHandle) -> GameId {
    let game_id = handle.create_game().await.expect("create game").id;
    for player in PlayerId::ALL {
        handle
            .select_deck(&game_id, player, standard_deck())
            .await
            .expect("deck should be accepted");
    }
    for player in PlayerId::ALL {
        let state = handle.get_game(&game_id).await.expect("load game");
        let picks = state.player(player).reserve[1..5]
            .iter()
            .map(|piece| piece.id)
            .collect();
        handle
            .setup_reinforcements(&game_id, player, picks)
            .await
            .expect("queue should be accepted");
    }
    let state = handle.start_game(&game_id).await.expect("start game");
    handle
        .execute_action(&game_id, state.defender(), Action::EndTurn)
        .await
        .expect("end turn should succeed");
    game_id
}

#[tokio::test]
async fn test_history_records_every_commit() {
    let runtime = Runtime::builder().build().await.expect("runtime should start");
    let handle = runtime.handle();
    let game_id = play_opening(&handle).await;

    let history = handle.get_game_history(&game_id).await.expect("history");
    let commands: Vec<&str> = history.iter().map(|record| record.command.as_str()).collect();
    assert_eq!(
        commands,
        vec![
            "selectDeck",
            "selectDeck",
            "setupReinforcements",
            "setupReinforcements",
            "startGame",
            "endTurn",
        ]
    );
    let ids: Vec<u64> = history.iter().map(|record| record.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);

    // Turn numbers are taken before the command runs.
    let turns: Vec<u32> = history.iter().map(|record| record.turn_number).collect();
    assert_eq!(turns, vec![0, 0, 0, 0, 0, 1]);
    assert_eq!(history[4].player, None);
    assert!(history.iter().all(|record| record.state_before.is_some()));

    let first = &history[0];
    assert_eq!(
        first.state_before.as_deref().map(|state| state.phase),
        Some(Phase::DeckSelection)
    );
    assert!(first.state_after.player(first.player.expect("player")).deck_selected);

    let latest = handle.get_game(&game_id).await.expect("load game");
    assert_eq!(*history[5].state_after, latest);

    let listed = handle.list_games().await.expect("list games");
    assert_eq!(listed[0].action_count, 6);
    assert_eq!(listed[0].phase, Phase::PostTurn);
    assert_eq!(listed[0].turn_number, 1);
}

#[tokio::test]
async fn test_replay_returns_recorded_snapshots() {
    let runtime = Runtime::builder().build().await.expect("runtime should start");
    let handle = runtime.handle();
    let game_id = play_opening(&handle).await;
    let history = handle.get_game_history(&game_id).await.expect("history");

    let after_start = handle
        .replay_to_action(&game_id, ActionId(5))
        .await
        .expect("record 5 exists");
    assert_eq!(after_start, *history[4].state_after);
    assert_eq!(after_start.phase, Phase::Playing);

    // Turn 0 ends with startGame.
    let turn_zero = handle
        .replay_to_turn(&game_id, 0)
        .await
        .expect("turn 0 was played");
    assert_eq!(turn_zero, after_start);

    let turn_one = handle
        .replay_to_turn(&game_id, 1)
        .await
        .expect("turn 1 was played");
    assert_eq!(turn_one.phase, Phase::PostTurn);

    let err = handle
        .replay_to_action(&game_id, ActionId(99))
        .await
        .expect_err("no such record");
    assert!(matches!(err, RuntimeError::ActionNotFound { .. }));
    assert_eq!(err.error_code(), "ACTION_RECORD_NOT_FOUND");

    let err = handle
        .replay_to_turn(&game_id, 7)
        .await
        .expect_err("turn 7 never happened");
    assert!(matches!(err, RuntimeError::TurnNotFound { .. }));

    // Replaying never rewinds the live game.
    let live = handle.get_game(&game_id).await.expect("load game");
    assert_eq!(live.phase, Phase::PostTurn);
}

#[tokio::test]
async fn test_history_can_skip_pre_command_snapshots() {
    let config = RuntimeConfig {
        record_state_before: false,
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
        .expect("deck should be accepted");

    let history = handle.get_game_history(&game_id).await.expect("history");
    assert_eq!(history.len(), 1);
    assert!(history[0].state_before.is_none());
}

#[tokio::test]
async fn test_delete_removes_game_and_history() {
    let runtime = Runtime::builder().build().await.expect("runtime should start");
    let handle = runtime.handle();
    let game_id = play_opening(&handle).await;
    let mut lifecycle = handle.subscribe(Topic::Lifecycle);

    handle.delete_game(&game_id).await.expect("delete game");

    assert!(!handle.game_exists(&game_id).await.expect("exists"));
    assert!(handle.list_games().await.expect("list games").is_empty());
    let err = handle
        .get_game_history(&game_id)
        .await
        .expect_err("history is gone");
    assert!(matches!(err, RuntimeError::GameNotFound(_)));

    match lifecycle.try_recv().expect("deletion should be announced") {
        Event::Lifecycle(LifecycleEvent::GameDeleted { game_id: deleted }) => {
            assert_eq!(deleted, game_id);
        }
        other => panic!("unexpected event: {:?}", other),
    }

    let err = handle
        .delete_game(&game_id)
        .await
        .expect_err("second delete finds nothing");
    assert!(matches!(err, RuntimeError::GameNotFound(_)));
}

#[tokio::test]
async fn test_file_storage_survives_restart() {
    println!("\n════════════════════════════════════════════════════════");
    println!("  VANGUARD - File Storage Round Trip");
    println!("════════════════════════════════════════════════════════\n");

    let dir = tempfile::tempdir().expect("temp dir");
    let config = RuntimeConfig {
        storage: StorageConfig::file(dir.path()),
        ..RuntimeConfig::default()
    };

    let runtime = Runtime::builder()
        .config(config.clone())
        .build()
        .await
        .expect("runtime should start");
    let handle = runtime.handle();
    let game_id = play_opening(&handle).await;
    let saved = handle.get_game(&game_id).await.expect("load game");
    drop(handle);
    runtime.shutdown().await.expect("clean shutdown");
    println!("✓ First runtime stopped after {} commands", 6);

    let runtime = Runtime::builder()
        .config(config)
        .build()
        .await
        .expect("runtime should restart");
    let handle = runtime.handle();

    assert!(handle.game_exists(&game_id).await.expect("exists"));
    let restored = handle.get_game(&game_id).await.expect("load game");
    assert_eq!(restored, saved);

    let history = handle.get_game_history(&game_id).await.expect("history");
    assert_eq!(history.len(), 6);
    assert_eq!(*history[5].state_after, saved);
    println!("✓ Snapshot and history restored from {:?}", dir.path());

    // The restored game keeps playing and numbering continues.
    let player = restored.current_player;
    let state = handle
        .complete_post_turn(&game_id, player, false, None)
        .await
        .expect("post-turn should succeed");
    assert_eq!(state.turn_number, 2);
    let history = handle.get_game_history(&game_id).await.expect("history");
    assert_eq!(history.last().map(|record| record.id), Some(ActionId(7)));

    drop(handle);
    runtime.shutdown().await.expect("clean shutdown");
    println!("✓ Numbering continued after restart\n");
}
