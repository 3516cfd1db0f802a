//! Line-delimited JSON protocol spoken on stdin/stdout.
//!
//! Every input line is one [`Request`] tagged by `op`; every output line is a
//! [`Reply`]. Accepted commands answer with the resulting snapshot under
//! `result`, rejected ones with `{error, class, code}`.
//!
//! ```text
//! > {"op":"createGame"}
//! < {"result":{"id":"3f9c0d1e2a4b5c6d","phase":"deck-selection",...}}
//! > {"op":"executeAction","gameId":"3f9c...","playerId":"player2","action":{"type":"endTurn"}}
//! < {"error":"...","class":"conflict","code":"ACTION_NOT_YOUR_TURN"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use vanguard_core::{GameError, GameId, PieceId, PieceKind, PlayerId, Position};
use vanguard_runtime::{ActionId, ActionRequest, ErrorClass, Event, RuntimeError, RuntimeHandle};

/// One client request.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Request {
    CreateGame,
    #[serde(rename_all = "camelCase")]
    SelectDeck {
        game_id: GameId,
        player_id: PlayerId,
        pieces: Vec<PieceKind>,
    },
    #[serde(rename_all = "camelCase")]
    PlaceGeneral {
        game_id: GameId,
        player_id: PlayerId,
        position: Position,
    },
    #[serde(rename_all = "camelCase")]
    SetupReinforcements {
        game_id: GameId,
        player_id: PlayerId,
        piece_ids: Vec<PieceId>,
    },
    #[serde(rename_all = "camelCase")]
    StartGame { game_id: GameId },
    #[serde(rename_all = "camelCase")]
    ExecuteAction {
        game_id: GameId,
        player_id: PlayerId,
        action: ActionRequest,
    },
    #[serde(rename_all = "camelCase")]
    CompletePostTurn {
        game_id: GameId,
        player_id: PlayerId,
        add_reinforcement: bool,
        #[serde(default)]
        reserve_piece_id: Option<PieceId>,
    },
    #[serde(rename_all = "camelCase")]
    GetGame { game_id: GameId },
    ListGames,
    #[serde(rename_all = "camelCase")]
    GetGameHistory { game_id: GameId },
    #[serde(rename_all = "camelCase")]
    ReplayToAction { game_id: GameId, action_id: ActionId },
    #[serde(rename_all = "camelCase")]
    ReplayToTurn { game_id: GameId, turn_number: u32 },
    #[serde(rename_all = "camelCase")]
    DeleteGame { game_id: GameId },
    #[serde(rename_all = "camelCase")]
    GameExists { game_id: GameId },
    #[serde(rename_all = "camelCase")]
    Zones { game_id: GameId, piece_id: PieceId },
    Rules,
}

/// One output line.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Ok {
        result: Value,
    },
    Rejected {
        error: String,
        class: ErrorClass,
        code: &'static str,
    },
    Event {
        event: Event,
    },
}

impl Reply {
    fn ok<T: Serialize>(result: Result<T, RuntimeError>) -> Self {
        match result {
            Ok(value) => match serde_json::to_value(value) {
                Ok(result) => Reply::Ok { result },
                Err(err) => Reply::Rejected {
                    error: format!("failed to encode reply: {err}"),
                    class: ErrorClass::Internal,
                    code: "REPLY_UNENCODABLE",
                },
            },
            Err(err) => Reply::rejected(&err),
        }
    }

    fn rejected(err: &RuntimeError) -> Self {
        Reply::Rejected {
            error: err.to_string(),
            class: err.class(),
            code: err.error_code(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok { .. })
    }
}

/// Parses and executes one input line.
pub async fn handle_line(handle: &RuntimeHandle, line: &str) -> Reply {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => dispatch(handle, request).await,
        Err(err) => {
            tracing::debug!("Unparseable request: {}", err);
            Reply::Rejected {
                error: format!("invalid request: {err}"),
                class: ErrorClass::BadRequest,
                code: "REQUEST_UNPARSEABLE",
            }
        }
    }
}

/// Maps one request to one [`RuntimeHandle`] call.
pub async fn dispatch(handle: &RuntimeHandle, request: Request) -> Reply {
    match request {
        Request::CreateGame => Reply::ok(handle.create_game().await),
        Request::SelectDeck {
            game_id,
            player_id,
            pieces,
        } => Reply::ok(handle.select_deck(&game_id, player_id, pieces).await),
        Request::PlaceGeneral {
            game_id,
            player_id,
            position,
        } => Reply::ok(handle.place_general(&game_id, player_id, position).await),
        Request::SetupReinforcements {
            game_id,
            player_id,
            piece_ids,
        } => Reply::ok(
            handle
                .setup_reinforcements(&game_id, player_id, piece_ids)
                .await,
        ),
        Request::StartGame { game_id } => Reply::ok(handle.start_game(&game_id).await),
        Request::ExecuteAction {
            game_id,
            player_id,
            action,
        } => Reply::ok(handle.execute_request(&game_id, player_id, action).await),
        Request::CompletePostTurn {
            game_id,
            player_id,
            add_reinforcement,
            reserve_piece_id,
        } => Reply::ok(
            handle
                .complete_post_turn(&game_id, player_id, add_reinforcement, reserve_piece_id)
                .await,
        ),
        Request::GetGame { game_id } => Reply::ok(handle.get_game(&game_id).await),
        Request::ListGames => Reply::ok(handle.list_games().await),
        Request::GetGameHistory { game_id } => Reply::ok(handle.get_game_history(&game_id).await),
        Request::ReplayToAction { game_id, action_id } => {
            Reply::ok(handle.replay_to_action(&game_id, action_id).await)
        }
        Request::ReplayToTurn {
            game_id,
            turn_number,
        } => Reply::ok(handle.replay_to_turn(&game_id, turn_number).await),
        Request::DeleteGame { game_id } => Reply::ok(
            handle
                .delete_game(&game_id)
                .await
                .map(|()| serde_json::json!({ "deleted": game_id })),
        ),
        Request::GameExists { game_id } => Reply::ok(handle.game_exists(&game_id).await),
        Request::Zones { game_id, piece_id } => Reply::ok(handle.zones(&game_id, piece_id).await),
        Request::Rules => Reply::ok(Ok(handle.rules())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vanguard_runtime::Runtime;

    fn result(reply: Reply) -> Value {
        match reply {
            Reply::Ok { result } => result,
            other => panic!("expected a result, got {:?}", other),
        }
    }

    fn deck() -> Value {
        let mut pieces = vec!["colonel"; 4];
        pieces.extend(["infantryman"; 9]);
        pieces.extend(["scout"; 6]);
        json!(pieces)
    }

    #[test]
    fn requests_use_camel_case_fields() {
        let request: Request = serde_json::from_value(json!({
            "op": "completePostTurn",
            "gameId": "g1",
            "playerId": "player2",
            "addReinforcement": true,
            "reservePieceId": 12
        }))
        .unwrap();

        assert_eq!(
            request,
            Request::CompletePostTurn {
                game_id: GameId::new("g1"),
                player_id: PlayerId::Player2,
                add_reinforcement: true,
                reserve_piece_id: Some(PieceId(12)),
            }
        );
    }

    #[test]
    fn rejections_serialize_flat() {
        let reply = Reply::rejected(&RuntimeError::GameNotFound(GameId::new("g1")));
        let value = serde_json::to_value(&reply).unwrap();

        assert_eq!(value["class"], "not_found");
        assert_eq!(value["code"], "GAME_NOT_FOUND");
        assert!(value["error"].as_str().unwrap().contains("g1"));
    }

    #[tokio::test]
    async fn garbage_lines_are_bad_requests() {
        let runtime = Runtime::builder().build().await.unwrap();
        let handle = runtime.handle();

        let value = serde_json::to_value(handle_line(&handle, "{not json").await).unwrap();
        assert_eq!(value["class"], "bad_request");
        assert_eq!(value["code"], "REQUEST_UNPARSEABLE");

        let value =
            serde_json::to_value(handle_line(&handle, r#"{"op":"teleport"}"#).await).unwrap();
        assert_eq!(value["code"], "REQUEST_UNPARSEABLE");
    }

    #[tokio::test]
    async fn lines_drive_a_game_through_setup() {
        let runtime = Runtime::builder().build().await.unwrap();
        let handle = runtime.handle();

        let created = result(handle_line(&handle, r#"{"op":"createGame"}"#).await);
        assert_eq!(created["phase"], "deck-selection");
        let game_id = created["id"].as_str().unwrap().to_string();

        for player in ["player1", "player2"] {
            let line = json!({
                "op": "selectDeck",
                "gameId": game_id,
                "playerId": player,
                "pieces": deck(),
            })
            .to_string();
            let reply = handle_line(&handle, &line).await;
            assert!(reply.is_ok(), "{:?}", reply);
        }

        let state = result(
            handle_line(&handle, &json!({"op": "getGame", "gameId": game_id}).to_string()).await,
        );
        assert_eq!(state["phase"], "setup");

        // Wrong phase for an in-turn action.
        let line = json!({
            "op": "executeAction",
            "gameId": game_id,
            "playerId": "player1",
            "action": {"type": "endTurn"},
        })
        .to_string();
        let value = serde_json::to_value(handle_line(&handle, &line).await).unwrap();
        assert_eq!(value["class"], "conflict");
        assert_eq!(value["code"], "ACTION_WRONG_PHASE");

        let history = result(
            handle_line(
                &handle,
                &json!({"op": "getGameHistory", "gameId": game_id}).to_string(),
            )
            .await,
        );
        assert_eq!(history.as_array().map(Vec::len), Some(2));

        let rules = result(handle_line(&handle, r#"{"op":"rules"}"#).await);
        assert_eq!(rules.as_array().map(Vec::len), Some(4));
    }
}
