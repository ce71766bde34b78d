//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request; a
//! submitted answer additionally gets the next game view pushed once the
//! feedback delay has elapsed.
//!
//! Games started or replayed on a connection belong to it and are discarded
//! when the socket closes.

use std::{collections::HashSet, sync::Arc};
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};
use uuid::Uuid;

use crate::error::TriviaError;
use crate::logic;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "roampedia_trivia", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "roampedia_trivia", "WebSocket connected");
  let mut owned = OwnedGames::default();

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let incoming = match parse_client(&txt) {
          Ok(incoming) => incoming,
          Err(reply) => {
            if send(&mut socket, &reply).await.is_err() { break; }
            continue;
          }
        };
        debug!(target: "roampedia_trivia", "WS received: {:?}", &incoming);

        // Answers hold the connection for the feedback delay, then push the next view.
        if let ClientWsMessage::SubmitAnswer { game_id, answer } = &incoming {
          let game_id = *game_id;
          let reply = match logic::submit_answer(&state, game_id, answer).await {
            Ok(feedback) => ServerWsMessage::Feedback { game_id, feedback },
            Err(e) => e.to_out().into(),
          };
          let accepted = matches!(reply, ServerWsMessage::Feedback { .. });
          if send(&mut socket, &reply).await.is_err() { break; }
          if accepted {
            let next = match logic::finish_feedback_after_delay(&state, game_id).await {
              Some(game) => ServerWsMessage::Game { game },
              None => ServerWsMessage::Abandoned { game_id },
            };
            if send(&mut socket, &next).await.is_err() { break; }
          }
          continue;
        }

        let reply = handle_client_ws(&incoming, &state).await;
        owned.track(&incoming, &reply);
        if send(&mut socket, &reply).await.is_err() { break; }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }

  let released = owned.release(&state).await;
  info!(target: "roampedia_trivia", released, "WebSocket disconnected");
}

/// Games this connection started and has not yet abandoned or replayed away.
#[derive(Debug, Default)]
struct OwnedGames(HashSet<Uuid>);

impl OwnedGames {
  fn track(&mut self, request: &ClientWsMessage, reply: &ServerWsMessage) {
    if matches!(reply, ServerWsMessage::Error { .. }) {
      return;
    }
    if let ClientWsMessage::Replay { game_id } | ClientWsMessage::Abandon { game_id } = request {
      self.0.remove(game_id);
    }
    if let (ClientWsMessage::StartGame { .. } | ClientWsMessage::Replay { .. }, ServerWsMessage::Game { game }) = (request, reply) {
      self.0.insert(game.id);
    }
  }

  /// Discard every owned game still registered. Returns how many were removed.
  async fn release(self, state: &AppState) -> usize {
    let mut released = 0;
    for id in self.0 {
      if logic::abandon(state, id).await.is_ok() {
        released += 1;
      }
    }
    released
  }
}

fn parse_client(txt: &str) -> Result<ClientWsMessage, ServerWsMessage> {
  serde_json::from_str::<ClientWsMessage>(txt).map_err(|e| TriviaError::InvalidJson(e.to_string()).to_out().into())
}

async fn send(socket: &mut WebSocket, msg: &ServerWsMessage) -> Result<(), axum::Error> {
  let out = serde_json::to_string(msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "code": "serialization", "message": format!("Serialization error: {}", e) }).to_string()
  });
  let sent = socket.send(Message::Text(out)).await;
  if let Err(e) = &sent {
    error!(target: "roampedia_trivia", error = %e, "WS send error");
  }
  sent
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: &ClientWsMessage, state: &AppState) -> ServerWsMessage {
  let outcome = match msg {
    ClientWsMessage::Ping => Ok(ServerWsMessage::Pong),

    ClientWsMessage::Rules => Ok(ServerWsMessage::Rules { rules: logic::rules(state) }),

    ClientWsMessage::Pool { region, difficulty } => logic::parse_filters(region.as_deref(), difficulty.as_deref())
      .map(|(r, d)| ServerWsMessage::Pool { pool: logic::pool_summary(state, r, d) }),

    ClientWsMessage::StartGame { region, difficulty } => {
      match logic::parse_filters(region.as_deref(), difficulty.as_deref()) {
        Ok((r, d)) => logic::start_game(state, r, d).await.map(|game| {
          info!(target: "trivia", id = %game.id, region = %r, difficulty = %d, "WS game started");
          ServerWsMessage::Game { game }
        }),
        Err(e) => Err(e),
      }
    }

    ClientWsMessage::GetGame { game_id } => logic::game_view(state, *game_id).await.map(|game| ServerWsMessage::Game { game }),

    ClientWsMessage::Replay { game_id } => logic::replay(state, *game_id).await.map(|game| ServerWsMessage::Game { game }),

    ClientWsMessage::Abandon { game_id } => {
      let game_id = *game_id;
      logic::abandon(state, game_id).await.map(|_| ServerWsMessage::Abandoned { game_id })
    }

    // The socket loop answers these itself so it can push the next view; this
    // arm replies with feedback only.
    ClientWsMessage::SubmitAnswer { game_id, answer } => {
      let game_id = *game_id;
      logic::submit_answer(state, game_id, answer)
        .await
        .map(|feedback| ServerWsMessage::Feedback { game_id, feedback })
    }
  };
  outcome.unwrap_or_else(|e| e.to_out().into())
}

#[cfg(test)]
mod tests {
  use serde_json::{json, Value};

  use super::*;
  use crate::config::TriviaConfig;
  use crate::domain::Country;
  use crate::seeds::seed_countries;

  fn state(countries: Vec<Country>) -> AppState {
    AppState::new(TriviaConfig { feedback_delay_ms: 10, ..TriviaConfig::default() }, countries)
  }

  fn client(value: Value) -> ClientWsMessage {
    parse_client(&value.to_string()).unwrap()
  }

  async fn exchange(state: &AppState, owned: &mut OwnedGames, value: Value) -> Value {
    let request = client(value);
    let reply = handle_client_ws(&request, state).await;
    owned.track(&request, &reply);
    serde_json::to_value(&reply).unwrap()
  }

  fn game_id(reply: &Value) -> String {
    reply["game"]["id"].as_str().unwrap().to_string()
  }

  #[test]
  fn malformed_messages_get_invalid_json() {
    for txt in ["not json", r#"{"type":"launch_rocket"}"#, r#"{"type":"get_game","gameId":"nope"}"#] {
      let reply = serde_json::to_value(parse_client(txt).unwrap_err()).unwrap();
      assert_eq!(reply["type"], "error");
      assert_eq!(reply["code"], "invalid_json");
      assert!(reply.get("available").is_none());
    }
  }

  #[tokio::test]
  async fn ping_rules_and_pool_replies() {
    let state = state(seed_countries());
    let mut owned = OwnedGames::default();

    assert_eq!(exchange(&state, &mut owned, json!({"type": "ping"})).await, json!({"type": "pong"}));

    let rules = exchange(&state, &mut owned, json!({"type": "rules"})).await;
    assert_eq!(rules["type"], "rules");
    assert_eq!(rules["rules"]["perfectScore"], 100);

    let pool = exchange(&state, &mut owned, json!({"type": "pool", "region": "Oceania", "difficulty": "easy"})).await;
    assert_eq!(pool["type"], "pool");
    assert_eq!(pool["pool"]["available"], 1);
    assert_eq!(pool["pool"]["playable"], false);

    let bad = exchange(&state, &mut owned, json!({"type": "pool", "difficulty": "impossible"})).await;
    assert_eq!(bad["code"], "unknown_difficulty");
  }

  #[tokio::test]
  async fn start_game_on_thin_pool_reports_availability() {
    let state = state(seed_countries());
    let mut owned = OwnedGames::default();
    let reply = exchange(&state, &mut owned, json!({"type": "start_game", "region": "Oceania", "difficulty": "medium"})).await;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["code"], "insufficient_pool");
    assert_eq!(reply["available"], 2);
    assert!(owned.0.is_empty());
  }

  #[tokio::test]
  async fn second_answer_during_feedback_is_locked() {
    let state = state(seed_countries());
    let mut owned = OwnedGames::default();
    let game = exchange(&state, &mut owned, json!({"type": "start_game", "difficulty": "easy"})).await;
    assert_eq!(game["type"], "game");
    assert_eq!(game["game"]["question"]["kind"], "flag");
    let id = game_id(&game);

    let answer = json!({"type": "submit_answer", "gameId": id, "answer": {"type": "choice", "option": 0}});
    let feedback = exchange(&state, &mut owned, answer.clone()).await;
    assert_eq!(feedback["type"], "feedback");
    assert_eq!(feedback["gameId"], id.as_str());
    assert!(feedback["feedback"]["expected"].is_string());

    let locked = exchange(&state, &mut owned, answer).await;
    assert_eq!(locked["type"], "error");
    assert_eq!(locked["code"], "input_locked");
  }

  #[tokio::test]
  async fn replay_and_abandon_update_owned_games() {
    let state = state(seed_countries());
    let mut owned = OwnedGames::default();
    let first = game_id(&exchange(&state, &mut owned, json!({"type": "start_game", "region": "Europe", "difficulty": "expert"})).await);

    let replayed = exchange(&state, &mut owned, json!({"type": "replay", "gameId": first})).await;
    assert_eq!(replayed["type"], "game");
    assert_eq!(replayed["game"]["region"], "Europe");
    assert_eq!(replayed["game"]["difficulty"], "expert");
    let second = game_id(&replayed);
    assert_ne!(first, second);
    assert_eq!(owned.0.len(), 1);

    let gone = exchange(&state, &mut owned, json!({"type": "get_game", "gameId": first})).await;
    assert_eq!(gone["code"], "session_not_found");

    let abandoned = exchange(&state, &mut owned, json!({"type": "abandon", "gameId": second})).await;
    assert_eq!(abandoned, json!({"type": "abandoned", "gameId": second}));
    assert!(owned.0.is_empty());
    assert!(state.sessions.read().await.is_empty());
  }

  #[tokio::test]
  async fn closing_the_socket_discards_its_games() {
    let state = state(seed_countries());
    let mut owned = OwnedGames::default();
    for _ in 0..3 {
      exchange(&state, &mut owned, json!({"type": "start_game", "difficulty": "easy"})).await;
    }
    // a game this connection only looked at stays
    let (foreign, _) = state.start_session(crate::domain::Region::World, crate::domain::Difficulty::Easy).await.unwrap();
    exchange(&state, &mut owned, json!({"type": "get_game", "gameId": foreign})).await;

    assert_eq!(owned.release(&state).await, 3);
    let sessions = state.sessions.read().await;
    assert_eq!(sessions.len(), 1);
    assert!(sessions.contains_key(&foreign));
  }
}
