//! Session state
//!
//! Tracks the sequence number and heartbeat acknowledgement of one connection
//! and turns incoming frames into actions for the connection loop.

use potd_core::LiveReactionEvent;
use tracing::{debug, trace};

use crate::error::{GatewayError, GatewayResult};
use crate::events::{GatewayEventType, ReactionAddPayload, ReactionRemovePayload, ReadyPayload};
use crate::protocol::{GatewayMessage, OpCode};

/// A dispatch the bot acts on
#[derive(Debug, Clone)]
pub enum Dispatch {
    Ready(ReadyPayload),
    Reaction(LiveReactionEvent),
}

/// What the connection loop should do after a frame
#[derive(Debug, Clone)]
pub enum Action {
    None,
    /// The gateway asked for an immediate heartbeat
    Heartbeat,
    Dispatch(Dispatch),
    /// Drop this connection and open a new one
    Reconnect,
}

/// Per-connection protocol state
#[derive(Debug, Default)]
pub struct SessionState {
    sequence: Option<u64>,
    awaiting_ack: bool,
    session_id: Option<String>,
}

impl SessionState {
    /// Last dispatch sequence number seen
    pub fn sequence(&self) -> Option<u64> {
        self.sequence
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Record a scheduled heartbeat
    ///
    /// Returns `false` when the previous one was never acknowledged; the
    /// connection is then considered dead.
    pub fn heartbeat_sent(&mut self) -> bool {
        if self.awaiting_ack {
            return false;
        }
        self.awaiting_ack = true;
        true
    }

    /// Apply one incoming frame
    pub fn handle(&mut self, msg: GatewayMessage) -> GatewayResult<Action> {
        if let Some(s) = msg.s {
            self.sequence = Some(s);
        }

        match msg.op {
            OpCode::Dispatch => self.dispatch(msg),
            OpCode::Heartbeat => Ok(Action::Heartbeat),
            OpCode::HeartbeatAck => {
                self.awaiting_ack = false;
                Ok(Action::None)
            }
            OpCode::Reconnect => {
                debug!("Gateway requested reconnect");
                Ok(Action::Reconnect)
            }
            OpCode::InvalidSession => {
                debug!(resumable = ?msg.d, "Session invalidated");
                self.session_id = None;
                Ok(Action::Reconnect)
            }
            other => {
                trace!(op = %other, "Ignoring frame");
                Ok(Action::None)
            }
        }
    }

    fn dispatch(&mut self, msg: GatewayMessage) -> GatewayResult<Action> {
        let Some(event) = msg.t.as_deref().and_then(GatewayEventType::parse) else {
            trace!(event = ?msg.t, "Ignoring dispatch");
            return Ok(Action::None);
        };
        let data = msg
            .d
            .ok_or_else(|| GatewayError::Protocol(format!("{event} without payload")))?;

        let dispatch = match event {
            GatewayEventType::Ready => {
                let ready: ReadyPayload = serde_json::from_value(data)?;
                self.session_id = Some(ready.session_id.clone());
                Dispatch::Ready(ready)
            }
            GatewayEventType::MessageReactionAdd => {
                Dispatch::Reaction(serde_json::from_value::<ReactionAddPayload>(data)?.into())
            }
            GatewayEventType::MessageReactionRemove => {
                Dispatch::Reaction(serde_json::from_value::<ReactionRemovePayload>(data)?.into())
            }
        };
        Ok(Action::Dispatch(dispatch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use potd_core::{ReactionEventKind, Snowflake};

    fn frame(json: &str) -> GatewayMessage {
        GatewayMessage::from_json(json).unwrap()
    }

    #[test]
    fn test_tracks_sequence() {
        let mut state = SessionState::default();
        assert_eq!(state.sequence(), None);

        state.handle(frame(r#"{"op":0,"t":"GUILD_CREATE","s":3,"d":{}}"#)).unwrap();
        state.handle(frame(r#"{"op":11}"#)).unwrap();

        assert_eq!(state.sequence(), Some(3));
    }

    #[test]
    fn test_missed_ack_is_detected() {
        let mut state = SessionState::default();

        assert!(state.heartbeat_sent());
        assert!(!state.heartbeat_sent());

        state.handle(frame(r#"{"op":11}"#)).unwrap();
        assert!(state.heartbeat_sent());
    }

    #[test]
    fn test_ready_records_session() {
        let mut state = SessionState::default();
        let action = state
            .handle(frame(
                r#"{"op":0,"t":"READY","s":1,"d":{"user":{"id":"1","bot":true},"session_id":"s1"}}"#,
            ))
            .unwrap();

        assert!(matches!(action, Action::Dispatch(Dispatch::Ready(ref r)) if r.user.id == Snowflake::new(1)));
        assert_eq!(state.session_id(), Some("s1"));
    }

    #[test]
    fn test_reaction_remove_dispatch() {
        let mut state = SessionState::default();
        let action = state
            .handle(frame(
                r#"{"op":0,"t":"MESSAGE_REACTION_REMOVE","s":2,"d":{"user_id":"7","channel_id":"100","message_id":"5","emoji":{"id":null,"name":"1️⃣"}}}"#,
            ))
            .unwrap();

        match action {
            Action::Dispatch(Dispatch::Reaction(event)) => {
                assert_eq!(event.kind, ReactionEventKind::Removed);
                assert_eq!(event.user_id, Snowflake::new(7));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_reconnect_and_invalid_session() {
        let mut state = SessionState::default();
        assert!(matches!(state.handle(frame(r#"{"op":7,"d":null}"#)).unwrap(), Action::Reconnect));
        assert!(matches!(state.handle(frame(r#"{"op":9,"d":false}"#)).unwrap(), Action::Reconnect));
        assert!(matches!(state.handle(frame(r#"{"op":1,"d":null}"#)).unwrap(), Action::Heartbeat));
    }

    #[test]
    fn test_malformed_dispatch_is_an_error() {
        let mut state = SessionState::default();
        let result = state.handle(frame(r#"{"op":0,"t":"MESSAGE_REACTION_ADD","s":4,"d":{"user_id":"x"}}"#));
        assert!(matches!(result, Err(GatewayError::Decode(_))));

        let result = state.handle(frame(r#"{"op":0,"t":"READY","s":5}"#));
        assert!(matches!(result, Err(GatewayError::Protocol(_))));
    }
}
