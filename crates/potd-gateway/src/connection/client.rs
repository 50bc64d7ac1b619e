//! Gateway connection loop
//!
//! Connects, identifies, heartbeats, and hands reaction dispatches to the live
//! reaction service. Reconnects after a fixed delay until the gateway closes
//! with a code that a new session cannot fix.

use std::time::Duration;

use futures_util::{Sink, SinkExt, StreamExt};
use potd_common::DiscordConfig;
use potd_service::{LiveReactionService, ServiceContext};
use tokio::time::{sleep, sleep_until, Instant};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::connect_async;
use tracing::{debug, error, info, instrument, warn};

use super::session::{Action, Dispatch, SessionState};
use crate::error::{GatewayError, GatewayResult};
use crate::protocol::{CloseCode, GatewayMessage, HelloPayload, IdentifyPayload, Intents};

/// Wait between sessions
const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Connection settings
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    pub url: String,
    pub token: String,
    pub intents: Intents,
    pub reconnect_delay: Duration,
}

impl GatewayOptions {
    pub fn from_config(config: &DiscordConfig) -> Self {
        Self {
            url: config.gateway_url.clone(),
            token: config.token.clone(),
            intents: Intents::POTD,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

/// Long-running gateway client
pub struct GatewayClient {
    options: GatewayOptions,
    ctx: ServiceContext,
}

impl GatewayClient {
    pub fn new(options: GatewayOptions, ctx: ServiceContext) -> Self {
        Self { options, ctx }
    }

    /// Keep a session open, reconnecting as needed
    ///
    /// Only returns on a fatal close.
    pub async fn run(&self) -> GatewayResult<()> {
        loop {
            match self.run_session().await {
                Ok(()) => info!("Gateway session ended"),
                Err(e) if e.is_fatal() => {
                    error!(error = %e, "Gateway closed for good");
                    return Err(e);
                }
                Err(e) => warn!(error = %e, "Gateway session failed"),
            }
            sleep(self.options.reconnect_delay).await;
        }
    }

    #[instrument(skip(self), fields(url = %self.options.url))]
    async fn run_session(&self) -> GatewayResult<()> {
        let (ws, _) = connect_async(self.options.url.as_str()).await?;
        let (mut sink, mut stream) = ws.split();

        let hello = loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    if let Some(hello) = GatewayMessage::from_json(&text)?.as_hello() {
                        break hello;
                    }
                }
                Some(Ok(Message::Close(frame))) => return on_close(frame),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Err(GatewayError::Protocol("closed before Hello".to_string())),
            }
        };
        let HelloPayload { heartbeat_interval } = hello;
        let interval = Duration::from_millis(heartbeat_interval.max(1));

        let identify = IdentifyPayload::new(self.options.token.as_str(), self.options.intents);
        send(&mut sink, &GatewayMessage::identify(&identify)?).await?;
        debug!(heartbeat_ms = heartbeat_interval, "Identified");

        let mut state = SessionState::default();
        // first beat lands at a random point of the first interval
        let mut next_beat = Instant::now() + interval.mul_f64(rand::random::<f64>());

        loop {
            tokio::select! {
                () = sleep_until(next_beat) => {
                    if !state.heartbeat_sent() {
                        warn!("Heartbeat not acknowledged, reconnecting");
                        return Ok(());
                    }
                    send(&mut sink, &GatewayMessage::heartbeat(state.sequence())).await?;
                    next_beat += interval;
                }
                frame = stream.next() => {
                    let text = match frame {
                        Some(Ok(Message::Text(text))) => text,
                        Some(Ok(Message::Close(frame))) => return on_close(frame),
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => return Err(e.into()),
                        None => return Ok(()),
                    };

                    let action = match GatewayMessage::from_json(&text)
                        .map_err(GatewayError::from)
                        .and_then(|msg| state.handle(msg))
                    {
                        Ok(action) => action,
                        Err(e) => {
                            warn!(error = %e, "Skipping frame");
                            continue;
                        }
                    };

                    match action {
                        Action::None => {}
                        Action::Heartbeat => {
                            send(&mut sink, &GatewayMessage::heartbeat(state.sequence())).await?;
                        }
                        Action::Dispatch(dispatch) => self.dispatch(dispatch),
                        Action::Reconnect => return Ok(()),
                    }
                }
            }
        }
    }

    fn dispatch(&self, dispatch: Dispatch) {
        match dispatch {
            Dispatch::Ready(ready) => {
                self.ctx.live_state().set_bot_user(ready.user.id);
                info!(user_id = %ready.user.id, "Gateway ready");
            }
            Dispatch::Reaction(event) => {
                LiveReactionService::new(&self.ctx).handle(&event);
            }
        }
    }
}

async fn send<S>(sink: &mut S, msg: &GatewayMessage) -> GatewayResult<()>
where
    S: Sink<Message, Error = tungstenite::Error> + Unpin,
{
    sink.send(Message::Text(msg.to_json()?)).await?;
    Ok(())
}

fn on_close(frame: Option<CloseFrame<'static>>) -> GatewayResult<()> {
    let Some(frame) = frame else {
        info!("Gateway closed the connection");
        return Ok(());
    };
    let raw = u16::from(frame.code);
    match CloseCode::from_u16(raw) {
        Some(code) if !code.should_reconnect() => Err(GatewayError::Fatal(code)),
        code => {
            info!(code = raw, reason = %frame.reason, known = ?code, "Gateway closed the connection");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use potd_core::Snowflake;
    use potd_service::services::testing::{TestHarness, POTD_CHANNEL};
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode as WsCloseCode;

    fn reaction(kind: &str, seq: u64, user: &str, channel: &str, bot: bool) -> String {
        let member = if kind == "MESSAGE_REACTION_ADD" {
            format!(r#","member":{{"user":{{"id":"{user}","bot":{bot}}}}}"#)
        } else {
            String::new()
        };
        format!(
            r#"{{"op":0,"t":"{kind}","s":{seq},"d":{{"user_id":"{user}","channel_id":"{channel}","message_id":"5000","emoji":{{"id":null,"name":"1️⃣"}}{member}}}}}"#
        )
    }

    /// Gateway that plays `frames` after Identify, then closes with `close_code`
    async fn fake_gateway(frames: Vec<String>, close_code: u16) -> (String, tokio::task::JoinHandle<GatewayMessage>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            ws.send(Message::Text(r#"{"op":10,"d":{"heartbeat_interval":60000}}"#.to_string()))
                .await
                .unwrap();

            let identify = loop {
                let Message::Text(text) = ws.next().await.unwrap().unwrap() else {
                    continue;
                };
                let msg = GatewayMessage::from_json(&text).unwrap();
                if msg.op == crate::protocol::OpCode::Identify {
                    break msg;
                }
            };

            for frame in frames {
                ws.send(Message::Text(frame)).await.unwrap();
            }
            ws.close(Some(CloseFrame {
                code: WsCloseCode::from(close_code),
                reason: "done".into(),
            }))
            .await
            .unwrap();
            while let Some(Ok(_)) = ws.next().await {}
            identify
        });
        (url, handle)
    }

    fn options(url: String) -> GatewayOptions {
        GatewayOptions {
            url,
            token: "token".to_string(),
            intents: Intents::POTD,
            reconnect_delay: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn test_session_feeds_ledger() {
        let h = TestHarness::new();
        h.ctx.live_state().watch_channel(POTD_CHANNEL);

        let frames = vec![
            r#"{"op":0,"t":"READY","s":1,"d":{"user":{"id":"1","bot":true},"session_id":"abc"}}"#.to_string(),
            reaction("MESSAGE_REACTION_ADD", 2, "7", "100", false),
            reaction("MESSAGE_REACTION_ADD", 3, "8", "100", false),
            reaction("MESSAGE_REACTION_ADD", 4, "1", "100", false),
            reaction("MESSAGE_REACTION_ADD", 5, "9", "999", false),
            reaction("MESSAGE_REACTION_REMOVE", 6, "8", "100", false),
        ];
        let (url, server) = fake_gateway(frames, 4004).await;

        let client = GatewayClient::new(options(url), h.ctx.clone());
        let result = tokio::time::timeout(Duration::from_secs(10), client.run())
            .await
            .expect("client should stop on the fatal close");

        assert!(matches!(result, Err(GatewayError::Fatal(CloseCode::AuthenticationFailed))));
        let identify = server.await.unwrap();
        assert_eq!(identify.d.unwrap()["token"], "token");

        assert_eq!(h.ctx.live_state().bot_user(), Some(Snowflake::new(1)));
        let ledger = h.ctx.ledger().lock();
        assert_eq!(ledger.count(Snowflake::new(7)), 1);
        assert_eq!(ledger.count(Snowflake::new(8)), 0);
        assert_eq!(ledger.count(Snowflake::new(1)), 0);
        assert_eq!(ledger.count(Snowflake::new(9)), 0);
    }

    #[test]
    fn test_on_close_codes() {
        let frame = |code: u16| {
            Some(CloseFrame {
                code: WsCloseCode::from(code),
                reason: "".into(),
            })
        };

        assert!(on_close(None).is_ok());
        assert!(on_close(frame(1000)).is_ok());
        assert!(on_close(frame(4009)).is_ok());
        assert!(matches!(
            on_close(frame(4014)),
            Err(GatewayError::Fatal(CloseCode::DisallowedIntents))
        ));
    }
}
