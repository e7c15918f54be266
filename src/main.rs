//! Terminal chat client.
//!
//! ```text
//! streamhub-chat <stream-id>
//! ```
//!
//! Logs in when credentials are configured, joins the stream, then prints
//! chat traffic and sends each stdin line as a message until EOF or Ctrl-C.

use secrecy::ExposeSecret;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use streamhub_chat::adapters::{
    ApiClient, HttpAuthGateway, HttpStreamDirectory, InMemoryCredentialStore,
    WebSocketChatTransport,
};
use streamhub_chat::application::handlers::{JoinStreamHandler, LoginCommand, LoginHandler};
use streamhub_chat::application::ChatSessionCore;
use streamhub_chat::config::AppConfig;
use streamhub_chat::domain::foundation::{RemoteResult, StreamId, UserId};
use streamhub_chat::presentation::{ChatPresenter, ChatState};
use streamhub_chat::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    telemetry::init_tracing(&config.client)?;

    let Some(stream_id) = std::env::args().nth(1) else {
        eprintln!("Usage: streamhub-chat <stream-id>");
        std::process::exit(2);
    };
    let stream_id = StreamId::new(stream_id)?;

    let credentials = Arc::new(match config.auth.token.as_ref() {
        Some(token) if config.auth.has_token() => {
            let user_id = config.auth.user_id.clone().and_then(|id| UserId::new(id).ok());
            InMemoryCredentialStore::with_credentials(token.expose_secret().clone(), user_id)
        }
        _ => InMemoryCredentialStore::new(),
    });
    let api = ApiClient::new(&config.api, credentials.clone())?;

    if let Some((email, password)) = config.auth.login_credentials() {
        let gateway = Arc::new(HttpAuthGateway::new(api.clone(), credentials.clone()));
        let login = LoginHandler::new(gateway);
        let cmd = LoginCommand {
            email: email.to_string(),
            password: password.to_string(),
        };
        if let RemoteResult::Error(message) = login.handle(cmd).await {
            eprintln!("Login failed: {}", message);
            std::process::exit(1);
        }
    }

    let join = JoinStreamHandler::new(Arc::new(HttpStreamDirectory::new(api)));
    match join.handle(&stream_id).await {
        RemoteResult::Success(message) => println!("* {}", message),
        RemoteResult::Error(message) => {
            tracing::warn!(stream_id = %stream_id, error = %message, "Join failed; opening chat anyway");
        }
        RemoteResult::Loading => {}
    }

    let transport = Arc::new(WebSocketChatTransport::new(&config.chat));
    let core = Arc::new(ChatSessionCore::new(transport, credentials));
    let presenter = ChatPresenter::start(core, stream_id).await;

    let mut state = presenter.state();
    let mut printed = 0;
    let mut was_connected = None;
    render(&state.borrow_and_update(), &mut printed, &mut was_connected);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => presenter.send_message(&line),
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read stdin");
                    break;
                }
            },
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                render(&state.borrow_and_update(), &mut printed, &mut was_connected);
            }
        }
    }

    presenter.stop().await;
    Ok(())
}

fn render(state: &ChatState, printed: &mut usize, was_connected: &mut Option<bool>) {
    if *was_connected != Some(state.is_connected) {
        match (&state.error, state.is_connected) {
            (_, true) => println!("* connected"),
            (Some(error), false) => println!("* {}", error),
            (None, false) => println!("* disconnected"),
        }
        *was_connected = Some(state.is_connected);
    }

    for message in state.messages.iter().skip(*printed) {
        let marker = if message.is_own_message { ">" } else { " " };
        println!("{} {}: {}", marker, message.username, message.content);
    }
    *printed = state.messages.len();
}
