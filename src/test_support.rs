//! Fixtures shared by the unit tests

use std::time::Duration;

use crate::app::App;
use crate::client::ChatClient;
use crate::state::{Message, Role, AGENT_AUTHOR, USER_AUTHOR};

pub fn user(text: &str) -> Message {
    Message::new(Role::User, USER_AUTHOR, text)
}

pub fn agent(text: &str) -> Message {
    Message::new(Role::Agent, AGENT_AUTHOR, text)
}

/// An app pointed at a server nobody talks to
pub fn app() -> App {
    let client = ChatClient::new("http://localhost:5000", Duration::from_secs(1)).unwrap();
    App::new(client)
}
