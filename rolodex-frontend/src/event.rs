use std::sync::Arc;

use futures::FutureExt;
use rolodex_navigation::{Contact, NavigationEvent};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    select,
    sync::mpsc::{self, Receiver, Sender},
};
use tokio_util::sync::CancellationToken;

use crate::{
    api::{ApiError, ContactApi, Fields},
    error::AppError,
    outlet::{Identity, OutletId, Payload},
    task::{Task, TaskManager},
};

#[derive(Debug)]
pub struct Envelope {
    pub messages: Vec<Message>,
    pub source: MessageSource,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageSource {
    Task,
    User,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    CancelEdit,
    CreateContact,
    DeleteContact,
    DismissAlert,
    EditContact,
    Loaded {
        outlet: OutletId,
        identity: Identity,
        generation: u64,
        result: Result<Payload, ApiError>,
    },
    Mutated(Result<Mutation, ApiError>),
    Navigation(NavigationEvent),
    Quit,
    SaveContact(Fields),
    Search(String),
    SearchSettled {
        generation: u64,
        query: String,
    },
    ToggleFavorite,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Mutation {
    Created(Contact),
    Deleted(String),
    Favorited(Contact),
    Updated(Contact),
}

pub struct Emitter {
    cancellation: CancellationToken,
    pub receiver: Receiver<Envelope>,
    tasks: TaskManager,
}

impl Emitter {
    pub fn start(api: Arc<dyn ContactApi>) -> Self {
        let (sender, receiver) = mpsc::channel(16);
        let cancellation = CancellationToken::new();

        start_stdin_listener(cancellation.child_token(), sender.clone());

        Self {
            cancellation,
            receiver,
            tasks: TaskManager::new(api, sender),
        }
    }

    pub fn run(&mut self, task: Task) {
        self.tasks.run(task);
    }

    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.cancellation.cancel();
        self.tasks.finishing().await
    }
}

fn start_stdin_listener(cancellation: CancellationToken, sender: Sender<Envelope>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            let line = lines.next_line().fuse();

            select! {
                _ = cancellation.cancelled() => break,
                line = line => {
                    let messages = match line {
                        Ok(Some(line)) => match parse_command(&line) {
                            Some(messages) => messages,
                            None => {
                                tracing::warn!("unknown command: {:?}", line);
                                continue;
                            }
                        },
                        Ok(None) => vec![Message::Quit],
                        Err(error) => {
                            tracing::error!("reading stdin failed: {:?}", error);
                            vec![Message::Quit]
                        }
                    };

                    let quit = messages.contains(&Message::Quit);
                    let envelope = Envelope {
                        messages,
                        source: MessageSource::User,
                    };

                    if sender.send(envelope).await.is_err() || quit {
                        break;
                    }
                }
            }
        }
    });
}

/// Maps a line of user input to messages, `None` if not understood.
pub fn parse_command(line: &str) -> Option<Vec<Message>> {
    let line = line.trim();
    let (command, arguments) = match line.split_once(char::is_whitespace) {
        Some((command, arguments)) => (command, arguments.trim()),
        None => (line, ""),
    };

    let message = match command {
        "back" => Message::Navigation(NavigationEvent::Back),
        "cancel" => Message::CancelEdit,
        "click" | "open" if !arguments.is_empty() => {
            let (href, modified) = match arguments.strip_suffix("--modified") {
                Some(href) => (href.trim(), true),
                None => (arguments, false),
            };

            Message::Navigation(NavigationEvent::Click {
                href: href.to_string(),
                modified,
            })
        }
        "delete" => Message::DeleteContact,
        "edit" => Message::EditContact,
        "favorite" => Message::ToggleFavorite,
        "forward" => Message::Navigation(NavigationEvent::Forward),
        "new" => Message::CreateContact,
        "ok" => Message::DismissAlert,
        "quit" | "q" => Message::Quit,
        "save" => Message::SaveContact(parse_fields(arguments)),
        "search" => Message::Search(arguments.to_string()),
        _ => return None,
    };

    Some(vec![message])
}

/// `key=value` pairs separated by whitespace, values may be double quoted.
fn parse_fields(arguments: &str) -> Fields {
    let mut fields = Fields::new();
    let mut rest = arguments.trim_start();
    while let Some((key, tail)) = rest.split_once('=') {
        let (value, tail) = match tail.strip_prefix('"') {
            Some(quoted) => match quoted.split_once('"') {
                Some((value, tail)) => (value, tail),
                None => (quoted, ""),
            },
            None => match tail.split_once(char::is_whitespace) {
                Some((value, tail)) => (value, tail),
                None => (tail, ""),
            },
        };

        fields.insert(key.trim().to_string(), value.to_string());
        rest = tail.trim_start();
    }

    fields
}
