use std::{sync::Arc, time::Duration};

use tokio::{sync::mpsc::Sender, task::JoinSet};
use tokio_util::sync::CancellationToken;

use crate::{
    api::{ContactApi, Fields},
    error::AppError,
    event::{Envelope, Message, MessageSource, Mutation},
    outlet::{Identity, OutletId, Payload},
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Task {
    CreateContact,
    Debounce {
        generation: u64,
        query: String,
        delay: Duration,
    },
    DeleteContact(String),
    FetchContact {
        outlet: OutletId,
        id: String,
        generation: u64,
    },
    FetchContacts {
        outlet: OutletId,
        query: Option<String>,
        generation: u64,
    },
    SetFavorite(String, bool),
    UpdateContact(String, Fields),
}

/// Spawns tasks onto the runtime. Results come back as task envelopes, tasks
/// never touch the model.
pub struct TaskManager {
    api: Arc<dyn ContactApi>,
    cancellation: CancellationToken,
    sender: Sender<Envelope>,
    tasks: JoinSet<Result<(), AppError>>,
}

impl TaskManager {
    pub fn new(api: Arc<dyn ContactApi>, sender: Sender<Envelope>) -> Self {
        Self {
            api,
            cancellation: CancellationToken::new(),
            sender,
            tasks: JoinSet::new(),
        }
    }

    pub fn run(&mut self, task: Task) {
        self.reap();

        tracing::debug!("handling task: {:?}", task);

        let api = self.api.clone();
        let sender = self.sender.clone();
        let cancellation = self.cancellation.child_token();
        self.tasks.spawn(async move {
            tokio::select! {
                _ = cancellation.cancelled() => Ok(()),
                message = run_task(api.as_ref(), task) => {
                    sender
                        .send(Envelope {
                            messages: vec![message],
                            source: MessageSource::Task,
                        })
                        .await?;

                    Ok(())
                }
            }
        });
    }

    pub async fn finishing(&mut self) -> Result<(), AppError> {
        self.cancellation.cancel();

        let mut errors = Vec::new();
        while let Some(task) = self.tasks.join_next().await {
            match task {
                Ok(Ok(())) => (),
                Ok(Err(error)) => {
                    tracing::error!("task result returned error: {:?}", error);
                    errors.push(error)
                }
                Err(error) => {
                    tracing::error!("task failed: {:?}", error);
                }
            };
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Aggregate(errors))
        }
    }

    fn reap(&mut self) {
        while let Some(task) = self.tasks.try_join_next() {
            match task {
                Ok(Ok(())) => (),
                Ok(Err(error)) => tracing::error!("task result returned error: {:?}", error),
                Err(error) => tracing::error!("task failed: {:?}", error),
            }
        }
    }
}

/// Executes a task against the api and returns the message reporting its
/// outcome.
pub async fn run_task(api: &dyn ContactApi, task: Task) -> Message {
    match task {
        Task::CreateContact => Message::Mutated(api.create().await.map(Mutation::Created)),
        Task::Debounce {
            generation,
            query,
            delay,
        } => {
            tokio::time::sleep(delay).await;
            Message::SearchSettled { generation, query }
        }
        Task::DeleteContact(id) => {
            Message::Mutated(api.delete(&id).await.map(|_| Mutation::Deleted(id)))
        }
        Task::FetchContact {
            outlet,
            id,
            generation,
        } => {
            let result = api.read(&id).await.map(Payload::Contact);
            Message::Loaded {
                outlet,
                identity: Identity::Contact(id),
                generation,
                result,
            }
        }
        Task::FetchContacts {
            outlet,
            query,
            generation,
        } => {
            let result = api.list(query.as_deref()).await.map(Payload::Contacts);
            Message::Loaded {
                outlet,
                identity: Identity::Contacts(query),
                generation,
                result,
            }
        }
        Task::SetFavorite(id, favorite) => Message::Mutated(
            api.favorite(&id, favorite)
                .await
                .map(Mutation::Favorited),
        ),
        Task::UpdateContact(id, fields) => {
            Message::Mutated(api.update(&id, &fields).await.map(Mutation::Updated))
        }
    }
}
