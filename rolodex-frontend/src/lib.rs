use std::sync::Arc;

use action::Action;
use api::{ContactApi, HttpContactApi, MemoryContactApi};
use error::AppError;
use event::Emitter;
use model::Model;
use settings::Settings;
use surface::Surface;
use update::update_model;
use url::Url;
use view::render_model;

mod action;
pub mod api;
pub mod error;
mod event;
mod indicator;
mod init;
mod model;
mod outlet;
pub mod settings;
mod slot;
pub mod surface;
mod task;
#[cfg(test)]
mod testing;
mod update;
mod view;

pub async fn run(settings: Settings) -> Result<(), AppError> {
    let api: Arc<dyn ContactApi> = if settings.demo {
        Arc::new(MemoryContactApi::demo())
    } else {
        Arc::new(HttpContactApi::new(&Url::parse(&settings.api_url)?)?)
    };

    run_with(settings, api, Surface::stdout()).await
}

pub async fn run_with(
    settings: Settings,
    api: Arc<dyn ContactApi>,
    mut surface: Surface,
) -> Result<(), AppError> {
    let mut model = init::model(settings)?;
    let mut emitter = Emitter::start(api);

    tracing::debug!("starting with model state: {:?}", model);

    let mut result = Vec::new();
    let actions = update::start(&mut model);
    let mut quit = execute(&mut emitter, actions);
    if let Err(error) = present(&mut model, &mut surface) {
        result.push(error);
        quit = true;
    }

    while !quit {
        let envelope = match emitter.receiver.recv().await {
            Some(it) => it,
            None => break,
        };

        tracing::debug!("received messages: {:?}", envelope.messages);

        let actions = update_model(&mut model, envelope);
        quit = execute(&mut emitter, actions);

        if let Err(error) = present(&mut model, &mut surface) {
            tracing::error!("rendering failed: {:?}", error);
            result.push(error);
            break;
        }
    }

    if let Err(error) = emitter.shutdown().await {
        result.push(error);
    }

    if result.is_empty() {
        Ok(())
    } else if result.len() == 1 {
        Err(result.remove(0))
    } else {
        Err(AppError::Aggregate(result))
    }
}

fn execute(emitter: &mut Emitter, actions: Vec<Action>) -> bool {
    let mut quit = false;
    for action in actions {
        match action {
            Action::Quit => quit = true,
            Action::Task(task) => emitter.run(task),
        }
    }
    quit
}

fn present(model: &mut Model, surface: &mut Surface) -> Result<(), AppError> {
    render_model(model)?;
    surface.present(model)
}
