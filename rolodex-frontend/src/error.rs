use rolodex_navigation::NavigationError;
use rolodex_template::error::TemplateError;
use thiserror::Error;

use crate::{api::ApiError, event::Envelope};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Contact api setup failed")]
    Api(#[from] ApiError),
    #[error("Sending message envelope failed")]
    ActionSendFailed(#[from] tokio::sync::mpsc::error::SendError<Envelope>),
    #[error("Error aggregation")]
    Aggregate(Vec<AppError>),
    #[error("File operation failed")]
    FileOperationFailed(#[from] std::io::Error),
    #[error("Initial navigation state is invalid")]
    InvalidState(#[from] serde_json::Error),
    #[error("Url is invalid")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Navigation failed")]
    Navigation(#[from] NavigationError),
    #[error("Rendering template failed")]
    Template(#[from] TemplateError),
}
