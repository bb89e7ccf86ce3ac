use thiserror::Error;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    Missing(String),
    #[error("Template markup invalid at line {line}: {message}")]
    Syntax { line: usize, message: String },
}
