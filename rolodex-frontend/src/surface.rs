use std::io::{self, Write};

use crate::{error::AppError, model::Model, view};

/// Where the visible document ends up. Frames equal to the previous one are
/// not written again.
pub struct Surface {
    last: Option<String>,
    writer: Box<dyn Write + Send>,
}

impl Surface {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self { last: None, writer }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    pub fn present(&mut self, model: &Model) -> Result<(), AppError> {
        let frame = frame(model);
        if self.last.as_ref() == Some(&frame) {
            return Ok(());
        }

        writeln!(self.writer, "{}", frame)?;
        self.writer.flush()?;
        self.last = Some(frame);

        Ok(())
    }
}

fn frame(model: &Model) -> String {
    let mut frame = format!("location: {}\n", model.store.location());
    if let Some(alert) = &model.alert {
        frame.push_str(&format!("alert: {} (ok to dismiss)\n", alert));
    }
    frame.push_str(&view::html(model));
    frame
}
