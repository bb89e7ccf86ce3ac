use crate::task::Task;

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Quit,
    Task(Task),
}
