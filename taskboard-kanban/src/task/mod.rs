//! Task commands

mod add;
mod delete;
mod list;
mod mv;
mod update;

pub use add::AddTask;
pub use delete::DeleteTask;
pub use list::ListTasks;
pub use mv::MoveTask;
pub use update::UpdateTask;
