//! Board commands

mod create;
mod list;
mod share;

pub use create::CreateBoard;
pub use list::ListBoards;
pub use share::ShareBoard;
