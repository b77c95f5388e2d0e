pub mod page;
pub mod shell;
pub mod state;
