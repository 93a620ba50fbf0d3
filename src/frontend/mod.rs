pub mod account;
pub mod console;
pub mod session;

pub use account::Account;
pub use console::{Command, Console, Entry, PromptKind, Response};
pub use session::Session;
