mod file_io;
mod html;
mod html_store;
mod interface;

pub use interface::{LedgerStore, Result, BackendError};
pub use html_store::HtmlStore;
