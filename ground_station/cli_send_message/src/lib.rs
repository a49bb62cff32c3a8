pub mod args;
pub mod sender;
pub mod session;

#[cfg(test)]
mod mock_firebase;

pub use args::Args;
pub use sender::{commands_url, CommandSender, SendError, SendReceipt};
