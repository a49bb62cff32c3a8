pub mod print_command;
pub use print_command::{CommandError, CommandKind, PrintCommand};

/// Realtime database the printer polls for pending commands
pub mod firebase {
    pub const DATABASE_URL: &str = "https://printerpot-d96f8-default-rtdb.firebaseio.com";
    pub const COMMANDS_PATH: &str = "/commands.json";

    /// Upper bound on a single request to the database
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;
}
