/// Runtime configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Capacity of each game session's command channel.
    pub command_buffer: usize,
    /// Print the board after every accepted move or undo.
    pub show_board: bool,
    /// Print the game record as JSON when the console exits.
    pub print_record: bool,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        let defaults = AppConfig::default();
        AppConfig {
            command_buffer: std::env::var("CHESS_COMMAND_BUFFER")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.command_buffer),
            show_board: std::env::var("CHESS_SHOW_BOARD")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.show_board),
            print_record: std::env::var("CHESS_PRINT_RECORD")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.print_record),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            command_buffer: 32,
            show_board: true,
            print_record: true,
        }
    }
}

/// Accepts the usual spellings of a boolean switch.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
