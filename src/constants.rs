//! Constants used throughout multistep

use std::time::Duration;

/// Flow definition file names in order of preference
pub const CONFIG_FILENAMES: &[&str] = &["flow.json", "flow.yaml", "flow.yml"];

/// STDIN indicator for CLI arguments
pub const STDIN_INDICATOR: &str = "-";

/// Debounce settings for transient validation messages
pub mod debounce {
    use super::Duration;

    /// Key shared by every clear request of a single prompt.
    pub const DEFAULT_KEY: &str = "validation-message";
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);
}

/// Terminal surface conventions
pub mod terminal {
    pub const BACK_LABEL: &str = "← Back";
    pub const BACK_COMMAND: &str = ":back";
    pub const CANCEL_COMMAND: &str = ":cancel";
    pub const BUTTON_COMMAND_PREFIX: &str = ":";
    pub const RESUME_QUESTION: &str = "Resume this step?";
}

/// Flow definition validation messages
pub mod validation {
    pub const INVALID_ANSWER: &str = "Invalid answer";
}

/// Exit codes
pub mod exit_codes {
    pub const FAILURE: i32 = 1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
