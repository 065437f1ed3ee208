// TUI widget modules for each dashboard panel.

pub mod activity;
pub mod groups;
pub mod help_bar;
pub mod members;
pub mod outcome;
pub mod prompt;
pub mod quit_confirm;
pub mod status_bar;
