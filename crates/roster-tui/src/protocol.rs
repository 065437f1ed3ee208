// Message types exchanged between the TUI render loop and the app
// orchestrator.
//
// The TUI never mutates store state. It sends `UserCommand`s; the
// orchestrator applies them, persists, and answers with `UiUpdate`s.

use std::path::PathBuf;

use roster_core::activity::{Activity, Outcome};
use roster_core::config::Theme;
use roster_core::ids::{GroupId, MemberId};
use roster_core::model::Group;

// ---------------------------------------------------------------------------
// TUI -> app
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    CreateGroup {
        name: String,
    },
    DeleteGroup {
        group_id: GroupId,
    },
    RenameGroup {
        group_id: GroupId,
        name: String,
    },
    AddMember {
        group_id: GroupId,
        name: String,
    },
    RemoveMember {
        group_id: GroupId,
        member_id: MemberId,
    },
    RenameMember {
        group_id: GroupId,
        member_id: MemberId,
        name: String,
    },
    ToggleExclusion {
        group_id: GroupId,
        member_id: MemberId,
    },
    RunActivity {
        group_id: GroupId,
        activity: Activity,
        number: usize,
    },
    ImportMembers {
        group_id: GroupId,
        path: PathBuf,
    },
    /// Write the most recent outcome to a CSV file in the export directory.
    ExportOutcome,
    /// Remember the theme the user switched to.
    SetTheme(Theme),
    Quit,
}

// ---------------------------------------------------------------------------
// app -> TUI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum UiUpdate {
    StateSnapshot(Box<AppSnapshot>),
    OutcomeReady(Box<OutcomeView>),
    Notice(Notice),
}

/// Read-only copy of everything the TUI renders from store state.
#[derive(Debug, Clone, Default)]
pub struct AppSnapshot {
    pub groups: Vec<Group>,
    /// False when the most recent persistence write failed.
    pub saved: bool,
}

/// An outcome together with the group it was produced from.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeView {
    pub group_id: GroupId,
    pub group_name: String,
    pub outcome: Outcome,
}

impl OutcomeView {
    pub fn activity(&self) -> Activity {
        self.outcome.activity()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One-line message shown in the status bar until replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}
