// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the orchestrator's store snapshot
// plus purely local concerns (selection, focus, prompt text). The
// orchestrator pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them to `ViewState` and re-renders on a fixed tick.

pub mod input;
pub mod layout;
pub mod theme;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;

use roster_core::activity::Activity;
use roster_core::config::{RandomizerConfig, Theme};
use roster_core::ids::{GroupId, MemberId};
use roster_core::model::{Group, Member};

use crate::protocol::{AppSnapshot, Notice, OutcomeView, UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// Focus and prompts
// ---------------------------------------------------------------------------

/// Which list the arrow keys move through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Groups,
    Members,
}

/// What a text prompt is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    NewGroup,
    RenameGroup(GroupId),
    NewMember(GroupId),
    RenameMember(GroupId, MemberId),
    ImportPath(GroupId),
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            PromptKind::NewGroup => "New group",
            PromptKind::RenameGroup(_) => "Rename group",
            PromptKind::NewMember(_) => "New member",
            PromptKind::RenameMember(_, _) => "Rename member",
            PromptKind::ImportPath(_) => "Import members from CSV",
        }
    }
}

/// Single-line text input overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub text: String,
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
pub struct ViewState {
    /// Groups as of the last snapshot.
    pub groups: Vec<Group>,
    /// Whether the last persistence write succeeded.
    pub saved: bool,
    pub focus: Focus,
    pub selected_group: usize,
    pub selected_member: usize,
    pub activity: Activity,
    /// Team count or pick count, depending on `activity`.
    pub number: usize,
    /// Latest outcome for the selected group, if any.
    pub outcome: Option<OutcomeView>,
    pub prompt: Option<Prompt>,
    pub confirm_quit: bool,
    pub theme: Theme,
    pub notice: Option<Notice>,
    /// Per-widget scroll offsets (keyed by widget name).
    pub scroll_offset: HashMap<String, usize>,
    /// Defaults applied when switching activity.
    pub defaults: RandomizerConfig,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(Theme::Dark, RandomizerConfig::default())
    }
}

impl ViewState {
    pub fn new(theme: Theme, defaults: RandomizerConfig) -> Self {
        ViewState {
            groups: Vec::new(),
            saved: true,
            focus: Focus::Groups,
            selected_group: 0,
            selected_member: 0,
            activity: Activity::Shuffle,
            number: defaults.default_team_count,
            outcome: None,
            prompt: None,
            confirm_quit: false,
            theme,
            notice: None,
            scroll_offset: HashMap::new(),
            defaults,
        }
    }

    pub fn current_group(&self) -> Option<&Group> {
        self.groups.get(self.selected_group)
    }

    pub fn current_member(&self) -> Option<&Member> {
        self.current_group()
            .and_then(|g| g.members.get(self.selected_member))
    }

    /// Apply a store snapshot, keeping selection indices in range and dropping
    /// an outcome whose group no longer exists.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        self.groups = snapshot.groups;
        self.saved = snapshot.saved;

        if self.selected_group >= self.groups.len() {
            self.selected_group = self.groups.len().saturating_sub(1);
        }
        let member_count = self.current_group().map_or(0, |g| g.members.len());
        if self.selected_member >= member_count {
            self.selected_member = member_count.saturating_sub(1);
        }
        if let Some(outcome) = &self.outcome {
            if !self.groups.iter().any(|g| g.id == outcome.group_id) {
                self.outcome = None;
            }
        }
        self.number = self.clamped_number(self.number);
    }

    /// Switch activity, resetting the numeric argument to its default.
    pub fn set_activity(&mut self, activity: Activity) {
        if self.activity != activity {
            self.activity = activity;
            self.outcome = None;
        }
        let default = match activity {
            Activity::Shuffle => self.defaults.default_team_count,
            Activity::Random => self.defaults.default_pick_count,
            Activity::Sort | Activity::Pairs => activity.default_number(),
        };
        self.number = self.clamped_number(default);
    }

    /// Move the numeric argument by `delta`, staying within the activity's
    /// bounds for the selected group.
    pub fn adjust_number(&mut self, delta: isize) {
        let next = self.number.saturating_add_signed(delta);
        self.number = self.clamped_number(next);
    }

    fn clamped_number(&self, number: usize) -> usize {
        let members = self.current_group().map_or(0, |g| g.members.len());
        self.activity.clamp_number(number, members)
    }

    /// Change the selected group; the outcome and member cursor belong to the
    /// previous group so they are reset.
    pub fn select_group(&mut self, index: usize) {
        if index != self.selected_group {
            self.selected_group = index;
            self.selected_member = 0;
            self.outcome = None;
            self.scroll_offset.remove("outcome");
        }
        self.number = self.clamped_number(self.number);
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::StateSnapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::OutcomeReady(view) => {
            state.outcome = Some(*view);
            state.scroll_offset.remove("outcome");
        }
        UiUpdate::Notice(notice) => {
            state.notice = Some(notice);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());
    let palette = theme::Palette::for_theme(state.theme);

    widgets::status_bar::render(frame, layout.status_bar, state, &palette);
    widgets::groups::render(frame, layout.groups, state, &palette);
    widgets::members::render(frame, layout.members, state, &palette);
    widgets::activity::render(frame, layout.activity, state, &palette);
    widgets::outcome::render(frame, layout.outcome, state, &palette);
    widgets::help_bar::render(frame, layout.help_bar, state, &palette);

    if let Some(prompt) = &state.prompt {
        widgets::prompt::render(frame, frame.area(), prompt, &palette);
    }
    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    mut view_state: ViewState,
    tick: Duration,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(tick);
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Orchestrator gone: nothing left to drive the UI.
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            if cmd_tx.send(cmd).await.is_err() || quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        break Err(anyhow::Error::from(e).context("terminal input error"))
                    }
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::from(e).context("failed to draw frame"));
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
