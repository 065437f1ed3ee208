// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (selection, focus,
// activity choice, prompt editing).

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use roster_core::activity::Activity;

use super::{Focus, Prompt, PromptKind, ViewState};
use crate::protocol::{Notice, UserCommand};

/// Lines moved by PageUp/PageDown in the outcome panel.
const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator. Returns `None` when the key press was handled locally by
/// mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows reports both Press and Release; only act on Press.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.prompt.is_some() {
        return handle_prompt(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            move_selection(view_state, -1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_selection(view_state, 1);
            None
        }
        KeyCode::Tab | KeyCode::BackTab => {
            view_state.focus = match view_state.focus {
                Focus::Groups => Focus::Members,
                Focus::Members => Focus::Groups,
            };
            None
        }

        KeyCode::Char('a') => {
            start_add(view_state);
            None
        }
        KeyCode::Char('e') => {
            start_rename(view_state);
            None
        }
        KeyCode::Char('d') | KeyCode::Delete => delete_selected(view_state),
        KeyCode::Char('x') => {
            let group = view_state.current_group()?;
            let member = view_state.current_member()?;
            Some(UserCommand::ToggleExclusion {
                group_id: group.id,
                member_id: member.id,
            })
        }

        KeyCode::Char('s') => {
            view_state.set_activity(Activity::Shuffle);
            None
        }
        KeyCode::Char('o') => {
            view_state.set_activity(Activity::Sort);
            None
        }
        KeyCode::Char('p') => {
            view_state.set_activity(Activity::Pairs);
            None
        }
        KeyCode::Char('r') => {
            view_state.set_activity(Activity::Random);
            None
        }
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => {
            view_state.adjust_number(1);
            None
        }
        KeyCode::Char('-') | KeyCode::Left => {
            view_state.adjust_number(-1);
            None
        }
        KeyCode::Enter => run_activity(view_state),

        KeyCode::Char('i') => {
            if let Some(group) = view_state.current_group() {
                view_state.prompt = Some(Prompt {
                    kind: PromptKind::ImportPath(group.id),
                    text: String::new(),
                });
            } else {
                view_state.notice = Some(Notice::error("Create a group before importing"));
            }
            None
        }
        KeyCode::Char('w') => {
            if view_state.outcome.is_some() {
                Some(UserCommand::ExportOutcome)
            } else {
                view_state.notice = Some(Notice::error("Run an activity before exporting"));
                None
            }
        }

        KeyCode::PageUp => {
            scroll_outcome(view_state, -(PAGE_SIZE as isize));
            None
        }
        KeyCode::PageDown => {
            scroll_outcome(view_state, PAGE_SIZE as isize);
            None
        }

        KeyCode::Char('t') => {
            view_state.theme = view_state.theme.toggled();
            Some(UserCommand::SetTheme(view_state.theme))
        }
        KeyCode::Esc => {
            view_state.notice = None;
            None
        }
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// While confirming quit: `y`/`q` quit, `n`/`Esc` cancel, everything else is
/// swallowed.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// While a prompt is open: printable characters edit the text, `Esc` cancels,
/// `Enter` submits the trimmed text. Empty input keeps the prompt open.
fn handle_prompt(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let prompt = view_state.prompt.as_mut()?;
    match key_event.code {
        KeyCode::Esc => {
            view_state.prompt = None;
            None
        }
        KeyCode::Backspace => {
            prompt.text.pop();
            None
        }
        KeyCode::Char(c) => {
            prompt.text.push(c);
            None
        }
        KeyCode::Enter => {
            let text = prompt.text.trim().to_string();
            let kind = prompt.kind;
            if text.is_empty() {
                let message = match kind {
                    PromptKind::ImportPath(_) => "Path cannot be empty",
                    _ => "Name cannot be empty",
                };
                view_state.notice = Some(Notice::error(message));
                return None;
            }
            view_state.prompt = None;
            Some(submit_prompt(kind, text, view_state))
        }
        _ => None,
    }
}

fn submit_prompt(kind: PromptKind, text: String, view_state: &mut ViewState) -> UserCommand {
    match kind {
        PromptKind::NewGroup => {
            // Point past the end; the next snapshot clamps onto the new group.
            view_state.selected_group = view_state.groups.len();
            view_state.selected_member = 0;
            view_state.outcome = None;
            UserCommand::CreateGroup { name: text }
        }
        PromptKind::RenameGroup(group_id) => UserCommand::RenameGroup {
            group_id,
            name: text,
        },
        PromptKind::NewMember(group_id) => {
            view_state.selected_member = view_state
                .current_group()
                .map_or(0, |g| g.members.len());
            UserCommand::AddMember {
                group_id,
                name: text,
            }
        }
        PromptKind::RenameMember(group_id, member_id) => UserCommand::RenameMember {
            group_id,
            member_id,
            name: text,
        },
        PromptKind::ImportPath(group_id) => UserCommand::ImportMembers {
            group_id,
            path: PathBuf::from(text),
        },
    }
}

fn move_selection(view_state: &mut ViewState, delta: isize) {
    match view_state.focus {
        Focus::Groups => {
            let len = view_state.groups.len();
            if len == 0 {
                return;
            }
            let next = step(view_state.selected_group, delta, len);
            view_state.select_group(next);
        }
        Focus::Members => {
            let len = view_state.current_group().map_or(0, |g| g.members.len());
            if len == 0 {
                return;
            }
            view_state.selected_member = step(view_state.selected_member, delta, len);
        }
    }
}

/// Move `index` by `delta`, staying within `0..len`.
fn step(index: usize, delta: isize, len: usize) -> usize {
    index.saturating_add_signed(delta).min(len.saturating_sub(1))
}

fn start_add(view_state: &mut ViewState) {
    let kind = match view_state.focus {
        Focus::Groups => PromptKind::NewGroup,
        Focus::Members => match view_state.current_group() {
            Some(group) => PromptKind::NewMember(group.id),
            None => {
                view_state.notice = Some(Notice::error("Create a group first"));
                return;
            }
        },
    };
    view_state.prompt = Some(Prompt {
        kind,
        text: String::new(),
    });
}

fn start_rename(view_state: &mut ViewState) {
    let prompt = match view_state.focus {
        Focus::Groups => view_state.current_group().map(|group| Prompt {
            kind: PromptKind::RenameGroup(group.id),
            text: group.name.clone(),
        }),
        Focus::Members => view_state
            .current_group()
            .zip(view_state.current_member())
            .map(|(group, member)| Prompt {
                kind: PromptKind::RenameMember(group.id, member.id),
                text: member.name.clone(),
            }),
    };
    if prompt.is_some() {
        view_state.prompt = prompt;
    }
}

fn delete_selected(view_state: &mut ViewState) -> Option<UserCommand> {
    let group = view_state.current_group()?;
    match view_state.focus {
        Focus::Groups => Some(UserCommand::DeleteGroup { group_id: group.id }),
        Focus::Members => {
            let member = view_state.current_member()?;
            Some(UserCommand::RemoveMember {
                group_id: group.id,
                member_id: member.id,
            })
        }
    }
}

fn run_activity(view_state: &mut ViewState) -> Option<UserCommand> {
    let Some(group) = view_state.current_group() else {
        view_state.notice = Some(Notice::error("Select a group first"));
        return None;
    };
    Some(UserCommand::RunActivity {
        group_id: group.id,
        activity: view_state.activity,
        number: view_state.number,
    })
}

fn scroll_outcome(view_state: &mut ViewState, delta: isize) {
    let offset = view_state
        .scroll_offset
        .entry("outcome".to_string())
        .or_insert(0);
    *offset = offset.saturating_add_signed(delta);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{AppSnapshot, NoticeLevel};
    use crossterm::event::{KeyEventState, KeyModifiers};
    use roster_core::config::Theme;
    use roster_core::store::RosterStore;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_text(state: &mut ViewState, text: &str) {
        for c in text.chars() {
            assert!(handle_key(key(KeyCode::Char(c)), state).is_none());
        }
    }

    /// ViewState holding two groups: "Crew" with three members, "Empty".
    fn loaded_state() -> ViewState {
        let mut store = RosterStore::new();
        let crew = store.create_group("Crew");
        store.add_members(crew, ["Ada", "Grace", "Linus"]);
        store.create_group("Empty");
        let mut state = ViewState::default();
        state.apply_snapshot(AppSnapshot {
            groups: store.groups().to_vec(),
            saved: true,
        });
        state
    }

    // -- Quit --

    #[test]
    fn q_enters_confirm_quit() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert!(state.confirm_quit);
    }

    #[test]
    fn confirm_quit_y_quits_and_n_cancels() {
        let mut state = ViewState::default();
        state.confirm_quit = true;
        assert!(handle_key(key(KeyCode::Char('a')), &mut state).is_none());
        assert!(state.prompt.is_none());
        assert!(handle_key(key(KeyCode::Char('n')), &mut state).is_none());
        assert!(!state.confirm_quit);

        state.confirm_quit = true;
        assert_eq!(
            handle_key(key(KeyCode::Char('y')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let mut state = ViewState::default();
        state.prompt = Some(Prompt {
            kind: PromptKind::NewGroup,
            text: String::new(),
        });
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn release_events_are_ignored() {
        let mut state = ViewState::default();
        let mut event = key(KeyCode::Char('q'));
        event.kind = KeyEventKind::Release;
        assert!(handle_key(event, &mut state).is_none());
        assert!(!state.confirm_quit);
    }

    // -- Prompts --

    #[test]
    fn add_group_prompt_submits_trimmed_name() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('a')), &mut state);
        assert_eq!(state.prompt.as_ref().unwrap().kind, PromptKind::NewGroup);
        type_text(&mut state, "  Design  ");
        let cmd = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(
            cmd,
            Some(UserCommand::CreateGroup {
                name: "Design".into()
            })
        );
        assert!(state.prompt.is_none());
    }

    #[test]
    fn empty_name_is_rejected_and_prompt_stays_open() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('a')), &mut state);
        type_text(&mut state, "   ");
        assert!(handle_key(key(KeyCode::Enter), &mut state).is_none());
        assert!(state.prompt.is_some());
        let notice = state.notice.as_ref().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.text, "Name cannot be empty");
    }

    #[test]
    fn prompt_keys_do_not_trigger_shortcuts() {
        let mut state = loaded_state();
        handle_key(key(KeyCode::Char('a')), &mut state);
        type_text(&mut state, "qdx");
        assert!(!state.confirm_quit);
        assert_eq!(state.prompt.as_ref().unwrap().text, "qdx");
        handle_key(key(KeyCode::Backspace), &mut state);
        assert_eq!(state.prompt.as_ref().unwrap().text, "qd");
        handle_key(key(KeyCode::Esc), &mut state);
        assert!(state.prompt.is_none());
    }

    #[test]
    fn add_member_targets_selected_group() {
        let mut state = loaded_state();
        let crew = state.groups[0].id;
        handle_key(key(KeyCode::Tab), &mut state);
        assert_eq!(state.focus, Focus::Members);
        handle_key(key(KeyCode::Char('a')), &mut state);
        type_text(&mut state, "Ken");
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::AddMember {
                group_id: crew,
                name: "Ken".into()
            })
        );
    }

    #[test]
    fn add_member_without_group_is_refused() {
        let mut state = ViewState::default();
        state.focus = Focus::Members;
        handle_key(key(KeyCode::Char('a')), &mut state);
        assert!(state.prompt.is_none());
        assert!(state.notice.is_some());
    }

    #[test]
    fn rename_prefills_current_name() {
        let mut state = loaded_state();
        let crew = state.groups[0].id;
        handle_key(key(KeyCode::Char('e')), &mut state);
        let prompt = state.prompt.as_ref().unwrap();
        assert_eq!(prompt.kind, PromptKind::RenameGroup(crew));
        assert_eq!(prompt.text, "Crew");

        handle_key(key(KeyCode::Esc), &mut state);
        state.focus = Focus::Members;
        state.selected_member = 1;
        handle_key(key(KeyCode::Char('e')), &mut state);
        let grace = state.groups[0].members[1].id;
        let prompt = state.prompt.as_ref().unwrap();
        assert_eq!(prompt.kind, PromptKind::RenameMember(crew, grace));
        assert_eq!(prompt.text, "Grace");
    }

    #[test]
    fn import_prompt_yields_path() {
        let mut state = loaded_state();
        let crew = state.groups[0].id;
        handle_key(key(KeyCode::Char('i')), &mut state);
        type_text(&mut state, "people.csv");
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::ImportMembers {
                group_id: crew,
                path: PathBuf::from("people.csv")
            })
        );
    }

    // -- Selection and mutation --

    #[test]
    fn arrows_move_group_selection_within_bounds() {
        let mut state = loaded_state();
        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.selected_group, 0);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.selected_group, 1);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.selected_group, 1);
    }

    #[test]
    fn arrows_move_member_selection_when_focused() {
        let mut state = loaded_state();
        state.focus = Focus::Members;
        handle_key(key(KeyCode::Char('j')), &mut state);
        handle_key(key(KeyCode::Char('j')), &mut state);
        handle_key(key(KeyCode::Char('j')), &mut state);
        assert_eq!(state.selected_member, 2);
        assert_eq!(state.selected_group, 0);
    }

    #[test]
    fn delete_depends_on_focus() {
        let mut state = loaded_state();
        let crew = state.groups[0].id;
        assert_eq!(
            handle_key(key(KeyCode::Char('d')), &mut state),
            Some(UserCommand::DeleteGroup { group_id: crew })
        );
        state.focus = Focus::Members;
        let ada = state.groups[0].members[0].id;
        assert_eq!(
            handle_key(key(KeyCode::Char('d')), &mut state),
            Some(UserCommand::RemoveMember {
                group_id: crew,
                member_id: ada
            })
        );
    }

    #[test]
    fn x_toggles_selected_member() {
        let mut state = loaded_state();
        let crew = state.groups[0].id;
        let ada = state.groups[0].members[0].id;
        assert_eq!(
            handle_key(key(KeyCode::Char('x')), &mut state),
            Some(UserCommand::ToggleExclusion {
                group_id: crew,
                member_id: ada
            })
        );
    }

    #[test]
    fn x_on_empty_group_does_nothing() {
        let mut state = loaded_state();
        state.select_group(1);
        assert!(handle_key(key(KeyCode::Char('x')), &mut state).is_none());
    }

    // -- Activities --

    #[test]
    fn activity_keys_switch_activity() {
        let mut state = loaded_state();
        for (c, activity) in [
            ('o', Activity::Sort),
            ('p', Activity::Pairs),
            ('r', Activity::Random),
            ('s', Activity::Shuffle),
        ] {
            handle_key(key(KeyCode::Char(c)), &mut state);
            assert_eq!(state.activity, activity);
        }
    }

    #[test]
    fn enter_runs_activity_with_current_number() {
        let mut state = loaded_state();
        let crew = state.groups[0].id;
        handle_key(key(KeyCode::Char('r')), &mut state);
        handle_key(key(KeyCode::Char('+')), &mut state);
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::RunActivity {
                group_id: crew,
                activity: Activity::Random,
                number: 2
            })
        );
    }

    #[test]
    fn enter_without_group_sets_notice() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Enter), &mut state).is_none());
        assert!(state.notice.is_some());
    }

    #[test]
    fn export_requires_outcome() {
        let mut state = loaded_state();
        assert!(handle_key(key(KeyCode::Char('w')), &mut state).is_none());
        assert!(state.notice.is_some());
    }

    #[test]
    fn t_toggles_theme() {
        let mut state = ViewState::default();
        let cmd = handle_key(key(KeyCode::Char('t')), &mut state);
        assert_eq!(state.theme, Theme::Light);
        assert_eq!(cmd, Some(UserCommand::SetTheme(Theme::Light)));
        let cmd = handle_key(key(KeyCode::Char('t')), &mut state);
        assert_eq!(state.theme, Theme::Dark);
        assert_eq!(cmd, Some(UserCommand::SetTheme(Theme::Dark)));
    }

    #[test]
    fn page_keys_scroll_outcome() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::PageDown), &mut state);
        assert_eq!(state.scroll_offset.get("outcome"), Some(&PAGE_SIZE));
        handle_key(key(KeyCode::PageUp), &mut state);
        handle_key(key(KeyCode::PageUp), &mut state);
        assert_eq!(state.scroll_offset.get("outcome"), Some(&0));
    }

    #[test]
    fn step_clamps() {
        assert_eq!(step(0, -1, 3), 0);
        assert_eq!(step(2, 1, 3), 2);
        assert_eq!(step(1, 1, 3), 2);
    }
}
