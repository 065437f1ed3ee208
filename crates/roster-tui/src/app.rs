// Application state and orchestration logic.
//
// The orchestrator is the only owner of the entity store. It applies one
// `UserCommand` at a time to completion, mirrors every state change into
// storage, and pushes snapshots and outcomes back to the TUI.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use roster_core::config::{Config, Theme};
use roster_core::csv_io;
use roster_core::ids::GroupId;
use roster_core::persist::StateStorage;
use roster_core::store::RosterStore;

use crate::protocol::{AppSnapshot, Notice, OutcomeView, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub store: RosterStore,
    pub storage: Box<dyn StateStorage>,
    /// Most recent outcome, kept for CSV export.
    pub last_outcome: Option<OutcomeView>,
    /// Whether the most recent write to storage succeeded.
    pub saved: bool,
    /// Theme in effect; the configured one until a saved choice is loaded.
    pub theme: Theme,
}

impl AppState {
    /// Create an AppState with an empty store. Call `load_from_storage`
    /// before handing it to `run`.
    pub fn new(config: Config, storage: Box<dyn StateStorage>) -> Self {
        let theme = config.ui.theme;
        AppState {
            config,
            store: RosterStore::new(),
            storage,
            last_outcome: None,
            saved: true,
            theme,
        }
    }

    fn namespace(&self) -> &str {
        &self.config.storage.namespace
    }

    /// Replace the store (and theme) with whatever was persisted under the
    /// configured namespace. Returns `true` if a saved state was found.
    pub fn load_from_storage(&mut self) -> anyhow::Result<bool> {
        let theme = self
            .storage
            .read_theme(self.namespace())
            .with_context(|| format!("failed to read saved theme from {}", self.namespace()))?;
        if let Some(theme) = theme {
            debug!("Restored theme {:?}", theme);
            self.theme = theme;
        }

        let loaded = self
            .storage
            .read(self.namespace())
            .with_context(|| format!("failed to read saved state from {}", self.namespace()))?;
        match loaded {
            Some(state) => {
                info!(
                    "Restored {} groups ({} members) from storage",
                    state.groups.len(),
                    state.member_count()
                );
                self.store = RosterStore::from_state(state);
                Ok(true)
            }
            None => {
                info!("No saved state under {}, starting empty", self.namespace());
                Ok(false)
            }
        }
    }

    /// Mirror the current store state into storage. Failures are logged and
    /// reported through `saved`; in-memory state is left as is.
    fn persist(&mut self) {
        match self.storage.write(&self.config.storage.namespace, self.store.state()) {
            Ok(()) => {
                self.saved = true;
            }
            Err(e) => {
                error!("Failed to save roster state: {}", e);
                self.saved = false;
            }
        }
    }

    /// Remember a theme change. Returns false if the write failed.
    fn save_theme(&mut self, theme: Theme) -> bool {
        self.theme = theme;
        match self.storage.write_theme(&self.config.storage.namespace, theme) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to save theme: {}", e);
                false
            }
        }
    }

    pub fn build_snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            groups: self.store.groups().to_vec(),
            saved: self.saved,
        }
    }

    /// Apply one command and return the updates the TUI should receive.
    ///
    /// A snapshot is only emitted (and storage only written) when the store
    /// actually changed.
    pub fn handle_command(&mut self, cmd: UserCommand) -> Vec<UiUpdate> {
        let mut updates = Vec::new();

        let changed = match cmd {
            UserCommand::CreateGroup { name } => {
                self.store.create_group(name);
                true
            }
            UserCommand::DeleteGroup { group_id } => {
                let removed = self.store.delete_group(group_id);
                if removed
                    && self
                        .last_outcome
                        .as_ref()
                        .is_some_and(|o| o.group_id == group_id)
                {
                    self.last_outcome = None;
                }
                removed
            }
            UserCommand::RenameGroup { group_id, name } => {
                self.store.rename_group(group_id, name)
            }
            UserCommand::AddMember { group_id, name } => {
                self.store.add_member(group_id, name).is_some()
            }
            UserCommand::RemoveMember {
                group_id,
                member_id,
            } => self.store.remove_member(group_id, member_id),
            UserCommand::RenameMember {
                group_id,
                member_id,
                name,
            } => self.store.rename_member(group_id, member_id, name),
            UserCommand::ToggleExclusion {
                group_id,
                member_id,
            } => self.store.toggle_exclusion(group_id, member_id),
            UserCommand::RunActivity {
                group_id,
                activity,
                number,
            } => {
                match self.store.group(group_id) {
                    Some(group) => {
                        let outcome = activity.run(&group.members, number);
                        info!(
                            "{} on {}: {} placements",
                            activity.label(),
                            group.name,
                            outcome.member_count()
                        );
                        let view = OutcomeView {
                            group_id,
                            group_name: group.name.clone(),
                            outcome,
                        };
                        self.last_outcome = Some(view.clone());
                        updates.push(UiUpdate::OutcomeReady(Box::new(view)));
                    }
                    None => debug!("RunActivity: group {} not found, ignoring", group_id),
                }
                false
            }
            UserCommand::ImportMembers { group_id, path } => {
                match self.import_members(group_id, &path) {
                    Ok(count) => {
                        updates.push(UiUpdate::Notice(Notice::info(format!(
                            "Imported {} members from {}",
                            count,
                            path.display()
                        ))));
                        count > 0
                    }
                    Err(e) => {
                        warn!("Import from {} failed: {:#}", path.display(), e);
                        updates.push(UiUpdate::Notice(Notice::error(format!(
                            "Import failed: {e:#}"
                        ))));
                        false
                    }
                }
            }
            UserCommand::ExportOutcome => {
                match self.export_last_outcome() {
                    Ok(Some(path)) => updates.push(UiUpdate::Notice(Notice::info(format!(
                        "Exported to {}",
                        path.display()
                    )))),
                    Ok(None) => updates.push(UiUpdate::Notice(Notice::error(
                        "Nothing to export yet",
                    ))),
                    Err(e) => {
                        warn!("Export failed: {:#}", e);
                        updates.push(UiUpdate::Notice(Notice::error(format!(
                            "Export failed: {e:#}"
                        ))));
                    }
                }
                false
            }
            UserCommand::SetTheme(theme) => {
                if theme != self.theme && !self.save_theme(theme) {
                    updates.push(UiUpdate::Notice(Notice::error(
                        "Could not save the theme; it will reset on exit",
                    )));
                }
                false
            }
            UserCommand::Quit => false,
        };

        if changed {
            self.persist();
            updates.push(UiUpdate::StateSnapshot(Box::new(self.build_snapshot())));
            if !self.saved {
                updates.push(UiUpdate::Notice(Notice::error(
                    "Could not save changes; they will be lost on exit",
                )));
            }
        }

        updates
    }

    fn import_members(
        &mut self,
        group_id: GroupId,
        path: &Path,
    ) -> anyhow::Result<usize> {
        if self.store.group(group_id).is_none() {
            anyhow::bail!("group no longer exists");
        }
        let names = csv_io::import_member_names(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(self.store.add_members(group_id, names).len())
    }

    fn export_last_outcome(&self) -> anyhow::Result<Option<PathBuf>> {
        let Some(view) = &self.last_outcome else {
            return Ok(None);
        };
        let file_name =
            csv_io::export_file_name(&view.group_name, &view.outcome, chrono::Utc::now());
        let path = PathBuf::from(&self.config.export.dir).join(file_name);
        csv_io::export_outcome(&path, &view.group_name, &view.outcome)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(Some(path))
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the orchestrator loop until the TUI quits or drops its sender.
///
/// Sends an initial snapshot so the TUI has something to draw.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let _ = ui_tx
        .send(UiUpdate::StateSnapshot(Box::new(state.build_snapshot())))
        .await;

    while let Some(cmd) = cmd_rx.recv().await {
        if cmd == UserCommand::Quit {
            info!("Quit command received, shutting down");
            break;
        }
        debug!("Handling command: {:?}", cmd);
        for update in state.handle_command(cmd) {
            if ui_tx.send(update).await.is_err() {
                info!("UI channel closed, shutting down");
                return Ok(());
            }
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
