// Entity store: the single owner of group and member state.
//
// Every mutation is total. Unknown group or member ids are silent no-ops so
// callers holding a stale snapshot never need error handling. Mutations
// report whether anything changed, which lets the caller skip redundant
// persistence writes.

use tracing::{debug, info};

use crate::ids::{GroupId, MemberId};
use crate::model::{Group, Member, StoreState};

/// Owned container for the canonical list of groups.
#[derive(Debug, Clone, Default)]
pub struct RosterStore {
    state: StoreState,
}

impl RosterStore {
    /// An empty store with no groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a previously persisted snapshot.
    pub fn from_state(state: StoreState) -> Self {
        RosterStore { state }
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn into_state(self) -> StoreState {
        self.state
    }

    pub fn groups(&self) -> &[Group] {
        &self.state.groups
    }

    pub fn group(&self, group_id: GroupId) -> Option<&Group> {
        self.state.group(group_id)
    }

    // ------------------------------------------------------------------
    // Group operations
    // ------------------------------------------------------------------

    /// Append a new empty group and return its freshly generated id.
    pub fn create_group(&mut self, name: impl Into<String>) -> GroupId {
        let group = Group::new(name);
        let id = group.id;
        info!("Created group {} ({})", group.name, id);
        self.state.groups.push(group);
        id
    }

    /// Remove a group and, with it, all of its members.
    pub fn delete_group(&mut self, group_id: GroupId) -> bool {
        let before = self.state.groups.len();
        self.state.groups.retain(|g| g.id != group_id);
        let removed = self.state.groups.len() != before;
        if removed {
            info!("Deleted group {}", group_id);
        } else {
            debug!("delete_group: {} not found, ignoring", group_id);
        }
        removed
    }

    pub fn rename_group(&mut self, group_id: GroupId, new_name: impl Into<String>) -> bool {
        match self.state.group_mut(group_id) {
            Some(group) => {
                group.name = new_name.into();
                debug!("Renamed group {} to {}", group_id, group.name);
                true
            }
            None => {
                debug!("rename_group: {} not found, ignoring", group_id);
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Member operations
    // ------------------------------------------------------------------

    /// Append a new included member to a group.
    ///
    /// Returns `None` (and leaves state untouched) when the group is unknown.
    pub fn add_member(&mut self, group_id: GroupId, name: impl Into<String>) -> Option<MemberId> {
        let Some(group) = self.state.group_mut(group_id) else {
            debug!("add_member: group {} not found, ignoring", group_id);
            return None;
        };
        let member = Member::new(name);
        let id = member.id;
        info!("Added member {} to group {}", member.name, group.name);
        group.members.push(member);
        Some(id)
    }

    /// Append several members at once, in the given order.
    ///
    /// Returns the new ids; empty when the group is unknown.
    pub fn add_members<I, S>(&mut self, group_id: GroupId, names: I) -> Vec<MemberId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(group) = self.state.group_mut(group_id) else {
            debug!("add_members: group {} not found, ignoring", group_id);
            return Vec::new();
        };
        let ids: Vec<MemberId> = names
            .into_iter()
            .map(|name| {
                let member = Member::new(name);
                let id = member.id;
                group.members.push(member);
                id
            })
            .collect();
        info!("Added {} members to group {}", ids.len(), group.name);
        ids
    }

    pub fn remove_member(&mut self, group_id: GroupId, member_id: MemberId) -> bool {
        let Some(group) = self.state.group_mut(group_id) else {
            return false;
        };
        let before = group.members.len();
        group.members.retain(|m| m.id != member_id);
        let removed = group.members.len() != before;
        if removed {
            info!("Removed member {} from group {}", member_id, group.name);
        }
        removed
    }

    pub fn rename_member(
        &mut self,
        group_id: GroupId,
        member_id: MemberId,
        new_name: impl Into<String>,
    ) -> bool {
        match self.member_mut(group_id, member_id) {
            Some(member) => {
                member.name = new_name.into();
                debug!("Renamed member {} to {}", member_id, member.name);
                true
            }
            None => false,
        }
    }

    /// Flip a member's exclusion flag.
    pub fn toggle_exclusion(&mut self, group_id: GroupId, member_id: MemberId) -> bool {
        match self.member_mut(group_id, member_id) {
            Some(member) => {
                member.excluded = !member.excluded;
                debug!(
                    "Member {} is now {}",
                    member.name,
                    if member.excluded { "excluded" } else { "included" }
                );
                true
            }
            None => false,
        }
    }

    fn member_mut(&mut self, group_id: GroupId, member_id: MemberId) -> Option<&mut Member> {
        self.state
            .group_mut(group_id)
            .and_then(|g| g.member_mut(member_id))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_group(names: &[&str]) -> (RosterStore, GroupId, Vec<MemberId>) {
        let mut store = RosterStore::new();
        let gid = store.create_group("Crew");
        let ids = names
            .iter()
            .map(|n| store.add_member(gid, *n).unwrap())
            .collect();
        (store, gid, ids)
    }

    #[test]
    fn create_group_appends_empty_group() {
        let mut store = RosterStore::new();
        let a = store.create_group("Alpha");
        let b = store.create_group("Beta");
        assert_ne!(a, b);
        assert_eq!(store.groups().len(), 2);
        assert_eq!(store.groups()[0].name, "Alpha");
        assert_eq!(store.groups()[1].name, "Beta");
        assert!(store.groups()[0].members.is_empty());
    }

    #[test]
    fn delete_group_cascades_members() {
        let (mut store, gid, _) = store_with_group(&["A", "B"]);
        assert!(store.delete_group(gid));
        assert!(store.groups().is_empty());
        assert_eq!(store.state().member_count(), 0);
    }

    #[test]
    fn delete_group_twice_is_idempotent() {
        let (mut store, gid, _) = store_with_group(&["A"]);
        let other = store.create_group("Other");
        store.delete_group(gid);
        let once = store.state().clone();
        assert!(!store.delete_group(gid));
        assert_eq!(store.state(), &once);
        assert_eq!(store.groups()[0].id, other);
    }

    #[test]
    fn add_member_defaults() {
        let (store, gid, ids) = store_with_group(&["Ada"]);
        let member = store.group(gid).unwrap().member(ids[0]).unwrap();
        assert_eq!(member.name, "Ada");
        assert!(!member.excluded);
        assert!(!member.avatar_seed.is_empty());
    }

    #[test]
    fn add_member_to_unknown_group_is_noop() {
        let (mut store, _, _) = store_with_group(&["A"]);
        let before = store.state().clone();
        assert!(store.add_member(GroupId::new(), "Ghost").is_none());
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn add_members_keeps_order() {
        let (mut store, gid, _) = store_with_group(&[]);
        let ids = store.add_members(gid, ["X", "Y", "Z"]);
        assert_eq!(ids.len(), 3);
        let names: Vec<_> = store
            .group(gid)
            .unwrap()
            .members
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["X", "Y", "Z"]);
        assert!(store.add_members(GroupId::new(), ["Q"]).is_empty());
    }

    #[test]
    fn member_ids_are_unique_within_group() {
        let (store, gid, _) = store_with_group(&["A", "A", "A"]);
        let group = store.group(gid).unwrap();
        let mut ids: Vec<_> = group.members.iter().map(|m| m.id).collect();
        ids.sort_by_key(|id| *id.as_uuid());
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn remove_member_twice_is_idempotent() {
        let (mut store, gid, ids) = store_with_group(&["A", "B"]);
        assert!(store.remove_member(gid, ids[0]));
        let once = store.state().clone();
        assert!(!store.remove_member(gid, ids[0]));
        assert_eq!(store.state(), &once);
        assert_eq!(store.group(gid).unwrap().members.len(), 1);
    }

    #[test]
    fn remove_member_from_unknown_group_is_noop() {
        let (mut store, _, ids) = store_with_group(&["A"]);
        assert!(!store.remove_member(GroupId::new(), ids[0]));
        assert_eq!(store.state().member_count(), 1);
    }

    #[test]
    fn rename_member_replaces_name_only() {
        let (mut store, gid, ids) = store_with_group(&["A"]);
        let seed = store.group(gid).unwrap().members[0].avatar_seed.clone();
        assert!(store.rename_member(gid, ids[0], "Alice"));
        let member = &store.group(gid).unwrap().members[0];
        assert_eq!(member.name, "Alice");
        assert_eq!(member.avatar_seed, seed);
        assert!(!store.rename_member(gid, MemberId::new(), "Nobody"));
    }

    #[test]
    fn rename_group_soft_on_missing() {
        let (mut store, gid, _) = store_with_group(&[]);
        assert!(store.rename_group(gid, "Renamed"));
        assert_eq!(store.group(gid).unwrap().name, "Renamed");
        assert!(!store.rename_group(GroupId::new(), "Nope"));
    }

    #[test]
    fn toggle_exclusion_flips_back_and_forth() {
        let (mut store, gid, ids) = store_with_group(&["A"]);
        assert!(store.toggle_exclusion(gid, ids[0]));
        assert!(store.group(gid).unwrap().members[0].excluded);
        assert!(store.toggle_exclusion(gid, ids[0]));
        assert!(!store.group(gid).unwrap().members[0].excluded);
        assert!(!store.toggle_exclusion(gid, MemberId::new()));
    }

    #[test]
    fn member_operations_do_not_leak_across_groups() {
        let (mut store, gid, ids) = store_with_group(&["A"]);
        let other = store.create_group("Other");
        assert!(!store.toggle_exclusion(other, ids[0]));
        assert!(!store.remove_member(other, ids[0]));
        assert_eq!(store.group(gid).unwrap().members.len(), 1);
    }
}
