// Groups, members and the full store snapshot.
//
// Field names serialize in camelCase (`avatarSeed`, `createdAt`) so the
// persisted envelope keeps the same shape as the browser build's storage.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ids::{GroupId, MemberId};

/// Alphabet for avatar seeds: lowercase base-36.
const SEED_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of a freshly generated avatar seed.
pub const AVATAR_SEED_LEN: usize = 6;

// ---------------------------------------------------------------------------
// Member
// ---------------------------------------------------------------------------

/// A named person belonging to exactly one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    /// Only consumed by the avatar renderer; carries no business meaning.
    pub avatar_seed: String,
    /// Excluded members are filtered out before every randomization.
    #[serde(default)]
    pub excluded: bool,
}

impl Member {
    /// Create an included member with a fresh id and avatar seed.
    pub fn new(name: impl Into<String>) -> Self {
        Member {
            id: MemberId::new(),
            name: name.into(),
            avatar_seed: generate_avatar_seed(&mut rand::thread_rng()),
            excluded: false,
        }
    }
}

/// Generate a short random base-36 string for the avatar renderer.
pub fn generate_avatar_seed<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..AVATAR_SEED_LEN)
        .map(|_| SEED_ALPHABET[rng.gen_range(0..SEED_ALPHABET.len())] as char)
        .collect()
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// A named, ordered collection of members.
///
/// Member order is insertion order and only matters for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub members: Vec<Member>,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Create an empty group stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        Group {
            id: GroupId::new(),
            name: name.into(),
            members: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn member(&self, member_id: MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == member_id)
    }

    pub fn member_mut(&mut self, member_id: MemberId) -> Option<&mut Member> {
        self.members.iter_mut().find(|m| m.id == member_id)
    }

    /// Members that survive the exclusion filter, in insertion order.
    pub fn active_members(&self) -> Vec<Member> {
        active_members(&self.members)
    }

    pub fn excluded_count(&self) -> usize {
        self.members.iter().filter(|m| m.excluded).count()
    }
}

/// Apply the exclusion filter to an arbitrary member slice.
pub fn active_members(members: &[Member]) -> Vec<Member> {
    members.iter().filter(|m| !m.excluded).cloned().collect()
}

// ---------------------------------------------------------------------------
// StoreState
// ---------------------------------------------------------------------------

/// Everything the entity store owns. This is exactly what gets persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl StoreState {
    pub fn group(&self, group_id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    pub fn group_mut(&mut self, group_id: GroupId) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == group_id)
    }

    /// Total number of members across all groups.
    pub fn member_count(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn new_member_is_included_with_seed() {
        let m = Member::new("Ada");
        assert_eq!(m.name, "Ada");
        assert!(!m.excluded);
        assert_eq!(m.avatar_seed.len(), AVATAR_SEED_LEN);
    }

    #[test]
    fn avatar_seed_uses_base36_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let seed = generate_avatar_seed(&mut rng);
            assert!(seed
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn active_members_drops_excluded() {
        let mut group = Group::new("Crew");
        group.members.push(Member::new("A"));
        let mut b = Member::new("B");
        b.excluded = true;
        group.members.push(b);
        group.members.push(Member::new("C"));

        let names: Vec<_> = group
            .active_members()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(group.excluded_count(), 1);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let mut group = Group::new("Crew");
        group.members.push(Member::new("A"));
        let json = serde_json::to_value(&group).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json["members"][0].get("avatarSeed").is_some());
        assert_eq!(json["members"][0]["excluded"], false);
    }

    #[test]
    fn missing_excluded_flag_defaults_to_false() {
        let json = r#"{
            "groups": [{
                "id": "550e8400-e29b-41d4-a716-446655440000",
                "name": "Legacy",
                "createdAt": "2024-05-01T09:30:00.000Z",
                "members": [{
                    "id": "6fa459ea-ee8a-3ca4-894e-db77e160355e",
                    "name": "Grace",
                    "avatarSeed": "k3x9q"
                }]
            }]
        }"#;
        let state: StoreState = serde_json::from_str(json).unwrap();
        assert_eq!(state.groups.len(), 1);
        assert!(!state.groups[0].members[0].excluded);
        assert_eq!(state.member_count(), 1);
    }

    #[test]
    fn group_lookup_by_id() {
        let mut state = StoreState::default();
        let group = Group::new("One");
        let id = group.id;
        state.groups.push(group);
        assert_eq!(state.group(id).map(|g| g.name.as_str()), Some("One"));
        assert!(state.group(GroupId::new()).is_none());
    }
}
