// Activities: the four randomization operations as a selectable action, and
// the tagged outcome each one produces.

use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::Member;
use crate::randomize::{self, Pair};

/// One of the randomization operations a user can run against a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activity {
    /// Split into N teams.
    Shuffle,
    /// Random ordering.
    Sort,
    /// Random pairs.
    Pairs,
    /// Random subset of N members.
    Random,
}

impl Activity {
    pub const ALL: [Activity; 4] = [
        Activity::Shuffle,
        Activity::Sort,
        Activity::Pairs,
        Activity::Random,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Activity::Shuffle => "Team Shuffler",
            Activity::Sort => "Team Sorting",
            Activity::Pairs => "Create Team Pairs",
            Activity::Random => "Select Random Members",
        }
    }

    pub fn action_text(&self) -> &'static str {
        match self {
            Activity::Shuffle => "Shuffle Teams",
            Activity::Sort => "Sort Members",
            Activity::Pairs => "Create Pairs",
            Activity::Random => "Select Members",
        }
    }

    /// Whether the activity takes a numeric argument (team count or pick count).
    pub fn needs_number(&self) -> bool {
        matches!(self, Activity::Shuffle | Activity::Random)
    }

    /// Initial numeric argument when the activity is chosen.
    pub fn default_number(&self) -> usize {
        match self {
            Activity::Shuffle => 2,
            Activity::Random | Activity::Sort | Activity::Pairs => 1,
        }
    }

    /// Range a front end should offer for the numeric argument given how many
    /// members the group has.
    ///
    /// Shuffle allows 2 up to half the group (so every team can get at least
    /// two people); Random allows 1 up to the whole group. The range never
    /// collapses below its lower bound.
    pub fn number_bounds(&self, member_count: usize) -> RangeInclusive<usize> {
        match self {
            Activity::Shuffle => 2..=(member_count / 2).max(2),
            Activity::Random => 1..=member_count.max(1),
            Activity::Sort | Activity::Pairs => 1..=1,
        }
    }

    /// Clamp a numeric argument into `number_bounds`.
    pub fn clamp_number(&self, number: usize, member_count: usize) -> usize {
        let bounds = self.number_bounds(member_count);
        number.clamp(*bounds.start(), *bounds.end())
    }

    /// Run the activity against a member list.
    ///
    /// `number` is the team count for Shuffle and the pick count for Random;
    /// it is ignored otherwise.
    pub fn run(&self, members: &[Member], number: usize) -> Outcome {
        self.run_with_rng(members, number, &mut rand::thread_rng())
    }

    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        members: &[Member],
        number: usize,
        rng: &mut R,
    ) -> Outcome {
        match self {
            Activity::Shuffle => {
                Outcome::Teams(randomize::shuffle_into_teams_with_rng(members, number, rng))
            }
            Activity::Sort => Outcome::Order(randomize::random_order_with_rng(members, rng)),
            Activity::Pairs => Outcome::Pairs(randomize::create_pairs_with_rng(members, rng)),
            Activity::Random => {
                Outcome::Selection(randomize::select_random_with_rng(members, number, rng))
            }
        }
    }

    /// Cycle to the next activity (wraps around).
    pub fn next(&self) -> Activity {
        let idx = Activity::ALL.iter().position(|a| a == self).unwrap_or(0);
        Activity::ALL[(idx + 1) % Activity::ALL.len()]
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of running an activity; one variant per activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Teams(Vec<Vec<Member>>),
    Order(Vec<Member>),
    Pairs(Vec<Pair>),
    Selection(Vec<Member>),
}

impl Outcome {
    pub fn activity(&self) -> Activity {
        match self {
            Outcome::Teams(_) => Activity::Shuffle,
            Outcome::Order(_) => Activity::Sort,
            Outcome::Pairs(_) => Activity::Pairs,
            Outcome::Selection(_) => Activity::Random,
        }
    }

    /// Number of member placements in the outcome.
    pub fn member_count(&self) -> usize {
        match self {
            Outcome::Teams(teams) => teams.iter().map(Vec::len).sum(),
            Outcome::Order(members) | Outcome::Selection(members) => members.len(),
            Outcome::Pairs(pairs) => pairs.iter().map(|p| p.members().count()).sum(),
        }
    }

    /// Flatten the outcome into `(slot label, member)` rows for display and
    /// export. Team and pair slots are 1-based.
    pub fn placements(&self) -> Vec<(String, &Member)> {
        match self {
            Outcome::Teams(teams) => teams
                .iter()
                .enumerate()
                .flat_map(|(i, team)| team.iter().map(move |m| (format!("Team {}", i + 1), m)))
                .collect(),
            Outcome::Order(members) => members.iter().map(|m| ("Order".to_string(), m)).collect(),
            Outcome::Pairs(pairs) => pairs
                .iter()
                .enumerate()
                .flat_map(|(i, pair)| pair.members().map(move |m| (format!("Pair {}", i + 1), m)))
                .collect(),
            Outcome::Selection(members) => {
                members.iter().map(|m| ("Pick".to_string(), m)).collect()
            }
        }
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

    fn roster(n: usize) -> Vec<Member> {
        (0..n).map(|i| Member::new(format!("m{i}"))).collect()
    }

    #[test]
    fn run_dispatches_to_matching_variant() {
        let members = roster(6);
        let mut rng = StdRng::seed_from_u64(1);
        for activity in Activity::ALL {
            let outcome = activity.run_with_rng(&members, 3, &mut rng);
            assert_eq!(outcome.activity(), activity);
        }
    }

    #[test]
    fn member_count_per_variant() {
        let members = roster(5);
        assert_eq!(Activity::Shuffle.run(&members, 2).member_count(), 5);
        assert_eq!(Activity::Sort.run(&members, 0).member_count(), 5);
        assert_eq!(Activity::Pairs.run(&members, 0).member_count(), 5);
        assert_eq!(Activity::Random.run(&members, 2).member_count(), 2);
    }

    #[test]
    fn shuffle_bounds_follow_half_the_group() {
        assert_eq!(Activity::Shuffle.number_bounds(10), 2..=5);
        assert_eq!(Activity::Shuffle.number_bounds(3), 2..=2);
        assert_eq!(Activity::Shuffle.number_bounds(0), 2..=2);
    }

    #[test]
    fn random_bounds_follow_group_size() {
        assert_eq!(Activity::Random.number_bounds(4), 1..=4);
        assert_eq!(Activity::Random.number_bounds(0), 1..=1);
    }

    #[test]
    fn clamp_number_respects_bounds() {
        assert_eq!(Activity::Random.clamp_number(0, 4), 1);
        assert_eq!(Activity::Random.clamp_number(9, 4), 4);
        assert_eq!(Activity::Shuffle.clamp_number(7, 8), 4);
        assert_eq!(Activity::Shuffle.clamp_number(1, 8), 2);
    }

    #[test]
    fn defaults_and_labels() {
        assert_eq!(Activity::Shuffle.default_number(), 2);
        assert_eq!(Activity::Random.default_number(), 1);
        assert!(Activity::Shuffle.needs_number());
        assert!(!Activity::Pairs.needs_number());
        assert_eq!(Activity::Sort.to_string(), "Team Sorting");
        assert_eq!(Activity::Pairs.action_text(), "Create Pairs");
    }

    #[test]
    fn next_cycles_through_all() {
        let mut a = Activity::Shuffle;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(a);
            a = a.next();
        }
        assert_eq!(seen, Activity::ALL.to_vec());
        assert_eq!(a, Activity::Shuffle);
    }

    #[test]
    fn placements_label_slots() {
        let members = roster(3);
        let mut rng = StdRng::seed_from_u64(8);
        let outcome = Activity::Pairs.run_with_rng(&members, 0, &mut rng);
        let slots: Vec<String> = outcome.placements().into_iter().map(|(s, _)| s).collect();
        assert_eq!(slots, vec!["Pair 1", "Pair 1", "Pair 2"]);

        let teams = Activity::Shuffle.run_with_rng(&members, 2, &mut rng);
        let slots: Vec<String> = teams.placements().into_iter().map(|(s, _)| s).collect();
        assert_eq!(slots, vec!["Team 1", "Team 1", "Team 2"]);
    }

    #[test]
    fn activity_serializes_lowercase() {
        let json = serde_json::to_string(&Activity::Random).unwrap();
        assert_eq!(json, "\"random\"");
    }
}
