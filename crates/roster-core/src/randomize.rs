// Randomization engine: teams, order, pairs and random picks.
//
// Every operation applies the exclusion filter first, then works on a
// uniform permutation produced by `SliceRandom::shuffle` (Fisher-Yates).
// Each call draws fresh randomness; the `_with_rng` variants take an explicit
// generator so tests can seed it.
//
// Arguments are clamped here rather than trusted: a team count of zero is
// treated as one, and pick counts are capped at the number of eligible
// members.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{active_members, Member};

/// Two consecutive members of a permutation. `second` is `None` only for the
/// trailing pair of an odd-sized list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub first: Member,
    pub second: Option<Member>,
}

impl Pair {
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        std::iter::once(&self.first).chain(self.second.as_ref())
    }

    pub fn is_complete(&self) -> bool {
        self.second.is_some()
    }
}

/// Filter out excluded members and shuffle what remains.
fn permuted<R: Rng + ?Sized>(members: &[Member], rng: &mut R) -> Vec<Member> {
    let mut pool = active_members(members);
    pool.shuffle(rng);
    pool
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// Split the eligible members into `team_count` teams, round-robin over a
/// uniform permutation. Team sizes differ by at most one; surplus teams are
/// empty.
pub fn shuffle_into_teams(members: &[Member], team_count: usize) -> Vec<Vec<Member>> {
    shuffle_into_teams_with_rng(members, team_count, &mut rand::thread_rng())
}

pub fn shuffle_into_teams_with_rng<R: Rng + ?Sized>(
    members: &[Member],
    team_count: usize,
    rng: &mut R,
) -> Vec<Vec<Member>> {
    let team_count = team_count.max(1);
    let mut teams: Vec<Vec<Member>> = vec![Vec::new(); team_count];
    for (i, member) in permuted(members, rng).into_iter().enumerate() {
        teams[i % team_count].push(member);
    }
    teams
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// A uniformly random ordering of the eligible members.
pub fn random_order(members: &[Member]) -> Vec<Member> {
    random_order_with_rng(members, &mut rand::thread_rng())
}

pub fn random_order_with_rng<R: Rng + ?Sized>(members: &[Member], rng: &mut R) -> Vec<Member> {
    permuted(members, rng)
}

// ---------------------------------------------------------------------------
// Pairs
// ---------------------------------------------------------------------------

/// Pair up consecutive members of a uniform permutation. With an odd count
/// the final pair has no second member.
pub fn create_pairs(members: &[Member]) -> Vec<Pair> {
    create_pairs_with_rng(members, &mut rand::thread_rng())
}

pub fn create_pairs_with_rng<R: Rng + ?Sized>(members: &[Member], rng: &mut R) -> Vec<Pair> {
    let mut pairs = Vec::new();
    let mut rest = permuted(members, rng).into_iter();
    while let Some(first) = rest.next() {
        pairs.push(Pair {
            first,
            second: rest.next(),
        });
    }
    pairs
}

// ---------------------------------------------------------------------------
// Random selection
// ---------------------------------------------------------------------------

/// A uniformly random subset of `min(count, eligible)` distinct members.
pub fn select_random(members: &[Member], count: usize) -> Vec<Member> {
    select_random_with_rng(members, count, &mut rand::thread_rng())
}

pub fn select_random_with_rng<R: Rng + ?Sized>(
    members: &[Member],
    count: usize,
    rng: &mut R,
) -> Vec<Member> {
    let mut pool = permuted(members, rng);
    pool.truncate(count);
    pool
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
