//! In-memory registries holding the canonical entity collections.

use crate::error::HallError;
use crate::models::{Lane, Match, Member};

/// Sole owner of the canonical member, lane, and match collections.
///
/// Registries keep insertion order. Lookups return `None` for a
/// missing key; callers translate that into a domain error. Snapshot
/// accessors return clones, so mutating a returned collection never
/// touches the registry. Lane reads refresh availability first, since
/// reservation expiry is evaluated lazily.
#[derive(Debug)]
pub struct HallRepository {
    members: Vec<Member>,
    lanes: Vec<Lane>,
    matches: Vec<Match>,
    member_seq: u32,
    match_seq: u32,
}

impl HallRepository {
    /// Empty registries with ID counters starting at 1.
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            lanes: Vec::new(),
            matches: Vec::new(),
            member_seq: 1,
            match_seq: 1,
        }
    }

    /// Rebuild registries from persisted collections, advancing the ID
    /// counters past the highest persisted IDs so they are never reused.
    pub fn restore(members: Vec<Member>, lanes: Vec<Lane>, matches: Vec<Match>) -> Self {
        let member_seq = members.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        let match_seq = matches.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        Self {
            members,
            lanes,
            matches,
            member_seq,
            match_seq,
        }
    }

    /// Claim the next member ID. Monotonic, never reused.
    pub fn next_member_id(&mut self) -> u32 {
        let id = self.member_seq;
        self.member_seq += 1;
        id
    }

    /// Claim the next match ID. Monotonic, never reused.
    pub fn next_match_id(&mut self) -> u32 {
        let id = self.match_seq;
        self.match_seq += 1;
        id
    }

    /// Append a member. IDs are repository-assigned, so no key check.
    pub fn add_member(&mut self, member: Member) {
        self.members.push(member);
    }

    /// Look up a member by ID.
    pub fn member_by_id(&self, id: u32) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Snapshot of all members in registration order.
    pub fn members_snapshot(&self) -> Vec<Member> {
        self.members.clone()
    }

    /// Add a lane with an unused positive number.
    pub fn add_lane(&mut self, lane: Lane) -> Result<(), HallError> {
        if lane.number == 0 {
            return Err(HallError::InvalidLaneNumber);
        }
        if self.contains_lane(lane.number) {
            return Err(HallError::DuplicateLane(lane.number));
        }
        self.lanes.push(lane);
        Ok(())
    }

    /// Whether a lane with this number exists.
    pub fn contains_lane(&self, number: u32) -> bool {
        self.lanes.iter().any(|l| l.number == number)
    }

    /// Number of registered lanes.
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Look up a lane, refreshing its availability first.
    pub fn lane_by_number(&mut self, number: u32) -> Option<&mut Lane> {
        let lane = self.lanes.iter_mut().find(|l| l.number == number)?;
        lane.refresh_availability();
        Some(lane)
    }

    /// Snapshot of all lanes with availability refreshed.
    pub fn lanes_snapshot(&mut self) -> Vec<Lane> {
        for lane in &mut self.lanes {
            lane.refresh_availability();
        }
        self.lanes.clone()
    }

    /// Snapshot of the lanes currently open for reservation.
    pub fn available_lanes(&mut self) -> Vec<Lane> {
        for lane in &mut self.lanes {
            lane.refresh_availability();
        }
        self.lanes.iter().filter(|l| l.available).cloned().collect()
    }

    // Lane state exactly as held, no expiry refresh; persistence writes
    // the current state, expiry stays a read-time concern.
    pub(crate) fn lanes_unrefreshed(&self) -> Vec<Lane> {
        self.lanes.clone()
    }

    /// Insert the default numbered lanes, skipping numbers already taken.
    pub fn bootstrap_lanes(&mut self, count: u32) {
        for number in 1..=count {
            if !self.contains_lane(number) {
                self.lanes.push(Lane::new(number));
            }
        }
    }

    /// Append a match. IDs are repository-assigned, so no key check.
    pub fn add_match(&mut self, game: Match) {
        self.matches.push(game);
    }

    /// Look up a match by ID.
    pub fn match_by_id(&self, id: u32) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Mutable lookup used when recording results.
    pub fn match_by_id_mut(&mut self, id: u32) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Snapshot of all matches in creation order.
    pub fn matches_snapshot(&self) -> Vec<Match> {
        self.matches.clone()
    }

    /// Snapshot of the matches still waiting for results.
    pub fn active_matches(&self) -> Vec<Match> {
        self.matches.iter().filter(|m| !m.complete).cloned().collect()
    }
}

impl Default for HallRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn member_ids_are_sequential_from_one() {
        let mut repo = HallRepository::new();
        assert_eq!(repo.next_member_id(), 1);
        assert_eq!(repo.next_member_id(), 2);
        assert_eq!(repo.next_match_id(), 1);
    }

    #[test]
    fn restore_advances_counters_past_persisted_ids() {
        let members = vec![Member::new(3, "Alice", "alice@example.com")];
        let matches = vec![Match::new(5, 3, 3, 1, Duration::hours(1))];
        let mut repo = HallRepository::restore(members, Vec::new(), matches);
        assert_eq!(repo.next_member_id(), 4);
        assert_eq!(repo.next_match_id(), 6);
    }

    #[test]
    fn duplicate_lane_numbers_are_rejected() {
        let mut repo = HallRepository::new();
        repo.add_lane(Lane::new(4)).expect("number unused");
        assert_eq!(repo.add_lane(Lane::new(4)), Err(HallError::DuplicateLane(4)));
        assert_eq!(repo.add_lane(Lane::new(0)), Err(HallError::InvalidLaneNumber));
        assert_eq!(repo.lane_count(), 1);
    }

    #[test]
    fn snapshots_are_defensive_copies() {
        let mut repo = HallRepository::new();
        repo.add_lane(Lane::new(1)).expect("number unused");
        let mut lanes = repo.lanes_snapshot();
        lanes[0].available = false;
        lanes.push(Lane::new(99));
        assert_eq!(repo.lane_count(), 1);
        assert!(repo.lane_by_number(1).expect("lane exists").available);
    }

    #[test]
    fn lane_lookup_refreshes_expired_reservation() {
        let mut repo = HallRepository::new();
        repo.add_lane(Lane::new(1)).expect("number unused");
        repo.lane_by_number(1)
            .expect("lane exists")
            .reserve(Duration::zero())
            .expect("lane is free");
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(repo.lane_by_number(1).expect("lane exists").available);
    }

    #[test]
    fn bootstrap_skips_existing_numbers() {
        let mut repo = HallRepository::new();
        repo.add_lane(Lane::new(2)).expect("number unused");
        repo.bootstrap_lanes(3);
        assert_eq!(repo.lane_count(), 3);
        for number in 1..=3 {
            assert!(repo.contains_lane(number));
        }
    }

    #[test]
    fn active_matches_excludes_finished_ones() {
        let mut repo = HallRepository::new();
        let mut done = Match::new(1, 1, 2, 1, Duration::hours(1));
        done.record_scores(100, 90).expect("match in progress");
        repo.add_match(done);
        repo.add_match(Match::new(2, 1, 2, 2, Duration::hours(1)));
        let active = repo.active_matches();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, 2);
    }
}
