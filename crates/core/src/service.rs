//! High-level hall operations used by frontends.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::HallConfig;
use crate::error::HallError;
use crate::models::{Lane, Match, Member};
use crate::repository::HallRepository;
use crate::scoring::{RandomScores, ScoreSource};
use crate::storage::HallStorage;

/// Cloneable handle to the hall state.
///
/// The entry point opens the hall once and hands clones of the handle
/// to whoever needs it; every operation takes the internal lock for
/// its full read-modify-persist span. Mutating operations persist the
/// registries before returning and hand back a snapshot of the
/// affected entity, so callers decide what (if anything) to log.
#[derive(Clone)]
pub struct HallService {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    repo: HallRepository,
    storage: HallStorage,
    config: HallConfig,
    scores: Box<dyn ScoreSource>,
}

impl Inner {
    fn persist(&self) {
        self.storage.save(&self.repo);
    }
}

impl HallService {
    /// Open the hall: load the persisted registries from
    /// `config.data_root`, bootstrapping the default lanes on first
    /// run or after a failed load.
    pub fn open(config: HallConfig) -> Self {
        let storage = HallStorage::new(&config.data_root);
        let repo = storage.load(config.lane_count);
        let inner = Inner {
            repo,
            storage,
            config,
            scores: Box::new(RandomScores::new()),
        };
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    /// Swap the score source used by [`HallService::simulate_match`].
    pub fn set_score_source(&self, source: Box<dyn ScoreSource>) {
        self.inner.write().scores = source;
    }

    /// Register a new member. Name and email must be non-blank.
    pub fn register_member(&self, name: &str, email: &str) -> Result<Member, HallError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(HallError::EmptyField("name"));
        }
        if email.is_empty() {
            return Err(HallError::EmptyField("email"));
        }

        let mut inner = self.inner.write();
        let id = inner.repo.next_member_id();
        let member = Member::new(id, name, email);
        inner.repo.add_member(member.clone());
        inner.persist();
        Ok(member)
    }

    /// Schedule a match between two distinct members on an available
    /// lane, reserving the lane for the configured duration.
    pub fn create_match(
        &self,
        player1_id: u32,
        player2_id: u32,
        lane_number: u32,
    ) -> Result<Match, HallError> {
        if player1_id == player2_id {
            return Err(HallError::InvalidPlayers);
        }

        let mut inner = self.inner.write();
        if inner.repo.member_by_id(player1_id).is_none() {
            return Err(HallError::MemberNotFound(player1_id));
        }
        if inner.repo.member_by_id(player2_id).is_none() {
            return Err(HallError::MemberNotFound(player2_id));
        }

        let duration = inner.config.match_duration();
        {
            let lane = inner
                .repo
                .lane_by_number(lane_number)
                .ok_or(HallError::LaneNotFound(lane_number))?;
            lane.reserve(duration)?;
        }

        let id = inner.repo.next_match_id();
        let game = Match::new(id, player1_id, player2_id, lane_number, duration);
        inner.repo.add_match(game.clone());
        inner.persist();
        Ok(game)
    }

    /// Record final scores for a scheduled match. The winner is derived
    /// from the scores and the match's lane is released unconditionally,
    /// even if its reservation has not yet expired.
    pub fn record_match_results(
        &self,
        match_id: u32,
        score_player1: u32,
        score_player2: u32,
    ) -> Result<Match, HallError> {
        let mut inner = self.inner.write();
        let updated = {
            let game = inner
                .repo
                .match_by_id_mut(match_id)
                .ok_or(HallError::MatchNotFound(match_id))?;
            game.record_scores(score_player1, score_player2)?;
            game.clone()
        };
        if let Some(lane) = inner.repo.lane_by_number(updated.lane_number) {
            lane.release();
        }
        inner.persist();
        Ok(updated)
    }

    /// Play out a scheduled match with scores drawn from the score
    /// source, then record them exactly like
    /// [`HallService::record_match_results`].
    pub fn simulate_match(&self, match_id: u32) -> Result<Match, HallError> {
        let (score_player1, score_player2) = {
            let mut inner = self.inner.write();
            let game = inner
                .repo
                .match_by_id(match_id)
                .ok_or(HallError::MatchNotFound(match_id))?;
            if game.complete {
                return Err(HallError::MatchAlreadyComplete(match_id));
            }
            inner.scores.draw()
        };
        self.record_match_results(match_id, score_player1, score_player2)
    }

    /// Add a lane with an unused positive number.
    pub fn add_lane(&self, number: u32) -> Result<Lane, HallError> {
        let mut inner = self.inner.write();
        let lane = Lane::new(number);
        inner.repo.add_lane(lane.clone())?;
        inner.persist();
        Ok(lane)
    }

    /// Manually release a lane, or reserve it for the default duration.
    pub fn set_lane_availability(&self, number: u32, available: bool) -> Result<Lane, HallError> {
        let mut inner = self.inner.write();
        let duration = inner.config.match_duration();
        let updated = {
            let lane = inner
                .repo
                .lane_by_number(number)
                .ok_or(HallError::LaneNotFound(number))?;
            if available {
                lane.release();
            } else {
                lane.reserve(duration)?;
            }
            lane.clone()
        };
        inner.persist();
        Ok(updated)
    }

    /// Snapshot of all members in registration order.
    pub fn members(&self) -> Vec<Member> {
        self.inner.read().repo.members_snapshot()
    }

    /// Look up a single member.
    pub fn member(&self, id: u32) -> Option<Member> {
        self.inner.read().repo.member_by_id(id).cloned()
    }

    /// Snapshot of all matches in creation order.
    pub fn matches(&self) -> Vec<Match> {
        self.inner.read().repo.matches_snapshot()
    }

    /// Look up a single match.
    pub fn match_by_id(&self, id: u32) -> Option<Match> {
        self.inner.read().repo.match_by_id(id).cloned()
    }

    /// Snapshot of the matches still waiting for results.
    pub fn active_matches(&self) -> Vec<Match> {
        self.inner.read().repo.active_matches()
    }

    /// Snapshot of all lanes with availability refreshed.
    pub fn lanes(&self) -> Vec<Lane> {
        self.inner.write().repo.lanes_snapshot()
    }

    /// Look up a single lane with availability refreshed.
    pub fn lane(&self, number: u32) -> Option<Lane> {
        self.inner.write().repo.lane_by_number(number).cloned()
    }

    /// Snapshot of the lanes currently open for reservation.
    pub fn available_lanes(&self) -> Vec<Lane> {
        self.inner.write().repo.available_lanes()
    }
}
