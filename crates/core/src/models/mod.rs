//! Shared domain models.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HallError;

/// A registered member of the bowling hall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Sequential identifier assigned by the repository, starting at 1.
    pub id: u32,
    /// Display name, never empty.
    pub name: String,
    /// Contact address, never empty.
    pub email: String,
    /// Timestamp of registration.
    pub member_since: DateTime<Utc>,
}

impl Member {
    /// Build a member registered now.
    pub fn new(id: u32, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            member_since: Utc::now(),
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} <{}> (since {})",
            self.id,
            self.name,
            self.email,
            self.member_since.format("%Y-%m-%d")
        )
    }
}

/// A physical lane whose availability is gated by a reservation expiry.
///
/// Expiry is evaluated lazily: `available` is only trustworthy after
/// [`Lane::refresh_availability`] has run, which every repository lane
/// read does before answering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    /// Unique positive lane number.
    pub number: u32,
    /// Whether the lane can currently be reserved.
    pub available: bool,
    /// End of the active reservation, if any.
    pub reserved_until: Option<DateTime<Utc>>,
}

impl Lane {
    /// A fresh, available lane.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            available: true,
            reserved_until: None,
        }
    }

    /// Take an exclusive time-boxed hold on the lane.
    pub fn reserve(&mut self, duration: Duration) -> Result<(), HallError> {
        self.refresh_availability();
        if !self.available {
            return Err(HallError::LaneUnavailable(self.number));
        }
        self.available = false;
        self.reserved_until = Some(Utc::now() + duration);
        Ok(())
    }

    /// Drop any hold on the lane. Idempotent.
    pub fn release(&mut self) {
        self.available = true;
        self.reserved_until = None;
    }

    /// Release the lane if its reservation has expired.
    pub fn refresh_availability(&mut self) {
        if !self.available {
            if let Some(until) = self.reserved_until {
                if Utc::now() > until {
                    self.release();
                }
            }
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.available {
            write!(f, "Lane #{} - Available", self.number)
        } else {
            match self.reserved_until {
                Some(until) => write!(
                    f,
                    "Lane #{} - Reserved until {}",
                    self.number,
                    until.format("%H:%M")
                ),
                None => write!(f, "Lane #{} - Reserved", self.number),
            }
        }
    }
}

/// A contest between two members bound to one lane for its duration.
///
/// Players and the lane are referenced by their registry keys; the
/// repository owns the live entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Sequential identifier assigned by the repository, starting at 1.
    pub id: u32,
    /// Registry key of the first player.
    pub player1_id: u32,
    /// Registry key of the second player.
    pub player2_id: u32,
    /// Number of the lane the match is played on.
    pub lane_number: u32,
    /// When the match was scheduled.
    pub date: DateTime<Utc>,
    /// First player's score, meaningful once complete.
    pub score_player1: u32,
    /// Second player's score, meaningful once complete.
    pub score_player2: u32,
    /// Winning player's key; `None` while in progress or on a draw.
    pub winner_id: Option<u32>,
    /// Whether results have been recorded.
    pub complete: bool,
    /// Length of the lane reservation, persisted as whole seconds.
    #[serde(with = "duration_secs")]
    pub duration: Duration,
}

impl Match {
    /// Schedule a match starting now.
    pub fn new(
        id: u32,
        player1_id: u32,
        player2_id: u32,
        lane_number: u32,
        duration: Duration,
    ) -> Self {
        Self {
            id,
            player1_id,
            player2_id,
            lane_number,
            date: Utc::now(),
            score_player1: 0,
            score_player2: 0,
            winner_id: None,
            complete: false,
            duration,
        }
    }

    /// Store the final scores, derive the winner, and finish the match.
    ///
    /// Finished matches are terminal; recording twice is an error and
    /// leaves every field untouched.
    pub fn record_scores(
        &mut self,
        score_player1: u32,
        score_player2: u32,
    ) -> Result<(), HallError> {
        if self.complete {
            return Err(HallError::MatchAlreadyComplete(self.id));
        }
        self.score_player1 = score_player1;
        self.score_player2 = score_player2;
        self.winner_id = Self::decide_winner(
            self.player1_id,
            self.player2_id,
            score_player1,
            score_player2,
        );
        self.complete = true;
        Ok(())
    }

    /// Winner as a pure function of the two scores. A tie has no winner.
    pub fn decide_winner(
        player1_id: u32,
        player2_id: u32,
        score_player1: u32,
        score_player2: u32,
    ) -> Option<u32> {
        if score_player1 > score_player2 {
            Some(player1_id)
        } else if score_player2 > score_player1 {
            Some(player2_id)
        } else {
            None
        }
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.complete { "Complete" } else { "In Progress" };
        write!(
            f,
            "Match #{} | Lane {} | {} | {}",
            self.id,
            self.lane_number,
            self.date.format("%Y-%m-%d"),
            status
        )?;
        if !self.complete {
            return Ok(());
        }
        write!(f, " | {} - {} | ", self.score_player1, self.score_player2)?;
        match self.winner_id {
            Some(id) => write!(f, "Winner: member {id}"),
            None => write!(f, "Draw"),
        }
    }
}

mod duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(value.num_seconds())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = i64::deserialize(deserializer)?;
        Ok(Duration::seconds(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_marks_lane_unavailable() {
        let mut lane = Lane::new(1);
        lane.reserve(Duration::hours(1)).expect("lane is free");
        assert!(!lane.available);
        assert!(lane.reserved_until.is_some());
    }

    #[test]
    fn reserve_fails_while_held() {
        let mut lane = Lane::new(1);
        lane.reserve(Duration::hours(1)).expect("lane is free");
        assert_eq!(
            lane.reserve(Duration::hours(1)),
            Err(HallError::LaneUnavailable(1))
        );
    }

    #[test]
    fn release_is_idempotent() {
        let mut lane = Lane::new(2);
        lane.release();
        lane.reserve(Duration::hours(1)).expect("lane is free");
        lane.release();
        lane.release();
        assert!(lane.available);
        assert!(lane.reserved_until.is_none());
    }

    #[test]
    fn expired_reservation_frees_lane_on_next_check() {
        let mut lane = Lane::new(3);
        lane.reserve(Duration::zero()).expect("lane is free");
        std::thread::sleep(std::time::Duration::from_millis(5));
        lane.refresh_availability();
        assert!(lane.available);
        assert!(lane.reserved_until.is_none());
    }

    #[test]
    fn winner_is_pure_function_of_scores() {
        assert_eq!(Match::decide_winner(1, 2, 200, 150), Some(1));
        assert_eq!(Match::decide_winner(1, 2, 150, 200), Some(2));
        // Swapping the scores mirrors the winner.
        for (s1, s2) in [(0, 300), (300, 0), (17, 120)] {
            let forward = Match::decide_winner(1, 2, s1, s2);
            let swapped = Match::decide_winner(2, 1, s2, s1);
            assert_eq!(forward, swapped);
        }
        for s in [0, 150, 300] {
            assert_eq!(Match::decide_winner(1, 2, s, s), None);
        }
    }

    #[test]
    fn recording_scores_finishes_match() {
        let mut m = Match::new(1, 1, 2, 4, Duration::hours(1));
        m.record_scores(200, 150).expect("match in progress");
        assert!(m.complete);
        assert_eq!(m.winner_id, Some(1));
        assert_eq!((m.score_player1, m.score_player2), (200, 150));
    }

    #[test]
    fn recording_twice_fails_and_changes_nothing() {
        let mut m = Match::new(7, 1, 2, 4, Duration::hours(1));
        m.record_scores(100, 100).expect("match in progress");
        let before = m.clone();
        assert_eq!(
            m.record_scores(300, 0),
            Err(HallError::MatchAlreadyComplete(7))
        );
        assert_eq!(m, before);
    }

    #[test]
    fn duration_round_trips_as_seconds() {
        let m = Match::new(1, 1, 2, 3, Duration::hours(1));
        let value = serde_json::to_value(&m).expect("serializable");
        assert_eq!(value["duration"], serde_json::json!(3600));
        let back: Match = serde_json::from_value(value).expect("deserializable");
        assert_eq!(back.duration, Duration::hours(1));
    }
}
