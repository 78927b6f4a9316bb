//! Flat-file persistence for the hall registries.
//!
//! Three independent, human-readable JSON documents live under the
//! storage root, one per entity type. Members and lanes are
//! value-complete records; matches carry registry keys
//! (`player1_id`, `player2_id`, `lane_number`) as the only
//! inter-document coupling.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::models::{Lane, Match, Member};
use crate::repository::HallRepository;

/// Document holding the member registry.
pub const MEMBERS_FILE: &str = "members.json";
/// Document holding the lane registry.
pub const LANES_FILE: &str = "lanes.json";
/// Document holding the match registry.
pub const MATCHES_FILE: &str = "matches.json";

/// Reads and writes the three registry documents.
///
/// Persistence never unwinds into callers: save failures are logged
/// and swallowed, and a load that cannot be read or parsed degrades to
/// empty registries with a logged diagnostic.
pub struct HallStorage {
    root: PathBuf,
}

impl HallStorage {
    /// Storage rooted at the provided directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the documents are stored in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist all three registries. Failures are logged, not returned.
    pub fn save(&self, repo: &HallRepository) {
        if let Err(err) = self.try_save(repo) {
            warn!("failed to persist hall data: {err:#}");
        }
    }

    /// Rebuild a repository from the persisted documents.
    ///
    /// Members and lanes load first; each match is then resolved
    /// against them and dropped (with a diagnostic) if any reference
    /// is missing. For matches marked complete the winner is re-derived
    /// from the persisted scores rather than trusted from the document.
    /// Lanes keep exactly the state that was persisted for them; loading
    /// a match never re-reserves its lane. When no lanes are present
    /// afterwards, the default numbered set is bootstrapped and
    /// persisted immediately.
    pub fn load(&self, default_lanes: u32) -> HallRepository {
        let (members, lanes, matches) = match self.try_load() {
            Ok(parts) => parts,
            Err(err) => {
                warn!("failed to load hall data, starting empty: {err:#}");
                (Vec::new(), Vec::new(), Vec::new())
            }
        };

        let member_ids: HashSet<u32> = members.iter().map(|m| m.id).collect();
        let lane_numbers: HashSet<u32> = lanes.iter().map(|l| l.number).collect();
        let matches: Vec<Match> = matches
            .into_iter()
            .filter_map(|mut game| {
                let resolved = member_ids.contains(&game.player1_id)
                    && member_ids.contains(&game.player2_id)
                    && lane_numbers.contains(&game.lane_number);
                if !resolved {
                    warn!("dropping match {} with unresolved references", game.id);
                    return None;
                }
                game.winner_id = if game.complete {
                    Match::decide_winner(
                        game.player1_id,
                        game.player2_id,
                        game.score_player1,
                        game.score_player2,
                    )
                } else {
                    None
                };
                Some(game)
            })
            .collect();

        let mut repo = HallRepository::restore(members, lanes, matches);
        if repo.lane_count() == 0 {
            repo.bootstrap_lanes(default_lanes);
            self.save(&repo);
        }
        repo
    }

    fn try_save(&self, repo: &HallRepository) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create {}", self.root.display()))?;
        self.write_doc(MEMBERS_FILE, &repo.members_snapshot())?;
        self.write_doc(LANES_FILE, &repo.lanes_unrefreshed())?;
        self.write_doc(MATCHES_FILE, &repo.matches_snapshot())?;
        Ok(())
    }

    fn try_load(&self) -> Result<(Vec<Member>, Vec<Lane>, Vec<Match>)> {
        let members = self.read_doc(MEMBERS_FILE)?;
        let lanes = self.read_doc(LANES_FILE)?;
        let matches = self.read_doc(MATCHES_FILE)?;
        Ok((members, lanes, matches))
    }

    fn write_doc<T: Serialize>(&self, name: &str, values: &[T]) -> Result<()> {
        let path = self.root.join(name);
        let serialized = serde_json::to_vec_pretty(values)
            .with_context(|| format!("failed to serialize {name}"))?;
        fs::write(&path, serialized).with_context(|| format!("failed to write {}", path.display()))
    }

    fn read_doc<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let path = self.root.join(name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}
