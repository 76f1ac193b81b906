// Top-k recommendation: score a pool against a reference and keep the best.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use scoutai_core::player::Player;
use tracing::debug;

use crate::features::PlayerFeatures;
use crate::similarity::{score, ScoreBreakdown, ScoringWeights};

/// Number of recommendations shown for a player.
pub const DEFAULT_TOP_K: usize = 8;

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// A pool member together with its score against the reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate<'a> {
    pub player: &'a Player,
    pub breakdown: ScoreBreakdown,
}

impl ScoredCandidate<'_> {
    pub fn score(&self) -> f64 {
        self.breakdown.total
    }
}

/// Score every pool member except the reference itself and return the best
/// `k`, highest first.
///
/// The sort is stable: candidates with equal scores keep their pool order.
/// No reference or an empty pool yields an empty list.
pub fn rank_scored<'a>(
    reference: Option<&Player>,
    pool: &'a [Player],
    k: usize,
    weights: &ScoringWeights,
) -> Vec<ScoredCandidate<'a>> {
    rank_indices(reference, pool, k, weights)
        .into_iter()
        .map(|(i, breakdown)| ScoredCandidate {
            player: &pool[i],
            breakdown,
        })
        .collect()
}

fn rank_indices(
    reference: Option<&Player>,
    pool: &[Player],
    k: usize,
    weights: &ScoringWeights,
) -> Vec<(usize, ScoreBreakdown)> {
    let Some(reference) = reference else {
        return Vec::new();
    };
    if pool.is_empty() || k == 0 {
        return Vec::new();
    }

    let target = PlayerFeatures::extract(reference);
    let mut scored: Vec<(usize, ScoreBreakdown)> = pool
        .iter()
        .enumerate()
        .filter(|(_, p)| p.player_id != reference.player_id)
        .map(|(i, p)| (i, score(&target, &PlayerFeatures::extract(p), weights)))
        .collect();

    scored.sort_by(|a, b| b.1.total.total_cmp(&a.1.total));
    scored.truncate(k);

    debug!(
        reference = reference.player_id,
        pool = pool.len(),
        kept = scored.len(),
        "ranked recommendations"
    );
    scored
}

/// [`rank_scored`] under the stock weights, returning just the players.
pub fn rank<'a>(reference: Option<&Player>, pool: &'a [Player], k: usize) -> Vec<&'a Player> {
    rank_scored(reference, pool, k, &ScoringWeights::default())
        .into_iter()
        .map(|c| c.player)
        .collect()
}

// ---------------------------------------------------------------------------
// Versioned pool
// ---------------------------------------------------------------------------

static NEXT_POOL_VERSION: AtomicU64 = AtomicU64::new(1);

fn next_version() -> u64 {
    NEXT_POOL_VERSION.fetch_add(1, Ordering::Relaxed)
}

/// The candidate pool plus a version stamp.
///
/// Every construction or replacement draws a fresh version from a
/// process-wide counter, so no two pool states ever share one.
#[derive(Debug)]
pub struct PlayerPool {
    players: Vec<Player>,
    version: u64,
}

impl PlayerPool {
    pub fn new(players: Vec<Player>) -> Self {
        Self {
            players,
            version: next_version(),
        }
    }

    /// Swap in a new set of players, invalidating any cached rankings.
    pub fn replace(&mut self, players: Vec<Player>) {
        self.players = players;
        self.version = next_version();
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn find(&self, player_id: i64) -> Option<&Player> {
        self.players.iter().find(|p| p.player_id == player_id)
    }

    /// Case-insensitive name lookup: an exact match wins, otherwise the first
    /// name containing `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&Player> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.players
            .iter()
            .find(|p| p.name.to_lowercase() == needle)
            .or_else(|| {
                self.players
                    .iter()
                    .find(|p| p.name.to_lowercase().contains(&needle))
            })
    }
}

// ---------------------------------------------------------------------------
// Memoized recommender
// ---------------------------------------------------------------------------

/// Ranks with fixed weights and `k`, memoizing results per
/// `(reference id, pool version)`.
#[derive(Debug)]
pub struct Recommender {
    weights: ScoringWeights,
    top_k: usize,
    cache: HashMap<(i64, u64), Vec<usize>>,
}

impl Recommender {
    pub fn new(weights: ScoringWeights, top_k: usize) -> Self {
        Self {
            weights,
            top_k,
            cache: HashMap::new(),
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Recommendations for `reference` drawn from `pool`.
    ///
    /// A hit returns the stored ranking without rescoring. Entries for older
    /// pool versions are dropped the first time a newer version is seen.
    pub fn recommend<'a>(&mut self, reference: Option<&Player>, pool: &'a PlayerPool) -> Vec<&'a Player> {
        let Some(reference) = reference else {
            return Vec::new();
        };
        let key = (reference.player_id, pool.version());

        if let Some(indices) = self.cache.get(&key) {
            debug!(reference = reference.player_id, "recommendation cache hit");
            return indices.iter().filter_map(|&i| pool.players().get(i)).collect();
        }

        self.cache.retain(|(_, version), _| *version == pool.version());

        let indices: Vec<usize> = rank_indices(Some(reference), pool.players(), self.top_k, &self.weights)
            .into_iter()
            .map(|(i, _)| i)
            .collect();
        let players = indices.iter().map(|&i| &pool.players()[i]).collect();
        self.cache.insert(key, indices);
        players
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: i64, style: &str, pos: &str, age: u32, goals: f64) -> Player {
        Player {
            style: style.into(),
            position: pos.into(),
            age: Some(age),
            goals: Some(goals),
            market_value: Some(20_000_000.0),
            ..Player::named(id, &format!("P{id}"))
        }
    }

    fn pool() -> Vec<Player> {
        vec![
            player(1, "jeu direct", "FW", 24, 12.0),
            player(2, "jeu direct", "FW", 25, 11.0),
            player(3, "defensif", "DF", 31, 1.0),
            player(4, "jeu direct", "MF", 23, 6.0),
            player(5, "pressing intense", "FW", 26, 12.0),
            player(6, "jeu direct", "FW", 24, 12.0),
        ]
    }

    #[test]
    fn excludes_reference_and_respects_k() {
        let players = pool();
        let out = rank(Some(&players[0]), &players, 3);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|p| p.player_id != 1));
        assert_eq!(out[0].player_id, 6);
        assert_eq!(out[1].player_id, 2);
    }

    #[test]
    fn k_larger_than_pool_returns_everyone_else() {
        let players = pool();
        let out = rank(Some(&players[2]), &players, 50);
        assert_eq!(out.len(), players.len() - 1);
    }

    #[test]
    fn scores_are_non_increasing() {
        let players = pool();
        let out = rank_scored(Some(&players[3]), &players, DEFAULT_TOP_K, &ScoringWeights::default());
        for pair in out.windows(2) {
            assert!(pair[0].score() >= pair[1].score());
        }
    }

    #[test]
    fn strictly_better_candidate_moves_to_front() {
        let mut players = pool();
        let reference = players[3].clone();
        let before = rank(Some(&reference), &players, DEFAULT_TOP_K);
        assert_ne!(before[0].player_id, 99);

        players.push(Player {
            player_id: 99,
            ..reference.clone()
        });
        let after = rank(Some(&reference), &players, DEFAULT_TOP_K);
        assert_eq!(after[0].player_id, 99);
    }

    #[test]
    fn worked_example_ranks_closer_candidate_first() {
        let reference = Player {
            style: "pressing intense".into(),
            position: "FW".into(),
            age: Some(24),
            market_value: Some(50_000_000.0),
            goals: Some(10.0),
            assists: Some(5.0),
            xg: Some(8.0),
            xag: Some(4.0),
            tackles: Some(10.0),
            progressive_passes: Some(20.0),
            key_passes: Some(15.0),
            ..Player::named(1, "Reference")
        };
        let a = Player {
            player_id: 2,
            age: Some(25),
            ..reference.clone()
        };
        let b = Player {
            player_id: 3,
            style: "jeu direct".into(),
            age: Some(30),
            ..reference.clone()
        };
        let candidates = vec![b, a];
        let out = rank_scored(Some(&reference), &candidates, 2, &ScoringWeights::default());
        let ids: Vec<i64> = out.iter().map(|c| c.player.player_id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert!((out[0].score() - 145.0).abs() < 1e-9);
        assert!((out[1].score() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn ties_keep_pool_order() {
        let players = vec![
            player(10, "jeu direct", "FW", 24, 5.0),
            player(11, "defensif", "DF", 24, 5.0),
            player(12, "defensif", "DF", 24, 5.0),
            player(13, "defensif", "DF", 24, 5.0),
        ];
        let out = rank(Some(&players[0]), &players, 3);
        let ids: Vec<i64> = out.iter().map(|p| p.player_id).collect();
        assert_eq!(ids, vec![11, 12, 13]);
    }

    #[test]
    fn no_reference_or_empty_pool_yields_nothing() {
        let players = pool();
        assert!(rank(None, &players, 8).is_empty());
        assert!(rank(Some(&players[0]), &[], 8).is_empty());
        assert!(rank(Some(&players[0]), &players, 0).is_empty());
    }

    #[test]
    fn reference_outside_pool_can_match_everyone() {
        let players = pool();
        let outsider = player(99, "jeu direct", "FW", 24, 12.0);
        let out = rank(Some(&outsider), &players, 8);
        assert_eq!(out.len(), players.len());
    }

    #[test]
    fn pool_versions_are_unique() {
        let mut a = PlayerPool::new(pool());
        let b = PlayerPool::new(pool());
        assert_ne!(a.version(), b.version());
        let before = a.version();
        a.replace(Vec::new());
        assert_ne!(a.version(), before);
        assert!(a.is_empty());
    }

    #[test]
    fn recommender_memoizes_per_pool_version() {
        let mut pool = PlayerPool::new(pool());
        let mut rec = Recommender::new(ScoringWeights::default(), 2);
        let reference = pool.find(1).cloned();

        let first: Vec<i64> = rec.recommend(reference.as_ref(), &pool).iter().map(|p| p.player_id).collect();
        let second: Vec<i64> = rec.recommend(reference.as_ref(), &pool).iter().map(|p| p.player_id).collect();
        assert_eq!(first, vec![6, 2]);
        assert_eq!(first, second);
        assert_eq!(rec.cached_entries(), 1);

        pool.replace(vec![player(1, "jeu direct", "FW", 24, 12.0), player(7, "defensif", "DF", 30, 0.0)]);
        let third: Vec<i64> = rec.recommend(reference.as_ref(), &pool).iter().map(|p| p.player_id).collect();
        assert_eq!(third, vec![7]);
        assert_eq!(rec.cached_entries(), 1);
    }

    #[test]
    fn find_by_name_prefers_exact_match() {
        let mut players = pool();
        players[0].name = "Vinicius Junior".into();
        players[1].name = "Junior".into();
        let pool = PlayerPool::new(players);
        assert_eq!(pool.find_by_name("junior").map(|p| p.player_id), Some(2));
        assert_eq!(pool.find_by_name("vini").map(|p| p.player_id), Some(1));
        assert!(pool.find_by_name("  ").is_none());
    }
}
