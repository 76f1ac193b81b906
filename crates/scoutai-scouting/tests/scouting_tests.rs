// Integration tests for the scouting engine.
//
// These load the fixture dataset from disk and drive the recommendation,
// search, chat and team-builder paths together, the way the CLI does.

use std::path::Path;

use scoutai_core::db::Database;
use scoutai_core::player::Player;
use scoutai_scouting::chatbot::{self, Intent};
use scoutai_scouting::comparison::compare;
use scoutai_scouting::dashboard::{DashboardStats, TOP_VALUE_COUNT};
use scoutai_scouting::dataset::load_players_file;
use scoutai_scouting::draft::DraftBoard;
use scoutai_scouting::filters::{PlayerFilter, SortOrder};
use scoutai_scouting::recommend::{rank, PlayerPool, Recommender, DEFAULT_TOP_K};
use scoutai_scouting::similarity::ScoringWeights;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the package root, which is the cwd
/// for `cargo test`).
const FIXTURES: &str = "tests/fixtures";

fn fixture_pool() -> Vec<Player> {
    load_players_file(&Path::new(FIXTURES).join("players.csv")).expect("fixture loads")
}

fn ids(players: &[&Player]) -> Vec<i64> {
    players.iter().map(|p| p.player_id).collect()
}

// ===========================================================================
// Recommendations
// ===========================================================================

#[test]
fn fixture_loads_every_row() {
    let pool = fixture_pool();
    assert_eq!(pool.len(), 12);
    assert!(pool.iter().all(|p| p.player_id > 0));
    let prospect = pool.iter().find(|p| p.player_id == 12).unwrap();
    assert!(prospect.market_value.is_none());
}

#[test]
fn similar_forwards_rank_first() {
    let pool = fixture_pool();
    let mbappe = pool.iter().find(|p| p.player_id == 1).unwrap();
    let out = rank(Some(mbappe), &pool, DEFAULT_TOP_K);

    assert_eq!(out.len(), DEFAULT_TOP_K);
    assert!(!ids(&out).contains(&1));
    let mut top_two = ids(&out[..2]);
    top_two.sort();
    assert_eq!(top_two, vec![2, 3]);
    assert!(!ids(&out[..3]).contains(&9));
}

#[test]
fn recommender_over_a_versioned_pool() {
    let mut pool = PlayerPool::new(fixture_pool());
    let mut rec = Recommender::new(ScoringWeights::default(), 3);
    let reference = pool.find_by_name("saliba").cloned();
    assert!(reference.is_some());

    let first = ids(&rec.recommend(reference.as_ref(), &pool));
    assert_eq!(first.len(), 3);
    assert_eq!(first[0], 8);

    pool.replace(fixture_pool().into_iter().filter(|p| p.player_id != 8).collect());
    let second = ids(&rec.recommend(reference.as_ref(), &pool));
    assert!(!second.contains(&8));
}

// ===========================================================================
// Search and chat
// ===========================================================================

#[test]
fn filter_over_fixture() {
    let pool = fixture_pool();
    let filter = PlayerFilter {
        position: Some("DF".into()),
        league: Some("arsenal".into()),
        ..PlayerFilter::default()
    };
    let out = filter.apply(&pool);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name, "William Saliba");

    let cheapest_first = PlayerFilter {
        priced_only: true,
        sort_order: SortOrder::Asc,
        limit: 2,
        ..PlayerFilter::default()
    };
    let out = cheapest_first.apply(&pool);
    let names: Vec<&str> = out.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Virgil van Dijk", "Gianluigi Donnarumma"]);
}

#[test]
fn chat_finds_young_direct_forwards() {
    let pool = fixture_pool();
    let reply = chatbot::answer("Je cherche un attaquant rapide de moins de 25 ans", &pool);
    assert_eq!(reply.intent, Intent::Search);
    let found: Vec<i64> = reply.players.iter().map(|p| p.player_id).collect();
    assert_eq!(found, vec![1, 3, 2, 4]);
    assert!(reply.response.starts_with("J'ai trouvé 4 attaquant(s)"));
    assert!(reply.response.contains("Et 1 autre(s) joueur(s)"));
}

#[test]
fn chat_without_results_offers_starters() {
    let pool = fixture_pool();
    let reply = chatbot::answer("Je veux un gardien de moins de 19 ans", &pool);
    assert!(reply.players.is_empty());
    assert!(reply.response.contains("Essayez d'augmenter l'âge maximum"));
    assert_eq!(reply.suggestions.len(), chatbot::conversation_starters().len());
}

#[test]
fn comparison_of_fixture_players() {
    let pool = fixture_pool();
    let rodri = pool.iter().find(|p| p.player_id == 5).unwrap();
    let haaland = pool.iter().find(|p| p.player_id == 3).unwrap();
    let cmp = compare(haaland, rodri);
    assert!(cmp.left_leads() >= 2);
    assert!(cmp.right_leads() >= 2);
    assert!(cmp.similarity > 0.0 && cmp.similarity < 145.0);
}

// ===========================================================================
// Team builder persistence
// ===========================================================================

#[test]
fn draft_board_saves_and_restores() {
    let pool = fixture_pool();
    let db = Database::open(":memory:").unwrap();

    let mut board = DraftBoard::new("Galácticos", "4-3-3").unwrap();
    board.place("ST", pool[0].clone()).unwrap();
    board.place("GK", pool[8].clone()).unwrap();
    board.place("CB1", pool[6].clone()).unwrap();
    board.ready_to_save().unwrap();

    db.save_team(&board.team_name, &serde_json::to_value(&board).unwrap())
        .unwrap();
    let raw = db.load_team("Galácticos").unwrap().unwrap();
    let restored: DraftBoard = serde_json::from_value(raw).unwrap();

    assert_eq!(restored, board);
    assert_eq!(restored.player_count(), 3);
    assert_eq!(restored.total_value(), 300_000_000.0);
    assert_eq!(db.list_teams().unwrap(), vec!["Galácticos".to_string()]);
}

// ===========================================================================
// Dashboard
// ===========================================================================

#[test]
fn dashboard_distributions_cover_the_whole_fixture() {
    let pool = fixture_pool();
    let stats = DashboardStats::of(&pool);

    assert_eq!(stats.total_players, pool.len());
    let age_total: usize = stats.by_age.iter().map(|(_, n)| n).sum();
    let value_total: usize = stats.by_value.iter().map(|(_, n)| n).sum();
    let position_total: usize = stats.by_position.iter().map(|c| c.count).sum();
    assert_eq!(age_total, pool.len());
    assert_eq!(value_total, pool.len());
    assert_eq!(position_total, pool.len());

    assert!(stats.top_by_value.len() <= TOP_VALUE_COUNT);
    assert!(!ids(&stats.top_by_value).contains(&12));
    for pair in stats.top_by_value.windows(2) {
        assert!(pair[0].market_value >= pair[1].market_value);
    }
}
