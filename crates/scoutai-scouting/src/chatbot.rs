// Rule-based scouting assistant: pulls search criteria out of a French
// free-text request and phrases the answer.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use scoutai_core::player::{format_market_value, Player, Position};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::features::numeric;
use crate::filters::{PlayerFilter, SortOrder, StatRange};

/// Results the assistant asks the search for.
pub const CHAT_RESULT_LIMIT: usize = 10;
/// Players spelled out in a reply.
const FEATURED_IN_REPLY: usize = 3;

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// Checked in order; the first keyword found decides the position.
const POSITION_KEYWORDS: &[(&str, Position)] = &[
    ("attaquant", Position::Forward),
    ("avant", Position::Forward),
    ("buteur", Position::Forward),
    ("ailier", Position::Forward),
    ("milieu", Position::Midfielder),
    ("defenseur", Position::Defender),
    ("défenseur", Position::Defender),
    ("gardien", Position::Goalkeeper),
    ("goal", Position::Goalkeeper),
];

/// Checked in order; the first keyword found decides the style.
const STYLE_KEYWORDS: &[(&str, &str)] = &[
    ("rapide", "jeu direct"),
    ("technique", "jeu de possession"),
    ("physique", "pressing intense"),
    ("créatif", "jeu positionnel"),
    ("défensif", "defensif"),
    ("total", "football total"),
    ("possession", "jeu de possession"),
    ("pressing", "pressing intense"),
];

const CONVERSATION_STARTERS: &[&str] = &[
    "Je cherche un attaquant rapide de moins de 25 ans",
    "Trouvez-moi un milieu créatif avec de bonnes passes",
    "Quel défenseur solide pour moins de 20 millions d'euros ?",
    "Montrez-moi les meilleurs jeunes talents",
    "Je veux un joueur comme Mbappé",
    "Cherchez un gardien expérimenté",
];

pub const HELP_TEXT: &str = "Je suis votre assistant ScoutAI !\n\n\
Je peux vous aider à :\n\
• Rechercher des joueurs selon vos critères\n\
• Analyser les profils et statistiques\n\
• Recommander des talents\n\n\
Exemples de questions :\n\
• \"Je cherche un attaquant rapide de moins de 25 ans\"\n\
• \"Trouve-moi un milieu créatif avec de bonnes passes\"\n\
• \"Quel défenseur pour moins de 20M€ ?\"";

pub fn conversation_starters() -> &'static [&'static str] {
    CONVERSATION_STARTERS
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum AgeRule {
    Max,
    Min,
    Range,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern compiles")
}

static AGE_PATTERNS: LazyLock<Vec<(Regex, AgeRule)>> = LazyLock::new(|| {
    vec![
        (compile(r"moins de (\d+) ans?"), AgeRule::Max),
        (compile(r"plus de (\d+) ans?"), AgeRule::Min),
        (compile(r"entre (\d+) et (\d+) ans?"), AgeRule::Range),
        (compile(r"(\d+) ans? maximum"), AgeRule::Max),
        (compile(r"(\d+) ans? minimum"), AgeRule::Min),
        (compile(r"(\d+)-(\d+) ans?"), AgeRule::Range),
    ]
});

// Group 2 is the millions marker.
static BUDGET_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"budget de (\d+)\s*(m\b|millions?\b)?\s*€?",
        r"moins de (\d+)\s*(m\b|millions?\b)?\s*€?",
        r"maximum (\d+)\s*(m\b|millions?\b)?\s*€?",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

static NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"comme (\w+(?:\s+\w+)*)",
        r"style (\w+(?:\s+\w+)*)",
        r"joueur (\w+(?:\s+\w+)*)",
    ]
    .into_iter()
    .map(compile)
    .collect()
});

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// What a request asks for. Serialized with the API's criteria keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(rename = "minAge", skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u32>,
    #[serde(rename = "maxAge", skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
    /// Euros.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assists_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tackles_min: Option<f64>,
    #[serde(rename = "playerName", skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl SearchCriteria {
    /// The search the assistant runs: priced players only, ten results.
    pub fn to_filter(&self) -> PlayerFilter {
        let at_least = |v: Option<f64>| v.map(StatRange::at_least).unwrap_or_default();
        PlayerFilter {
            style: self.style.clone(),
            position: self.position.map(|p| p.code().to_string()),
            player_name: self.player_name.clone(),
            min_age: self.min_age,
            max_age: self.max_age,
            budget: self.budget,
            goals: at_least(self.goals_min),
            assists: at_least(self.assists_min),
            tackles: at_least(self.tackles_min),
            priced_only: true,
            sort_order: self.sort_order,
            limit: CHAT_RESULT_LIMIT,
            ..PlayerFilter::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Search,
    Compare,
    Help,
}

pub fn analyze_intent(message: &str) -> Intent {
    let msg = message.to_lowercase();
    let has_any = |words: &[&str]| words.iter().any(|w| msg.contains(w));
    if has_any(&["cherche", "trouve", "veux", "besoin"]) {
        Intent::Search
    } else if has_any(&["compare", "différence", "versus"]) {
        Intent::Compare
    } else if has_any(&["aide", "comment", "expliquer"]) {
        Intent::Help
    } else {
        Intent::Search
    }
}

fn capture_u32(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

fn parse_age(msg: &str, criteria: &mut SearchCriteria) {
    for (re, rule) in AGE_PATTERNS.iter() {
        let Some(caps) = re.captures(msg) else {
            continue;
        };
        match rule {
            AgeRule::Max => criteria.max_age = capture_u32(&caps, 1),
            AgeRule::Min => criteria.min_age = capture_u32(&caps, 1),
            AgeRule::Range => {
                criteria.min_age = capture_u32(&caps, 1);
                criteria.max_age = capture_u32(&caps, 2);
            }
        }
        return;
    }
}

/// First budget phrase whose number is not an age.
fn parse_budget(msg: &str) -> Option<f64> {
    for re in BUDGET_PATTERNS.iter() {
        for caps in re.captures_iter(msg) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if msg[whole.end()..].trim_start().starts_with("an") {
                continue;
            }
            let Ok(value) = caps[1].parse::<f64>() else {
                continue;
            };
            let in_millions = caps.get(2).is_some() || value < 1000.0;
            return Some(if in_millions { value * 1_000_000.0 } else { value });
        }
    }
    None
}

fn parse_player_name(msg: &str) -> Option<String> {
    let caps = NAME_PATTERNS.iter().find_map(|re| re.captures(msg))?;
    let name = caps[1].trim();
    (name.split_whitespace().count() <= 3).then(|| name.to_string())
}

/// Extract search criteria from a free-text request.
///
/// Matching runs on the lowercased message, so any player name comes back
/// lowercased; the name filter ignores case.
pub fn parse_message(message: &str) -> SearchCriteria {
    let msg = message.to_lowercase();
    let mut criteria = SearchCriteria::default();

    parse_age(&msg, &mut criteria);
    criteria.budget = parse_budget(&msg);
    criteria.position = POSITION_KEYWORDS
        .iter()
        .find(|(kw, _)| msg.contains(kw))
        .map(|(_, pos)| *pos);
    criteria.style = STYLE_KEYWORDS
        .iter()
        .find(|(kw, _)| msg.contains(kw))
        .map(|(_, style)| style.to_string());

    if msg.contains("buteur") || msg.contains("buts") {
        criteria.goals_min = Some(5.0);
    }
    if msg.contains("passeur") || msg.contains("assists") {
        criteria.assists_min = Some(3.0);
    }
    if msg.contains("défenseur") || msg.contains("tacles") {
        criteria.tackles_min = Some(30.0);
    }

    criteria.player_name = parse_player_name(&msg);
    criteria.sort_order = SortOrder::Desc;

    debug!(?criteria, "parsed chat request");
    criteria
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

fn position_name(position: Position) -> &'static str {
    match position {
        Position::Forward => "attaquant",
        Position::Midfielder => "milieu de terrain",
        Position::Defender => "défenseur",
        Position::Goalkeeper => "gardien",
    }
}

fn no_results_reply(criteria: &SearchCriteria) -> String {
    let mut suggestions = Vec::new();
    if criteria.max_age.is_some_and(|a| a < 20) {
        suggestions.push("Essayez d'augmenter l'âge maximum");
    }
    if criteria.budget.is_some_and(|b| b < 10_000_000.0) {
        suggestions.push("Considérez un budget plus élevé");
    }
    if criteria.goals_min.is_some_and(|g| g > 10.0) {
        suggestions.push("Réduisez le nombre minimum de buts");
    }

    let mut reply = String::from("Aucun joueur ne correspond exactement à vos critères.");
    if !suggestions.is_empty() {
        reply.push_str("\n\nSuggestions :\n• ");
        reply.push_str(&suggestions.join("\n• "));
    }
    reply.push_str("\n\nEssayez de reformuler votre demande ou d'ajuster vos critères.");
    reply
}

fn describe_player(rank: usize, player: &Player) -> String {
    let age = player
        .age
        .map(|a| a.to_string())
        .unwrap_or_else(|| "?".to_string());
    format!(
        "\n{rank}. **{}** ({age} ans, {})\n   • Position: {}\n   • Style: {}\n   • Valeur: {}\n   • Stats: {:.0} buts, {:.0} assists",
        player.name,
        player.squad,
        player.position,
        player.style,
        format_market_value(numeric(player.market_value)),
        numeric(player.goals),
        numeric(player.assists),
    )
}

/// Phrase the answer to a search: count, recognised criteria and the top
/// three players, or advice when nothing matched.
pub fn compose_reply(criteria: &SearchCriteria, players: &[Player]) -> String {
    if players.is_empty() {
        return no_results_reply(criteria);
    }

    let mut parts = Vec::new();
    match criteria.position {
        Some(pos) => parts.push(format!("J'ai trouvé {} {}(s)", players.len(), position_name(pos))),
        None => parts.push(format!("J'ai trouvé {} joueur(s)", players.len())),
    }

    let mut recognised = Vec::new();
    if let Some(max) = criteria.max_age {
        recognised.push(format!("moins de {max} ans"));
    }
    if let Some(min) = criteria.min_age {
        recognised.push(format!("plus de {min} ans"));
    }
    if let Some(style) = &criteria.style {
        recognised.push(format!("style {style}"));
    }
    if let Some(budget) = criteria.budget {
        recognised.push(format!("budget max {:.0}M€", budget / 1_000_000.0));
    }
    if !recognised.is_empty() {
        parts.push(format!("correspondant à vos critères : {}", recognised.join(", ")));
    }

    parts.push("\n\n**Mes recommandations principales :**".to_string());
    for (i, player) in players.iter().take(FEATURED_IN_REPLY).enumerate() {
        parts.push(describe_player(i + 1, player));
    }
    if players.len() > FEATURED_IN_REPLY {
        parts.push(format!(
            "\nEt {} autre(s) joueur(s) dans les résultats complets.",
            players.len() - FEATURED_IN_REPLY
        ));
    }
    parts.join(" ")
}

/// A full answer to one chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub criteria: SearchCriteria,
    pub intent: Intent,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Answer `message` against a local pool.
pub fn answer(message: &str, pool: &[Player]) -> ChatReply {
    let intent = analyze_intent(message);
    let starters = || -> Vec<String> { CONVERSATION_STARTERS.iter().map(|s| s.to_string()).collect() };

    if intent == Intent::Help {
        return ChatReply {
            response: HELP_TEXT.to_string(),
            players: Vec::new(),
            criteria: SearchCriteria::default(),
            intent,
            suggestions: starters(),
        };
    }

    let criteria = parse_message(message);
    let players = criteria.to_filter().apply(pool);
    debug!(found = players.len(), "chat search complete");
    let suggestions = if players.is_empty() { starters() } else { Vec::new() };
    ChatReply {
        response: compose_reply(&criteria, &players),
        players,
        criteria,
        intent,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_phrases() {
        assert_eq!(parse_message("un attaquant de moins de 25 ans").max_age, Some(25));
        assert_eq!(parse_message("plus de 30 ans").min_age, Some(30));

        let between = parse_message("un milieu entre 20 et 24 ans");
        assert_eq!((between.min_age, between.max_age), (Some(20), Some(24)));

        let dash = parse_message("gardien 28-33 ans");
        assert_eq!((dash.min_age, dash.max_age), (Some(28), Some(33)));

        assert_eq!(parse_message("21 ans maximum").max_age, Some(21));
        assert_eq!(parse_message("27 ans minimum").min_age, Some(27));
    }

    #[test]
    fn first_age_pattern_wins() {
        let c = parse_message("moins de 23 ans, plus de 18 ans");
        assert_eq!(c.max_age, Some(23));
        assert_eq!(c.min_age, None);
    }

    #[test]
    fn budget_phrases() {
        assert_eq!(parse_message("budget de 40m€").budget, Some(40_000_000.0));
        assert_eq!(parse_message("budget de 500000").budget, Some(500_000.0));
        assert_eq!(
            parse_message("Quel défenseur solide pour moins de 20 millions d'euros ?").budget,
            Some(20_000_000.0)
        );
        assert_eq!(parse_message("maximum 15").budget, Some(15_000_000.0));
        assert_eq!(parse_message("un ailier").budget, None);
    }

    #[test]
    fn age_numbers_are_not_budgets() {
        let c = parse_message("Je cherche un attaquant rapide de moins de 25 ans");
        assert_eq!(c.max_age, Some(25));
        assert_eq!(c.budget, None);

        let both = parse_message("moins de 25 ans et moins de 30m€");
        assert_eq!(both.max_age, Some(25));
        assert_eq!(both.budget, Some(30_000_000.0));
    }

    #[test]
    fn position_and_style_keywords() {
        let c = parse_message("Je cherche un attaquant rapide");
        assert_eq!(c.position, Some(Position::Forward));
        assert_eq!(c.style.as_deref(), Some("jeu direct"));

        let c = parse_message("Trouvez-moi un milieu créatif avec de bonnes passes");
        assert_eq!(c.position, Some(Position::Midfielder));
        assert_eq!(c.style.as_deref(), Some("jeu positionnel"));

        let c = parse_message("un Défenseur physique");
        assert_eq!(c.position, Some(Position::Defender));
        assert_eq!(c.style.as_deref(), Some("pressing intense"));
        assert_eq!(c.tackles_min, Some(30.0));

        assert_eq!(parse_message("Cherchez un gardien").position, Some(Position::Goalkeeper));
        assert_eq!(parse_message("bonjour").position, None);
    }

    #[test]
    fn stat_keywords() {
        let c = parse_message("un buteur et passeur");
        assert_eq!(c.goals_min, Some(5.0));
        assert_eq!(c.assists_min, Some(3.0));
        assert_eq!(c.tackles_min, None);
    }

    #[test]
    fn player_name_phrases() {
        assert_eq!(
            parse_message("Je veux un joueur comme Mbappé").player_name.as_deref(),
            Some("mbappé")
        );
        assert_eq!(
            parse_message("un joueur comme vinicius junior").player_name.as_deref(),
            Some("vinicius junior")
        );
        // First matching phrase is too long, so no name at all.
        assert_eq!(
            parse_message("Je cherche un joueur rapide de moins de 25 ans").player_name,
            None
        );
    }

    #[test]
    fn intents() {
        assert_eq!(analyze_intent("Je cherche un ailier"), Intent::Search);
        assert_eq!(analyze_intent("Compare Saka et Foden"), Intent::Compare);
        assert_eq!(analyze_intent("aide"), Intent::Help);
        assert_eq!(analyze_intent("bonjour"), Intent::Search);
        assert_eq!(analyze_intent("je cherche de l'aide"), Intent::Search);
    }

    #[test]
    fn criteria_become_a_priced_ten_result_filter() {
        let c = parse_message("un attaquant rapide de moins de 25 ans, budget de 50m");
        let f = c.to_filter();
        assert!(f.priced_only);
        assert_eq!(f.limit, CHAT_RESULT_LIMIT);
        assert_eq!(f.position.as_deref(), Some("FW"));
        assert_eq!(f.max_age, Some(25));
        assert_eq!(f.budget, Some(50_000_000.0));
        assert_eq!(f.style.as_deref(), Some("jeu direct"));
    }

    #[test]
    fn criteria_serialize_with_api_keys() {
        let c = parse_message("moins de 21 ans");
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["maxAge"], 21);
        assert_eq!(v["sort_order"], "desc");
        assert!(v.get("budget").is_none());
    }

    fn forward(id: i64, name: &str, age: u32, value: f64) -> Player {
        Player {
            age: Some(age),
            position: "FW".into(),
            squad: "Club".into(),
            style: "jeu direct".into(),
            market_value: Some(value),
            goals: Some(12.0),
            assists: Some(4.0),
            ..Player::named(id, name)
        }
    }

    #[test]
    fn reply_lists_top_three_and_the_rest() {
        let players: Vec<Player> = (1..=5)
            .map(|i| forward(i, &format!("Forward {i}"), 22, 10e6 * i as f64))
            .collect();
        let criteria = parse_message("un attaquant rapide de moins de 25 ans");
        let reply = compose_reply(&criteria, &players);
        assert!(reply.starts_with("J'ai trouvé 5 attaquant(s)"));
        assert!(reply.contains("moins de 25 ans, style jeu direct"));
        assert!(reply.contains("1. **Forward 1** (22 ans, Club)"));
        assert!(reply.contains("3. **Forward 3**"));
        assert!(!reply.contains("Forward 4"));
        assert!(reply.contains("Et 2 autre(s) joueur(s)"));
        assert!(reply.contains("Valeur: 10.0M€"));
        assert!(reply.contains("Stats: 12 buts, 4 assists"));
    }

    #[test]
    fn empty_reply_suggests_relaxing_criteria() {
        let criteria = SearchCriteria {
            max_age: Some(18),
            budget: Some(5_000_000.0),
            goals_min: Some(15.0),
            ..SearchCriteria::default()
        };
        let reply = compose_reply(&criteria, &[]);
        assert!(reply.starts_with("Aucun joueur"));
        assert!(reply.contains("Essayez d'augmenter l'âge maximum"));
        assert!(reply.contains("Considérez un budget plus élevé"));
        assert!(reply.contains("Réduisez le nombre minimum de buts"));

        let plain = compose_reply(&SearchCriteria::default(), &[]);
        assert!(!plain.contains("Suggestions"));
    }

    #[test]
    fn answer_runs_the_search() {
        let pool = vec![
            forward(1, "Young", 21, 40e6),
            forward(2, "Veteran", 33, 20e6),
            Player {
                market_value: Some(0.0),
                ..forward(3, "Unpriced", 20, 0.0)
            },
        ];
        let reply = answer("Je cherche un attaquant de moins de 25 ans", &pool);
        assert_eq!(reply.intent, Intent::Search);
        let ids: Vec<i64> = reply.players.iter().map(|p| p.player_id).collect();
        assert_eq!(ids, vec![1]);
        assert!(reply.suggestions.is_empty());

        let help = answer("comment ça marche ?", &pool);
        assert_eq!(help.intent, Intent::Help);
        assert!(help.players.is_empty());
        assert_eq!(help.suggestions.len(), conversation_starters().len());
    }
}
