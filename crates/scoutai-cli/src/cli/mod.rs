//! Command-line interface definitions.

pub mod chat;
pub mod compare;
pub mod dashboard;
pub mod draft;
pub mod export;
pub mod favorites;
pub mod health;
pub mod history;
pub mod output;
pub mod recommend;
pub mod search;
pub mod session;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use scoutai_scouting::filters::{PlayerFilter, SortOrder, StatRange};

/// ScoutAI - player scouting, similarity recommendations and team building.
#[derive(Parser, Debug)]
#[command(name = "scoutai")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Read players from a CSV or JSON file instead of the API
    #[arg(long, global = true, value_name = "FILE")]
    pub players: Option<PathBuf>,

    /// Override log level (debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Players most similar to a reference player
    Recommend(RecommendArgs),

    /// Filter the player catalogue
    Search(SearchArgs),

    /// Ask the scouting assistant in natural language
    Chat(ChatArgs),

    /// Head-to-head comparison of two players
    Compare(CompareArgs),

    /// Performance metrics and radar values for one player
    Metrics(PlayerArg),

    /// Manage favorite players
    #[command(subcommand)]
    Favorites(FavoritesCommand),

    /// Recent searches and comparisons
    #[command(subcommand)]
    History(HistoryCommand),

    /// Build an eleven on a formation
    #[command(subcommand)]
    Draft(DraftCommand),

    /// Write players to a CSV file
    Export(ExportArgs),

    /// Catalogue overview: averages, distributions and most valuable players
    Dashboard,

    /// Check that the API is reachable
    Health,
}

/// Shared argument for commands that act on one player.
#[derive(Args, Debug)]
pub struct PlayerArg {
    /// Player id or name (case-insensitive, partial names allowed)
    pub player: String,
}

/// Arguments for the `recommend` subcommand.
#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Reference player id or name
    pub player: String,

    /// Number of recommendations (defaults to recommendations.top_k)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Show the per-component score breakdown
    #[arg(long)]
    pub explain: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortArg {
    Asc,
    Desc,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Asc => SortOrder::Asc,
            SortArg::Desc => SortOrder::Desc,
        }
    }
}

/// Arguments for the `search` subcommand.
#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Free-text query on name or club (recorded in the search history)
    pub query: Option<String>,

    /// Playing style, e.g. "jeu direct"
    #[arg(long)]
    pub style: Option<String>,

    /// Position code (FW, MF, DF, GK)
    #[arg(long)]
    pub position: Option<String>,

    /// Club name fragment (case-insensitive)
    #[arg(long)]
    pub squad: Option<String>,

    /// League or club name fragment
    #[arg(long)]
    pub league: Option<String>,

    /// Player name fragment
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub min_age: Option<u32>,

    #[arg(long)]
    pub max_age: Option<u32>,

    /// Maximum market value in euros
    #[arg(long)]
    pub budget: Option<f64>,

    #[arg(long)]
    pub min_goals: Option<f64>,

    #[arg(long)]
    pub max_goals: Option<f64>,

    #[arg(long)]
    pub min_assists: Option<f64>,

    #[arg(long)]
    pub max_assists: Option<f64>,

    #[arg(long)]
    pub min_xg: Option<f64>,

    #[arg(long)]
    pub max_xg: Option<f64>,

    #[arg(long)]
    pub min_tackles: Option<f64>,

    #[arg(long)]
    pub max_tackles: Option<f64>,

    /// Skip players without a market value
    #[arg(long)]
    pub priced_only: bool,

    /// Sort by market value
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Maximum number of results (defaults to search.default_results)
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

impl SearchArgs {
    /// Whether any structured criterion was given, as opposed to just a
    /// free-text query.
    pub fn has_criteria(&self) -> bool {
        self.style.is_some()
            || self.position.is_some()
            || self.squad.is_some()
            || self.league.is_some()
            || self.name.is_some()
            || self.min_age.is_some()
            || self.max_age.is_some()
            || self.budget.is_some()
            || self.min_goals.is_some()
            || self.max_goals.is_some()
            || self.min_assists.is_some()
            || self.max_assists.is_some()
            || self.min_xg.is_some()
            || self.max_xg.is_some()
            || self.min_tackles.is_some()
            || self.max_tackles.is_some()
            || self.priced_only
    }

    /// Build the filter, capping the limit at `max_results`.
    pub fn to_filter(&self, default_results: usize, max_results: usize) -> PlayerFilter {
        PlayerFilter {
            style: self.style.clone(),
            position: self.position.clone(),
            squad: self.squad.clone(),
            league: self.league.clone(),
            player_name: self.name.clone(),
            min_age: self.min_age,
            max_age: self.max_age,
            budget: self.budget,
            goals: StatRange {
                min: self.min_goals,
                max: self.max_goals,
            },
            assists: StatRange {
                min: self.min_assists,
                max: self.max_assists,
            },
            xg: StatRange {
                min: self.min_xg,
                max: self.max_xg,
            },
            tackles: StatRange {
                min: self.min_tackles,
                max: self.max_tackles,
            },
            priced_only: self.priced_only,
            sort_order: self.sort.map(SortOrder::from).unwrap_or_default(),
            limit: self.limit.unwrap_or(default_results).min(max_results),
        }
    }
}

/// Arguments for the `chat` subcommand.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// The question, e.g. "un attaquant rapide de moins de 25 ans"
    #[arg(required_unless_present = "suggestions", num_args = 1..)]
    pub message: Vec<String>,

    /// Print example questions instead
    #[arg(long)]
    pub suggestions: bool,

    /// Print the raw reply as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `compare` subcommand.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// First player id or name
    pub left: String,

    /// Second player id or name
    pub right: String,

    /// Do not record the comparison in the history
    #[arg(long)]
    pub no_save: bool,
}

/// Subcommands for `scoutai favorites`
#[derive(Subcommand, Debug)]
pub enum FavoritesCommand {
    /// List favorite players
    List,
    /// Add a player to the favorites
    Add(FavoriteAddArgs),
    /// Remove a player by name
    Remove(FavoriteNameArg),
    /// Replace the notes on a favorite
    Note(FavoriteNoteArgs),
}

#[derive(Args, Debug)]
pub struct FavoriteAddArgs {
    /// Player id or name
    pub player: String,

    /// Scouting notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct FavoriteNameArg {
    /// Exact player name as stored in the favorites
    pub name: String,
}

#[derive(Args, Debug)]
pub struct FavoriteNoteArgs {
    /// Exact player name as stored in the favorites
    pub name: String,

    /// New notes text
    pub notes: String,
}

/// Subcommands for `scoutai history`
#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// Recent search queries
    Searches,
    /// Recent comparisons
    Comparisons(ComparisonsArgs),
    /// Forget one search query
    Remove(HistoryQueryArg),
    /// Forget all search queries
    Clear,
}

#[derive(Args, Debug)]
pub struct ComparisonsArgs {
    #[arg(short = 'n', long, default_value = "50")]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct HistoryQueryArg {
    pub query: String,
}

/// Subcommands for `scoutai draft`
#[derive(Subcommand, Debug)]
pub enum DraftCommand {
    /// Start a new board, replacing the one in progress
    New(DraftNewArgs),
    /// Show the board in progress, or a saved team
    Show(DraftShowArgs),
    /// Put a player in a slot
    Place(DraftPlaceArgs),
    /// Put a player in the first open slot for their position
    Add(PlayerArg),
    /// Empty a slot
    Remove(DraftSlotArg),
    /// Switch formation
    Formation(DraftFormationArg),
    /// Empty the whole board
    Reset,
    /// Save the board in progress under its team name
    Save,
    /// Load a saved team into the board in progress
    Load(DraftTeamArg),
    /// List saved teams
    List,
    /// Delete a saved team
    Delete(DraftTeamArg),
}

#[derive(Args, Debug)]
pub struct DraftNewArgs {
    /// Team name
    pub team: String,

    #[arg(short, long, default_value = "4-3-3")]
    pub formation: String,
}

#[derive(Args, Debug)]
pub struct DraftShowArgs {
    /// Saved team to show instead of the board in progress
    #[arg(long)]
    pub team: Option<String>,
}

#[derive(Args, Debug)]
pub struct DraftPlaceArgs {
    /// Slot name, e.g. ST or CB1
    pub slot: String,

    /// Player id or name
    pub player: String,
}

#[derive(Args, Debug)]
pub struct DraftSlotArg {
    pub slot: String,
}

#[derive(Args, Debug)]
pub struct DraftFormationArg {
    /// Formation name (4-3-3 or 4-4-2)
    pub formation: String,
}

#[derive(Args, Debug)]
pub struct DraftTeamArg {
    pub team: String,
}

/// Arguments for the `export` subcommand.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output CSV path
    pub output: PathBuf,

    /// Export the favorites instead of the whole catalogue
    #[arg(long)]
    pub favorites: bool,
}
