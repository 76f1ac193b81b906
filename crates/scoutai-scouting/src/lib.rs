// Scouting engine: similarity recommendations, criteria search, metrics,
// the team builder and the chat assistant, all over in-memory player pools.

pub mod chatbot;
pub mod comparison;
pub mod dashboard;
pub mod dataset;
pub mod draft;
pub mod features;
pub mod filters;
pub mod metrics;
pub mod recommend;
pub mod similarity;
