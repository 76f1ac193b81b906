// Library root for the shared scouting data model, configuration and local
// persistence.

pub mod config;
pub mod db;
pub mod player;
