pub mod auth;
pub mod entries;
pub mod habits;
pub mod health;
pub mod stats;
