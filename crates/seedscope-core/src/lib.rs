pub mod best_score;
pub mod cache;
pub mod config;
pub mod errors;
pub mod fingerprint;
pub mod grouping;
pub mod model;
pub mod report;
pub mod repository;
pub mod score;
pub mod snapshot;
pub mod sort;
pub mod stats;
pub mod view;
