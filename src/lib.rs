//! RVP Poll - a satirical public-opinion tracker
//!
//! This crate serves the backend for a single-page poll site: a news
//! aggregation endpoint over syndication feeds and a SQLite-backed voting
//! store with daily trend data.

pub mod config;
pub mod db;
pub mod fetcher;
pub mod news;
pub mod poll;
pub mod routes;
