#![warn(clippy::all, missing_docs)]

//! Core domain logic for the bowling hall manager.
//!
//! This crate hosts the entity models, lane-reservation rules,
//! in-memory registries, configuration handling, and flat-file
//! persistence layers used by interactive frontends.

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod scoring;
pub mod service;
pub mod storage;

pub use config::HallConfig;
pub use error::HallError;
pub use models::{Lane, Match, Member};
pub use repository::HallRepository;
pub use scoring::{RandomScores, ScoreSource};
pub use service::HallService;
pub use storage::HallStorage;
