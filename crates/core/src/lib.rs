//! Core aggregation logic for Fiscus.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. The upstream snapshot stores are reached through the
//! collaborator traits in [`home::sources`], implemented by the db crate.
//!
//! # Modules
//!
//! - `home` - Home dashboard aggregation (totals and real-vs-projected
//!   comparison tables)

pub mod home;
