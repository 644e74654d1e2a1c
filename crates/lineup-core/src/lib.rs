//! Core domain model for lineup.
//!
//! This crate defines the music-streaming entities (Band, Album, Song,
//! Artist, Membership, Stream), the [`Catalog`](storage::Catalog) storage
//! trait they are persisted through, and the two derived queries built on
//! top: [`query::band_formation`] and [`query::song_revenue`].
//!
//! No database binding lives here. `lineup-sqlite` provides one; the
//! in-memory [`storage::memory::MemoryCatalog`] is another, and the
//! queries are written against the trait so they run unchanged on either.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod query;
pub mod storage;

pub use error::{Error, Result};
