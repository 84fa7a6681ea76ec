//! Film catalog service: popularity rankings, shared likes, nearest-neighbour
//! recommendations and title/director search over a like-based rating store.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
