//! dragon-scales: hierarchical notebooks with chronological annotation
//! trails and versioned content blocks.
//!
//! The engine is split by concern:
//!
//! - [`client`]: the [`EntityGraphClient`](client::EntityGraphClient) boundary
//! - [`graph`]: id-indexed entity cache and subgraph loading
//! - [`tree`]: descendant skeletons for navigation
//! - [`merge`]: chronological comment/sub-entity interleaving
//! - [`versions`]: append-only content history
//! - [`activation`]: exclusive select/edit state per viewport
//! - [`view`]: a viewport over one entity tying the above together
//! - [`workspace`]: the in-process entity graph
//! - [`api`]: the HTTP surface

pub mod activation;
pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod graph;
pub mod merge;
pub mod models;
pub mod render;
pub mod tree;
pub mod versions;
pub mod view;
pub mod workspace;
