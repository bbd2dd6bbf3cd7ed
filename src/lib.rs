//! Threadboard - the connector core of an investigation board
//!
//! This library provides the two simulation engines behind an evidence
//! board's "red string" connectors: a per-frame string physics engine that
//! renders each connector as a sagging thread between node anchors, and a
//! cluster layout engine that declutters the graph around a chosen focal
//! node. Node content, persistence, and drawing belong to the host UI; the
//! core consumes node boxes and produces point positions.
//!
//! # Example
//!
//! ```rust
//! use threadboard::board::{Board, NodeBoxes};
//! use threadboard::physics::StringPhysics;
//!
//! let board = Board::from_toml(r#"
//!     [[nodes]]
//!     id = "suspect"
//!     x = 0.0
//!     y = 0.0
//!     w = 200.0
//!     h = 120.0
//!
//!     [[nodes]]
//!     id = "warehouse"
//!     x = 400.0
//!     y = 0.0
//!     w = 200.0
//!     h = 120.0
//!
//!     [[connectors]]
//!     id = "thread"
//!     from = "suspect"
//!     to = "warehouse"
//!     from_port = "right"
//!     to_port = "left"
//! "#).unwrap();
//!
//! let boxes = NodeBoxes::from_nodes(&board.nodes);
//! let mut physics = StringPhysics::new();
//! for conn in &board.connectors {
//!     physics.register(conn, &boxes);
//! }
//! physics.step(&boxes);
//!
//! let strand = physics.polyline("thread").unwrap();
//! assert_eq!(strand.points.len(), 9);
//! ```

pub mod anchor;
pub mod board;
pub mod geometry;
pub mod layout;
pub mod physics;

pub use anchor::{closest_pair, Anchor};
pub use board::{Board, BoardError, Connector, Node, NodeBoxes};
pub use geometry::{Point, Rect};
pub use layout::{layout, layout_with_config, LayoutConfig, LayoutOutcome};
pub use physics::{PhysicsConfig, RegisterOutcome, StringPhysics, MAX_CONNECTIONS, POINTS_COUNT};
