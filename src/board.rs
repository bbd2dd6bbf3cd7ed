//! Board data model: nodes, connectors, and the live node-box table
//!
//! The board itself is owned by the host UI; this module carries the shapes
//! the engines consume, TOML (de)serialization for board files, and the
//! validation the engines are entitled to assume has already happened:
//! connector endpoints reference defined, distinct nodes, and no two
//! connectors link the same unordered node pair.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Rect;

/// Errors raised while loading or validating a board
#[derive(Error, Debug)]
pub enum BoardError {
    #[error("failed to read board file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse board TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("connector '{connector}' references undefined node '{node}'{}", format_suggestions(.suggestions))]
    UnknownNode {
        connector: String,
        node: String,
        suggestions: Vec<String>,
    },
    #[error("connector '{connector}' links node '{node}' to itself")]
    SelfLoop { connector: String, node: String },
    #[error("connectors '{first}' and '{second}' both link '{a}' and '{b}'")]
    DuplicateConnector {
        first: String,
        second: String,
        a: String,
        b: String,
    },
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean {}?)", suggestions.join(", "))
    }
}

/// A case node. Position and size are owned and mutated by the host UI; the
/// engines read them through [`NodeBoxes`] and only propose new positions as
/// layout output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Content tag (suspect, evidence, location, ...); opaque to the engines
    #[serde(default)]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Node {
    /// The node's current bounding box
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// A thread between two node ports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    pub id: String,
    pub from: String,
    pub to: String,
    /// Port name on the `from` node; unknown names resolve to center
    #[serde(default)]
    pub from_port: String,
    /// Port name on the `to` node; unknown names resolve to center
    #[serde(default)]
    pub to_port: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub arrow_left: bool,
    #[serde(default)]
    pub arrow_right: bool,
}

/// Live node-box table. The host updates it as nodes move or resize; both
/// engines borrow it read-only. A node missing from the table is simply
/// unavailable this frame.
#[derive(Debug, Clone, Default)]
pub struct NodeBoxes {
    boxes: HashMap<String, Rect>,
}

impl NodeBoxes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from a node collection
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let mut table = Self::new();
        for node in nodes {
            table.set(&node.id, node.rect());
        }
        table
    }

    /// Record the current box for a node
    pub fn set(&mut self, id: &str, rect: Rect) {
        self.boxes.insert(id.to_string(), rect);
    }

    /// Current box for a node, if available
    pub fn get(&self, id: &str) -> Option<Rect> {
        self.boxes.get(id).copied()
    }

    /// Drop a node's box (e.g. on node deletion)
    pub fn remove(&mut self, id: &str) {
        self.boxes.remove(id);
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// A complete board: the collections handed to the layout engine and used to
/// register connectors with the physics engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Board {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
}

impl Board {
    /// Load and validate a board from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, BoardError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load and validate a board from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, BoardError> {
        let board: Board = toml::from_str(content)?;
        board.validate()?;
        Ok(board)
    }

    /// Enforce the invariants the engines assume: unique ids, endpoints that
    /// resolve to defined and distinct nodes, and at most one connector per
    /// unordered node pair.
    pub fn validate(&self) -> Result<(), BoardError> {
        let mut node_ids: HashSet<&str> = HashSet::new();
        for node in &self.nodes {
            if !node_ids.insert(&node.id) {
                return Err(BoardError::DuplicateId {
                    kind: "node",
                    id: node.id.clone(),
                });
            }
        }

        let defined: HashSet<String> = self.nodes.iter().map(|n| n.id.clone()).collect();
        let mut connector_ids: HashSet<&str> = HashSet::new();
        let mut pairs: HashMap<(String, String), &str> = HashMap::new();

        for conn in &self.connectors {
            if !connector_ids.insert(&conn.id) {
                return Err(BoardError::DuplicateId {
                    kind: "connector",
                    id: conn.id.clone(),
                });
            }

            for endpoint in [&conn.from, &conn.to] {
                if !defined.contains(endpoint) {
                    return Err(BoardError::UnknownNode {
                        connector: conn.id.clone(),
                        node: endpoint.clone(),
                        suggestions: find_similar(&defined, endpoint, 2),
                    });
                }
            }

            if conn.from == conn.to {
                return Err(BoardError::SelfLoop {
                    connector: conn.id.clone(),
                    node: conn.from.clone(),
                });
            }

            let key = if conn.from <= conn.to {
                (conn.from.clone(), conn.to.clone())
            } else {
                (conn.to.clone(), conn.from.clone())
            };
            if let Some(first) = pairs.insert(key, &conn.id) {
                return Err(BoardError::DuplicateConnector {
                    first: first.to_string(),
                    second: conn.id.clone(),
                    a: conn.from.clone(),
                    b: conn.to.clone(),
                });
            }
        }

        Ok(())
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut dp = vec![vec![0usize; n + 1]; m + 1];

    for i in 0..=m {
        dp[i][0] = i;
    }
    for j in 0..=n {
        dp[0][j] = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = if a_chars[i - 1] == b_chars[j - 1] {
                0
            } else {
                1
            };
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
        }
    }

    dp[m][n]
}

/// Find defined node ids within a maximum edit distance of the target
fn find_similar(defined: &HashSet<String>, target: &str, max_distance: usize) -> Vec<String> {
    let mut candidates: Vec<(String, usize)> = defined
        .iter()
        .filter_map(|name| {
            let dist = levenshtein_distance(name, target);
            if dist <= max_distance && dist > 0 {
                Some((name.clone(), dist))
            } else {
                None
            }
        })
        .collect();

    candidates.sort_by(|(na, da), (nb, db)| da.cmp(db).then_with(|| na.cmp(nb)));
    candidates
        .into_iter()
        .map(|(name, _)| name)
        .take(3)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_board() -> &'static str {
        r#"
            [[nodes]]
            id = "suspect"
            kind = "person"
            x = 0.0
            y = 0.0
            w = 200.0
            h = 120.0

            [[nodes]]
            id = "warehouse"
            kind = "location"
            x = 400.0
            y = 0.0
            w = 200.0
            h = 120.0

            [[connectors]]
            id = "c1"
            from = "suspect"
            to = "warehouse"
            from_port = "right"
            to_port = "left"
            label = "seen at"
        "#
    }

    #[test]
    fn test_parse_board_toml() {
        let board = Board::from_toml(sample_board()).expect("should parse");
        assert_eq!(board.nodes.len(), 2);
        assert_eq!(board.connectors.len(), 1);
        assert_eq!(board.connectors[0].from_port, "right");
        assert_eq!(board.node("suspect").unwrap().w, 200.0);
    }

    #[test]
    fn test_connector_defaults() {
        let board = Board::from_toml(
            r#"
                [[nodes]]
                id = "a"
                x = 0.0
                y = 0.0
                w = 10.0
                h = 10.0

                [[nodes]]
                id = "b"
                x = 50.0
                y = 0.0
                w = 10.0
                h = 10.0

                [[connectors]]
                id = "c"
                from = "a"
                to = "b"
            "#,
        )
        .expect("should parse");

        let conn = &board.connectors[0];
        assert_eq!(conn.from_port, "");
        assert_eq!(conn.label, "");
        assert!(!conn.arrow_left);
        assert!(!conn.arrow_right);
    }

    #[test]
    fn test_unknown_node_with_suggestion() {
        let mut board = Board::from_toml(sample_board()).unwrap();
        board.connectors[0].to = "warehose".to_string();

        let err = board.validate().unwrap_err();
        match err {
            BoardError::UnknownNode {
                node, suggestions, ..
            } => {
                assert_eq!(node, "warehose");
                assert_eq!(suggestions, vec!["warehouse".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut board = Board::from_toml(sample_board()).unwrap();
        board.connectors[0].to = "suspect".to_string();
        assert!(matches!(
            board.validate(),
            Err(BoardError::SelfLoop { .. })
        ));
    }

    #[test]
    fn test_duplicate_pair_rejected_both_directions() {
        let mut board = Board::from_toml(sample_board()).unwrap();
        let mut dup = board.connectors[0].clone();
        dup.id = "c2".to_string();
        // Reversed direction still collides on the unordered pair
        std::mem::swap(&mut dup.from, &mut dup.to);
        board.connectors.push(dup);

        assert!(matches!(
            board.validate(),
            Err(BoardError::DuplicateConnector { .. })
        ));
    }

    #[test]
    fn test_duplicate_node_id_rejected() {
        let mut board = Board::from_toml(sample_board()).unwrap();
        let dup = board.nodes[0].clone();
        board.nodes.push(dup);
        assert!(matches!(
            board.validate(),
            Err(BoardError::DuplicateId { kind: "node", .. })
        ));
    }

    #[test]
    fn test_node_boxes_table() {
        let board = Board::from_toml(sample_board()).unwrap();
        let mut boxes = NodeBoxes::from_nodes(&board.nodes);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes.get("suspect"), Some(Rect::new(0.0, 0.0, 200.0, 120.0)));

        boxes.remove("suspect");
        assert_eq!(boxes.get("suspect"), None);
        assert_eq!(boxes.len(), 1);
    }

    #[test]
    fn test_invalid_toml_error() {
        let invalid = "this is not valid toml {{{{";
        assert!(matches!(Board::from_toml(invalid), Err(BoardError::Toml(_))));
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("hello", "hello"), 0);
        assert_eq!(levenshtein_distance("server", "servr"), 1);
        assert_eq!(levenshtein_distance("cat", "dog"), 3);
    }
}
