//! Label types carried by the layout graph, plus the typed layout configuration.

use crate::graphlib::{EdgeKey, Graph};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub type LayoutGraph = Graph<NodeLabel, EdgeLabel, GraphLabel>;

/// Direction in which ranks advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl RankDir {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "tb" => Self::TB,
            "bt" => Self::BT,
            "lr" => Self::LR,
            "rl" => Self::RL,
            other => {
                tracing::debug!(rankdir = other, "unknown rankdir, using tb");
                Self::default()
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TB => "tb",
            Self::BT => "bt",
            Self::LR => "lr",
            Self::RL => "rl",
        }
    }

    /// Whether ranks advance horizontally.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LR | Self::RL)
    }
}

/// Rank assignment algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Ranker {
    #[default]
    NetworkSimplex,
    TightTree,
    LongestPath,
}

impl Ranker {
    /// Parses a ranker name. Unknown names select the network simplex ranker.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "network-simplex" => Self::NetworkSimplex,
            "tight-tree" => Self::TightTree,
            "longest-path" => Self::LongestPath,
            other => {
                tracing::debug!(ranker = other, "unknown ranker, using network-simplex");
                Self::default()
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NetworkSimplex => "network-simplex",
            Self::TightTree => "tight-tree",
            Self::LongestPath => "longest-path",
        }
    }
}

/// Feedback arc set heuristic used to break cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Acyclicer {
    Greedy,
    #[default]
    Dfs,
}

impl Acyclicer {
    /// `"greedy"` selects the weighted greedy heuristic; anything else selects DFS.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("greedy") {
            Self::Greedy
        } else {
            Self::Dfs
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Dfs => "dfs",
        }
    }
}

/// One of the four Brandes-Köpf sweep directions: vertical (`u`p/`d`own) then horizontal
/// (`l`eft/`r`ight).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Align {
    UL,
    UR,
    DL,
    DR,
}

impl Align {
    pub const ALL: [Align; 4] = [Align::UL, Align::UR, Align::DL, Align::DR];

    /// Parses an alignment code. Unknown codes yield `None`, which means "balance all four".
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ul" => Some(Self::UL),
            "ur" => Some(Self::UR),
            "dl" => Some(Self::DL),
            "dr" => Some(Self::DR),
            other => {
                tracing::debug!(align = other, "unknown align, balancing all alignments");
                None
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UL => "ul",
            Self::UR => "ur",
            Self::DL => "dl",
            Self::DR => "dr",
        }
    }

    pub fn is_up(self) -> bool {
        matches!(self, Self::UL | Self::UR)
    }

    pub fn is_left(self) -> bool {
        matches!(self, Self::UL | Self::DL)
    }
}

macro_rules! string_conversions {
    ($($ty:ty),*) => {$(
        impl From<String> for $ty {
            fn from(name: String) -> Self {
                Self::from_name(&name)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

string_conversions!(RankDir, Ranker, Acyclicer);

impl From<Align> for String {
    fn from(value: Align) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn deserialize_align<'de, D>(deserializer: D) -> Result<Option<Align>, D::Error>
where
    D: Deserializer<'de>,
{
    let name: Option<String> = Option::deserialize(deserializer)?;
    Ok(name.as_deref().and_then(Align::from_name))
}

/// Graph-level label: layout configuration plus bookkeeping written by the stages.
///
/// Deserializing accepts partial input; missing fields take their defaults and unknown
/// enum names fall back as described on each enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphLabel {
    pub rankdir: RankDir,
    #[serde(deserialize_with = "deserialize_align")]
    pub align: Option<Align>,
    pub ranker: Ranker,
    pub acyclicer: Acyclicer,
    pub nodesep: f64,
    pub edgesep: f64,
    pub ranksep: f64,
    pub marginx: f64,
    pub marginy: f64,

    /// Width of the laid out drawing, including margins.
    #[serde(skip_deserializing)]
    pub width: Option<f64>,
    /// Height of the laid out drawing, including margins.
    #[serde(skip_deserializing)]
    pub height: Option<f64>,

    #[serde(skip)]
    pub dummy_chains: Vec<String>,
    #[serde(skip)]
    pub nesting_root: Option<String>,
    #[serde(skip)]
    pub node_rank_factor: Option<i32>,
    #[serde(skip)]
    pub max_rank: Option<i32>,
    #[serde(skip)]
    pub next_dummy_id: usize,
}

impl Default for GraphLabel {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            align: None,
            ranker: Ranker::NetworkSimplex,
            acyclicer: Acyclicer::Dfs,
            nodesep: 50.0,
            edgesep: 20.0,
            ranksep: 50.0,
            marginx: 0.0,
            marginy: 0.0,
            width: None,
            height: None,
            dummy_chains: Vec::new(),
            nesting_root: None,
            node_rank_factor: None,
            max_rank: None,
            next_dummy_id: 0,
        }
    }
}

/// Side of a subgraph a border node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderType {
    Top,
    Bottom,
    Left,
    Right,
}

/// Synthetic node kinds. Each variant carries what its stage needs to undo itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Dummy {
    /// One rank segment of a long edge.
    Edge { edge: EdgeKey, label: Box<EdgeLabel> },
    /// The segment of a long edge that carries the edge label.
    EdgeLabel { edge: EdgeKey, label: Box<EdgeLabel> },
    Border(BorderType),
    /// Placeholder to the right of a node with a self-loop.
    SelfEdge { edge: EdgeKey, label: Box<EdgeLabel> },
    /// Marks the rank an edge label should land on while ranks are being cleaned up.
    EdgeProxy { edge: EdgeKey },
    /// Root of the nesting graph.
    Root,
}

impl Dummy {
    /// The original edge a chain or placeholder dummy stands in for.
    pub fn edge(&self) -> Option<&EdgeKey> {
        match self {
            Self::Edge { edge, .. }
            | Self::EdgeLabel { edge, .. }
            | Self::SelfEdge { edge, .. }
            | Self::EdgeProxy { edge } => Some(edge),
            Self::Border(_) | Self::Root => None,
        }
    }

    pub fn edge_label(&self) -> Option<&EdgeLabel> {
        match self {
            Self::Edge { label, .. } | Self::EdgeLabel { label, .. } | Self::SelfEdge { label, .. } => {
                Some(label)
            }
            Self::Border(_) | Self::EdgeProxy { .. } | Self::Root => None,
        }
    }

    pub fn border_type(&self) -> Option<BorderType> {
        match self {
            Self::Border(side) => Some(*side),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rank: Option<i32>,
    pub order: Option<usize>,
    pub dummy: Option<Dummy>,

    // Subgraph bookkeeping.
    pub min_rank: Option<i32>,
    pub max_rank: Option<i32>,
    pub border_top: Option<String>,
    pub border_bottom: Option<String>,
    /// Left border node per rank, indexed by rank.
    pub border_left: Vec<Option<String>>,
    /// Right border node per rank, indexed by rank.
    pub border_right: Vec<Option<String>>,

    pub self_edges: Vec<SelfEdge>,
    pub extras: BTreeMap<String, serde_json::Value>,
}

impl NodeLabel {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.dummy.is_some()
    }

    /// Label position of an edge-label dummy.
    pub fn labelpos(&self) -> Option<LabelPos> {
        match &self.dummy {
            Some(Dummy::EdgeLabel { label, .. }) => Some(label.labelpos),
            _ => None,
        }
    }

    pub fn border_type(&self) -> Option<BorderType> {
        self.dummy.as_ref().and_then(Dummy::border_type)
    }

    pub fn center(&self) -> Option<Point> {
        Some(Point {
            x: self.x?,
            y: self.y?,
        })
    }
}

/// Where an edge label sits relative to the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelPos {
    #[serde(rename = "l")]
    L,
    #[serde(rename = "c")]
    C,
    #[default]
    #[serde(rename = "r")]
    R,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub width: f64,
    pub height: f64,
    pub labelpos: LabelPos,
    pub labeloffset: f64,
    pub label_rank: Option<i32>,
    pub minlen: i32,
    pub weight: f64,
    pub nesting_edge: bool,
    pub reversed: bool,
    pub forward_name: Option<String>,
    pub extras: BTreeMap<String, serde_json::Value>,

    pub x: Option<f64>,
    pub y: Option<f64>,
    pub points: Vec<Point>,
}

impl EdgeLabel {
    pub fn with_weight(weight: f64) -> Self {
        Self {
            weight,
            ..Default::default()
        }
    }

    pub fn with_minlen(minlen: i32) -> Self {
        Self {
            minlen,
            ..Default::default()
        }
    }

    /// Whether the label occupies space that must be laid out.
    pub fn has_label(&self) -> bool {
        self.width != 0.0 && self.height != 0.0
    }
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            labelpos: LabelPos::R,
            labeloffset: 10.0,
            label_rank: None,
            minlen: 1,
            weight: 1.0,
            nesting_edge: false,
            reversed: false,
            forward_name: None,
            extras: BTreeMap::new(),
            x: None,
            y: None,
            points: Vec::new(),
        }
    }
}

/// A self-loop stashed on its node while the rest of the pipeline runs.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfEdge {
    pub edge: EdgeKey,
    pub label: EdgeLabel,
}
