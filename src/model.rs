use serde::Serialize;

/// Reserved id of the synthetic top-level node. No dataset entity may use it.
pub const ROOT_ID: &str = "root";

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset_from(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Size of the drawing surface in logical (CSS-like) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }
}

/// In-memory representation of an entity (or the synthetic root), carrying
/// both its structural fields and its rendered position.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub parent_id: Option<String>,
    /// Number of registry entries whose parent is this node, fixed at load.
    pub child_count: usize,
    /// What the data provider claimed; kept for diagnostics only.
    pub reported_child_count: Option<usize>,
    pub position: Point,
    pub target: Point,
    pub highlighted: bool,
}

impl Node {
    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }

    pub fn is_expandable(&self) -> bool {
        self.child_count > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
