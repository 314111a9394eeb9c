use crate::error::NavigationError;
use crate::model::{Edge, ROOT_ID};
use crate::registry::Registry;
use std::collections::HashSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavMode {
    Overview,
    Drilled(String),
}

/// Navigation cursor plus the node/edge sets derived from it.
///
/// `visible` and `edges` are rebuilt from scratch on every cursor change.
#[derive(Debug, Clone)]
pub struct Navigation {
    mode: NavMode,
    visible: Vec<String>,
    edges: Vec<Edge>,
    ancestors: Vec<String>,
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            mode: NavMode::Overview,
            visible: vec![ROOT_ID.to_string()],
            edges: Vec::new(),
            ancestors: Vec::new(),
        }
    }
}

impl Navigation {
    pub fn new(registry: &mut Registry) -> Self {
        let mut nav = Self::default();
        nav.show(registry, None);
        nav
    }

    pub fn mode(&self) -> &NavMode {
        &self.mode
    }

    pub fn current_parent(&self) -> Option<&str> {
        match &self.mode {
            NavMode::Overview => None,
            NavMode::Drilled(id) => Some(id.as_str()),
        }
    }

    pub fn is_overview(&self) -> bool {
        matches!(self.mode, NavMode::Overview)
    }

    pub fn visible(&self) -> &[String] {
        &self.visible
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Ancestors of the current parent, root-exclusive, in root-to-current order.
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.iter().any(|v| v == id)
    }

    pub fn drill_into(&mut self, registry: &mut Registry, node_id: &str) -> Result<(), NavigationError> {
        let node = registry
            .find_by_id(node_id)
            .ok_or_else(|| NavigationError::UnknownNode(node_id.to_string()))?;
        if !node.is_expandable() {
            return Err(NavigationError::NotExpandable(node_id.to_string()));
        }
        if node.is_root() {
            self.show(registry, None);
        } else {
            self.show(registry, Some(node_id));
        }
        Ok(())
    }

    pub fn go_back(&mut self, registry: &mut Registry) -> Result<(), NavigationError> {
        let current = self.current_parent().ok_or(NavigationError::AtOverview)?;
        let target = registry
            .find_by_id(current)
            .and_then(|node| node.parent_id.clone())
            .filter(|id| id != ROOT_ID);
        self.show(registry, target.as_deref());
        Ok(())
    }

    /// Moves the cursor without validation and recomputes the derived sets.
    /// An unknown parent id falls back to the overview.
    pub fn show(&mut self, registry: &mut Registry, parent: Option<&str>) {
        let parent = match parent {
            Some(id) if id != ROOT_ID && registry.find_by_id(id).is_some() => Some(id),
            Some(id) if id != ROOT_ID => {
                warn!(id, "cannot show unknown parent, falling back to overview");
                None
            }
            _ => None,
        };

        match parent {
            None => {
                self.mode = NavMode::Overview;
                self.ancestors.clear();
                self.visible = std::iter::once(ROOT_ID.to_string())
                    .chain(registry.top_level().map(|n| n.id.clone()))
                    .collect();
                self.edges = self.visible[1..].iter().map(|id| Edge::new(ROOT_ID, id)).collect();
            }
            Some(parent) => {
                self.mode = NavMode::Drilled(parent.to_string());
                self.ancestors = ancestor_chain(registry, parent);

                let mut visible = Vec::with_capacity(self.ancestors.len() + 2);
                visible.push(ROOT_ID.to_string());
                visible.extend(self.ancestors.iter().cloned());
                visible.push(parent.to_string());
                let mut seen: HashSet<String> = visible.iter().cloned().collect();
                let children: Vec<String> = registry
                    .children_of(parent)
                    .filter(|child| seen.insert(child.id.clone()))
                    .map(|child| child.id.clone())
                    .collect();
                if children.is_empty() {
                    debug!(parent, "drilled into a node with no children");
                }

                let mut edges = Vec::with_capacity(self.ancestors.len() + children.len() + 1);
                let first = self.ancestors.first().map(String::as_str).unwrap_or(parent);
                edges.push(Edge::new(ROOT_ID, first));
                for pair in self.ancestors.windows(2) {
                    edges.push(Edge::new(&pair[0], &pair[1]));
                }
                if let Some(last) = self.ancestors.last() {
                    edges.push(Edge::new(last, parent));
                }
                edges.extend(children.iter().map(|child| Edge::new(parent, child)));

                visible.extend(children);
                self.visible = visible;
                self.edges = edges;
            }
        }

        let current = self.current_parent().map(str::to_string);
        for node in registry.nodes_mut() {
            node.highlighted = current.as_deref() == Some(node.id.as_str());
        }
        debug!(parent = ?self.current_parent(), visible = self.visible.len(), "navigation updated");
    }

    /// Labels from the root down to the current parent.
    pub fn breadcrumb(&self, registry: &Registry) -> Vec<String> {
        let mut trail = vec![registry.root().label.clone()];
        if let Some(current) = self.current_parent() {
            trail.extend(
                self.ancestors
                    .iter()
                    .map(String::as_str)
                    .chain(std::iter::once(current))
                    .filter_map(|id| registry.find_by_id(id))
                    .map(|node| node.label.clone()),
            );
        }
        trail
    }
}

/// Walks parent links upward from `start`. Stops at a node without a parent,
/// at a dangling reference, at the synthetic root, or when a node repeats.
pub fn ancestor_chain(registry: &Registry, start: &str) -> Vec<String> {
    let mut chain = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(start);
    let mut current = registry.find_by_id(start);

    while let Some(node) = current {
        let Some(parent_id) = node.parent_id.as_deref() else {
            break;
        };
        if parent_id == ROOT_ID || chain.len() >= registry.len() {
            break;
        }
        let Some(parent) = registry.find_by_id(parent_id) else {
            break;
        };
        if !visited.insert(parent.id.as_str()) {
            warn!(start, at = parent_id, "cycle in parent links");
            break;
        }
        chain.push(parent.id.clone());
        current = Some(parent);
    }

    chain.reverse();
    chain
}
