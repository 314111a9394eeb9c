use crate::error::DataError;
use crate::model::{Node, Point, ROOT_ID, Viewport};
use crate::provider::{DataProvider, Entity};
use std::collections::HashMap;
use tracing::{info, warn};

/// Flat store of every node, in dataset order, with the synthetic root first.
#[derive(Debug, Clone)]
pub struct Registry {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub async fn load<P>(provider: &P, viewport: Viewport, root_label: &str) -> Result<Self, DataError>
    where
        P: DataProvider + ?Sized,
    {
        let entities = provider.fetch().await?;
        Self::from_entities(entities, viewport.center(), root_label)
    }

    pub fn from_entities(entities: Vec<Entity>, origin: Point, root_label: &str) -> Result<Self, DataError> {
        let mut index = HashMap::with_capacity(entities.len() + 1);
        index.insert(ROOT_ID.to_string(), 0);
        for (idx, entity) in entities.iter().enumerate() {
            if entity.id == ROOT_ID {
                return Err(DataError::ReservedId(entity.id.clone()));
            }
            if index.insert(entity.id.clone(), idx + 1).is_some() {
                return Err(DataError::DuplicateId(entity.id.clone()));
            }
        }

        let mut child_counts: HashMap<&str, usize> = HashMap::new();
        let mut top_level = 0usize;
        for entity in &entities {
            match entity.parent_id() {
                Some(parent) => *child_counts.entry(parent).or_default() += 1,
                None => top_level += 1,
            }
        }

        let mut nodes = Vec::with_capacity(entities.len() + 1);
        nodes.push(Node {
            id: ROOT_ID.to_string(),
            label: root_label.to_string(),
            parent_id: None,
            child_count: top_level,
            reported_child_count: None,
            position: origin,
            target: origin,
            highlighted: false,
        });

        for entity in &entities {
            let child_count = child_counts.get(entity.id.as_str()).copied().unwrap_or(0);
            if let Some(parent) = entity.parent_id()
                && !index.contains_key(parent)
            {
                warn!(id = %entity.id, parent, "dangling parent reference");
            }
            if let Some(reported) = entity.children_count
                && reported != child_count
            {
                warn!(id = %entity.id, reported, derived = child_count, "childrenCount disagrees with dataset");
            }
            nodes.push(Node {
                id: entity.id.clone(),
                label: entity.title.translation.clone(),
                parent_id: entity.parent_id().map(str::to_string),
                child_count,
                reported_child_count: entity.children_count,
                position: origin,
                target: origin,
                highlighted: false,
            });
        }

        info!(nodes = nodes.len(), top_level, "registry loaded");
        Ok(Self { nodes, index })
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Node> {
        self.index.get(id).and_then(|idx| self.nodes.get(*idx))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Node> {
        let idx = *self.index.get(id)?;
        self.nodes.get_mut(idx)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Entities without a parent, in dataset order.
    pub fn top_level(&self) -> impl Iterator<Item = &Node> {
        self.nodes[1..].iter().filter(|node| node.parent_id.is_none())
    }

    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes[1..]
            .iter()
            .filter(move |node| node.parent_id.as_deref() == Some(id))
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::StaticProvider;

    fn sample() -> Vec<Entity> {
        vec![
            Entity::new("A", "Alpha", None),
            Entity::new("B", "Beta", None),
            Entity::new("C", "Gamma", Some("A")),
        ]
    }

    #[test]
    fn root_counts_top_level_entities() {
        let registry = Registry::from_entities(sample(), Point::new(10.0, 20.0), "All").unwrap();
        let root = registry.find_by_id(ROOT_ID).unwrap();
        assert_eq!(root.child_count, 2);
        assert_eq!(root.label, "All");
        assert_eq!(registry.find_by_id("A").unwrap().child_count, 1);
        assert_eq!(registry.find_by_id("B").unwrap().child_count, 0);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn nodes_start_at_origin() {
        let origin = Point::new(300.0, 200.0);
        let registry = Registry::from_entities(sample(), origin, "All").unwrap();
        assert!(registry.nodes().iter().all(|n| n.position == origin && n.target == origin));
    }

    #[test]
    fn missing_id_is_none() {
        let registry = Registry::from_entities(sample(), Point::default(), "All").unwrap();
        assert!(registry.find_by_id("nope").is_none());
    }

    #[test]
    fn keeps_dataset_order() {
        let registry = Registry::from_entities(sample(), Point::default(), "All").unwrap();
        let ids: Vec<_> = registry.top_level().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["A", "B"]);
        let kids: Vec<_> = registry.children_of("A").map(|n| n.id.as_str()).collect();
        assert_eq!(kids, ["C"]);
    }

    #[test]
    fn rejects_reserved_and_duplicate_ids() {
        let err = Registry::from_entities(vec![Entity::new("root", "x", None)], Point::default(), "All")
            .unwrap_err();
        assert!(matches!(err, DataError::ReservedId(_)));

        let dup = vec![Entity::new("A", "x", None), Entity::new("A", "y", None)];
        let err = Registry::from_entities(dup, Point::default(), "All").unwrap_err();
        assert!(matches!(err, DataError::DuplicateId(id) if id == "A"));
    }

    #[test]
    fn derived_count_wins_over_reported() {
        let mut entities = sample();
        entities[1].children_count = Some(5);
        let registry = Registry::from_entities(entities, Point::default(), "All").unwrap();
        let beta = registry.find_by_id("B").unwrap();
        assert_eq!(beta.child_count, 0);
        assert_eq!(beta.reported_child_count, Some(5));
    }

    #[test]
    fn loads_through_provider() {
        let provider = StaticProvider::new(sample());
        let registry =
            futures::executor::block_on(Registry::load(&provider, Viewport::new(800.0, 600.0), "All")).unwrap();
        assert_eq!(registry.root().position, Point::new(400.0, 300.0));
    }
}
