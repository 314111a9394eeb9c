use crate::config::LayoutConfig;
use crate::model::{Point, ROOT_ID, Viewport};
use crate::navigation::{NavMode, Navigation};
use crate::registry::Registry;
use std::f32::consts::TAU;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeTarget {
    pub id: String,
    pub target: Point,
}

pub fn compute_targets(nav: &Navigation, viewport: Viewport, config: &LayoutConfig) -> Vec<NodeTarget> {
    compute_targets_for(nav.mode(), nav.visible(), viewport, config)
}

pub fn compute_targets_for(
    mode: &NavMode,
    visible: &[String],
    viewport: Viewport,
    config: &LayoutConfig,
) -> Vec<NodeTarget> {
    let center = viewport.center();
    let mut targets = Vec::with_capacity(visible.len());

    match mode {
        NavMode::Overview => {
            let radius = viewport.min_side() / config.overview_radius_divisor;
            let ring: Vec<&String> = visible.iter().filter(|id| *id != ROOT_ID).collect();
            if visible.iter().any(|id| id == ROOT_ID) {
                targets.push(NodeTarget {
                    id: ROOT_ID.to_string(),
                    target: center,
                });
            }
            place_ring(&mut targets, &ring, center, radius);
        }
        NavMode::Drilled(parent) => {
            let radius = viewport.min_side() / config.drill_radius_divisor;
            let ring: Vec<&String> = visible
                .iter()
                .filter(|id| *id != ROOT_ID && *id != parent)
                .collect();
            if visible.iter().any(|id| id == ROOT_ID) {
                targets.push(NodeTarget {
                    id: ROOT_ID.to_string(),
                    target: Point::new(
                        viewport.width * config.root_anchor_x,
                        viewport.height * config.root_anchor_y,
                    ),
                });
            }
            if visible.iter().any(|id| id == parent) {
                targets.push(NodeTarget {
                    id: parent.clone(),
                    target: center,
                });
            }
            place_ring(&mut targets, &ring, center, radius);
        }
    }

    targets
}

fn place_ring(targets: &mut Vec<NodeTarget>, ring: &[&String], center: Point, radius: f32) {
    if ring.is_empty() {
        return;
    }
    let count = ring.len() as f32;
    for (idx, id) in ring.iter().enumerate() {
        let angle = ring_angle(idx, count);
        targets.push(NodeTarget {
            id: (*id).clone(),
            target: Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin()),
        });
    }
}

fn ring_angle(idx: usize, count: f32) -> f32 {
    (idx as f32 / count) * TAU
}

/// Writes each target into the registry. Unknown ids are skipped.
pub fn apply_targets(registry: &mut Registry, targets: &[NodeTarget]) {
    for entry in targets {
        if let Some(node) = registry.find_by_id_mut(&entry.id) {
            node.target = entry.target;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Entity;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn target_of<'a>(targets: &'a [NodeTarget], id: &str) -> &'a Point {
        &targets.iter().find(|t| t.id == id).unwrap().target
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn overview_is_even_ring_around_center() {
        let visible = ids(&["root", "a", "b", "c", "d", "e"]);
        let viewport = Viewport::new(900.0, 600.0);
        let targets = compute_targets_for(&NavMode::Overview, &visible, viewport, &LayoutConfig::default());
        assert_eq!(*target_of(&targets, "root"), Point::new(450.0, 300.0));

        let angles: Vec<f32> = visible[1..]
            .iter()
            .map(|id| {
                let p = target_of(&targets, id);
                let dx = p.x - 450.0;
                let dy = p.y - 300.0;
                assert!(close((dx * dx + dy * dy).sqrt(), 200.0));
                dy.atan2(dx).rem_euclid(TAU)
            })
            .collect();
        let step = TAU / 5.0;
        for pair in angles.windows(2) {
            assert!(close((pair[1] - pair[0]).rem_euclid(TAU), step));
        }
        assert!(close(angles[0], 0.0));
    }

    #[test]
    fn drilled_anchors_root_and_centers_parent() {
        let visible = ids(&["root", "p", "c1", "c2"]);
        let viewport = Viewport::new(1000.0, 800.0);
        let mode = NavMode::Drilled("p".into());
        let targets = compute_targets_for(&mode, &visible, viewport, &LayoutConfig::default());
        let root = target_of(&targets, "root");
        assert!(close(root.x, 850.0) && close(root.y, 120.0));
        assert_eq!(*target_of(&targets, "p"), Point::new(500.0, 400.0));
        let c1 = target_of(&targets, "c1");
        assert!(close(c1.x, 700.0) && close(c1.y, 400.0));
        let c2 = target_of(&targets, "c2");
        assert!(close(c2.x, 300.0) && close(c2.y, 400.0));
    }

    #[test]
    fn drilled_without_children_does_not_divide_by_zero() {
        let visible = ids(&["root", "p"]);
        let mode = NavMode::Drilled("p".into());
        let targets = compute_targets_for(&mode, &visible, Viewport::new(400.0, 400.0), &LayoutConfig::default());
        assert_eq!(targets.len(), 2);
        assert!(targets.iter().all(|t| t.target.x.is_finite() && t.target.y.is_finite()));
    }

    #[test]
    fn layout_is_idempotent() {
        let visible = ids(&["root", "a", "b"]);
        let viewport = Viewport::new(640.0, 480.0);
        let config = LayoutConfig::default();
        let first = compute_targets_for(&NavMode::Overview, &visible, viewport, &config);
        let second = compute_targets_for(&NavMode::Overview, &visible, viewport, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn applies_to_registry() {
        let mut registry = Registry::from_entities(
            vec![Entity::new("a", "A", None), Entity::new("b", "B", None)],
            Point::default(),
            "Root",
        )
        .unwrap();
        let nav = Navigation::new(&mut registry);
        let targets = compute_targets(&nav, Viewport::new(300.0, 300.0), &LayoutConfig::default());
        apply_targets(&mut registry, &targets);
        assert_eq!(registry.root().target, Point::new(150.0, 150.0));
        assert!(close(registry.find_by_id("a").unwrap().target.x, 250.0));
        assert!(close(registry.find_by_id("b").unwrap().target.x, 50.0));
    }
}
