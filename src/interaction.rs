use crate::config::InteractionConfig;
use crate::model::{Node, Point};
use crate::navigation::Navigation;
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Pointer input in surface-relative logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PointerEvent {
    Press { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Release { x: f32, y: f32 },
    Leave,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickTarget {
    BackButton,
    Node(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    Ignored,
    Redraw,
    Click(ClickTarget),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Grab,
    Grabbing,
}

pub fn hit(point: Point, center: Point, radius: f32) -> bool {
    point.distance_sq(center) <= radius * radius
}

fn hit_radius(node: &Node, config: &InteractionConfig) -> f32 {
    if node.is_root() {
        config.root_radius()
    } else {
        config.node_radius
    }
}

pub fn back_button_hit(point: Point, nav: &Navigation, config: &InteractionConfig) -> bool {
    !nav.is_overview()
        && hit(
            point,
            Point::new(config.back_button_x, config.back_button_y),
            config.back_button_radius,
        )
}

/// First visible node (in visible order) under `point` that passes `filter`.
fn visible_node_at<'a>(
    point: Point,
    registry: &'a Registry,
    nav: &Navigation,
    config: &InteractionConfig,
    filter: impl Fn(&Node) -> bool,
) -> Option<&'a Node> {
    nav.visible()
        .iter()
        .filter_map(|id| registry.find_by_id(id))
        .filter(|node| filter(*node))
        .find(|node| hit(point, node.position, hit_radius(node, config)))
}

pub fn node_at<'a>(
    point: Point,
    registry: &'a Registry,
    nav: &Navigation,
    config: &InteractionConfig,
) -> Option<&'a Node> {
    visible_node_at(point, registry, nav, config, |_| true)
}

/// Resolves a click: the back button wins, then the first expandable node.
pub fn click_target(
    point: Point,
    registry: &Registry,
    nav: &Navigation,
    config: &InteractionConfig,
) -> Option<ClickTarget> {
    if back_button_hit(point, nav, config) {
        return Some(ClickTarget::BackButton);
    }
    visible_node_at(point, registry, nav, config, Node::is_expandable)
        .map(|node| ClickTarget::Node(node.id.clone()))
}

#[derive(Debug, Clone, PartialEq)]
struct DragState {
    node_id: String,
    offset: Point,
}

/// Press/move/release bookkeeping: drags, click suppression and hover.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    drag: Option<DragState>,
    pressed: bool,
    moved: bool,
    hovering: bool,
}

impl PointerTracker {
    pub fn dragged_node(&self) -> Option<&str> {
        self.drag.as_ref().map(|d| d.node_id.as_str())
    }

    pub fn cursor(&self) -> Cursor {
        if self.drag.is_some() {
            Cursor::Grabbing
        } else if self.hovering {
            Cursor::Grab
        } else {
            Cursor::Default
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        registry: &mut Registry,
        nav: &Navigation,
        config: &InteractionConfig,
    ) -> PointerOutcome {
        match event {
            PointerEvent::Press { x, y } => {
                let point = Point::new(x, y);
                self.pressed = true;
                self.moved = false;
                self.drag = node_at(point, registry, nav, config).map(|node| DragState {
                    node_id: node.id.clone(),
                    offset: point.offset_from(node.position),
                });
                if let Some(drag) = &self.drag {
                    debug!(node = %drag.node_id, "drag started");
                }
                PointerOutcome::Ignored
            }
            PointerEvent::Move { x, y } => {
                let point = Point::new(x, y);
                let Some(drag) = &self.drag else {
                    self.hovering = node_at(point, registry, nav, config).is_some();
                    return PointerOutcome::Ignored;
                };
                let Some(node) = registry.find_by_id_mut(&drag.node_id) else {
                    self.drag = None;
                    return PointerOutcome::Ignored;
                };
                let dropped_at = point.offset_from(drag.offset);
                node.position = dropped_at;
                node.target = dropped_at;
                self.moved = true;
                PointerOutcome::Redraw
            }
            PointerEvent::Release { x, y } => {
                let was_pressed = std::mem::take(&mut self.pressed);
                if let Some(drag) = self.drag.take() {
                    debug!(node = %drag.node_id, moved = self.moved, "drag ended");
                }
                if !was_pressed || self.moved {
                    return PointerOutcome::Ignored;
                }
                match click_target(Point::new(x, y), registry, nav, config) {
                    Some(target) => PointerOutcome::Click(target),
                    None => PointerOutcome::Ignored,
                }
            }
            PointerEvent::Leave => {
                self.drag = None;
                self.pressed = false;
                self.hovering = false;
                PointerOutcome::Ignored
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Entity;

    fn setup() -> (Registry, Navigation, InteractionConfig) {
        let mut registry = Registry::from_entities(
            vec![
                Entity::new("A", "A", None),
                Entity::new("B", "B", None),
                Entity::new("C", "C", Some("A")),
            ],
            Point::default(),
            "Root",
        )
        .unwrap();
        registry.find_by_id_mut("root").unwrap().position = Point::new(400.0, 300.0);
        registry.find_by_id_mut("A").unwrap().position = Point::new(200.0, 300.0);
        registry.find_by_id_mut("B").unwrap().position = Point::new(600.0, 300.0);
        let nav = Navigation::new(&mut registry);
        (registry, nav, InteractionConfig::default())
    }

    #[test]
    fn hit_is_inclusive_on_boundary() {
        assert!(hit(Point::new(3.0, 4.0), Point::new(0.0, 0.0), 5.0));
        assert!(!hit(Point::new(3.0, 4.1), Point::new(0.0, 0.0), 5.0));
    }

    #[test]
    fn back_button_only_when_drilled() {
        let (mut registry, mut nav, config) = setup();
        let corner = Point::new(50.0, 50.0);
        assert_eq!(click_target(corner, &registry, &nav, &config), None);
        nav.drill_into(&mut registry, "A").unwrap();
        assert_eq!(
            click_target(corner, &registry, &nav, &config),
            Some(ClickTarget::BackButton)
        );
    }

    #[test]
    fn click_ignores_leaf_nodes() {
        let (registry, nav, config) = setup();
        assert_eq!(
            click_target(Point::new(205.0, 290.0), &registry, &nav, &config),
            Some(ClickTarget::Node("A".into()))
        );
        assert_eq!(click_target(Point::new(600.0, 300.0), &registry, &nav, &config), None);
        // root hit radius is scaled
        assert_eq!(
            click_target(Point::new(425.0, 300.0), &registry, &nav, &config),
            Some(ClickTarget::Node("root".into()))
        );
    }

    #[test]
    fn press_release_without_motion_is_click() {
        let (mut registry, nav, config) = setup();
        let mut tracker = PointerTracker::default();
        tracker.handle(PointerEvent::Press { x: 200.0, y: 300.0 }, &mut registry, &nav, &config);
        assert_eq!(tracker.cursor(), Cursor::Grabbing);
        let outcome = tracker.handle(PointerEvent::Release { x: 200.0, y: 300.0 }, &mut registry, &nav, &config);
        assert_eq!(outcome, PointerOutcome::Click(ClickTarget::Node("A".into())));
        assert_eq!(tracker.cursor(), Cursor::Default);
    }

    #[test]
    fn drag_moves_node_and_suppresses_click() {
        let (mut registry, nav, config) = setup();
        let mut tracker = PointerTracker::default();
        tracker.handle(PointerEvent::Press { x: 210.0, y: 305.0 }, &mut registry, &nav, &config);
        let outcome = tracker.handle(PointerEvent::Move { x: 260.0, y: 355.0 }, &mut registry, &nav, &config);
        assert_eq!(outcome, PointerOutcome::Redraw);
        tracker.handle(PointerEvent::Move { x: 300.0, y: 100.0 }, &mut registry, &nav, &config);
        let outcome = tracker.handle(PointerEvent::Release { x: 300.0, y: 100.0 }, &mut registry, &nav, &config);
        assert_eq!(outcome, PointerOutcome::Ignored);

        let node = registry.find_by_id("A").unwrap();
        assert_eq!(node.position, Point::new(290.0, 95.0));
        assert_eq!(node.target, Point::new(290.0, 95.0));
        assert!(tracker.dragged_node().is_none());
    }

    #[test]
    fn leave_cancels_drag_without_click() {
        let (mut registry, nav, config) = setup();
        let mut tracker = PointerTracker::default();
        tracker.handle(PointerEvent::Press { x: 200.0, y: 300.0 }, &mut registry, &nav, &config);
        tracker.handle(PointerEvent::Leave, &mut registry, &nav, &config);
        assert!(tracker.dragged_node().is_none());
        let outcome = tracker.handle(PointerEvent::Release { x: 200.0, y: 300.0 }, &mut registry, &nav, &config);
        assert_eq!(outcome, PointerOutcome::Ignored);
    }

    #[test]
    fn hover_sets_grab_cursor() {
        let (mut registry, nav, config) = setup();
        let mut tracker = PointerTracker::default();
        tracker.handle(PointerEvent::Move { x: 600.0, y: 300.0 }, &mut registry, &nav, &config);
        assert_eq!(tracker.cursor(), Cursor::Grab);
        tracker.handle(PointerEvent::Move { x: 10.0, y: 10.0 }, &mut registry, &nav, &config);
        assert_eq!(tracker.cursor(), Cursor::Default);
    }

    #[test]
    fn events_deserialize_from_json() {
        let events: Vec<PointerEvent> = serde_json::from_str(
            r#"[{"kind":"press","x":1,"y":2},{"kind":"leave"}]"#,
        )
        .unwrap();
        assert_eq!(events, vec![PointerEvent::Press { x: 1.0, y: 2.0 }, PointerEvent::Leave]);
    }
}
