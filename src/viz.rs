use crate::animation::Transition;
use crate::config::Config;
use crate::error::{DataError, NavigationError};
use crate::interaction::{ClickTarget, Cursor, PointerEvent, PointerOutcome, PointerTracker};
use crate::layout::{apply_targets, compute_targets};
use crate::model::{Point, Viewport};
use crate::navigation::Navigation;
use crate::provider::{DataProvider, Entity};
use crate::registry::Registry;
use crate::render::{Surface, draw_scene};
use std::time::Duration;
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

pub struct Visualization {
    config: Config,
    viewport: Viewport,
    state: LoadState,
    registry: Option<Registry>,
    navigation: Navigation,
    transition: Option<Transition>,
    pointer: PointerTracker,
}

impl Visualization {
    pub fn new(config: Config, viewport: Viewport) -> Self {
        Self {
            config,
            viewport,
            state: LoadState::Loading,
            registry: None,
            navigation: Navigation::default(),
            transition: None,
            pointer: PointerTracker::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    pub fn registry(&self) -> Option<&Registry> {
        self.registry.as_ref()
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn cursor(&self) -> Cursor {
        self.pointer.cursor()
    }

    pub fn is_animating(&self) -> bool {
        self.transition.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Awaits the provider. A failure is kept as a visible error state and
    /// also returned to the caller.
    pub async fn load<P>(&mut self, provider: &P) -> Result<(), DataError>
    where
        P: DataProvider + ?Sized,
    {
        self.state = LoadState::Loading;
        match provider.fetch().await {
            Ok(entities) => self.try_set_entities(entities),
            Err(err) => {
                self.set_load_error(&err.to_string());
                Err(err)
            }
        }
    }

    pub fn try_set_entities(&mut self, entities: Vec<Entity>) -> Result<(), DataError> {
        match Registry::from_entities(entities, self.viewport.center(), &self.config.label.root_label) {
            Ok(registry) => {
                info!(nodes = registry.len(), "dataset ready");
                self.registry = Some(registry);
                self.state = LoadState::Ready;
                self.pointer.reset();
                self.show(None);
                Ok(())
            }
            Err(err) => {
                self.set_load_error(&err.to_string());
                Err(err)
            }
        }
    }

    pub fn set_load_error(&mut self, message: &str) {
        error!(message, "failed to load dataset");
        self.state = LoadState::Failed(message.to_string());
        self.registry = None;
        self.transition = None;
        self.navigation = Navigation::default();
    }

    pub fn drill_into(&mut self, node_id: &str) -> Result<(), NavigationError> {
        let registry = self.registry.as_mut().ok_or(NavigationError::NotLoaded)?;
        self.navigation.drill_into(registry, node_id)?;
        self.relayout();
        Ok(())
    }

    pub fn go_back(&mut self) -> Result<(), NavigationError> {
        let registry = self.registry.as_mut().ok_or(NavigationError::NotLoaded)?;
        self.navigation.go_back(registry)?;
        self.relayout();
        Ok(())
    }

    fn show(&mut self, parent: Option<&str>) {
        if let Some(registry) = self.registry.as_mut() {
            self.navigation.show(registry, parent);
            self.relayout();
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        debug!(width = viewport.width, height = viewport.height, "resized");
        self.viewport = viewport;
        self.relayout();
    }

    /// Recomputes targets for the current view and starts a transition
    /// from wherever the nodes are now.
    fn relayout(&mut self) {
        let Some(registry) = self.registry.as_mut() else {
            return;
        };
        let targets = compute_targets(&self.navigation, self.viewport, &self.config.layout);
        apply_targets(registry, &targets);
        self.transition = Some(Transition::new(
            registry,
            self.navigation.visible(),
            self.config.animation.duration(),
        ));
    }

    /// Samples the active transition at `now`. Returns whether the host
    /// should schedule another frame.
    pub fn on_frame(&mut self, now: Duration) -> bool {
        let (Some(transition), Some(registry)) = (self.transition.as_mut(), self.registry.as_mut()) else {
            return false;
        };
        let more = transition.sample(registry, now, self.pointer.dragged_node());
        if !more {
            self.transition = None;
        }
        more
    }

    /// Runs the active transition to its end at the given frame interval,
    /// calling `frame` after each sample.
    pub fn run_transition(&mut self, start: Duration, interval: Duration, mut frame: impl FnMut(&Self)) {
        let interval = interval.max(Duration::from_millis(1));
        let mut now = start;
        while self.transition.is_some() {
            let more = self.on_frame(now);
            frame(self);
            if !more {
                break;
            }
            now += interval;
        }
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerOutcome {
        let Some(registry) = self.registry.as_mut() else {
            return PointerOutcome::Ignored;
        };
        let outcome = self
            .pointer
            .handle(event, registry, &self.navigation, &self.config.interaction);
        if matches!(event, PointerEvent::Move { .. })
            && let (Some(id), Some(transition)) = (self.pointer.dragged_node(), self.transition.as_mut())
        {
            transition.release(id);
        }
        if let PointerOutcome::Click(target) = &outcome {
            let result = match target {
                ClickTarget::BackButton => self.go_back(),
                ClickTarget::Node(id) => self.drill_into(id),
            };
            if let Err(err) = result {
                debug!(%err, "click ignored");
                return PointerOutcome::Ignored;
            }
        }
        outcome
    }

    pub fn node_position(&self, id: &str) -> Option<Point> {
        self.registry.as_ref()?.find_by_id(id).map(|node| node.position)
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        draw_scene(self, surface);
    }
}
