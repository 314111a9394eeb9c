pub mod animation;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod navigation;
pub mod provider;
pub mod registry;
pub mod render;
pub mod scene_dump;
pub mod text_metrics;
pub mod theme;
pub mod viz;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use error::{DataError, NavigationError};
pub use interaction::{ClickTarget, Cursor, PointerEvent, PointerOutcome};
pub use model::{Edge, Node, Point, ROOT_ID, Viewport};
pub use navigation::{NavMode, Navigation};
pub use provider::{DataProvider, Entity, JsonFileProvider, StaticProvider, parse_assemblies};
pub use registry::Registry;
pub use render::{Surface, SvgSurface, render_svg};
pub use theme::Theme;
pub use viz::{LoadState, Visualization};
