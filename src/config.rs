use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Overview ring radius is `min(W, H) / overview_radius_divisor`.
    pub overview_radius_divisor: f32,
    /// Drill-down ring radius is `min(W, H) / drill_radius_divisor`.
    pub drill_radius_divisor: f32,
    /// Root position in drill-down mode, as fractions of the viewport.
    pub root_anchor_x: f32,
    pub root_anchor_y: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            overview_radius_divisor: 3.0,
            drill_radius_divisor: 4.0,
            root_anchor_x: 0.85,
            root_anchor_y: 0.15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionConfig {
    pub node_radius: f32,
    pub root_scale: f32,
    pub back_button_x: f32,
    pub back_button_y: f32,
    pub back_button_radius: f32,
}

impl InteractionConfig {
    pub fn root_radius(&self) -> f32 {
        self.node_radius * self.root_scale
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            node_radius: 20.0,
            root_scale: 1.5,
            back_button_x: 50.0,
            back_button_y: 50.0,
            back_button_radius: 25.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub duration_ms: u64,
}

impl AnimationConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self { duration_ms: 400 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    pub font_size: f32,
    pub root_font_size: f32,
    pub badge_font_size: f32,
    pub max_width: f32,
    pub line_height: f32,
    pub root_label: String,
    pub loading_message: String,
    pub error_message: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            root_font_size: 14.0,
            badge_font_size: 12.0,
            max_width: 150.0,
            line_height: 1.4,
            root_label: "Asambleas de Barcelona".to_string(),
            loading_message: "Cargando datos...".to_string(),
            error_message: "Error cargando datos".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            pixel_ratio: 2.0,
            background: "#ffffff".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub interaction: InteractionConfig,
    pub animation: AnimationConfig,
    pub label: LabelConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            interaction: InteractionConfig::default(),
            animation: AnimationConfig::default(),
            label: LabelConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    background: Option<String>,
    text_color: Option<String>,
    node_color: Option<String>,
    highlight_color: Option<String>,
    root_color: Option<String>,
    edge_color: Option<String>,
    error_color: Option<String>,
    back_button_color: Option<String>,
    back_arrow_color: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    overview_radius_divisor: Option<f32>,
    drill_radius_divisor: Option<f32>,
    root_anchor_x: Option<f32>,
    root_anchor_y: Option<f32>,
    node_radius: Option<f32>,
    root_scale: Option<f32>,
    back_button_x: Option<f32>,
    back_button_y: Option<f32>,
    back_button_radius: Option<f32>,
    animation_duration_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LabelConfigFile {
    font_size: Option<f32>,
    root_font_size: Option<f32>,
    badge_font_size: Option<f32>,
    max_width: Option<f32>,
    line_height: Option<f32>,
    root_label: Option<String>,
    loading_message: Option<String>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    labels: Option<LabelConfigFile>,
    pixel_ratio: Option<f32>,
}

/// Loads a JSON (or JSON5) config file and merges it over the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::by_name(theme_name) {
            Some(theme) => config.theme = theme,
            None => tracing::warn!(theme = theme_name, "unknown theme preset, keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.node_color {
            config.theme.node_color = v;
        }
        if let Some(v) = vars.highlight_color {
            config.theme.highlight_color = v;
        }
        if let Some(v) = vars.root_color {
            config.theme.root_color = v;
        }
        if let Some(v) = vars.edge_color {
            config.theme.edge_color = v;
        }
        if let Some(v) = vars.error_color {
            config.theme.error_color = v;
        }
        if let Some(v) = vars.back_button_color {
            config.theme.back_button_color = v;
        }
        if let Some(v) = vars.back_arrow_color {
            config.theme.back_arrow_color = v;
        }
    }
    config.render.background = config.theme.background.clone();

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.overview_radius_divisor.filter(|v| *v > 0.0) {
            config.layout.overview_radius_divisor = v;
        }
        if let Some(v) = layout.drill_radius_divisor.filter(|v| *v > 0.0) {
            config.layout.drill_radius_divisor = v;
        }
        if let Some(v) = layout.root_anchor_x {
            config.layout.root_anchor_x = v;
        }
        if let Some(v) = layout.root_anchor_y {
            config.layout.root_anchor_y = v;
        }
        if let Some(v) = layout.node_radius {
            config.interaction.node_radius = v;
        }
        if let Some(v) = layout.root_scale {
            config.interaction.root_scale = v;
        }
        if let Some(v) = layout.back_button_x {
            config.interaction.back_button_x = v;
        }
        if let Some(v) = layout.back_button_y {
            config.interaction.back_button_y = v;
        }
        if let Some(v) = layout.back_button_radius {
            config.interaction.back_button_radius = v;
        }
        if let Some(v) = layout.animation_duration_ms {
            config.animation.duration_ms = v;
        }
    }

    if let Some(labels) = parsed.labels {
        if let Some(v) = labels.font_size {
            config.label.font_size = v;
        }
        if let Some(v) = labels.root_font_size {
            config.label.root_font_size = v;
        }
        if let Some(v) = labels.badge_font_size {
            config.label.badge_font_size = v;
        }
        if let Some(v) = labels.max_width {
            config.label.max_width = v;
        }
        if let Some(v) = labels.line_height {
            config.label.line_height = v;
        }
        if let Some(v) = labels.root_label {
            config.label.root_label = v;
        }
        if let Some(v) = labels.loading_message {
            config.label.loading_message = v;
        }
        if let Some(v) = labels.error_message {
            config.label.error_message = v;
        }
    }

    if let Some(ratio) = parsed.pixel_ratio.filter(|v| *v > 0.0) {
        config.render.pixel_ratio = ratio;
    }

    Ok(config)
}
