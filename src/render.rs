use crate::config::{Config, RenderConfig};
use crate::model::{Node, Point, Viewport};
use crate::text_metrics;
use crate::viz::{LoadState, Visualization};
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    Top,
    Middle,
}

#[derive(Debug, Clone)]
pub struct TextStyle<'a> {
    pub font_family: &'a str,
    pub font_size: f32,
    pub color: &'a str,
    pub bold: bool,
    pub baseline: Baseline,
}

/// Drawing primitives the scene needs. Text is always horizontally centered
/// on the given point.
pub trait Surface {
    fn clear(&mut self, color: &str);
    fn fill_circle(&mut self, center: Point, radius: f32, color: &str);
    fn stroke_circle(&mut self, center: Point, radius: f32, color: &str, width: f32);
    fn stroke_line(&mut self, from: Point, to: Point, color: &str, width: f32);
    fn stroke_polyline(&mut self, points: &[Point], color: &str, width: f32);
    fn fill_text(&mut self, at: Point, text: &str, style: &TextStyle<'_>);
    fn measure_text(&self, text: &str, style: &TextStyle<'_>) -> f32;
}

/// Greedy word wrap: a word joins the current line while the measured line
/// stays under `max_width`. A single over-long word gets its own line.
pub fn wrap_label(label: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in label.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure(&candidate) < max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

pub fn draw_scene<S: Surface + ?Sized>(viz: &Visualization, surface: &mut S) {
    let config = viz.config();
    let theme = &config.theme;
    surface.clear(&config.render.background);

    let center = viz.viewport().center();
    let message_style = TextStyle {
        font_family: &theme.font_family,
        font_size: config.label.root_font_size,
        color: &theme.text_color,
        bold: false,
        baseline: Baseline::Middle,
    };
    match viz.load_state() {
        LoadState::Loading => {
            surface.fill_text(center, &config.label.loading_message, &message_style);
            return;
        }
        LoadState::Failed(_) => {
            let style = TextStyle {
                color: &theme.error_color,
                ..message_style
            };
            surface.fill_text(center, &config.label.error_message, &style);
            return;
        }
        LoadState::Ready => {}
    }
    let Some(registry) = viz.registry() else {
        return;
    };
    let nav = viz.navigation();

    for edge in nav.edges() {
        let (Some(from), Some(to)) = (registry.find_by_id(&edge.from), registry.find_by_id(&edge.to)) else {
            continue;
        };
        surface.stroke_line(from.position, to.position, &theme.edge_color, 1.0);
    }

    for node in nav.visible().iter().filter_map(|id| registry.find_by_id(id)) {
        if node.is_root() {
            draw_root(node, config, surface);
        } else {
            draw_node(node, config, surface);
        }
    }

    if !nav.is_overview() {
        draw_back_button(config, surface);
    }
}

fn draw_root<S: Surface + ?Sized>(node: &Node, config: &Config, surface: &mut S) {
    let theme = &config.theme;
    surface.fill_circle(node.position, config.interaction.root_radius(), &theme.root_color);
    let style = TextStyle {
        font_family: &theme.font_family,
        font_size: config.label.root_font_size,
        color: &theme.text_color,
        bold: false,
        baseline: Baseline::Middle,
    };
    surface.fill_text(node.position, &node.label, &style);
}

fn draw_node<S: Surface + ?Sized>(node: &Node, config: &Config, surface: &mut S) {
    let theme = &config.theme;
    let radius = config.interaction.node_radius;
    let color = if node.highlighted {
        &theme.highlight_color
    } else {
        &theme.node_color
    };
    surface.fill_circle(node.position, radius, color);

    if node.is_expandable() {
        surface.stroke_circle(node.position, radius + 5.0, color, 2.0);
        let badge = TextStyle {
            font_family: &theme.font_family,
            font_size: config.label.badge_font_size,
            color: &theme.text_color,
            bold: true,
            baseline: Baseline::Middle,
        };
        let at = Point::new(node.position.x + radius + 15.0, node.position.y - radius - 5.0);
        surface.fill_text(at, &node.child_count.to_string(), &badge);
    }

    let style = TextStyle {
        font_family: &theme.font_family,
        font_size: config.label.font_size,
        color: &theme.text_color,
        bold: false,
        baseline: Baseline::Top,
    };
    let lines = wrap_label(&node.label, config.label.max_width, |text| {
        surface.measure_text(text, &style)
    });
    let line_height = config.label.font_size * config.label.line_height;
    let top = node.position.y + radius + 10.0;
    for (idx, line) in lines.iter().enumerate() {
        let at = Point::new(node.position.x.round(), (top + idx as f32 * line_height).round());
        surface.fill_text(at, line, &style);
    }
}

fn draw_back_button<S: Surface + ?Sized>(config: &Config, surface: &mut S) {
    let theme = &config.theme;
    let ui = &config.interaction;
    let (x, y) = (ui.back_button_x, ui.back_button_y);
    surface.fill_circle(Point::new(x, y), ui.back_button_radius, &theme.back_button_color);
    surface.stroke_polyline(
        &[
            Point::new(x + 8.0, y),
            Point::new(x - 8.0, y),
            Point::new(x - 8.0, y - 8.0),
        ],
        &theme.back_arrow_color,
        3.0,
    );
}

/// Accumulates draw calls as SVG markup.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    viewport: Viewport,
    body: String,
}

impl SvgSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            body: String::new(),
        }
    }

    pub fn finish(self) -> String {
        let width = self.viewport.width.max(1.0);
        let height = self.viewport.height.max(1.0);
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">{}</svg>",
            self.body
        )
    }
}

impl Surface for SvgSurface {
    fn clear(&mut self, color: &str) {
        self.body.clear();
        let _ = write!(self.body, "<rect width=\"100%\" height=\"100%\" fill=\"{color}\"/>");
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: &str) {
        let _ = write!(
            self.body,
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{color}\"/>",
            center.x, center.y, radius
        );
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, color: &str, width: f32) {
        let _ = write!(
            self.body,
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{width}\"/>",
            center.x, center.y, radius
        );
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: &str, width: f32) {
        let _ = write!(
            self.body,
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{color}\" stroke-width=\"{width}\"/>",
            from.x, from.y, to.x, to.y
        );
    }

    fn stroke_polyline(&mut self, points: &[Point], color: &str, width: f32) {
        if points.is_empty() {
            return;
        }
        let coords = points
            .iter()
            .map(|p| format!("{:.2},{:.2}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = write!(
            self.body,
            "<polyline points=\"{coords}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{width}\"/>"
        );
    }

    fn fill_text(&mut self, at: Point, text: &str, style: &TextStyle<'_>) {
        let baseline = match style.baseline {
            Baseline::Top => "hanging",
            Baseline::Middle => "central",
        };
        let weight = if style.bold { " font-weight=\"bold\"" } else { "" };
        let _ = write!(
            self.body,
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"{baseline}\" font-family=\"{}\" font-size=\"{}\"{weight} fill=\"{}\">{}</text>",
            at.x,
            at.y,
            escape_xml(style.font_family),
            style.font_size,
            style.color,
            escape_xml(text)
        );
    }

    fn measure_text(&self, text: &str, style: &TextStyle<'_>) -> f32 {
        text_metrics::text_width(text, style.font_size, style.font_family)
    }
}

pub fn render_svg(viz: &Visualization) -> String {
    let mut surface = SvgSurface::new(viz.viewport());
    draw_scene(viz, &mut surface);
    surface.finish()
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, font_family: &str) -> Result<()> {
    let mut opt = usvg::Options::default();
    if let Some(first) = font_family.split(',').next() {
        opt.font_family = first.trim().trim_matches('"').to_string();
    }
    opt.fontdb_mut().load_system_fonts();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let ratio = render_cfg.pixel_ratio.max(1.0);
    let size = tree.size().to_int_size();
    let width = (size.width() as f32 * ratio).ceil() as u32;
    let height = (size.height() as f32 * ratio).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::from_scale(ratio, ratio), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig, _font_family: &str) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
