use crate::model::{Edge, Point, Viewport};
use crate::viz::{LoadState, Visualization};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct SceneDump {
    pub state: String,
    pub mode: String,
    pub current_parent: Option<String>,
    pub viewport: Viewport,
    pub breadcrumb: Vec<String>,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub label: String,
    pub parent_id: Option<String>,
    pub child_count: usize,
    pub position: Point,
    pub target: Point,
    pub highlighted: bool,
}

impl SceneDump {
    pub fn from_visualization(viz: &Visualization) -> Self {
        let nav = viz.navigation();
        let state = match viz.load_state() {
            LoadState::Loading => "loading".to_string(),
            LoadState::Ready => "ready".to_string(),
            LoadState::Failed(message) => format!("failed: {message}"),
        };
        let (nodes, breadcrumb) = match viz.registry() {
            Some(registry) => (
                nav.visible()
                    .iter()
                    .filter_map(|id| registry.find_by_id(id))
                    .map(|node| NodeDump {
                        id: node.id.clone(),
                        label: node.label.clone(),
                        parent_id: node.parent_id.clone(),
                        child_count: node.child_count,
                        position: node.position,
                        target: node.target,
                        highlighted: node.highlighted,
                    })
                    .collect(),
                nav.breadcrumb(registry),
            ),
            None => (Vec::new(), Vec::new()),
        };

        SceneDump {
            state,
            mode: if nav.is_overview() { "overview" } else { "drilled" }.to_string(),
            current_parent: nav.current_parent().map(str::to_string),
            viewport: viz.viewport(),
            breadcrumb,
            nodes,
            edges: if viz.registry().is_some() {
                nav.edges().to_vec()
            } else {
                Vec::new()
            },
        }
    }
}

pub fn write_scene_dump(path: &Path, viz: &Visualization) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = SceneDump::from_visualization(viz);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
