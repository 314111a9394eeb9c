use std::f32::consts::TAU;
use std::path::Path;
use std::time::Duration;

use assembly_network::{
    ClickTarget, Config, JsonFileProvider, LoadState, Point, PointerEvent, PointerOutcome, ROOT_ID, Viewport,
    Visualization, render_svg,
};

fn fixture_path() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("assemblies.json")
}

fn loaded(viewport: Viewport) -> Visualization {
    let mut viz = Visualization::new(Config::default(), viewport);
    let provider = JsonFileProvider::new(fixture_path());
    futures::executor::block_on(viz.load(&provider)).expect("fixture load failed");
    settle(&mut viz);
    viz
}

fn settle(viz: &mut Visualization) {
    viz.run_transition(Duration::ZERO, Duration::from_millis(16), |_| {});
}

fn click(viz: &mut Visualization, at: Point) -> PointerOutcome {
    viz.handle_pointer(PointerEvent::Press { x: at.x, y: at.y });
    viz.handle_pointer(PointerEvent::Release { x: at.x, y: at.y })
}

#[test]
fn root_counts_top_level_entities() {
    let viz = loaded(Viewport::new(1200.0, 800.0));
    let registry = viz.registry().unwrap();
    let top_level = registry.nodes().iter().filter(|n| !n.is_root() && n.parent_id.is_none()).count();
    assert_eq!(registry.find_by_id(ROOT_ID).unwrap().child_count, top_level);
    assert_eq!(top_level, 3);
}

#[test]
fn overview_ring_is_evenly_spaced() {
    let viewport = Viewport::new(1200.0, 800.0);
    let viz = loaded(viewport);
    let center = viewport.center();
    let angles: Vec<f32> = viz.navigation().visible()[1..]
        .iter()
        .map(|id| {
            let p = viz.node_position(id).unwrap();
            (p.y - center.y).atan2(p.x - center.x).rem_euclid(TAU)
        })
        .collect();
    assert_eq!(angles.len(), 3);
    for idx in 0..angles.len() {
        let next = angles[(idx + 1) % angles.len()];
        let gap = (next - angles[idx]).rem_euclid(TAU);
        assert!((gap - TAU / 3.0).abs() < 1e-3, "gap {gap}");
    }
}

#[test]
fn click_through_hierarchy_and_back() {
    let mut viz = loaded(Viewport::new(1200.0, 800.0));

    let council = viz.node_position("1").unwrap();
    assert_eq!(click(&mut viz, council), PointerOutcome::Click(ClickTarget::Node("1".into())));
    settle(&mut viz);
    assert_eq!(viz.navigation().visible(), ["root", "1", "4", "5"]);
    assert_eq!(viz.node_position("1"), Some(Point::new(600.0, 400.0)));

    let commission = viz.node_position("5").unwrap();
    click(&mut viz, commission);
    settle(&mut viz);
    assert_eq!(viz.navigation().visible(), ["root", "1", "5", "9"]);
    let pairs: Vec<(&str, &str)> = viz
        .navigation()
        .edges()
        .iter()
        .map(|e| (e.from.as_str(), e.to.as_str()))
        .collect();
    assert_eq!(pairs, [("root", "1"), ("1", "5"), ("5", "9")]);

    // leaves do not drill
    let leaf = viz.node_position("9").unwrap();
    assert_eq!(click(&mut viz, leaf), PointerOutcome::Ignored);
    assert_eq!(viz.navigation().current_parent(), Some("5"));

    click(&mut viz, Point::new(50.0, 50.0));
    assert_eq!(viz.navigation().current_parent(), Some("1"));
    click(&mut viz, Point::new(50.0, 50.0));
    assert!(viz.navigation().is_overview());
}

#[test]
fn orphan_is_not_top_level() {
    let viz = loaded(Viewport::new(1200.0, 800.0));
    assert!(!viz.navigation().is_visible("10"));
    assert_eq!(viz.registry().unwrap().find_by_id("10").unwrap().parent_id.as_deref(), Some("99"));
}

#[test]
fn drag_survives_until_navigation() {
    let mut viz = loaded(Viewport::new(1200.0, 800.0));
    let start = viz.node_position("3").unwrap();
    viz.handle_pointer(PointerEvent::Press { x: start.x + 5.0, y: start.y });
    viz.handle_pointer(PointerEvent::Move { x: 300.0, y: 300.0 });
    assert_eq!(viz.cursor(), assembly_network::Cursor::Grabbing);
    viz.handle_pointer(PointerEvent::Release { x: 300.0, y: 300.0 });
    assert_eq!(viz.node_position("3"), Some(Point::new(295.0, 300.0)));

    viz.drill_into("2").unwrap();
    viz.go_back().unwrap();
    settle(&mut viz);
    assert_eq!(viz.node_position("3"), Some(start));
}

#[test]
fn missing_dataset_renders_error_view() {
    let mut viz = Visualization::new(Config::default(), Viewport::new(640.0, 480.0));
    let provider = JsonFileProvider::new("/definitely/not/here.json");
    assert!(futures::executor::block_on(viz.load(&provider)).is_err());
    assert!(matches!(viz.load_state(), LoadState::Failed(_)));
    let svg = render_svg(&viz);
    assert!(svg.contains("Error cargando datos"));
}

#[test]
fn renders_every_step_as_svg() {
    let mut viz = loaded(Viewport::new(900.0, 700.0));
    let mut frames = 0;
    viz.drill_into("2").unwrap();
    viz.run_transition(Duration::from_secs(1), Duration::from_millis(40), |viz| {
        let svg = render_svg(viz);
        assert!(svg.contains("<svg") && svg.contains("</svg>"));
        frames += 1;
    });
    assert!(frames >= 10);
    let svg = render_svg(&viz);
    assert!(svg.contains("Taula de Comerç"));
    assert!(svg.contains("<polyline"));
}
