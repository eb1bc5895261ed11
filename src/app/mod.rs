use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Color32, Context, Pos2, Vec2};

use crate::snapshot::{EdgeKind, NodeKind, TopologySnapshot, load_snapshot};

mod camera;
mod graph;
mod highlight;
mod physics;
mod render_utils;
mod ui;

use camera::Camera;
use graph::InteractionController;
use highlight::HighlightStyle;
use physics::SimulationConfig;

pub struct TopoScopeApp {
    snapshot_path: String,
    state: AppState,
    reload_rx: Option<Receiver<Result<TopologySnapshot, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<TopologySnapshot, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    snapshot: TopologySnapshot,
    search: String,
    selected: Option<String>,
    camera: Camera,
    interaction: InteractionController,
    simulation: SimulationConfig,
    highlight_style: HighlightStyle,
    live_physics: bool,
    show_legend: bool,
    graph_dirty: bool,
    graph_revision: u64,
    graph_cache: Option<RenderGraph>,
    search_match_cache: Option<SearchMatchCache>,
    dropped_edge_count: usize,
}

struct SearchMatchCache {
    query: String,
    graph_revision: u64,
    matches: Arc<HashSet<usize>>,
}

struct RenderGraph {
    nodes: Vec<RenderNode>,
    edges: Vec<RenderEdge>,
    index_by_id: HashMap<String, usize>,
    neighbors: Vec<Vec<usize>>,
    sim: SimulationState,
    physics_scratch: PhysicsScratch,
    view_scratch: ViewScratch,
}

/// Engine-owned simulation record. The caller-supplied display record stays
/// untouched in the snapshot; `display` joins the two at render time.
struct RenderNode {
    id: String,
    display: usize,
    kind: NodeKind,
    color: Color32,
    radius: f32,
    world_pos: Vec2,
    velocity: Vec2,
    /// Forced position while dragged; `Some` if and only if pinned.
    pinned: Option<Vec2>,
}

struct RenderEdge {
    source: usize,
    target: usize,
    kind: EdgeKind,
    label: Option<String>,
}

struct SimulationState {
    alpha: f32,
    alpha_target: f32,
}

struct PhysicsScratch {
    forces: Vec<Vec2>,
    positions: Vec<Vec2>,
    radii: Vec<f32>,
}

struct ViewScratch {
    screen_positions: Vec<Pos2>,
    screen_sizes: Vec<f32>,
}

impl RenderGraph {
    fn new(nodes: Vec<RenderNode>, edges: Vec<RenderEdge>) -> Self {
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            index_by_id.entry(node.id.clone()).or_insert(index);
        }

        let mut neighbors = vec![Vec::new(); nodes.len()];
        for edge in &edges {
            if edge.source == edge.target {
                continue;
            }
            if !neighbors[edge.source].contains(&edge.target) {
                neighbors[edge.source].push(edge.target);
            }
            if !neighbors[edge.target].contains(&edge.source) {
                neighbors[edge.target].push(edge.source);
            }
        }

        Self {
            nodes,
            edges,
            index_by_id,
            neighbors,
            sim: SimulationState {
                alpha: 1.0,
                alpha_target: 0.0,
            },
            physics_scratch: PhysicsScratch {
                forces: Vec::new(),
                positions: Vec::new(),
                radii: Vec::new(),
            },
            view_scratch: ViewScratch {
                screen_positions: Vec::new(),
                screen_sizes: Vec::new(),
            },
        }
    }
}

impl TopoScopeApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, snapshot_path: String) -> Self {
        let state = Self::start_load(snapshot_path.clone());
        Self {
            snapshot_path,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(snapshot_path: String) -> Receiver<Result<TopologySnapshot, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_snapshot(&snapshot_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(snapshot_path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(snapshot_path),
        }
    }
}

impl eframe::App for TopoScopeApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(snapshot) => AppState::Ready(Box::new(ViewModel::new(snapshot))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading topology snapshot...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load topology snapshot");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.snapshot_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.snapshot_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.snapshot_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => match result {
                            // A wholly new graph: keep settled positions for
                            // retained ids, reset the view transform.
                            Ok(snapshot) => {
                                model.replace_snapshot(snapshot, ctx.input(|input| input.time));
                            }
                            Err(error) => transition = Some(AppState::Error(error)),
                        },
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
