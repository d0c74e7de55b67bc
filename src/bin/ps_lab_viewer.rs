//! Native hierarchy viewer
//!
//! Opens a window around the hierarchy visualizer. The hierarchy is loaded
//! from a JSON file; an optional detection event file is applied on start.
//!
//! ```bash
//! ps_lab_viewer --hierarchy org.json
//! ps_lab_viewer --hierarchy org.json --detection-event event.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use ps_lab::visualizer::DetectionEvent;
use ps_lab::{HierarchyVisualizer, Node, Notification, NotificationVariant, PsLabError};

#[derive(Parser, Debug)]
#[command(name = "ps_lab_viewer")]
#[command(version = "0.1.0")]
#[command(about = "Interactive permission-set hierarchy viewer")]
struct Args {
    /// Full hierarchy JSON
    #[arg(long)]
    hierarchy: PathBuf,

    /// Detection event JSON: { "permissionSets": [...], "payload": {...} }
    #[arg(long)]
    detection_event: Option<PathBuf>,
}

fn load_hierarchy(path: &Path) -> Result<Option<Node>, PsLabError> {
    let content = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}

fn load_event(path: &Path) -> Result<DetectionEvent> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

struct ViewerApp {
    visualizer: HierarchyVisualizer,
    pending_event: Option<DetectionEvent>,
    notices: Vec<Notification>,
}

impl ViewerApp {
    fn new(visualizer: HierarchyVisualizer, pending_event: Option<DetectionEvent>) -> Self {
        Self {
            visualizer,
            pending_event,
            notices: Vec::new(),
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // The chart must exist before the first detection is applied
        if self.visualizer.chart().is_some() {
            if let Some(event) = self.pending_event.take() {
                self.visualizer.handle_detection(event);
            }
        }
        self.notices.extend(self.visualizer.take_notifications());
        for event in self.visualizer.take_tree_events() {
            info!(?event, "tree event");
        }

        if !self.notices.is_empty() {
            egui::TopBottomPanel::bottom("notices").show(ctx, |ui| {
                for notice in &self.notices {
                    let color = match notice.variant {
                        NotificationVariant::Error => egui::Color32::from_rgb(200, 60, 60),
                        _ => ui.visuals().text_color(),
                    };
                    ui.colored_label(color, format!("{}: {}", notice.title, notice.message));
                }
                if ui.small_button("Dismiss").clicked() {
                    self.notices.clear();
                }
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.visualizer.ui(ui);
        });
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let mut visualizer = HierarchyVisualizer::new();
    visualizer.load(load_hierarchy(&args.hierarchy));
    let pending_event = args
        .detection_event
        .as_deref()
        .map(load_event)
        .transpose()?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("PS-Lab Hierarchy")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let app = ViewerApp::new(visualizer, pending_event);
    let app_creator = move |_cc: &eframe::CreationContext<'_>| {
        Ok(Box::new(app) as Box<dyn eframe::App>)
    };

    match eframe::run_native("PS-Lab Hierarchy", native_options, Box::new(app_creator)) {
        Ok(()) => {
            info!("viewer closed");
            Ok(())
        }
        Err(e) => {
            error!("viewer error: {}", e);
            Err(anyhow::anyhow!("viewer error: {}", e))
        }
    }
}
