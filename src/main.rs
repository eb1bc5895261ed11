mod app;
mod snapshot;
mod util;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to a topology snapshot exported by the scan backend
    #[arg(long, default_value = "topology.json")]
    snapshot: String,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "toposcope",
        options,
        Box::new(move |cc| Ok(Box::new(app::TopoScopeApp::new(cc, args.snapshot.clone())))),
    )
}
