mod app;
mod engine;
mod network;
mod util;

use clap::Parser;
use env_logger::Env;

use network::DataSource;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Network JSON file, or an http(s) URL serving it.
    #[arg(long, default_value = "data/network.json")]
    data: String,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long, default_value_t = 1440.0)]
    width: f32,

    #[arg(long, default_value_t = 920.0)]
    height: f32,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str()))
        .format_timestamp_secs()
        .init();

    let source = DataSource::parse(&args.data);
    log::info!("reading network from {source}");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    eframe::run_native(
        "entity-graph",
        options,
        Box::new(move |cc| Ok(Box::new(app::ExplorerApp::new(cc, source)))),
    )
}
