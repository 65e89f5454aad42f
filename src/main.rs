#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::sync::Arc;

use soundaffect::media::MediaEngine;
use soundaffect::widget::poller::RepaintHandle;
use soundaffect::{CpalMediaEngine, IndicatorShape, PlayerStyle, PlayerWidget};

#[derive(Clone, Default)]
struct StartupConfig {
    open_file: Option<std::path::PathBuf>,
    open_url: Option<String>,
    indicator: Option<IndicatorShape>,
    hide_prev: bool,
}

fn parse_startup_config() -> StartupConfig {
    let mut cfg = StartupConfig::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--open-file" => {
                if let Some(p) = args.next() {
                    cfg.open_file = Some(std::path::PathBuf::from(p));
                }
            }
            "--open-url" => {
                if let Some(u) = args.next() {
                    cfg.open_url = Some(u);
                }
            }
            "--indicator" => {
                if let Some(v) = args.next() {
                    cfg.indicator = match v.to_lowercase().as_str() {
                        "notch" => Some(IndicatorShape::Notch),
                        "dot" => Some(IndicatorShape::Dot),
                        _ => None,
                    };
                }
            }
            "--hide-prev" => {
                cfg.hide_prev = true;
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage:\n  soundaffect [options] [file-or-url]\n\nOptions:\n  --open-file <audio>\n  --open-url <http url>\n  --indicator <notch|dot>\n  --hide-prev\n  --help"
                );
                std::process::exit(0);
            }
            _ => {
                if arg.starts_with('-') {
                    continue;
                }
                if arg.starts_with("http://") || arg.starts_with("https://") {
                    cfg.open_url = Some(arg);
                } else {
                    cfg.open_file = Some(std::path::PathBuf::from(arg));
                }
            }
        }
    }
    cfg
}

struct DemoApp {
    widget: PlayerWidget,
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.widget.show(ui);
        });
    }
}

fn main() -> eframe::Result<()> {
    let cfg = parse_startup_config();
    let viewport = egui::ViewportBuilder::default()
        .with_min_inner_size([340.0, 220.0])
        .with_inner_size([560.0, 240.0]);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "SoundAffect",
        native_options,
        Box::new(move |cc| {
            let engine = Arc::new(CpalMediaEngine::new().expect("failed to open audio output"));
            if let Some(path) = &cfg.open_file {
                engine.load_file(path);
            }
            if let Some(url) = &cfg.open_url {
                engine.load_url(url);
            }
            let ctx = cc.egui_ctx.clone();
            let repaint: RepaintHandle = Arc::new(move || ctx.request_repaint());
            let mut style = PlayerStyle::default();
            if let Some(shape) = cfg.indicator {
                style.indicator_shape = shape;
            }
            style.show_prev_button = !cfg.hide_prev;
            let widget = PlayerWidget::with_style(engine, repaint, style);
            Ok(Box::new(DemoApp { widget }))
        }),
    )
}
