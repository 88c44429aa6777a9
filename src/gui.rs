// src/gui.rs
use eframe::egui;
use egui::Color32;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use std::path::PathBuf;
use std::time::Instant;

use crate::config::AppConfig;
use crate::drivers::{ChartBoard, LineSource, TelemetryPipeline};
use crate::engine::{save_snapshot, FrameTicker};
use crate::types::SeriesKind;

pub struct TelemetryApp {
    pipeline: TelemetryPipeline<Box<dyn LineSource>>,
    board: ChartBoard,
    ticker: FrameTicker,
    source_label: String,
    snapshot: Option<PathBuf>,
}

impl TelemetryApp {
    pub fn new(pipeline: TelemetryPipeline<Box<dyn LineSource>>, config: &AppConfig) -> Self {
        Self {
            pipeline,
            board: ChartBoard::new(),
            ticker: FrameTicker::new(config.poll_interval),
            source_label: config.source.describe(),
            snapshot: config.snapshot.clone(),
        }
    }

    fn status_line(&self) -> String {
        let machine = self.pipeline.machine();
        if machine.is_empty() {
            return format!("{} | waiting for data", self.source_label);
        }
        let stats = self.pipeline.stats();
        let marker = machine
            .marker_ms()
            .map(|ms| format!("{ms:.3} ms"))
            .unwrap_or_else(|| "n/a".to_owned());
        format!(
            "{} | samples {} (evicted {}) | encrypt time {} | lines {} (discarded {})",
            self.source_label,
            machine.len(),
            stats.evicted,
            marker,
            stats.total(),
            stats.malformed + stats.headers
        )
    }

    fn draw_chart(&self, ui: &mut egui::Ui, kind: SeriesKind, height: f32) {
        let (r, g, b) = kind.rgb();
        let mut plot = Plot::new(kind.name())
            .height(height)
            .legend(Legend::default())
            .x_axis_label(self.board.axis_label())
            .allow_scroll(false);
        if let Some(axis) = self.board.axis() {
            plot = plot.include_x(axis.low).include_x(axis.high);
        }
        ui.label(egui::RichText::new(kind.title()).strong());
        plot.show(ui, |plot_ui| {
            let points = self.board.kind_points(kind);
            if !points.is_empty() {
                plot_ui.line(
                    Line::new(PlotPoints::new(points.to_vec()))
                        .name(kind.name())
                        .color(Color32::from_rgb(r, g, b))
                        .width(2.0),
                );
            }
        });
    }
}

impl eframe::App for TelemetryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // 1. 轮询：每个间隔最多读一行
        if self.ticker.due(Instant::now()) {
            self.pipeline.pump_once(&mut self.board);
        }
        ctx.request_repaint_after(self.ticker.interval());

        // 2. UI 绘制
        ctx.set_visuals(egui::Visuals::light());

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.monospace(self.status_line());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let spacing = ui.spacing().item_spacing.y * 2.0 + 20.0;
            let height = (ui.available_height() / SeriesKind::ALL.len() as f32 - spacing).max(80.0);
            for kind in SeriesKind::ALL {
                self.draw_chart(ui, kind, height);
            }
        });
    }
}

impl Drop for TelemetryApp {
    fn drop(&mut self) {
        self.pipeline.shutdown(&mut self.board);
        if let Some(path) = &self.snapshot {
            save_snapshot(&self.board, path);
        }
    }
}

/// Opens the window and blocks until it is closed.
pub fn run(
    pipeline: TelemetryPipeline<Box<dyn LineSource>>,
    config: &AppConfig,
) -> Result<(), eframe::Error> {
    let app = TelemetryApp::new(pipeline, config);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_title("Real-Time Sensor Plot"),
        ..Default::default()
    };
    eframe::run_native(
        "powerscope",
        options,
        Box::new(move |_cc| Box::new(app)),
    )
}
