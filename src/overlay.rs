use std::any::Any;

use egui_plot as eplot;

use crate::entity::{Behavior, UpdateCtx};
use crate::input::KeyCode;

/// Rolling samples for [`GuiPanel`] contents; updated by the panel each
/// frame before the overlay pass runs.
pub struct PanelStats {
    pub frame_ms: Vec<f32>,
    pub fps: u32,
    pub elapsed: f32,
}

const FRAME_HISTORY: usize = 240;

type PanelContents = Box<dyn FnMut(&mut egui::Ui, &PanelStats)>;

/// Debug-GUI behaviour unit: a named overlay window with a toggle key and a
/// caller-provided closure painting its contents during the overlay pass.
pub struct GuiPanel {
    pub title: String,
    pub open: bool,
    pub toggle_key: KeyCode,
    stats: PanelStats,
    contents: Option<PanelContents>,
}

impl GuiPanel {
    pub fn new(title: impl Into<String>, toggle_key: KeyCode) -> Self {
        Self {
            title: title.into(),
            open: false,
            toggle_key,
            stats: PanelStats { frame_ms: Vec::new(), fps: 0, elapsed: 0.0 },
            contents: None,
        }
    }

    pub fn with_contents(mut self, contents: impl FnMut(&mut egui::Ui, &PanelStats) + 'static) -> Self {
        self.contents = Some(Box::new(contents));
        self
    }

    pub fn opened(mut self) -> Self {
        self.open = true;
        self
    }

    pub fn plot_line(ui: &mut egui::Ui, label: &str, values: &[f32]) {
        let points: Vec<[f64; 2]> =
            values.iter().enumerate().map(|(i, v)| [i as f64, *v as f64]).collect();
        eplot::Plot::new(label.to_owned()).height(80.0).include_y(0.0).show(ui, |plot_ui| {
            plot_ui.line(eplot::Line::new(label.to_owned(), eplot::PlotPoints::from(points)));
        });
    }

    pub fn plot_bar(ui: &mut egui::Ui, label: &str, values: &[f32]) {
        let bars: Vec<eplot::Bar> =
            values.iter().enumerate().map(|(i, v)| eplot::Bar::new(i as f64, *v as f64)).collect();
        eplot::Plot::new(label.to_owned()).height(80.0).include_y(0.0).show(ui, |plot_ui| {
            plot_ui.bar_chart(eplot::BarChart::new(label.to_owned(), bars));
        });
    }
}

impl Behavior for GuiPanel {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn update(&mut self, ctx: &mut UpdateCtx<'_>) {
        if self.toggle_key != 0 && ctx.input.is_key_pressed(self.toggle_key) {
            self.open = !self.open;
        }
        self.stats.frame_ms.push(ctx.dt * 1000.0);
        if self.stats.frame_ms.len() > FRAME_HISTORY {
            self.stats.frame_ms.remove(0);
        }
        self.stats.fps = ctx.clock.fps();
        self.stats.elapsed = ctx.clock.elapsed_seconds();
    }

    fn overlay(&mut self, gui: &egui::Context) {
        let Some(contents) = self.contents.as_mut() else { return };
        if !self.open {
            return;
        }
        let mut open = self.open;
        egui::Window::new(&self.title).open(&mut open).show(gui, |ui| {
            contents(ui, &self.stats);
        });
        self.open = open;
    }
}
