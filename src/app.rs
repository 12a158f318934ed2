use std::time::{Duration, Instant};

use eframe::egui;

use crate::config::ViewerConfig;
use crate::controller::{Controller, UiEvent};
use crate::loader::{DataSources, LoadState};
use crate::themes;
use crate::widgets::{self, DensityPlot};

const LOAD_POLL: Duration = Duration::from_millis(100);

pub struct ViewerApp {
    load: LoadState,
    controller: Option<Controller>,
    config: ViewerConfig,
    search: String,
}

impl ViewerApp {
    pub fn new(sources: DataSources, config: ViewerConfig) -> Self {
        log::info!(
            "loading {} and {}",
            sources.ratings.display(),
            sources.structure.display()
        );
        Self {
            load: LoadState::spawn(sources, config.clone()),
            controller: None,
            config,
            search: String::new(),
        }
    }

    fn poll_load(&mut self, ctx: &egui::Context) {
        if let Some(dataset) = self.load.poll() {
            log::info!(
                "loaded {} ratings over {} months, {} regions",
                dataset.table.len(),
                dataset.table.months().len(),
                dataset.index.region_count()
            );
            self.controller = Some(Controller::new(dataset, self.config.clone()));
            ctx.request_repaint();
        } else if self.load.is_loading() {
            ctx.request_repaint_after(LOAD_POLL);
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_load(ctx);

        let Some(controller) = self.controller.as_mut() else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    if self.load.is_loading() {
                        ui.add(egui::Spinner::new());
                    }
                });
            });
            return;
        };

        let now = Instant::now();
        controller.on_tick(now);

        let mut events = Vec::new();

        egui::SidePanel::left("regions")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                let search = egui::TextEdit::singleline(&mut self.search).hint_text("Search regions");
                if ui.add(search).changed() {
                    events.push(UiEvent::Search(self.search.clone()));
                }
                ui.separator();
                widgets::region_tree(
                    ui,
                    &controller.dataset().root,
                    controller.selection(),
                    controller.filter(),
                    &mut events,
                );
            });

        egui::TopBottomPanel::bottom("timeline").show(ctx, |ui| {
            ui.add_space(4.0);
            widgets::timeline(
                ui,
                controller.months(),
                controller.month_index(),
                controller.is_playing(),
                &mut events,
            );
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(controller.month().unwrap_or("No data"));
            widgets::legend(ui, controller.scene().legend());
            ui.add_space(8.0);
            let height = (ui.available_height() - 40.0).max(200.0);
            ui.add(
                DensityPlot::new(controller.scene(), controller.x_range(), controller.y_max())
                    .plot_height(height),
            );
        });

        for event in events {
            controller.handle(event, now);
        }

        if controller.scene_mut().advance(ctx.input(|i| i.stable_dt)) {
            ctx.request_repaint();
        }
        if controller.notice().is_none() {
            if let Some(wait) = controller.playback().until_next(Instant::now()) {
                ctx.request_repaint_after(wait);
            }
        }

        if let Some(message) = controller.notice().map(str::to_owned) {
            let modal = egui::Modal::new(egui::Id::new("selection_notice")).show(ctx, |ui| {
                ui.set_max_width(320.0);
                ui.label(message.as_str());
                ui.add_space(8.0);
                ui.button("OK").clicked()
            });
            if modal.inner || modal.should_close() {
                controller.dismiss_notice();
            }
        }
    }
}

pub fn run(sources: DataSources, config: ViewerConfig) -> eframe::Result {
    let mut native_options = eframe::NativeOptions::default();
    native_options.persist_window = true;
    native_options.viewport = egui::ViewportBuilder::default()
        .with_title("Rating distributions")
        .with_inner_size([1100.0, 720.0]);

    eframe::run_native(
        "ratingscope",
        native_options,
        Box::new(|cc| {
            let ctx = cc.egui_ctx.clone();
            if let Err(err) =
                ctrlc::set_handler(move || ctx.send_viewport_cmd(egui::ViewportCommand::Close))
            {
                log::warn!("failed to set exit signal handler: {err}");
            }
            themes::install(&cc.egui_ctx);
            Ok(Box::new(ViewerApp::new(sources, config)))
        }),
    )
}
