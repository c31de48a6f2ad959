/*!
 * Desktop dashboard for covid-tracker
 *
 * A cross-platform window showing:
 * - Worldwide or per-country counters (click one to change the active metric)
 * - Countries ranked by cases
 * - Circles on a map sized by the active metric
 * - Daily new values of the active metric, worldwide
 *
 * Platform support: Windows, macOS, Linux
 */

use covid_tracker::api::DEFAULT_HISTORY_DAYS;
use covid_tracker::dispatch::Dispatcher;
use covid_tracker::present::{
    CircleSpec, Counter, DashboardView, GraphPoint, derive_view, metric_style,
};
use covid_tracker::{Client, Dashboard, Metric, Region, Viewport, storage};
use eframe::egui;
use egui::{Align2, Color32, FontId, Sense, Stroke, pos2, vec2};
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("COVID-19 Tracker"),
        ..Default::default()
    };

    eframe::run_native(
        "COVID-19 Tracker",
        options,
        Box::new(|_cc| {
            let client = Client::new()?;
            Ok(Box::new(TrackerApp::new(client)))
        }),
    )
}

/// Main application state
struct TrackerApp {
    dashboard: Dashboard,
    dispatcher: Dispatcher<Client>,
    // Dropdown value; `Region::WORLDWIDE` or a country code.
    region_choice: String,
    export_dir: String,
    status_message: String,
}

impl TrackerApp {
    fn new(client: Client) -> Self {
        let export_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .to_string_lossy()
            .to_string();

        let mut dispatcher = Dispatcher::new(Arc::new(client));
        dispatcher.spawn_global();
        dispatcher.spawn_countries();
        dispatcher.spawn_history(DEFAULT_HISTORY_DAYS);

        Self {
            dashboard: Dashboard::new(),
            dispatcher,
            region_choice: Region::WORLDWIDE.to_string(),
            export_dir,
            status_message: String::new(),
        }
    }

    fn check_results(&mut self) {
        for event in self.dispatcher.poll() {
            self.dashboard.apply(event);
        }
    }

    fn on_region_change(&mut self) {
        let ticket = self.dashboard.select_region(Region::parse(&self.region_choice));
        self.dispatcher.spawn_detail(ticket);
    }

    fn refresh(&mut self) {
        self.dispatcher.spawn_global();
        self.dispatcher.spawn_countries();
        self.dispatcher.spawn_history(DEFAULT_HISTORY_DAYS);
        self.on_region_change();
    }

    fn export_table(&mut self) {
        let path = PathBuf::from(&self.export_dir).join("covid_countries.csv");
        self.status_message = match storage::save_csv(self.dashboard.store().ranked(), &path) {
            Ok(()) => format!("Saved {}", path.display()),
            Err(err) => format!("Failed to save CSV: {}", err),
        };
    }
}

impl eframe::App for TrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_results();

        // Keep polling while requests are outstanding
        if self.dispatcher.in_flight() > 0 {
            ctx.request_repaint();
        }

        let view = derive_view(&self.dashboard);

        egui::SidePanel::right("right_panel")
            .min_width(320.0)
            .show(ctx, |ui| {
                ui.heading("Live cases by country");
                egui::ScrollArea::vertical()
                    .max_height(ui.available_height() * 0.55)
                    .show(ui, |ui| table_ui(ui, &view));

                ui.horizontal(|ui| {
                    ui.label("Export to:");
                    ui.text_edit_singleline(&mut self.export_dir);
                    if ui.button("Save CSV").clicked() {
                        self.export_table();
                    }
                });
                if !self.status_message.is_empty() {
                    ui.label(&self.status_message);
                }

                ui.add_space(10.0);
                ui.heading(&view.graph_title);
                graph_ui(ui, &view.graph, self.dashboard.selection().metric);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("COVID-19 Tracker");
                ui.add_space(20.0);

                let selected_text = if self.region_choice == Region::WORLDWIDE {
                    "Worldwide".to_string()
                } else {
                    view.options
                        .iter()
                        .find(|o| o.code == self.region_choice)
                        .map(|o| o.name.clone())
                        .unwrap_or_else(|| self.region_choice.clone())
                };
                let before = self.region_choice.clone();
                egui::ComboBox::from_id_salt("region")
                    .selected_text(selected_text)
                    .height(400.0)
                    .show_ui(ui, |ui| {
                        ui.selectable_value(
                            &mut self.region_choice,
                            Region::WORLDWIDE.to_string(),
                            "Worldwide",
                        );
                        for opt in &view.options {
                            ui.selectable_value(&mut self.region_choice, opt.code.clone(), &opt.name);
                        }
                    });
                if self.region_choice != before {
                    self.on_region_change();
                }

                if ui
                    .add_enabled(self.dispatcher.in_flight() == 0, egui::Button::new("Refresh"))
                    .clicked()
                {
                    self.refresh();
                }
                if self.dispatcher.in_flight() > 0 {
                    ui.spinner();
                }
            });

            if let Some(notice) = &view.notice {
                ui.horizontal(|ui| {
                    ui.colored_label(Color32::RED, notice);
                    if ui.small_button("Dismiss").clicked() {
                        self.dashboard.dismiss_notice();
                    }
                });
            }

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                for counter in &view.counters {
                    if counter_ui(ui, counter).clicked() {
                        self.dashboard.set_metric(counter.metric);
                    }
                }
            });

            ui.add_space(8.0);
            map_ui(ui, &view.overlay, view.viewport);
        });
    }
}

fn counter_ui(ui: &mut egui::Ui, counter: &Counter) -> egui::Response {
    let accent = if counter.is_red {
        Color32::from_rgb(204, 16, 52)
    } else {
        Color32::from_rgb(125, 215, 29)
    };
    let stroke = if counter.active {
        Stroke::new(3.0, accent)
    } else {
        Stroke::new(1.0, Color32::GRAY)
    };
    let inner = egui::Frame::group(ui.style())
        .stroke(stroke)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.set_min_width(180.0);
            ui.vertical(|ui| {
                ui.label(counter.title);
                ui.label(egui::RichText::new(&counter.delta).size(24.0).color(accent));
                ui.label(format!("{} Total", counter.total));
            });
        });
    ui.interact(
        inner.response.rect,
        ui.id().with(counter.title),
        Sense::click(),
    )
}

fn table_ui(ui: &mut egui::Ui, view: &DashboardView) {
    egui::Grid::new("countries_table")
        .striped(true)
        .num_columns(2)
        .show(ui, |ui| {
            for row in &view.table {
                ui.label(&row.name);
                ui.label(egui::RichText::new(&row.cases).strong());
                ui.end_row();
            }
        });
}

fn rgba(metric_color: (u8, u8, u8), alpha: f32) -> Color32 {
    let (r, g, b) = metric_color;
    Color32::from_rgba_unmultiplied(r, g, b, (alpha * 255.0) as u8)
}

fn map_ui(ui: &mut egui::Ui, overlay: &[CircleSpec], viewport: Viewport) {
    let size = ui.available_size();
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let rect = response.rect;
    painter.rect_filled(rect, 4.0, Color32::from_rgb(230, 236, 242));

    let (w, h) = (rect.width(), rect.height());
    let mut hovered: Option<&CircleSpec> = None;
    for circle in overlay {
        let (x, y) = viewport.project(circle.center, w, h);
        let center = rect.min + vec2(x, y);
        let radius = viewport.meters_to_px(circle.radius, w).max(1.0);
        if !rect.expand(radius).contains(center) {
            continue;
        }
        painter.circle(
            center,
            radius,
            rgba(circle.rgb, circle.fill_opacity),
            Stroke::new(1.0, rgba(circle.rgb, 1.0)),
        );
        if let Some(pointer) = response.hover_pos()
            && pointer.distance(center) <= radius
        {
            hovered = Some(circle);
        }
    }

    if let Some(c) = hovered {
        let text = format!(
            "{}\nCases: {}\nRecovered: {}\nDeaths: {}",
            c.popup.name, c.popup.cases, c.popup.recovered, c.popup.deaths
        );
        response.on_hover_text(text);
    }
}

fn graph_ui(ui: &mut egui::Ui, points: &[GraphPoint], metric: Metric) {
    let size = vec2(ui.available_width(), ui.available_height().max(120.0));
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let rect = response.rect.shrink(8.0);
    if points.len() < 2 {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "No data yet",
            FontId::proportional(14.0),
            Color32::GRAY,
        );
        return;
    }

    let max = points.iter().map(|p| p.value).max().unwrap_or(0).max(1) as f32;
    let min = points.iter().map(|p| p.value).min().unwrap_or(0).min(0) as f32;
    let span = (max - min).max(1.0);
    let step = rect.width() / (points.len() - 1) as f32;
    let to_screen = |i: usize, v: i64| {
        pos2(
            rect.left() + i as f32 * step,
            rect.bottom() - (v as f32 - min) / span * rect.height(),
        )
    };

    let color = metric_style(metric).rgb;
    let baseline = to_screen(0, 0).y;
    for (i, p) in points.iter().enumerate() {
        let top = to_screen(i, p.value);
        painter.line_segment(
            [pos2(top.x, baseline), top],
            Stroke::new(step.max(1.0), rgba(color, 0.5)),
        );
    }
    let line: Vec<_> = points
        .iter()
        .enumerate()
        .map(|(i, p)| to_screen(i, p.value))
        .collect();
    painter.add(egui::Shape::line(line, Stroke::new(2.0, rgba(color, 1.0))));

    painter.text(
        rect.left_top(),
        Align2::LEFT_TOP,
        covid_tracker::format::format_magnitude(Some(max as i64)),
        FontId::proportional(12.0),
        Color32::DARK_GRAY,
    );
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        painter.text(
            rect.left_bottom(),
            Align2::LEFT_BOTTOM,
            first.date.format("%m/%d/%y").to_string(),
            FontId::proportional(12.0),
            Color32::DARK_GRAY,
        );
        painter.text(
            rect.right_bottom(),
            Align2::RIGHT_BOTTOM,
            last.date.format("%m/%d/%y").to_string(),
            FontId::proportional(12.0),
            Color32::DARK_GRAY,
        );
    }
}
