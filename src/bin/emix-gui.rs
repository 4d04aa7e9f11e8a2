/*!
 * GUI application for energy-mix-rs - electricity data explorer and energy budget simulator
 *
 * A cross-platform desktop application providing:
 * - A world view ranking countries by electricity consumption for a chosen year
 * - A Korea view with energy-mix sliders, per-category locks and a budget estimate,
 *   next to the actual mix, energy balance and sector savings of the selected year
 * - CSV/JSON export of the estimate
 *
 * Usage: emix-gui [DATASET.json] [PRICES.json] [KOREA_DIR]
 */

use anyhow::Result;
use eframe::egui;
use energy_mix::budget::{self, DEFAULT_NEEDED_ENERGY};
use energy_mix::dataset::DEFAULT_TOP_N;
use energy_mix::format::{format_number, format_share};
use energy_mix::korea::PriceSource;
use energy_mix::mix::TOTAL;
use energy_mix::view::KOREA;
use energy_mix::{
    Category, CategorySet, Dataset, KoreaData, Metric, MixOutcome, MixResult, UnitPrices, View,
    ViewState, storage,
};
use std::path::PathBuf;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let data_path = args.next().map(PathBuf::from);
    let prices_path = args.next().map(PathBuf::from);
    let korea_dir = args.next().map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 680.0])
            .with_min_inner_size([640.0, 420.0])
            .with_title("Energy Mix Explorer - energy-mix-rs"),
        ..Default::default()
    };

    eframe::run_native(
        "Energy Mix Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(EmixApp::new(data_path, prices_path, korea_dir)))),
    )
}

/// Main application state
struct EmixApp {
    dataset: Dataset,
    prices: UnitPrices,
    korea: KoreaData,
    view: ViewState,
    mix: CategorySet,
    needed_energy: f64,

    export_format: ExportFormat,
    output_dir: String,
    locale: String,

    status_message: String,
    error_message: String,
}

#[derive(Debug, Clone, PartialEq)]
enum ExportFormat {
    Csv,
    Json,
}

impl EmixApp {
    fn new(
        data_path: Option<PathBuf>,
        prices_path: Option<PathBuf>,
        korea_dir: Option<PathBuf>,
    ) -> Self {
        // Default to user's documents (or home) directory for output
        let output_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .to_string_lossy()
            .to_string();

        let mut app = Self {
            dataset: Dataset::default(),
            prices: UnitPrices::new(),
            korea: KoreaData::default(),
            view: ViewState::new(),
            mix: CategorySet::default(),
            needed_energy: DEFAULT_NEEDED_ENERGY,

            export_format: ExportFormat::Csv,
            output_dir,
            locale: "en".to_string(),

            status_message: String::new(),
            error_message: String::new(),
        };
        if let Some(path) = data_path {
            app.load_dataset(path);
        }
        if let Some(path) = prices_path {
            app.load_prices(path);
        }
        if let Some(dir) = korea_dir {
            app.load_korea(dir);
        }
        app
    }

    fn load_dataset(&mut self, path: PathBuf) {
        match Dataset::load(&path) {
            Ok(ds) => {
                let bounds = ds.year_bounds();
                self.dataset = ds;
                let year = self.view.year;
                self.view.set_year(year, bounds);
                self.status_message =
                    format!("Loaded {} countries from {}", self.dataset.len(), path.display());
                self.error_message.clear();
            }
            Err(err) => self.error_message = format!("Failed to load dataset: {:#}", err),
        }
    }

    fn load_prices(&mut self, path: PathBuf) {
        match UnitPrices::load(&path) {
            Ok(prices) => {
                self.prices = prices;
                self.status_message = format!("Loaded unit prices from {}", path.display());
                self.error_message.clear();
            }
            Err(err) => self.error_message = format!("Failed to load prices: {:#}", err),
        }
    }

    fn load_korea(&mut self, dir: PathBuf) {
        match KoreaData::load_dir(&dir) {
            Ok(data) => {
                self.korea = data;
                self.status_message = format!("Loaded Korea series from {}", dir.display());
                self.error_message.clear();
            }
            Err(err) => self.error_message = format!("Failed to load Korea series: {:#}", err),
        }
    }

    /// Replace the sliders with the actual mix of the selected year.
    fn use_actual_mix(&mut self) {
        let year = self.view.year;
        let Some(production) = self.korea.production_for(year) else {
            self.status_message = format!("No production data for {}", year);
            return;
        };
        match production.to_mix(*self.mix.config()) {
            Ok(mix) => {
                self.mix = mix;
                self.status_message = format!("Sliders set to the {} mix", year);
            }
            Err(err) => self.error_message = err.to_string(),
        }
    }

    fn apply(&mut self, what: String, outcome: MixResult<MixOutcome>) {
        match outcome {
            Ok(MixOutcome::Applied) => self.error_message.clear(),
            Ok(MixOutcome::Unchanged(reason)) => {
                self.status_message = format!("{}: {}", what, reason);
            }
            Err(err) => self.error_message = err.to_string(),
        }
    }

    fn export_estimate(&mut self) {
        let estimate = budget::estimate(&self.mix, self.needed_energy, &self.prices);
        let dir = PathBuf::from(&self.output_dir);
        let result = match self.export_format {
            ExportFormat::Csv => {
                let path = dir.join("emix_estimate.csv");
                storage::save_estimate_csv(&estimate, &path).map(|_| path)
            }
            ExportFormat::Json => {
                let path = dir.join("emix_estimate.json");
                storage::save_estimate_json(&estimate, &path).map(|_| path)
            }
        };
        match result {
            Ok(path) => {
                self.status_message = format!("Saved estimate to {}", path.display());
                self.error_message.clear();
            }
            Err(err) => self.error_message = format!("Failed to save estimate: {:#}", err),
        }
    }

    fn world_view(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Open dataset…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("JSON", &["json"])
                    .pick_file()
                {
                    self.load_dataset(path);
                }
            }
            if self.dataset.is_empty() {
                ui.label("No dataset loaded");
            }
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.label("Year:");
            let mut year = self.view.year;
            let (lo, hi) = self.dataset.year_bounds().unwrap_or((1980, 2030));
            if ui
                .add(egui::Slider::new(&mut year, lo..=hi))
                .changed()
            {
                self.view.set_year(year, Some((lo, hi)));
            }

            ui.label("Country:");
            let selected = self.view.selected_country.clone().unwrap_or_default();
            let mut picked: Option<String> = None;
            egui::ComboBox::from_id_salt("country")
                .selected_text(if selected.is_empty() { "World" } else { selected.as_str() })
                .show_ui(ui, |ui| {
                    if ui.selectable_label(selected.is_empty(), "World").clicked() {
                        picked = Some(String::new());
                    }
                    if ui.selectable_label(selected == KOREA, KOREA).clicked() {
                        picked = Some(KOREA.to_string());
                    }
                    for name in self.dataset.names() {
                        if name != KOREA && ui.selectable_label(selected == name, name).clicked() {
                            picked = Some(name.to_string());
                        }
                    }
                });
            if let Some(name) = picked {
                self.view.select_country(&name);
            }
        });

        if let Some(name) = self.view.selected_country.clone() {
            if self.view.hidden_from_ranking(&name, &self.dataset) {
                ui.colored_label(
                    egui::Color32::from_rgb(0xff, 0xc1, 0x07),
                    format!("{} is outside the top {}; show all countries to find it.", name, DEFAULT_TOP_N),
                );
            }
        }

        ui.add_space(5.0);

        let toggle_text = if self.view.show_all_countries {
            format!("Show Top {}", DEFAULT_TOP_N)
        } else {
            "Show All Countries".to_string()
        };
        if ui.button(toggle_text).clicked() {
            self.view.toggle_show_all();
        }

        let rows = self
            .dataset
            .consumption_ranking(self.view.year, self.view.ranking_limit());
        let mut clicked: Option<String> = None;
        egui::ScrollArea::vertical()
            .max_height(420.0)
            .show(ui, |ui| {
                egui::Grid::new("ranking").striped(true).show(ui, |ui| {
                    ui.strong("#");
                    ui.strong("Country");
                    ui.strong("Consumption (TWh)");
                    ui.strong("Generation (TWh)");
                    ui.strong("Self-sufficiency");
                    ui.end_row();
                    for r in &rows {
                        ui.label(r.rank.to_string());
                        if ui.link(r.country.as_str()).clicked() {
                            clicked = Some(r.country.clone());
                        }
                        ui.label(format_number(r.consumption, 1, &self.locale));
                        ui.label(format_number(r.generation, 1, &self.locale));
                        ui.label(
                            r.self_sufficiency
                                .map(|v| format!("{:.1}%", v))
                                .unwrap_or_else(|| "N/A".to_string()),
                        );
                        ui.end_row();
                    }
                });
            });
        if let Some(name) = clicked {
            self.view.click_country(&name, &self.dataset);
        }
    }

    fn detail_window(&mut self, ctx: &egui::Context) {
        let Some(name) = self.view.detail_country.clone() else {
            return;
        };
        let Some(record) = self.dataset.get(&name) else {
            self.view.close_detail();
            return;
        };
        let year = self.view.year;
        let mut open = true;
        egui::Window::new(name.as_str()).open(&mut open).show(ctx, |ui| {
            ui.label(format!("Region: {}", record.region));
            let fmt = |v: Option<f64>, unit: &str| {
                v.map(|x| format!("{:.1}{}", x, unit))
                    .unwrap_or_else(|| "N/A".to_string())
            };
            ui.label(format!(
                "Self-Sufficiency: {}",
                fmt(record.value(Metric::SelfSufficiency, year), "%")
            ));
            ui.label(format!(
                "Generation: {}",
                fmt(record.value(Metric::NetGeneration, year), " TWh")
            ));
            ui.label(format!(
                "Consumption: {}",
                fmt(record.value(Metric::NetConsumption, year), " TWh")
            ));
            ui.label(format!(
                "Trade balance: {}",
                fmt(record.value(Metric::TradeBalance, year), " TWh")
            ));
            if let Some(rank) = self.dataset.rank_of(&name, year) {
                ui.label(format!("Consumption rank in {}: {}", year, rank));
            }
        });
        if !open {
            self.view.close_detail();
        }
    }

    fn korea_view(&mut self, ui: &mut egui::Ui) {
        if ui.button("← World").clicked() {
            self.view.show_world();
        }
        ui.heading("Energy Budget Simulation");
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            if ui.button("Open Korea data folder…").clicked() {
                if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                    self.load_korea(dir);
                }
            }
            ui.label("Year:");
            let mut year = self.view.year;
            if ui.add(egui::DragValue::new(&mut year)).changed() {
                let production = self.korea.production();
                let bounds = production
                    .first()
                    .zip(production.last())
                    .map(|(a, b)| (a.year, b.year));
                self.view.set_year(year, bounds);
            }
            let has_year = self.korea.production_for(self.view.year).is_some();
            if ui
                .add_enabled(has_year, egui::Button::new("Use actual mix"))
                .clicked()
            {
                self.use_actual_mix();
            }
        });
        if let Some(b) = self.korea.balance_for(self.view.year) {
            let fmt = |v: Option<f64>| {
                v.map(|x| format_number(x, 1, &self.locale))
                    .unwrap_or_else(|| "N/A".to_string())
            };
            ui.label(format!(
                "생산 {}  ·  순수입 {}  ·  소비 {}",
                fmt(b.production),
                fmt(b.net_imports),
                fmt(b.consumption)
            ));
        }

        ui.horizontal(|ui| {
            ui.label("Needed Energy:");
            ui.add(
                egui::DragValue::new(&mut self.needed_energy)
                    .range(0.0..=f64::MAX)
                    .speed(100.0),
            );
            ui.label("1000toe");
        });

        ui.add_space(5.0);

        let categories: Vec<Category> = self.mix.categories().collect();
        let actual = self.korea.shares_for(self.view.year).unwrap_or_default();
        ui.group(|ui| {
            for c in categories {
                let (r, g, b) = c.color_rgb();
                let mut value = self.mix.share(c).unwrap_or(0.0);
                let mut locked = self.mix.is_locked(c).unwrap_or(false);
                let can_lock = self.mix.can_lock(c).unwrap_or(false);
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::from_rgb(r, g, b), "■");
                    ui.label(format!("{} ({})", c.label_ko(), c.label()));
                    let slider = ui.add_enabled(
                        !locked,
                        egui::Slider::new(&mut value, 0.1..=99.6)
                            .step_by(0.1)
                            .suffix("%"),
                    );
                    if slider.changed() {
                        let outcome = self.mix.set_share(c, value);
                        self.apply(format!("{} → {:.1}%", c.key(), value), outcome);
                    }
                    if ui
                        .add_enabled(can_lock, egui::Checkbox::new(&mut locked, "Lock"))
                        .changed()
                    {
                        let outcome = self.mix.set_locked(c, locked);
                        self.apply(format!("lock {}", c.key()), outcome);
                    }
                    if let Some((_, share)) = actual.iter().find(|(a, _)| *a == c) {
                        ui.weak(format!("actual {}", format_share(*share)));
                    }
                });
            }
            ui.label(format!("Total: {}", format_share(self.mix.total())));
            if (self.mix.total() - TOTAL).abs() > 0.05 {
                ui.colored_label(
                    egui::Color32::from_rgb(0xff, 0x7f, 0x0e),
                    "Several categories sit at the floor; the total is approximate.",
                );
            }
        });

        ui.add_space(10.0);

        ui.horizontal(|ui| {
            if ui.button("Load unit prices…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("JSON", &["json"])
                    .pick_file()
                {
                    self.load_prices(path);
                }
            }
            if self.prices.is_empty() {
                ui.label("No unit prices loaded; costs count as zero.");
            }
        });

        let estimate = budget::estimate(&self.mix, self.needed_energy, &self.prices);
        egui::Grid::new("budget").striped(true).show(ui, |ui| {
            ui.strong("Source");
            ui.strong("Energy (1000toe)");
            ui.strong("Unit price");
            ui.strong("Cost (million KRW)");
            ui.end_row();
            for row in &estimate.rows {
                ui.label(row.category.label_ko());
                ui.label(format_number(row.energy, 1, &self.locale));
                ui.label(
                    row.unit_price
                        .map(|p| format_number(p, 2, &self.locale))
                        .unwrap_or_else(|| "NA".to_string()),
                );
                ui.label(format_number(row.cost, 2, &self.locale));
                ui.end_row();
            }
        });
        ui.heading(format!(
            "Needed Energy Budget: {}억 KRW",
            format_number(estimate.total_eok(), 2, &self.locale)
        ));

        let reductions = self.korea.reductions();
        if !reductions.is_empty() {
            ui.collapsing("Electricity savings by sector", |ui| {
                if let Some(total) = self.korea.reduction_total() {
                    ui.label(format!(
                        "Reducible overall: {}",
                        total
                            .reduction_rate
                            .map(format_share)
                            .unwrap_or_else(|| "N/A".to_string())
                    ));
                }
                egui::Grid::new("savings").striped(true).show(ui, |ui| {
                    ui.strong("Sector");
                    ui.strong("Usage");
                    ui.strong("After reduction");
                    ui.strong("Reducible");
                    ui.strong("Rate");
                    ui.end_row();
                    for r in &reductions {
                        ui.label(r.sector.as_str()).on_hover_text(r.description.as_str());
                        ui.label(format_number(r.usage, 0, &self.locale));
                        ui.label(format_number(r.after_reduction, 0, &self.locale));
                        ui.label(format_number(r.reduction, 0, &self.locale));
                        ui.label(
                            r.reduction_rate
                                .map(format_share)
                                .unwrap_or_else(|| "N/A".to_string()),
                        );
                        ui.end_row();
                    }
                });
            });
        }

        if !self.korea.monthly_prices().is_empty() {
            ui.collapsing("Monthly unit prices", |ui| {
                egui::Grid::new("monthly_prices").striped(true).show(ui, |ui| {
                    ui.strong("Month");
                    for source in PriceSource::ALL {
                        ui.strong(source.label_ko());
                    }
                    ui.end_row();
                    for m in self.korea.monthly_prices() {
                        ui.label(format!("{}월", m.month));
                        for source in PriceSource::ALL {
                            ui.label(
                                m.get(source)
                                    .map(|p| format_number(p, 2, &self.locale))
                                    .unwrap_or_else(|| "NA".to_string()),
                            );
                        }
                        ui.end_row();
                    }
                });
            });
        }

        ui.add_space(10.0);

        ui.collapsing("Export", |ui| {
            ui.horizontal(|ui| {
                ui.label("Format:");
                ui.radio_value(&mut self.export_format, ExportFormat::Csv, "CSV");
                ui.radio_value(&mut self.export_format, ExportFormat::Json, "JSON");
            });
            ui.horizontal(|ui| {
                ui.label("Output directory:");
                ui.text_edit_singleline(&mut self.output_dir);
                if ui.button("Browse").clicked() {
                    if let Some(path) = rfd::FileDialog::new().pick_folder() {
                        self.output_dir = path.to_string_lossy().to_string();
                    }
                }
            });
            if ui.button("Export estimate").clicked() {
                self.export_estimate();
            }
        });
    }
}

impl eframe::App for EmixApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("nav").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Energy Mix Explorer");
                ui.separator();
                if ui
                    .selectable_label(self.view.view == View::World, "World")
                    .clicked()
                {
                    self.view.show_world();
                }
                if ui
                    .selectable_label(self.view.view == View::Korea, "South Korea")
                    .clicked()
                {
                    self.view.select_country(KOREA);
                }
                ui.separator();
                ui.label("Locale:");
                egui::ComboBox::from_id_salt("locale")
                    .selected_text(self.locale.as_str())
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.locale, "en".to_string(), "English (en)");
                        ui.selectable_value(&mut self.locale, "ko".to_string(), "Korean (ko)");
                        ui.selectable_value(&mut self.locale, "de".to_string(), "German (de)");
                        ui.selectable_value(&mut self.locale, "fr".to_string(), "French (fr)");
                    });
            });
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            if !self.status_message.is_empty() {
                ui.colored_label(egui::Color32::DARK_GREEN, self.status_message.as_str());
            }
            if !self.error_message.is_empty() {
                ui.colored_label(egui::Color32::RED, self.error_message.as_str());
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.view.view {
                View::World => self.world_view(ui),
                View::Korea => self.korea_view(ui),
            });
        });

        if self.view.view == View::World {
            self.detail_window(ctx);
        }
    }
}
