//! Tech pack screen
//!
//! All edits go through [`TechPackSession::edit_tracked`], so any widget
//! change rewrites the active draft on the same frame.

use std::path::PathBuf;

use chrono::Local;
use eframe::egui::{self, Color32, ColorImage, RichText, ScrollArea, TextureHandle, Ui, Vec2};
use sow_app::app::TechPackSession;
use sow_app::print::{render_techpack, PageSet, PrintJob};
use sow_domain::model::catalog::{
    CLOSING_MACHINES, COLLAR_MATERIALS, HEM_MACHINES, HEM_SIZES, REINFORCEMENT_MACHINES,
    REINFORCEMENT_TYPES, THREADS, TRIM_ITEMS,
};
use sow_domain::model::{CompanyInfo, GridSize, ImageSlot, TechPackDocument, MAX_GRID_QUANTITY};
use sow_domain::repository::StoredDocument;
use sow_infra::image_data_uri::{decode_preview, encode_image_file};
use sow_types::Result;
use tracing::{info, warn};

use crate::load_dialog::LoadDialog;
use crate::widgets::{choice_combo, confirm, muted, show_error, text_area, text_combo, text_field, ACCENT};
use crate::worker::Job;

const PREVIEW_MAX_SIDE: u32 = 512;
const PAGE_TITLES: [&str; 3] = ["1 · Costura", "2 · Estampa", "3 · Corte"];

enum BackgroundOutcome {
    Saved(StoredDocument),
    Listed(Vec<StoredDocument>),
    Loaded(TechPackDocument),
    Image(ImageSlot, String),
}

#[derive(Default)]
enum Preview {
    #[default]
    Unloaded,
    Ready(TextureHandle),
    Unavailable,
}

fn slot_index(slot: ImageSlot) -> usize {
    match slot {
        ImageSlot::TechnicalDrawing => 0,
        ImageSlot::Front => 1,
        ImageSlot::Back => 2,
    }
}

pub struct TechPackPanel {
    session: TechPackSession,
    company: CompanyInfo,
    print_job: PrintJob,
    load_dialog: LoadDialog,
    job: Option<Job<BackgroundOutcome>>,
    previews: [Preview; 3],
    print_pages: [bool; 3],
    status: Option<String>,
}

impl TechPackPanel {
    pub fn new(session: TechPackSession, company: CompanyInfo, print_job: PrintJob) -> Self {
        Self {
            session,
            company,
            print_job,
            load_dialog: LoadDialog::default(),
            job: None,
            previews: Default::default(),
            print_pages: [true; 3],
            status: None,
        }
    }

    fn is_busy(&self) -> bool {
        self.job.is_some()
    }

    fn today() -> chrono::NaiveDate {
        Local::now().date_naive()
    }

    pub fn ui(&mut self, ui: &mut Ui) {
        self.poll_job();
        self.render_actions(ui);
        ui.separator();

        let mut picked_image: Option<ImageSlot> = None;
        let mut cleared_image: Option<ImageSlot> = None;

        ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            let result = self.session.edit_tracked(|doc| {
                let mut changed = false;

                egui::CollapsingHeader::new(RichText::new("1. Identificação").strong())
                    .default_open(true)
                    .show(ui, |ui| changed |= identification_section(ui, doc));

                egui::CollapsingHeader::new(RichText::new("2. Corte & Tecido").strong())
                    .default_open(true)
                    .show(ui, |ui| changed |= cutting_section(ui, doc));

                egui::CollapsingHeader::new(RichText::new("3. Costura").strong())
                    .default_open(true)
                    .show(ui, |ui| changed |= sewing_section(ui, doc));

                egui::CollapsingHeader::new(RichText::new("4. Aviamentos").strong())
                    .default_open(false)
                    .show(ui, |ui| changed |= trims_section(ui, doc));

                egui::CollapsingHeader::new(RichText::new("5. Estamparia").strong())
                    .default_open(false)
                    .show(ui, |ui| changed |= print_section(ui, doc));

                egui::CollapsingHeader::new(RichText::new("6. Parâmetros DTF").strong())
                    .default_open(false)
                    .show(ui, |ui| changed |= dtf_section(ui, doc));

                egui::CollapsingHeader::new(RichText::new("7. Grade de Produção").strong())
                    .default_open(true)
                    .show(ui, |ui| changed |= grid_section(ui, doc));

                changed
            });
            if let Err(e) = result {
                show_error("Erro ao salvar rascunho", &e.to_string());
            }

            egui::CollapsingHeader::new(RichText::new("8. Imagens").strong())
                .default_open(true)
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        for slot in ImageSlot::ALL {
                            match self.image_card(ui, slot) {
                                Some(true) => picked_image = Some(slot),
                                Some(false) => cleared_image = Some(slot),
                                None => {}
                            }
                        }
                    });
                });
        });

        if let Some(slot) = picked_image {
            self.pick_image(ui.ctx(), slot);
        }
        if let Some(slot) = cleared_image {
            self.set_image(slot, None);
        }

        if let Some(id) = self.load_dialog.ui(ui.ctx(), "Abrir ficha técnica") {
            let service = self.session.service().clone();
            self.job = Some(Job::spawn(ui.ctx(), move || {
                service
                    .load_from_library(&id, Local::now().date_naive())
                    .map(BackgroundOutcome::Loaded)
            }));
        }
    }

    fn poll_job(&mut self) {
        let Some(result) = self.job.as_ref().and_then(|job| job.poll()) else {
            return;
        };
        self.job = None;

        match result {
            Ok(BackgroundOutcome::Saved(row)) => {
                self.status = Some(format!("Salvo na biblioteca: {}", row.title));
            }
            Ok(BackgroundOutcome::Listed(rows)) => self.load_dialog.show_rows(rows),
            Ok(BackgroundOutcome::Loaded(doc)) => {
                self.status = Some(format!("Ficha {} carregada", doc.reference));
                if let Err(e) = self.session.replace(doc) {
                    show_error("Erro ao salvar rascunho", &e.to_string());
                }
                self.previews = Default::default();
            }
            Ok(BackgroundOutcome::Image(slot, uri)) => self.set_image(slot, Some(uri)),
            Err(e) => show_error("Ficha Técnica", &e.to_string()),
        }
    }

    fn set_image(&mut self, slot: ImageSlot, uri: Option<String>) {
        let result = self.session.edit(|doc| match uri {
            Some(uri) => doc.set_image(slot, uri),
            None => doc.clear_image(slot),
        });
        if let Err(e) = result {
            show_error("Erro ao salvar rascunho", &e.to_string());
        }
        self.previews[slot_index(slot)] = Preview::Unloaded;
    }

    fn pick_image(&mut self, ctx: &egui::Context, slot: ImageSlot) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Imagens", &["png", "jpg", "jpeg", "gif", "bmp", "webp", "svg"])
            .pick_file()
        else {
            return;
        };
        self.job = Some(Job::spawn(ctx, move || encode_slot(slot, path)));
    }

    /// Returns `Some(true)` when "choose" was clicked, `Some(false)` for "remove"
    fn image_card(&mut self, ui: &mut Ui, slot: ImageSlot) -> Option<bool> {
        let idle = !self.is_busy();
        let mut action = None;

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(240.0);
            ui.vertical(|ui| {
                ui.label(RichText::new(slot.label()).strong());

                let has_image = self.session.document().image(slot).is_some();
                match self.preview(ui.ctx(), slot) {
                    Some(texture) => {
                        let size = fit_size(texture.size_vec2(), 220.0, 160.0);
                        ui.add(egui::Image::new(&texture).fit_to_exact_size(size));
                    }
                    None if has_image => {
                        ui.label(muted("Pré-visualização indisponível"));
                    }
                    None => {
                        ui.label(muted("Nenhuma imagem"));
                    }
                }

                ui.horizontal(|ui| {
                    if ui.add_enabled(idle, egui::Button::new("Escolher...")).clicked() {
                        action = Some(true);
                    }
                    if ui.add_enabled(has_image, egui::Button::new("Remover")).clicked() {
                        action = Some(false);
                    }
                });
            });
        });

        action
    }

    /// Texture for the slot, decoded on first use
    fn preview(&mut self, ctx: &egui::Context, slot: ImageSlot) -> Option<TextureHandle> {
        let index = slot_index(slot);
        if let Preview::Unloaded = self.previews[index] {
            self.previews[index] = match self.session.document().image(slot) {
                None => Preview::Unavailable,
                Some(uri) => match decode_preview(uri, PREVIEW_MAX_SIDE) {
                    Ok(img) => {
                        let rgba = img.to_rgba8();
                        let size = [rgba.width() as usize, rgba.height() as usize];
                        let color_image = ColorImage::from_rgba_unmultiplied(size, &rgba.into_raw());
                        Preview::Ready(ctx.load_texture(
                            format!("techpack_{:?}", slot),
                            color_image,
                            egui::TextureOptions::LINEAR,
                        ))
                    }
                    Err(e) => {
                        warn!(?slot, error = %e, "image preview not decoded");
                        Preview::Unavailable
                    }
                },
            };
        }

        match &self.previews[index] {
            Preview::Ready(texture) => Some(texture.clone()),
            _ => None,
        }
    }

    fn render_actions(&mut self, ui: &mut Ui) {
        let idle = !self.is_busy();

        ui.horizontal(|ui| {
            if ui.button("Nova Ficha").clicked()
                && confirm("Nova ficha", "Descartar a ficha atual e começar outra?")
            {
                if let Err(e) = self.session.reset(Self::today()) {
                    show_error("Erro", &e.to_string());
                }
                self.previews = Default::default();
                self.status = None;
            }

            if ui.button("Imprimir").clicked() {
                self.print();
            }

            if ui.add_enabled(idle, egui::Button::new("Salvar")).clicked() {
                match self.session.document().validate_for_save() {
                    Ok(()) => {
                        let service = self.session.service().clone();
                        let doc = self.session.document().clone();
                        self.job = Some(Job::spawn(ui.ctx(), move || {
                            service.save_to_library(&doc).map(BackgroundOutcome::Saved)
                        }));
                    }
                    Err(e) => show_error("Salvar", &e.to_string()),
                }
            }

            if ui.add_enabled(idle, egui::Button::new("Abrir")).clicked() {
                let service = self.session.service().clone();
                self.job = Some(Job::spawn(ui.ctx(), move || {
                    service.list_library().map(BackgroundOutcome::Listed)
                }));
            }

            ui.separator();
            ui.label("Páginas:");
            for (selected, title) in self.print_pages.iter_mut().zip(PAGE_TITLES) {
                ui.checkbox(selected, title);
            }

            if self.is_busy() {
                ui.spinner();
            }
            if let Some(ref status) = self.status {
                ui.label(RichText::new(status).color(Color32::LIGHT_BLUE));
            }
        });
    }

    fn selected_pages(&self) -> PageSet {
        if self.print_pages.iter().all(|selected| *selected) {
            return PageSet::All;
        }
        PageSet::only(
            self.print_pages
                .iter()
                .enumerate()
                .filter(|(_, selected)| **selected)
                .map(|(index, _)| index + 1),
        )
    }

    fn print(&mut self) {
        let doc = self.session.document();
        let pages = self.selected_pages();
        match self
            .print_job
            .run(&doc.library_title(), render_techpack(doc, &self.company), &pages)
        {
            Ok(path) => {
                info!(path = %path.display(), pages = %pages, "tech pack printed");
                self.status = Some("Ficha enviada para impressão".to_string());
            }
            Err(e) => show_error("Impressão", &e.to_string()),
        }
    }
}

fn encode_slot(slot: ImageSlot, path: PathBuf) -> Result<BackgroundOutcome> {
    let uri = encode_image_file(&path)?;
    Ok(BackgroundOutcome::Image(slot, uri))
}

/// Scale to fit inside the box, keeping the aspect ratio
fn fit_size(original: Vec2, max_width: f32, max_height: f32) -> Vec2 {
    let scale = (max_width / original.x).min(max_height / original.y).min(1.0);
    Vec2::new(original.x * scale, original.y * scale)
}

fn labeled_grid(ui: &mut Ui, id: &str, add_rows: impl FnOnce(&mut Ui) -> bool) -> bool {
    egui::Grid::new(id)
        .num_columns(2)
        .spacing([10.0, 6.0])
        .show(ui, add_rows)
        .inner
}

fn identification_section(ui: &mut Ui, doc: &mut TechPackDocument) -> bool {
    labeled_grid(ui, "tp_identification", |ui| {
        let mut changed = false;
        for (label, value, hint) in [
            ("Referência:", &mut doc.reference, "Ex: SB-001"),
            ("Coleção:", &mut doc.collection, "Ex: Verão 2025"),
            ("Produto:", &mut doc.product, "Ex: Camiseta Oversized"),
            ("Responsável:", &mut doc.responsible, ""),
            ("Data:", &mut doc.date, "AAAA-MM-DD"),
        ] {
            ui.label(label);
            changed |= text_field(ui, value, hint);
            ui.end_row();
        }
        changed
    })
}

fn cutting_section(ui: &mut Ui, doc: &mut TechPackDocument) -> bool {
    labeled_grid(ui, "tp_cutting", |ui| {
        let mut changed = false;
        for (label, value, hint) in [
            ("Tecido principal:", &mut doc.fabric, "Ex: Algodão 30.1 Penteado"),
            ("Largura:", &mut doc.fabric_width, "Ex: 1,80 m"),
            ("Rendimento:", &mut doc.fabric_yield, "Ex: 3,2 peças/kg"),
        ] {
            ui.label(label);
            changed |= text_field(ui, value, hint);
            ui.end_row();
        }
        ui.label("Descanso da malha:");
        changed |= ui.checkbox(&mut doc.rest_time, "24h antes do corte").changed();
        ui.end_row();
        changed
    })
}

fn sewing_section(ui: &mut Ui, doc: &mut TechPackDocument) -> bool {
    let mut changed = labeled_grid(ui, "tp_sewing", |ui| {
        let mut changed = false;
        for (label, id, value, options) in [
            ("Fechamento:", "tp_closing", &mut doc.machine_closing, CLOSING_MACHINES),
            ("Bainha:", "tp_hem", &mut doc.machine_hem, HEM_MACHINES),
            ("Reforço:", "tp_reinf_machine", &mut doc.machine_reinforcement, REINFORCEMENT_MACHINES),
            ("Linha agulha:", "tp_needle", &mut doc.needle_thread, THREADS),
            ("Fio laçadeira:", "tp_looper", &mut doc.looper_thread, THREADS),
            ("Bainha (tam.):", "tp_hem_size", &mut doc.hem_size, HEM_SIZES),
            ("Bainha manga:", "tp_sleeve_hem", &mut doc.sleeve_hem, HEM_SIZES),
            ("Gola:", "tp_collar", &mut doc.collar_material, COLLAR_MATERIALS),
            ("Tipo de reforço:", "tp_reinf_type", &mut doc.reinforcement_type, REINFORCEMENT_TYPES),
        ] {
            ui.label(label);
            changed |= text_combo(ui, id, value, options);
            ui.end_row();
        }
        ui.label("Altura gola:");
        changed |= text_field(ui, &mut doc.collar_height, "Ex: 2 cm");
        ui.end_row();
        changed
    });

    ui.label("Obs. costura:");
    changed |= text_area(ui, &mut doc.obs_costura, "Instruções para a oficina");
    changed
}

fn trims_section(ui: &mut Ui, doc: &mut TechPackDocument) -> bool {
    labeled_grid(ui, "tp_trims", |ui| {
        let mut changed = false;
        for (key, label) in TRIM_ITEMS {
            let Some(entry) = doc.trims.get_mut(key) else {
                continue;
            };
            changed |= ui.checkbox(&mut entry.used, *label).changed();
            changed |= text_field(ui, &mut entry.desc, "Especificação");
            ui.end_row();
        }
        changed
    })
}

fn print_section(ui: &mut Ui, doc: &mut TechPackDocument) -> bool {
    let mut changed = labeled_grid(ui, "tp_print_specs", |ui| {
        let mut changed = false;
        ui.label("Técnica:");
        changed |= choice_combo(ui, "tp_technique", &mut doc.print_specs.technique);
        ui.end_row();
        ui.label("Toque:");
        changed |= choice_combo(ui, "tp_touch", &mut doc.print_specs.touch);
        ui.end_row();
        changed
    });

    for index in 0..3 {
        let Some(location) = doc.print_locations.get_mut(index) else {
            continue;
        };
        ui.add_space(6.0);
        ui.label(RichText::new(format!("Local {}", index + 1)).strong().color(ACCENT));
        changed |= labeled_grid(ui, &format!("tp_location_{}", index), |ui| {
            let mut changed = false;
            for (label, value) in [
                ("Nome:", &mut location.name),
                ("Arte:", &mut location.art),
                ("Dimensão:", &mut location.dimension),
                ("Posição:", &mut location.position),
                ("Cores / Pantone:", &mut location.pantone),
                ("Técnica:", &mut location.technique),
            ] {
                ui.label(label);
                changed |= text_field(ui, value, "");
                ui.end_row();
            }
            changed
        });
    }

    ui.add_space(6.0);
    ui.label("Variantes ativas:");
    changed |= text_area(ui, &mut doc.variants, "Cores de peça e de estampa por variante");
    changed
}

fn dtf_section(ui: &mut Ui, doc: &mut TechPackDocument) -> bool {
    labeled_grid(ui, "tp_dtf", |ui| {
        let mut changed = false;
        for (label, value, hint) in [
            ("Temperatura:", &mut doc.dtf_temp, "Ex: 160 ºC"),
            ("Tempo:", &mut doc.dtf_time, "Ex: 12 s"),
            ("Pressão:", &mut doc.dtf_pressure, "Ex: Média"),
            ("Peel:", &mut doc.dtf_peel, "Ex: Frio"),
        ] {
            ui.label(label);
            changed |= text_field(ui, value, hint);
            ui.end_row();
        }
        changed
    })
}

fn grid_section(ui: &mut Ui, doc: &mut TechPackDocument) -> bool {
    let mut changed = false;
    let mut removed: Option<String> = None;

    egui::Grid::new("tp_production_grid")
        .striped(true)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.strong("Cor");
            for size in GridSize::ALL {
                ui.strong(size.label());
            }
            ui.strong("Total");
            ui.label("");
            ui.end_row();

            for row in doc.production_grid.iter_mut() {
                changed |= ui
                    .add(egui::TextEdit::singleline(&mut row.color).desired_width(120.0))
                    .changed();
                for size in GridSize::ALL {
                    let mut quantity = row.sizes.get(size);
                    if ui
                        .add(egui::DragValue::new(&mut quantity).range(0..=MAX_GRID_QUANTITY))
                        .changed()
                    {
                        row.sizes.set(size, quantity);
                        changed = true;
                    }
                }
                ui.label(RichText::new(row.total().to_string()).strong());
                if ui.small_button("✕").clicked() {
                    removed = Some(row.id.clone());
                }
                ui.end_row();
            }

            ui.strong("TOTAL");
            for size in GridSize::ALL {
                ui.strong(doc.size_total(size).to_string());
            }
            ui.label(RichText::new(doc.grid_total().to_string()).strong().color(ACCENT));
            ui.end_row();
        });

    if let Some(id) = removed {
        changed |= doc.remove_grid_row(&id);
    }
    if ui.button("+ Adicionar cor").clicked() {
        doc.add_grid_row("");
        changed = true;
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_size_keeps_aspect() {
        let size = fit_size(Vec2::new(400.0, 200.0), 200.0, 160.0);
        assert_eq!(size, Vec2::new(200.0, 100.0));
        let small = fit_size(Vec2::new(100.0, 50.0), 220.0, 160.0);
        assert_eq!(small, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_slot_index_matches_all() {
        for (index, slot) in ImageSlot::ALL.into_iter().enumerate() {
            assert_eq!(slot_index(slot), index);
        }
    }
}
