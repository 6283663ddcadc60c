//! Quote / sales order screen

use chrono::{Local, Utc};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use sow_app::app::QuoteService;
use sow_app::print::{render_quote, PageSet, PrintJob};
use sow_domain::format::{format_currency, format_date};
use sow_domain::model::catalog::{service_names, PRIVATE_LABEL_MODELS, PRIVATE_LABEL_SERVICE};
use sow_domain::model::{CompanyInfo, ItemEdit, QuoteDocument};
use sow_domain::repository::StoredDocument;
use sow_types::Result;
use tracing::info;

use crate::load_dialog::LoadDialog;
use crate::widgets::{confirm, muted, show_error, text_area, text_field, ACCENT};
use crate::worker::Job;

enum LibraryOutcome {
    Saved(StoredDocument),
    Listed(Vec<StoredDocument>),
    Loaded(QuoteDocument),
}

fn report(result: Result<()>, title: &str) {
    if let Err(e) = result {
        show_error(title, &e.to_string());
    }
}

fn placeholder_or(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

pub struct QuotePanel {
    service: QuoteService,
    quote: QuoteDocument,
    company: CompanyInfo,
    print_job: PrintJob,
    load_dialog: LoadDialog,
    job: Option<Job<LibraryOutcome>>,
    status: Option<String>,
}

impl QuotePanel {
    pub fn open(service: QuoteService, company: CompanyInfo, print_job: PrintJob) -> Result<Self> {
        let quote = service.open(Utc::now())?;
        Ok(Self {
            service,
            quote,
            company,
            print_job,
            load_dialog: LoadDialog::default(),
            job: None,
            status: None,
        })
    }

    fn is_busy(&self) -> bool {
        self.job.is_some()
    }

    pub fn ui(&mut self, ui: &mut Ui) {
        self.poll_job();

        self.render_banner(ui);
        ui.add_space(8.0);
        self.render_actions(ui);
        ui.separator();

        ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            self.render_client(ui);
            ui.add_space(10.0);
            self.render_items(ui);
            ui.add_space(10.0);
            ui.label(RichText::new("Observações").strong());
            text_area(ui, &mut self.quote.observations, "Condições, prazos, detalhes de entrega...");
        });

        if let Some(id) = self.load_dialog.ui(ui.ctx(), "Abrir orçamento") {
            self.start_load(ui.ctx(), id);
        }
    }

    fn poll_job(&mut self) {
        let Some(result) = self.job.as_ref().and_then(|job| job.poll()) else {
            return;
        };
        self.job = None;

        match result {
            Ok(LibraryOutcome::Saved(row)) => {
                self.status = Some(format!("Salvo na biblioteca: {}", row.title));
            }
            Ok(LibraryOutcome::Listed(rows)) => self.load_dialog.show_rows(rows),
            Ok(LibraryOutcome::Loaded(quote)) => {
                self.quote = quote;
                report(self.service.save_draft(&self.quote), "Erro ao salvar rascunho");
                self.status = Some(format!("Orçamento {} carregado", self.quote.order_number));
            }
            Err(e) => show_error("Biblioteca", &e.to_string()),
        }
    }

    fn render_banner(&self, ui: &mut Ui) {
        egui::Frame::new()
            .fill(Color32::from_gray(30))
            .inner_margin(10.0)
            .corner_radius(4.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("PEDIDO DE VENDA").strong());
                    ui.label(
                        RichText::new(&self.quote.order_number)
                            .monospace()
                            .size(20.0)
                            .color(ACCENT),
                    );
                    ui.add_space(20.0);
                    ui.label(format!(
                        "Emissão {}  ·  Entrega {}",
                        format_date(self.quote.order_date.with_timezone(&Local).date_naive()),
                        format_date(self.quote.delivery_date.with_timezone(&Local).date_naive()),
                    ));
                });
            });
    }

    fn render_actions(&mut self, ui: &mut Ui) {
        let idle = !self.is_busy();
        ui.horizontal(|ui| {
            if ui.button("Salvar rascunho").clicked() {
                let result = self.service.save_draft(&self.quote);
                if result.is_ok() {
                    self.status = Some("Rascunho salvo".to_string());
                }
                report(result, "Erro ao salvar rascunho");
            }

            if ui.button("Imprimir").clicked() {
                self.print();
            }

            if ui.add_enabled(idle, egui::Button::new("Salvar na biblioteca")).clicked() {
                self.start_save(ui.ctx());
            }

            if ui.add_enabled(idle, egui::Button::new("Abrir")).clicked() {
                let service = self.service.clone();
                self.job = Some(Job::spawn(ui.ctx(), move || {
                    service.list_library().map(LibraryOutcome::Listed)
                }));
            }

            if ui.button("Novo").clicked()
                && confirm("Novo orçamento", "Descartar o orçamento atual e começar outro?")
            {
                match self.service.reset(Utc::now()) {
                    Ok(quote) => {
                        self.quote = quote;
                        self.status = None;
                    }
                    Err(e) => show_error("Erro", &e.to_string()),
                }
            }

            if self.is_busy() {
                ui.spinner();
            }
            if let Some(ref status) = self.status {
                ui.label(RichText::new(status).color(Color32::LIGHT_BLUE));
            }
        });
    }

    fn print(&mut self) {
        let pages = render_quote(&self.quote, &self.company);
        let result = self
            .print_job
            .run(&self.quote.library_title(), pages, &PageSet::All)
            .and_then(|path| {
                info!(path = %path.display(), "quote printed");
                self.service.commit(&self.quote)
            });
        match result {
            Ok(()) => self.status = Some(format!("Pedido {} enviado para impressão", self.quote.order_number)),
            Err(e) => show_error("Impressão", &e.to_string()),
        }
    }

    fn start_save(&mut self, ctx: &egui::Context) {
        if let Err(e) = self.quote.validate_for_save() {
            show_error("Salvar", &e.to_string());
            return;
        }
        let service = self.service.clone();
        let quote = self.quote.clone();
        self.job = Some(Job::spawn(ctx, move || {
            service.save_to_library(&quote).map(LibraryOutcome::Saved)
        }));
    }

    fn start_load(&mut self, ctx: &egui::Context, id: String) {
        let service = self.service.clone();
        self.job = Some(Job::spawn(ctx, move || {
            service
                .load_from_library(&id, Utc::now())
                .map(LibraryOutcome::Loaded)
        }));
    }

    fn render_client(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Cliente").strong());
        egui::Grid::new("quote_client_grid")
            .num_columns(2)
            .spacing([10.0, 6.0])
            .show(ui, |ui| {
                ui.label("Nome / Marca:");
                text_field(ui, &mut self.quote.client_name, "Nome do cliente");
                ui.end_row();

                ui.label("Contato:");
                text_field(ui, &mut self.quote.client_contact, "Telefone ou e-mail");
                ui.end_row();

                ui.label("Endereço:");
                text_field(ui, &mut self.quote.client_address, "Endereço de entrega");
                ui.end_row();
            });
    }

    fn render_items(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Itens").strong());
            if ui.button("+ Adicionar item").clicked() {
                self.quote.add_item();
            }
        });

        if self.quote.items.is_empty() {
            ui.label(muted("Nenhum item adicionado"));
        }

        let mut edits: Vec<(String, ItemEdit)> = Vec::new();
        let mut remove: Option<String> = None;

        for item in &self.quote.items {
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&item.sku).monospace().color(Color32::GRAY));

                    let mut service = item.service.clone();
                    let service_text = placeholder_or(&item.service, "Selecione...");
                    egui::ComboBox::from_id_salt(format!("service_{}", item.id))
                        .width(200.0)
                        .selected_text(service_text)
                        .show_ui(ui, |ui| {
                            for name in service_names() {
                                ui.selectable_value(&mut service, name.to_string(), name);
                            }
                        });
                    if service != item.service {
                        edits.push((item.id.clone(), ItemEdit::Service(service)));
                    }

                    let mut description = item.description.clone();
                    let changed = if item.service == PRIVATE_LABEL_SERVICE {
                        let mut changed = false;
                        let model_text = placeholder_or(&item.description, "Modelo...");
                        egui::ComboBox::from_id_salt(format!("model_{}", item.id))
                            .width(220.0)
                            .selected_text(model_text)
                            .show_ui(ui, |ui| {
                                for model in PRIVATE_LABEL_MODELS {
                                    changed |= ui
                                        .selectable_value(&mut description, model.to_string(), *model)
                                        .changed();
                                }
                            });
                        changed
                    } else {
                        ui.add(
                            egui::TextEdit::singleline(&mut description)
                                .hint_text("Descrição")
                                .desired_width(220.0),
                        )
                        .changed()
                    };
                    if changed {
                        edits.push((item.id.clone(), ItemEdit::Description(description)));
                    }

                    let mut quantity = item.quantity;
                    ui.label("Qtd");
                    if ui.add(egui::DragValue::new(&mut quantity).range(0..=1_000_000)).changed() {
                        edits.push((item.id.clone(), ItemEdit::Quantity(quantity)));
                    }

                    let mut price = item.unit_price;
                    ui.label("R$");
                    if ui
                        .add(egui::DragValue::new(&mut price).speed(0.5).range(0.0..=f64::MAX).fixed_decimals(2))
                        .changed()
                    {
                        edits.push((item.id.clone(), ItemEdit::UnitPrice(price)));
                    }

                    ui.label(RichText::new(format_currency(item.line_total())).strong());

                    if ui.button("Remover").clicked() {
                        remove = Some(item.id.clone());
                    }
                });
            });
        }

        for (id, edit) in edits {
            self.quote.update_item(&id, edit);
        }
        if let Some(id) = remove {
            self.quote.remove_item(&id);
        }

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new("TOTAL DO PEDIDO").strong());
            ui.label(
                RichText::new(format_currency(self.quote.total()))
                    .size(18.0)
                    .strong()
                    .color(ACCENT),
            );
        });
    }
}
