//! Command handlers

use crate::cli::{Cli, Commands, PrintArgs, QuoteCommand, TechpackCommand};
use crate::output::{output_library, output_quote, output_techpack};
use chrono::{Local, NaiveDate, Utc};
use sow_app::app::{QuoteService, TechPackService, TechPackSession};
use sow_app::config::Config;
use sow_app::export::{export_production_grid, export_quote_to_excel};
use sow_app::print::{render_quote, render_techpack, PageSet, PrintJob};
use sow_app::repository::open_repositories;
use sow_domain::model::{GridSize, ImageSlot, ItemEdit, QuoteDocument, TechPackDocument};
use sow_infra::image_data_uri::encode_image_file;
use sow_types::{Error, OutputFormat, Result, StorageBackend};
use std::path::PathBuf;
use tracing::debug;

pub fn execute(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Config {
            show,
            set_backend,
            set_remote_url,
            set_remote_key,
            set_store_dir,
            set_output,
            reset,
        } => cmd_config(
            *show,
            *set_backend,
            set_remote_url.clone(),
            set_remote_key.clone(),
            set_store_dir.clone(),
            *set_output,
            *reset,
        ),

        Commands::Quote(command) => {
            let config = load_config()?;
            let output_format = cli.format.unwrap_or(config.output_format);
            cmd_quote(&config, command, output_format)
        }

        Commands::Techpack(command) => {
            let config = load_config()?;
            let output_format = cli.format.unwrap_or(config.output_format);
            cmd_techpack(&config, command, output_format)
        }
    }
}

fn load_config() -> Result<Config> {
    let config = Config::load()?;
    debug!(backend = %config.backend, store = ?config.store_dir, "configuration loaded");
    Ok(config)
}

fn print_job(config: &Config, args: &PrintArgs) -> PrintJob {
    let job = PrintJob::new(config.print_dir());
    if args.no_open {
        job.without_opening()
    } else {
        job
    }
}

fn require_confirmation(yes: bool, what: &str) -> Result<()> {
    if yes {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{} será descartado. Repita com --yes para confirmar.",
            what
        )))
    }
}

// --- Quote -----------------------------------------------------------------

fn quote_service(config: &Config) -> Result<QuoteService> {
    let (drafts, library) = open_repositories(config)?;
    Ok(QuoteService::new(drafts, library))
}

fn item_edits(
    service: Option<String>,
    description: Option<String>,
    quantity: Option<u32>,
    price: Option<f64>,
) -> Vec<ItemEdit> {
    // Service first: it clears the description
    let mut edits = Vec::new();
    edits.extend(service.map(ItemEdit::Service));
    edits.extend(description.map(ItemEdit::Description));
    edits.extend(quantity.map(ItemEdit::Quantity));
    edits.extend(price.map(ItemEdit::UnitPrice));
    edits
}

fn apply_item_edits(quote: &mut QuoteDocument, id: &str, edits: Vec<ItemEdit>) -> Result<()> {
    if quote.item(id).is_none() {
        return Err(Error::NotFound(format!("Item {} não encontrado", id)));
    }
    for edit in edits {
        quote.update_item(id, edit);
    }
    Ok(())
}

fn cmd_quote(config: &Config, command: &QuoteCommand, output_format: OutputFormat) -> Result<()> {
    let service = quote_service(config)?;
    let now = Utc::now();

    match command {
        QuoteCommand::Show => {
            let quote = service.open(now)?;
            output_quote(output_format, &quote)
        }

        QuoteCommand::Client {
            name,
            contact,
            address,
            observations,
        } => {
            let mut quote = service.open(now)?;
            if let Some(name) = name {
                quote.client_name = name.clone();
            }
            if let Some(contact) = contact {
                quote.client_contact = contact.clone();
            }
            if let Some(address) = address {
                quote.client_address = address.clone();
            }
            if let Some(observations) = observations {
                quote.observations = observations.clone();
            }
            service.save_draft(&quote)?;
            output_quote(output_format, &quote)
        }

        QuoteCommand::AddItem {
            service: name,
            description,
            quantity,
            price,
        } => {
            let mut quote = service.open(now)?;
            let id = quote.add_item().id.clone();
            let edits = item_edits(name.clone(), description.clone(), *quantity, *price);
            apply_item_edits(&mut quote, &id, edits)?;
            service.save_draft(&quote)?;
            println!("Item {} adicionado", id);
            output_quote(output_format, &quote)
        }

        QuoteCommand::EditItem {
            id,
            service: name,
            description,
            quantity,
            price,
        } => {
            let mut quote = service.open(now)?;
            let edits = item_edits(name.clone(), description.clone(), *quantity, *price);
            apply_item_edits(&mut quote, id, edits)?;
            service.save_draft(&quote)?;
            output_quote(output_format, &quote)
        }

        QuoteCommand::RemoveItem { id } => {
            let mut quote = service.open(now)?;
            if !quote.remove_item(id) {
                return Err(Error::NotFound(format!("Item {} não encontrado", id)));
            }
            service.save_draft(&quote)?;
            output_quote(output_format, &quote)
        }

        QuoteCommand::SaveDraft => {
            let quote = service.open(now)?;
            service.save_draft(&quote)?;
            println!("Rascunho salvo ({})", quote.order_number);
            Ok(())
        }

        QuoteCommand::Print(args) => {
            let quote = service.open(now)?;
            let pages: PageSet = args.pages.parse()?;
            let path = print_job(config, args).run(
                &quote.library_title(),
                render_quote(&quote, &config.company),
                &pages,
            )?;
            service.commit(&quote)?;
            println!("Pedido {} enviado para impressão", quote.order_number);
            println!("Arquivo: {}", path.display());
            Ok(())
        }

        QuoteCommand::Save => {
            let quote = service.open(now)?;
            let row = service.save_to_library(&quote)?;
            println!("Salvo na biblioteca: {} (id {})", row.title, row.id);
            Ok(())
        }

        QuoteCommand::List => {
            let rows = service.list_library()?;
            output_library(output_format, &rows)
        }

        QuoteCommand::Load { id } => {
            let quote = service.load_from_library(id, now)?;
            service.save_draft(&quote)?;
            println!("Orçamento carregado");
            output_quote(output_format, &quote)
        }

        QuoteCommand::Reset { yes } => {
            require_confirmation(*yes, "O orçamento atual")?;
            let quote = service.reset(now)?;
            println!("Novo orçamento: {}", quote.order_number);
            Ok(())
        }

        QuoteCommand::Export { output } => {
            let quote = service.open(now)?;
            export_quote_to_excel(&quote, &config.company, output)?;
            println!("Exported to: {}", output.display());
            Ok(())
        }
    }
}

// --- Tech pack -------------------------------------------------------------

fn techpack_session(config: &Config, today: NaiveDate) -> Result<TechPackSession> {
    let (drafts, library) = open_repositories(config)?;
    TechPackSession::open(TechPackService::new(drafts, library), today)
}

/// Accepts a row id or its 1-based position
fn resolve_grid_row(doc: &TechPackDocument, row: &str) -> Result<String> {
    if doc.production_grid.iter().any(|r| r.id == row) {
        return Ok(row.to_string());
    }
    row.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| doc.production_grid.get(index))
        .map(|r| r.id.clone())
        .ok_or_else(|| Error::NotFound(format!("Linha da grade {} não encontrada", row)))
}

fn cmd_techpack(config: &Config, command: &TechpackCommand, output_format: OutputFormat) -> Result<()> {
    let today = Local::now().date_naive();
    let mut session = techpack_session(config, today)?;

    match command {
        TechpackCommand::Show => output_techpack(output_format, session.document()),

        TechpackCommand::Set { path, value } => {
            session.set_field_text(path, value)?;
            output_techpack(output_format, session.document())
        }

        TechpackCommand::Image { slot, file } => {
            let slot: ImageSlot = slot.parse()?;
            let data_uri = encode_image_file(file)?;
            session.edit(|doc| doc.set_image(slot, data_uri))?;
            println!("Imagem '{}' atualizada", slot.label());
            Ok(())
        }

        TechpackCommand::ClearImage { slot } => {
            let slot: ImageSlot = slot.parse()?;
            session.edit(|doc| doc.clear_image(slot))?;
            println!("Imagem '{}' removida", slot.label());
            Ok(())
        }

        TechpackCommand::GridAdd { color } => {
            let id = session.edit(|doc| doc.add_grid_row(color.clone()))?;
            println!("Linha {} adicionada", id);
            output_techpack(output_format, session.document())
        }

        TechpackCommand::GridSet { row, size, quantity } => {
            let size: GridSize = size.parse()?;
            let id = resolve_grid_row(session.document(), row)?;
            session.edit(|doc| doc.set_grid_quantity(&id, size, *quantity))?;
            output_techpack(output_format, session.document())
        }

        TechpackCommand::GridRemove { row } => {
            let id = resolve_grid_row(session.document(), row)?;
            session.edit(|doc| doc.remove_grid_row(&id))?;
            output_techpack(output_format, session.document())
        }

        TechpackCommand::Print(args) => {
            let pages: PageSet = args.pages.parse()?;
            let doc = session.document();
            let path = print_job(config, args).run(
                &doc.library_title(),
                render_techpack(doc, &config.company),
                &pages,
            )?;
            println!("Ficha {} enviada para impressão (páginas: {})", doc.reference, pages);
            println!("Arquivo: {}", path.display());
            Ok(())
        }

        TechpackCommand::Save => {
            let row = session.service().save_to_library(session.document())?;
            println!("Salvo na biblioteca: {} (id {})", row.title, row.id);
            Ok(())
        }

        TechpackCommand::List => {
            let rows = session.service().list_library()?;
            output_library(output_format, &rows)
        }

        TechpackCommand::Load { id } => {
            let doc = session.service().load_from_library(id, today)?;
            println!("Ficha carregada");
            output_techpack(output_format, &doc)
        }

        TechpackCommand::Reset { yes } => {
            require_confirmation(*yes, "A ficha atual")?;
            session.reset(today)?;
            println!("Ficha reiniciada");
            Ok(())
        }

        TechpackCommand::Export { output } => {
            export_production_grid(session.document(), output)?;
            println!("Exported to: {}", output.display());
            Ok(())
        }
    }
}

// --- Config ----------------------------------------------------------------

fn cmd_config(
    show: bool,
    set_backend: Option<StorageBackend>,
    set_remote_url: Option<String>,
    set_remote_key: Option<String>,
    set_store_dir: Option<PathBuf>,
    set_output: Option<OutputFormat>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(backend) = set_backend {
        config.backend = backend;
        modified = true;
    }

    if let Some(url) = set_remote_url {
        config.remote.url = url;
        modified = true;
    }

    if let Some(key) = set_remote_key {
        config.remote.api_key = key;
        modified = true;
    }

    if let Some(dir) = set_store_dir {
        config.store_dir = Some(dir);
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_grid_row() {
        let mut doc = TechPackDocument::new(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        let first = doc.add_grid_row("Preto");
        let second = doc.add_grid_row("Branco");

        assert_eq!(resolve_grid_row(&doc, &second).unwrap(), second);
        assert_eq!(resolve_grid_row(&doc, "1").unwrap(), first);
        assert!(resolve_grid_row(&doc, "0").is_err());
        assert!(resolve_grid_row(&doc, "3").is_err());
    }

    #[test]
    fn test_item_edits_put_service_first() {
        let edits = item_edits(Some("Mentoria".into()), Some("Turma A".into()), Some(2), None);
        assert_eq!(
            edits,
            [
                ItemEdit::Service("Mentoria".into()),
                ItemEdit::Description("Turma A".into()),
                ItemEdit::Quantity(2),
            ]
        );
    }

    #[test]
    fn test_reset_needs_confirmation() {
        assert!(require_confirmation(false, "x").unwrap_err().is_validation());
        assert!(require_confirmation(true, "x").is_ok());
    }
}
