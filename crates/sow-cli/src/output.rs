//! Output formatting module

use chrono::Local;
use sow_domain::format::{format_currency, format_date, format_iso_date};
use sow_domain::model::{Choice, GridSize, ImageSlot, QuoteDocument, TechPackDocument};
use sow_domain::repository::StoredDocument;
use sow_types::{OutputFormat, Result};

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let head: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn or_dash(text: &str) -> &str {
    if text.trim().is_empty() {
        "-"
    } else {
        text
    }
}

pub fn output_quote(output_format: OutputFormat, quote: &QuoteDocument) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(quote)?;
        println!("{}", content);
        return Ok(());
    }

    println!("\nPedido de Venda {}", quote.order_number);
    println!("========================");
    println!("Cliente:   {}", or_dash(&quote.client_name));
    println!("Contato:   {}", or_dash(&quote.client_contact));
    println!("Endereço:  {}", or_dash(&quote.client_address));
    println!(
        "Emissão:   {}",
        format_date(quote.order_date.with_timezone(&Local).date_naive())
    );
    println!(
        "Entrega:   {}",
        format_date(quote.delivery_date.with_timezone(&Local).date_naive())
    );
    println!();

    if quote.items.is_empty() {
        println!("Nenhum item.");
    } else {
        println!(
            "{:<14} {:<8} {:<22} {:<26} {:>5} {:>14} {:>14}",
            "ID", "SKU", "Serviço", "Descrição", "Qtd", "Unitário", "Total"
        );
        println!("{}", "-".repeat(109));
        for item in &quote.items {
            println!(
                "{:<14} {:<8} {:<22} {:<26} {:>5} {:>14} {:>14}",
                truncate(&item.id, 14),
                item.sku,
                truncate(or_dash(&item.service), 22),
                truncate(&item.description, 26),
                item.quantity,
                format_currency(item.unit_price_decimal()),
                format_currency(item.line_total()),
            );
        }
    }

    println!();
    println!("Total do Pedido: {}", format_currency(quote.total()));

    if !quote.observations.trim().is_empty() {
        println!("\nObservações:");
        println!("{}", quote.observations);
    }

    Ok(())
}

pub fn output_techpack(output_format: OutputFormat, doc: &TechPackDocument) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(doc)?;
        println!("{}", content);
        return Ok(());
    }

    println!("\nFicha Técnica {}", or_dash(&doc.reference));
    println!("==================");
    println!("Produto:      {}", or_dash(&doc.product));
    println!("Coleção:      {}", or_dash(&doc.collection));
    println!("Responsável:  {}", or_dash(&doc.responsible));
    println!("Data:         {}", or_dash(&format_iso_date(&doc.date)));
    println!("Tecido:       {}", or_dash(&doc.fabric));

    let technique = doc.print_specs.technique.map(|t| t.label()).unwrap_or("-");
    let touch = doc.print_specs.touch.map(|t| t.label()).unwrap_or("-");
    println!("Estampa:      {} / {}", technique, touch);

    let images: Vec<&str> = ImageSlot::ALL
        .into_iter()
        .filter(|slot| doc.image(*slot).is_some())
        .map(|slot| slot.label())
        .collect();
    println!(
        "Imagens:      {}",
        if images.is_empty() { "-".to_string() } else { images.join(", ") }
    );

    println!("\nGrade de Produção");
    println!("-----------------");
    if doc.production_grid.is_empty() {
        println!("Grade não preenchida.");
        return Ok(());
    }

    print!("{:>3} {:<18}", "#", "Cor");
    for size in GridSize::ALL {
        print!(" {:>5}", size.label());
    }
    println!(" {:>6}", "Total");

    for (index, row) in doc.production_grid.iter().enumerate() {
        print!("{:>3} {:<18}", index + 1, truncate(or_dash(&row.color), 18));
        for size in GridSize::ALL {
            print!(" {:>5}", row.sizes.get(size));
        }
        println!(" {:>6}", row.total());
    }

    print!("{:>3} {:<18}", "", "TOTAL");
    for size in GridSize::ALL {
        print!(" {:>5}", doc.size_total(size));
    }
    println!(" {:>6}", doc.grid_total());

    Ok(())
}

pub fn output_library(output_format: OutputFormat, rows: &[StoredDocument]) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(rows)?;
        println!("{}", content);
        return Ok(());
    }

    if rows.is_empty() {
        println!("Nenhum documento salvo.");
        return Ok(());
    }

    println!("{:<36} {:<44} {:>16}", "ID", "Título", "Criado em");
    println!("{}", "-".repeat(98));
    for row in rows {
        println!(
            "{:<36} {:<44} {:>16}",
            truncate(&row.id, 36),
            truncate(&row.title, 44),
            row.created_at.with_timezone(&Local).format("%d/%m/%Y %H:%M"),
        );
    }
    println!("\n{} documento(s)", rows.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Camiseta", 10), "Camiseta");
        assert_eq!(truncate("Camiseta Oversized", 10), "Camiset...");
        assert_eq!(truncate("Ação ação ação", 7), "Ação...");
    }
}
