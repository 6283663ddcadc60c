//! Excel export functionality

use chrono::Local;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use sow_domain::format::format_date;
use sow_domain::model::{CompanyInfo, GridSize, QuoteDocument, TechPackDocument};
use sow_types::{Error, Result};
use std::path::Path;

const CURRENCY_FORMAT: &str = "\"R$\" #,##0.00";

fn excel_error(e: XlsxError) -> Error {
    Error::Excel(e.to_string())
}

/// Export a quote as a one-sheet order: header block then the item table
pub fn export_quote_to_excel(quote: &QuoteDocument, company: &CompanyInfo, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    write_quote_sheet(sheet, quote, company).map_err(excel_error)?;

    workbook.save(output_path).map_err(excel_error)?;
    Ok(())
}

fn write_quote_sheet(
    sheet: &mut Worksheet,
    quote: &QuoteDocument,
    company: &CompanyInfo,
) -> std::result::Result<(), XlsxError> {
    sheet.set_name("Pedido")?;

    let title_format = Format::new().set_bold().set_font_size(14);
    let header_format = Format::new().set_bold();
    let money_format = Format::new().set_num_format(CURRENCY_FORMAT);
    let total_format = Format::new().set_bold().set_num_format(CURRENCY_FORMAT);

    sheet.write_string_with_format(0, 0, format!("{} - Pedido de Venda", company.name), &title_format)?;
    sheet.write_string(1, 0, format!("CNPJ: {}", company.cnpj))?;
    sheet.write_string(2, 0, format!("Contato: {}", company.contact))?;

    let details = [
        ("Nº Pedido:", quote.order_number.clone()),
        ("Cliente:", quote.client_name.clone()),
        ("Contato:", quote.client_contact.clone()),
        ("Endereço:", quote.client_address.clone()),
        ("Emissão:", format_date(quote.order_date.with_timezone(&Local).date_naive())),
        ("Entrega:", format_date(quote.delivery_date.with_timezone(&Local).date_naive())),
    ];
    for (offset, (label, value)) in details.iter().enumerate() {
        let row = 4 + offset as u32;
        sheet.write_string_with_format(row, 0, *label, &header_format)?;
        sheet.write_string(row, 1, value)?;
    }

    let table_row = 11;
    let headers = ["SKU", "Serviço", "Descrição", "Qtd", "Unitário", "Total"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(table_row, col as u16, *header, &header_format)?;
    }

    let mut row = table_row + 1;
    for item in &quote.items {
        sheet.write_string(row, 0, &item.sku)?;
        sheet.write_string(row, 1, &item.service)?;
        sheet.write_string(row, 2, &item.description)?;
        sheet.write_number(row, 3, item.quantity as f64)?;
        sheet.write_number_with_format(row, 4, item.unit_price_decimal().to_f64().unwrap_or(0.0), &money_format)?;
        sheet.write_number_with_format(row, 5, item.line_total().to_f64().unwrap_or(0.0), &money_format)?;
        row += 1;
    }

    sheet.write_string_with_format(row, 4, "Total do Pedido", &header_format)?;
    sheet.write_number_with_format(row, 5, quote.total().to_f64().unwrap_or(0.0), &total_format)?;

    if !quote.observations.trim().is_empty() {
        sheet.write_string_with_format(row + 2, 0, "Observações:", &header_format)?;
        sheet.write_string(row + 2, 1, &quote.observations)?;
    }

    sheet.set_column_width(0, 14)?;
    sheet.set_column_width(1, 26)?;
    sheet.set_column_width(2, 40)?;
    sheet.set_column_width(4, 14)?;
    sheet.set_column_width(5, 16)?;
    Ok(())
}

/// Export the production grid (colour × size) with row and column totals
pub fn export_production_grid(techpack: &TechPackDocument, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    write_grid_sheet(sheet, techpack).map_err(excel_error)?;

    workbook.save(output_path).map_err(excel_error)?;
    Ok(())
}

fn write_grid_sheet(sheet: &mut Worksheet, techpack: &TechPackDocument) -> std::result::Result<(), XlsxError> {
    sheet.set_name("Grade")?;

    let header_format = Format::new().set_bold();

    sheet.write_string_with_format(0, 0, "Referência:", &header_format)?;
    sheet.write_string(0, 1, &techpack.reference)?;
    sheet.write_string_with_format(1, 0, "Produto:", &header_format)?;
    sheet.write_string(1, 1, &techpack.product)?;

    let table_row = 3;
    sheet.write_string_with_format(table_row, 0, "Cor", &header_format)?;
    for (col, size) in GridSize::ALL.iter().enumerate() {
        sheet.write_string_with_format(table_row, col as u16 + 1, size.label(), &header_format)?;
    }
    let total_col = GridSize::ALL.len() as u16 + 1;
    sheet.write_string_with_format(table_row, total_col, "Total", &header_format)?;

    let mut row = table_row + 1;
    for grid_row in &techpack.production_grid {
        sheet.write_string(row, 0, &grid_row.color)?;
        for (col, size) in GridSize::ALL.iter().enumerate() {
            sheet.write_number(row, col as u16 + 1, grid_row.sizes.get(*size) as f64)?;
        }
        sheet.write_number_with_format(row, total_col, grid_row.total() as f64, &header_format)?;
        row += 1;
    }

    sheet.write_string_with_format(row, 0, "TOTAL", &header_format)?;
    for (col, size) in GridSize::ALL.iter().enumerate() {
        sheet.write_number_with_format(row, col as u16 + 1, techpack.size_total(*size) as f64, &header_format)?;
    }
    sheet.write_number_with_format(row, total_col, techpack.grid_total() as f64, &header_format)?;

    sheet.set_column_width(0, 20)?;
    Ok(())
}
