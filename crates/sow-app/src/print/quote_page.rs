//! Sales order page

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use sow_domain::format::{format_currency, format_date};
use sow_domain::model::{CompanyInfo, QuoteDocument};

use super::html::{escape, logo, multiline, or_dash};
use super::PrintPage;

fn local_date(value: DateTime<Utc>) -> String {
    format_date(value.with_timezone(&Local).date_naive())
}

/// The quote prints as a single "pedido de venda" page. Long item lists are
/// clipped at the page edge.
pub fn render_quote(quote: &QuoteDocument, company: &CompanyInfo) -> Vec<PrintPage> {
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<div style="display:flex;justify-content:space-between;border-bottom:2px solid #000;padding-bottom:12px;margin-bottom:18px">
<div>{logo}<div class="muted"><b>CNPJ:</b> {cnpj}<br><b>Contato:</b> {contact}<br>{address}</div></div>
<div style="text-align:right"><div style="font-size:20px;font-weight:bold;text-transform:uppercase">Pedido de Venda</div>
<div class="box" style="display:inline-block;padding:2px 14px;text-align:center;background:#f5f5f5"><div class="muted">Nº PEDIDO</div><div class="mono" style="font-size:18px;font-weight:bold">{number}</div></div></div>
</div>"#,
        logo = logo(),
        cnpj = escape(&company.cnpj),
        contact = escape(&company.contact),
        address = escape(&company.address),
        number = escape(&quote.order_number),
    );

    let _ = write!(
        body,
        r#"<div class="cols" style="border-bottom:1px dotted #999;padding-bottom:14px;margin-bottom:18px">
<div><div class="muted" style="font-weight:bold;text-transform:uppercase">Cliente</div>
<div style="font-size:14px;font-weight:bold">{client}</div><div>{contact}</div><div>{address}</div></div>
<div><div class="muted" style="font-weight:bold;text-transform:uppercase">Condições</div>
<div style="display:flex;justify-content:space-between"><span>Emissão:</span><b>{issued}</b></div>
<div style="display:flex;justify-content:space-between"><span>Entrega:</span><b>{delivery}</b></div></div>
</div>"#,
        client = or_dash(&quote.client_name),
        contact = escape(&quote.client_contact),
        address = escape(&quote.client_address),
        issued = local_date(quote.order_date),
        delivery = local_date(quote.delivery_date),
    );

    body.push_str(
        r#"<table class="items"><thead><tr><th style="text-align:left">SKU</th><th style="text-align:left;width:50%">Descrição</th><th>Qtd</th><th class="num">Unit</th><th class="num">Total</th></tr></thead><tbody>"#,
    );
    for item in &quote.items {
        let _ = write!(
            body,
            r#"<tr><td class="mono muted">{sku}</td><td><b>{service}</b><div class="muted">{description}</div></td><td class="center"><b>{quantity}</b></td><td class="num">{unit}</td><td class="num"><b>{total}</b></td></tr>"#,
            sku = escape(&item.sku),
            service = escape(&item.service),
            description = escape(&item.description),
            quantity = item.quantity,
            unit = format_currency(item.unit_price_decimal()),
            total = format_currency(item.line_total()),
        );
    }
    let _ = write!(
        body,
        r#"</tbody><tfoot><tr><td colspan="4" class="num" style="text-transform:uppercase">Total do Pedido</td><td class="num total">{}</td></tr></tfoot></table>"#,
        format_currency(quote.total())
    );

    if !quote.observations.trim().is_empty() {
        let _ = write!(
            body,
            r#"<div class="box" style="margin-top:18px;padding:10px;background:#f5f5f5"><div class="muted" style="font-weight:bold;text-transform:uppercase">Observações</div><div>{}</div></div>"#,
            multiline(&quote.observations)
        );
    }

    let client_signature = if quote.client_name.trim().is_empty() {
        "Assinatura Cliente".to_string()
    } else {
        escape(quote.client_name.trim())
    };
    let _ = write!(
        body,
        r#"<div class="signatures"><div>{}</div><div>{} Brasil</div></div>"#,
        client_signature,
        escape(&company.name)
    );

    vec![PrintPage {
        key: "pedido",
        title: "Pedido de Venda",
        body,
    }]
}
