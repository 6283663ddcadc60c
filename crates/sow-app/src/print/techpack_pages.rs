//! Tech pack pages: sewing, print/art, cutting

use std::fmt::Write as _;

use sow_domain::format::format_iso_date;
use sow_domain::model::catalog::TRIM_ITEMS;
use sow_domain::model::{Choice, CompanyInfo, GridSize, ImageSlot, TechPackDocument};

use super::html::{escape, field_row, image_or_placeholder, logo, multiline, or_dash};
use super::PrintPage;

const PAGE_COUNT: usize = 3;

fn header(doc: &TechPackDocument, company: &CompanyInfo, section: &str) -> String {
    format!(
        r#"<div style="display:flex;justify-content:space-between;align-items:flex-end;margin-bottom:4px">
<div style="font-size:9px" class="muted">{company}</div>{logo}</div>
<div class="box"><div class="box-title">{brand} SYSTEMS | FICHA TÉCNICA: {section}</div>
<table class="fields"><tr><th>REF</th><td>{reference}</td><th>COLEÇÃO</th><td>{collection}</td></tr>
<tr><th>PRODUTO</th><td colspan="3">{product}</td></tr>
<tr><th>RESPONSÁVEL</th><td>{responsible}</td><th>DATA</th><td>{date}</td></tr></table></div>"#,
        company = escape(&company.name),
        logo = logo(),
        brand = escape(&company.name.to_uppercase().replace(' ', "")),
        section = escape(section),
        reference = or_dash(&doc.reference),
        collection = or_dash(&doc.collection),
        product = or_dash(&doc.product),
        responsible = or_dash(&doc.responsible),
        date = or_dash(&format_iso_date(&doc.date)),
    )
}

fn footer(number: usize, label: &str) -> String {
    format!(
        r#"<div class="footer">SOWBRAND SYS | PÁGINA {}/{} | {}</div>"#,
        number,
        PAGE_COUNT,
        escape(label)
    )
}

fn choice_label<T: Choice>(value: Option<T>) -> &'static str {
    value.map(|c| c.label()).unwrap_or("")
}

fn sewing_page(doc: &TechPackDocument, company: &CompanyInfo) -> String {
    let mut body = header(doc, company, "COSTURA & AVIAMENTOS");

    let _ = write!(
        body,
        r#"<div class="box grow" style="display:flex;flex-direction:column;min-height:0"><div class="box-title">Desenho Técnico (Frente / Verso)</div><div class="image-area grow">{}</div></div>"#,
        image_or_placeholder(doc.image(ImageSlot::TechnicalDrawing), "Sem desenho técnico")
    );

    let mut machinery = String::new();
    for (label, value) in [
        ("Fechamento", &doc.machine_closing),
        ("Bainha", &doc.machine_hem),
        ("Reforço", &doc.machine_reinforcement),
        ("Linha agulha", &doc.needle_thread),
        ("Fio laçadeira", &doc.looper_thread),
        ("Bainha (tam.)", &doc.hem_size),
        ("Bainha manga", &doc.sleeve_hem),
        ("Gola", &doc.collar_material),
        ("Altura gola", &doc.collar_height),
        ("Tipo de reforço", &doc.reinforcement_type),
    ] {
        machinery.push_str(&field_row(label, value));
    }

    let mut trims = String::new();
    for (key, label) in TRIM_ITEMS {
        let Some(entry) = doc.trims.get(key) else {
            continue;
        };
        let _ = write!(
            trims,
            r#"<tr><td class="center">{}</td><td><b>{}</b></td><td>{}</td></tr>"#,
            if entry.used { "&#9745;" } else { "&#9744;" },
            escape(label),
            escape(&entry.desc)
        );
    }

    let _ = write!(
        body,
        r#"<div class="cols" style="height:78mm">
<div class="box"><div class="box-title" style="text-align:center">Maquinário & Costura</div><table class="fields">{machinery}</table></div>
<div class="box"><div class="box-title" style="text-align:center">Tabela de Aviamentos</div><table class="grid">{trims}</table></div>
</div>
<div class="box" style="background:#f5f5f5;padding:4px;min-height:18mm"><div class="muted" style="font-weight:bold">OBS. COSTURA</div>{obs}</div>"#,
        machinery = machinery,
        trims = trims,
        obs = multiline(&doc.obs_costura),
    );

    body.push_str(&footer(1, "ESPEC. TÉCNICA COSTURA"));
    body
}

fn print_page(doc: &TechPackDocument, company: &CompanyInfo) -> String {
    let mut body = header(doc, company, "ESPECIFICAÇÕES DE ESTAMPARIA");

    let mut locations = String::new();
    for (index, location) in doc.print_locations.iter().enumerate() {
        let _ = write!(
            locations,
            r#"<div style="border-bottom:1px dashed #999;padding:4px 0"><b>LOCAL {}: {}</b><table class="fields">{}{}{}{}{}</table></div>"#,
            index + 1,
            escape(&location.name),
            field_row("Arte", &location.art),
            field_row("Dimensão", &location.dimension),
            field_row("Posição", &location.position),
            field_row("Cores", &location.pantone),
            field_row("Técnica", &location.technique),
        );
    }

    let _ = write!(
        body,
        r#"<div class="cols grow" style="min-height:0">
<div style="display:flex;flex-direction:column;gap:6px;flex:55">
<div class="box grow" style="display:flex;flex-direction:column;min-height:0"><div class="box-title" style="text-align:center">Vista Frente</div><div class="image-area grow">{front}</div></div>
<div class="box grow" style="display:flex;flex-direction:column;min-height:0"><div class="box-title" style="text-align:center">Vista Costas</div><div class="image-area grow">{back}</div></div>
</div>
<div class="box" style="flex:45;overflow:hidden">
<div class="box-title highlight">&gt;&gt;&gt; FOCO TOTAL: ESTAMPARIA & ARTE &lt;&lt;&lt;</div>
<div style="padding:4px">
<table class="fields">{fabric}{technique}{touch}</table>
{locations}
<div class="box-title" style="margin-top:6px;background:#333;color:#fff;text-align:center">Variantes Ativas</div><div style="padding:4px">{variants}</div>
<div class="box-title" style="margin-top:6px">Parâmetros DTF</div>
<table class="fields">{temp}{time}{pressure}{peel}</table>
</div></div>
</div>"#,
        front = image_or_placeholder(doc.image(ImageSlot::Front), "Sem mockup frente"),
        back = image_or_placeholder(doc.image(ImageSlot::Back), "Sem mockup costas"),
        fabric = field_row("Tecido principal", &doc.fabric),
        technique = field_row("Técnica predominante", choice_label(doc.print_specs.technique)),
        touch = field_row("Toque desejado", choice_label(doc.print_specs.touch)),
        locations = locations,
        variants = multiline(&doc.variants),
        temp = field_row("Temperatura", &doc.dtf_temp),
        time = field_row("Tempo", &doc.dtf_time),
        pressure = field_row("Pressão", &doc.dtf_pressure),
        peel = field_row("Peel", &doc.dtf_peel),
    );

    body.push_str(&footer(2, "ESPEC. TÉCNICA ESTAMPA"));
    body
}

fn cutting_page(doc: &TechPackDocument, company: &CompanyInfo) -> String {
    let mut body = header(doc, company, "CORTE & GRADE DE PRODUÇÃO");

    let _ = write!(
        body,
        r#"<div class="box"><div class="box-title">Dados de Corte</div><table class="fields">{}{}{}{}</table></div>"#,
        field_row("Tecido", &doc.fabric),
        field_row("Largura", &doc.fabric_width),
        field_row("Rendimento", &doc.fabric_yield),
        field_row("Descanso da malha", if doc.rest_time { "Sim" } else { "Não" }),
    );

    let mut grid = String::from("<table class=\"grid\"><thead><tr><th style=\"text-align:left\">Cor</th>");
    for size in GridSize::ALL {
        let _ = write!(grid, "<th>{}</th>", size.label());
    }
    grid.push_str("<th>Total</th></tr></thead><tbody>");
    for row in &doc.production_grid {
        let _ = write!(grid, "<tr><td style=\"text-align:left\">{}</td>", or_dash(&row.color));
        for size in GridSize::ALL {
            let _ = write!(grid, "<td>{}</td>", row.sizes.get(size));
        }
        let _ = write!(grid, "<td><b>{}</b></td></tr>", row.total());
    }
    if doc.production_grid.is_empty() {
        grid.push_str("<tr><td colspan=\"7\" class=\"muted\">Grade não preenchida</td></tr>");
    }
    grid.push_str("</tbody><tfoot><tr><th style=\"text-align:left\">TOTAL</th>");
    for size in GridSize::ALL {
        let _ = write!(grid, "<th>{}</th>", doc.size_total(size));
    }
    let _ = write!(grid, "<th>{}</th></tr></tfoot></table>", doc.grid_total());

    let _ = write!(
        body,
        r#"<div class="box grow" style="overflow:hidden"><div class="box-title">Grade de Produção</div><div style="padding:6px">{}</div></div>"#,
        grid
    );

    body.push_str(&footer(3, "CORTE & GRADE"));
    body
}

/// Three fixed pages: costura, estampa, corte
pub fn render_techpack(doc: &TechPackDocument, company: &CompanyInfo) -> Vec<PrintPage> {
    vec![
        PrintPage {
            key: "costura",
            title: "Costura & Aviamentos",
            body: sewing_page(doc, company),
        },
        PrintPage {
            key: "estampa",
            title: "Estamparia",
            body: print_page(doc, company),
        },
        PrintPage {
            key: "corte",
            title: "Corte & Grade",
            body: cutting_page(doc, company),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sow_domain::model::PrintTechnique;

    fn sample() -> TechPackDocument {
        let mut doc = TechPackDocument::new(NaiveDate::from_ymd_opt(2025, 7, 14).unwrap());
        doc.reference = "SB-033".into();
        doc.product = "Camiseta <Oversized>".into();
        doc.print_specs.technique = Some(PrintTechnique::Dtf);
        doc.dtf_temp = "160 ºC".into();
        let row = doc.add_grid_row("Preto");
        doc.set_grid_quantity(&row, GridSize::M, 20);
        doc.set_grid_quantity(&row, GridSize::G, 10);
        doc
    }

    #[test]
    fn test_three_pages_in_order() {
        let pages = render_techpack(&sample(), &CompanyInfo::default());
        let keys: Vec<_> = pages.iter().map(|p| p.key).collect();
        assert_eq!(keys, ["costura", "estampa", "corte"]);
        assert!(pages.iter().all(|p| p.body.contains("SB-033")));
        assert!(pages[0].body.contains("14/07/2025"));
        assert!(pages[0].body.contains("Camiseta &lt;Oversized&gt;"));
    }

    #[test]
    fn test_print_page_content() {
        let pages = render_techpack(&sample(), &CompanyInfo::default());
        let body = &pages[1].body;
        assert!(body.contains("DTF - Direct to Film"));
        assert!(body.contains("160 ºC"));
        assert!(body.contains("FRENTE (Tórax)"));
        assert!(body.contains("Sem mockup frente"));
    }

    #[test]
    fn test_grid_totals_on_cutting_page() {
        let pages = render_techpack(&sample(), &CompanyInfo::default());
        let body = &pages[2].body;
        assert!(body.contains("<td><b>30</b></td>"));
        assert!(body.contains("<th>30</th></tr></tfoot>"));
    }
}
