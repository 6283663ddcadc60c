//! HTML building blocks for print pages

use std::fmt::Write as _;

use crate::constants::print::{
    ACCENT_COLOR, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, PRINT_CLEANUP_DELAY_MS, PRINT_SETTLE_DELAY_MS,
};

/// Escape text for element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escaped text with line breaks kept
pub fn multiline(text: &str) -> String {
    escape(text).replace('\n', "<br>")
}

/// `value` or a dash when empty
pub fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "---".to_string()
    } else {
        escape(value)
    }
}

/// `<img>` for an embedded image, or a placeholder box
pub fn image_or_placeholder(data_uri: Option<&str>, placeholder: &str) -> String {
    match data_uri {
        Some(uri) if uri.starts_with("data:image/") => {
            format!("<img class=\"fit\" src=\"{}\" alt=\"\">", escape(uri))
        }
        _ => format!("<div class=\"placeholder\">{}</div>", escape(placeholder)),
    }
}

/// Two-column label/value row
pub fn field_row(label: &str, value: &str) -> String {
    format!(
        "<tr><th>{}</th><td>{}</td></tr>",
        escape(label),
        or_dash(value)
    )
}

/// `SOW BRAND` wordmark
pub fn logo() -> String {
    "<div class=\"logo\"><span>SOW</span><span class=\"accent\">BRAND</span></div>".to_string()
}

fn stylesheet() -> String {
    let mut css = String::new();
    let _ = write!(
        css,
        r#"@page {{ size: A4; margin: 0; }}
* {{ box-sizing: border-box; -webkit-print-color-adjust: exact; print-color-adjust: exact; }}
body {{ margin: 0; font-family: Helvetica, Arial, sans-serif; color: #111; font-size: 11px; }}
.page {{ width: {w}mm; height: {h}mm; overflow: hidden; position: relative; background: #fff;
  padding: 12mm; display: flex; flex-direction: column; page-break-after: always; break-after: page; }}
.page:last-of-type {{ page-break-after: auto; break-after: auto; }}
.logo {{ font-weight: bold; font-size: 20px; letter-spacing: -1px; }}
.accent {{ color: {accent}; }}
.box {{ border: 1px solid #000; margin-bottom: 4px; }}
.box-title {{ background: #e5e5e5; border-bottom: 1px solid #000; padding: 2px 6px; font-weight: bold; font-size: 10px; text-transform: uppercase; }}
.box-title.highlight {{ background: #fde047; text-align: center; }}
.grow {{ flex-grow: 1; }}
.cols {{ display: flex; gap: 6px; }}
.cols > * {{ flex: 1; }}
.image-area {{ display: flex; align-items: center; justify-content: center; overflow: hidden; padding: 4px; }}
img.fit {{ max-width: 100%; max-height: 100%; object-fit: contain; }}
.placeholder {{ color: #bbb; font-size: 12px; }}
table {{ width: 100%; border-collapse: collapse; }}
table.fields th {{ text-align: left; width: 38%; padding: 2px 6px; font-size: 10px; }}
table.fields td {{ padding: 2px 6px; border-bottom: 1px dotted #999; }}
table.grid th, table.grid td {{ border: 1px solid #000; padding: 3px 6px; text-align: center; }}
table.grid th {{ background: #e5e5e5; }}
table.items thead th {{ background: #000; color: #fff; font-size: 9px; text-transform: uppercase; padding: 5px; }}
table.items td {{ padding: 5px; border-bottom: 1px solid #e5e5e5; vertical-align: top; }}
table.items tfoot td {{ border-top: 2px solid #000; background: #f5f5f5; font-weight: bold; padding: 8px 5px; }}
.num {{ text-align: right; }}
.center {{ text-align: center; }}
.mono {{ font-family: "Courier New", monospace; }}
.muted {{ color: #666; font-size: 10px; }}
.total {{ color: {accent}; font-size: 16px; }}
.footer {{ text-align: right; font-size: 9px; font-weight: bold; margin-top: 4px; }}
.signatures {{ display: flex; gap: 48px; margin-top: auto; padding-top: 48px; }}
.signatures div {{ flex: 1; border-top: 1px solid #000; padding-top: 6px; text-align: center; font-size: 10px; font-weight: bold; text-transform: uppercase; }}
.controls {{ position: fixed; top: 8px; right: 8px; }}
@media screen {{
  body {{ background: #e5e5e5; }}
  .page {{ margin: 8mm auto; box-shadow: 0 2px 8px rgba(0,0,0,.25); }}
}}
@media print {{
  .no-print {{ display: none !important; }}
}}
"#,
        w = PAGE_WIDTH_MM,
        h = PAGE_HEIGHT_MM,
        accent = ACCENT_COLOR,
    );
    css
}

fn print_script() -> String {
    format!(
        r#"window.addEventListener("load", function () {{
  setTimeout(function () {{ window.print(); }}, {settle});
}});
window.addEventListener("afterprint", function () {{
  setTimeout(function () {{ window.close(); }}, {cleanup});
}});"#,
        settle = PRINT_SETTLE_DELAY_MS,
        cleanup = PRINT_CLEANUP_DELAY_MS,
    )
}

/// Self-contained HTML document around already-rendered page bodies
pub fn document(title: &str, pages: &[String]) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{}</style>\n</head>\n<body>\n",
        escape(title),
        stylesheet()
    );
    html.push_str(
        "<div class=\"controls no-print\"><button onclick=\"window.print()\">Imprimir</button></div>\n",
    );
    for page in pages {
        let _ = writeln!(html, "<section class=\"page\">{}</section>", page);
    }
    let _ = write!(html, "<script>\n{}\n</script>\n</body>\n</html>\n", print_script());
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<b>\"Sow\" & 'Brand'</b>"),
            "&lt;b&gt;&quot;Sow&quot; &amp; &#39;Brand&#39;&lt;/b&gt;"
        );
        assert_eq!(multiline("a\nb<"), "a<br>b&lt;");
        assert_eq!(or_dash("  "), "---");
    }

    #[test]
    fn test_only_image_data_uris_are_embedded() {
        assert!(image_or_placeholder(Some("data:image/png;base64,AA=="), "x").contains("<img"));
        assert!(image_or_placeholder(Some("javascript:alert(1)"), "Sem imagem").contains("Sem imagem"));
        assert!(image_or_placeholder(None, "Sem imagem").contains("placeholder"));
    }

    #[test]
    fn test_document_shell() {
        let html = document("Pedido <1>", &["<p>um</p>".to_string(), "<p>dois</p>".to_string()]);
        assert!(html.contains("<title>Pedido &lt;1&gt;</title>"));
        assert_eq!(html.matches("<section class=\"page\">").count(), 2);
        assert!(html.contains("overflow: hidden"));
        assert!(html.contains("print-color-adjust: exact"));
        assert!(html.contains("page-break-after: always"));
        assert!(html.contains("window.print(); }, 100)"));
        assert!(html.contains("window.close(); }, 500)"));
    }
}
