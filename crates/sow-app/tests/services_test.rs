//! Application services against in-memory repositories

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::json;
use sow_app::app::{QuoteService, TechPackService, TechPackSession};
use sow_app::constants::storage::ORDER_COUNTER_KEY;
use sow_app::print::{render_quote, render_techpack, PageSet, PrintJob};
use sow_domain::format::format_currency;
use sow_domain::model::{
    CompanyInfo, GridSize, ItemEdit, PrintTouch, QuoteDocument, TechPackDocument,
};
use sow_domain::repository::{DocumentRepository, DraftRepository, NewDocument};
use sow_domain::service::DocumentSchema;
use sow_infra::persistence::{MemoryDocumentRepository, MemoryDraftRepository};
use sow_types::{DocumentKind, Error};
use tempfile::TempDir;

struct Fixture {
    drafts: Arc<MemoryDraftRepository>,
    library: Arc<MemoryDocumentRepository>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            drafts: Arc::new(MemoryDraftRepository::new()),
            library: Arc::new(MemoryDocumentRepository::new()),
        }
    }

    fn quotes(&self) -> QuoteService {
        QuoteService::new(self.drafts.clone(), self.library.clone())
    }

    fn techpacks(&self) -> TechPackService {
        TechPackService::new(self.drafts.clone(), self.library.clone())
    }
}

fn june(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

// --- Quotes ----------------------------------------------------------------

#[test]
fn first_quote_gets_sequence_one() {
    let fx = Fixture::new();
    let quote = fx.quotes().open(june(2)).unwrap();
    assert_eq!(quote.order_number, "001/2025");
}

#[test]
fn committed_numbers_strictly_increase() {
    let fx = Fixture::new();
    let service = fx.quotes();

    let mut seen = Vec::new();
    for _ in 0..3 {
        let quote = service.reset(june(3)).unwrap();
        service.commit(&quote).unwrap();
        seen.push(quote.order_number);
    }
    assert_eq!(seen, ["001/2025", "002/2025", "003/2025"]);
}

#[test]
fn abandoned_quote_does_not_advance_counter() {
    let fx = Fixture::new();
    let service = fx.quotes();

    let first = service.reset(june(3)).unwrap();
    let again = service.reset(june(3)).unwrap();
    assert_eq!(first.order_number, again.order_number);
    assert_eq!(fx.drafts.read(ORDER_COUNTER_KEY).unwrap(), None);
}

#[test]
fn new_year_restarts_sequence() {
    let fx = Fixture::new();
    fx.drafts
        .write(ORDER_COUNTER_KEY, r#"{"year":2024,"sequence":57}"#)
        .unwrap();
    let quote = fx.quotes().open(june(2)).unwrap();
    assert_eq!(quote.order_number, "001/2025");
}

#[test]
fn corrupt_counter_counts_as_absent() {
    let fx = Fixture::new();
    fx.drafts.write(ORDER_COUNTER_KEY, "{{{").unwrap();
    let quote = fx.quotes().open(june(2)).unwrap();
    assert_eq!(quote.order_number, "001/2025");
}

#[test]
fn draft_is_restored_verbatim_without_allocating() {
    let fx = Fixture::new();
    let service = fx.quotes();

    let mut quote = service.open(june(2)).unwrap();
    quote.client_name = "Ateliê Maré".into();
    let id = quote.add_item().id.clone();
    quote.update_item(&id, ItemEdit::Service("Mentoria".into()));
    service.save_draft(&quote).unwrap();

    // Someone else commits a later number meanwhile
    fx.drafts
        .write(ORDER_COUNTER_KEY, r#"{"year":2025,"sequence":9}"#)
        .unwrap();

    let reopened = service.open(june(5)).unwrap();
    assert_eq!(reopened, quote);
    assert_eq!(reopened.order_number, "001/2025");
}

#[test]
fn malformed_quote_draft_falls_back_to_fresh() {
    let fx = Fixture::new();
    fx.drafts
        .write(QuoteDocument::DRAFT_KEY, "[\"not\", \"an\", \"object\"]")
        .unwrap();
    let quote = fx.quotes().open(june(2)).unwrap();
    assert_eq!(quote.order_number, "001/2025");
    assert!(quote.items.is_empty());
}

#[test]
fn reset_clears_draft() {
    let fx = Fixture::new();
    let service = fx.quotes();

    let mut quote = service.open(june(2)).unwrap();
    quote.client_name = "Cliente".into();
    service.save_draft(&quote).unwrap();

    let fresh = service.reset(june(2)).unwrap();
    assert!(fresh.client_name.is_empty());
    assert_eq!(fx.drafts.read(QuoteDocument::DRAFT_KEY).unwrap(), None);
}

#[test]
fn two_item_quote_totals_and_prints() {
    let fx = Fixture::new();
    let service = fx.quotes();

    let mut quote = service.open(june(2)).unwrap();
    quote.client_name = "Loja Centro".into();
    let a = quote.add_item().id.clone();
    let b = quote.add_item().id.clone();
    quote.update_item(&a, ItemEdit::Quantity(2));
    quote.update_item(&a, ItemEdit::UnitPrice(10.0));
    quote.update_item(&b, ItemEdit::UnitPrice(5.0));

    assert_eq!(format_currency(quote.total()), "R$\u{a0}25,00");

    let dir = TempDir::new().unwrap();
    let job = PrintJob::new(dir.path().to_path_buf()).without_opening();
    let path = job
        .run(
            &quote.library_title(),
            render_quote(&quote, &CompanyInfo::default()),
            &PageSet::All,
        )
        .unwrap();
    service.commit(&quote).unwrap();

    let html = std::fs::read_to_string(path).unwrap();
    assert!(html.contains("R$\u{a0}25,00"));
    assert_eq!(
        fx.drafts.read(ORDER_COUNTER_KEY).unwrap().as_deref(),
        Some(r#"{"year":2025,"sequence":1}"#)
    );
}

#[test]
fn quote_library_requires_client_name() {
    let fx = Fixture::new();
    let service = fx.quotes();
    let quote = service.open(june(2)).unwrap();

    let err = service.save_to_library(&quote).unwrap_err();
    assert!(err.is_validation());
    assert!(fx.library.is_empty());
}

#[test]
fn quote_library_round_trip() {
    let fx = Fixture::new();
    let service = fx.quotes();

    let mut quote = service.open(june(2)).unwrap();
    quote.client_name = "Marca X".into();
    quote.observations = "Entrega parcial".into();
    let id = quote.add_item().id.clone();
    quote.update_item(&id, ItemEdit::Service("Private Label".into()));
    quote.update_item(&id, ItemEdit::Description("Camiseta Slim".into()));

    let row = service.save_to_library(&quote).unwrap();
    assert_eq!(row.title, "Orç. 001/2025 - Marca X");
    service.save_to_library(&quote).unwrap();
    assert_eq!(service.list_library().unwrap().len(), 2);

    let loaded = service.load_from_library(&row.id, june(20)).unwrap();
    assert_eq!(loaded, quote);
}

#[test]
fn loading_wrong_kind_is_not_found() {
    let fx = Fixture::new();
    let row = fx
        .library
        .save(NewDocument {
            kind: DocumentKind::TechPack,
            title: "Ficha A".into(),
            content: json!({"reference": "A"}),
        })
        .unwrap();

    let err = fx.quotes().load_from_library(&row.id, june(2)).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    let err = fx.quotes().load_from_library("404", june(2)).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

// --- Tech packs ------------------------------------------------------------

#[test]
fn every_edit_autosaves() {
    let fx = Fixture::new();
    let mut session = TechPackSession::open(fx.techpacks(), today()).unwrap();

    session.edit(|doc| doc.reference = "SB-100".into()).unwrap();
    session
        .set_field("printLocations.local2.art", json!("Costas grande"))
        .unwrap();
    let row = session.edit(|doc| doc.add_grid_row("Off-white")).unwrap();
    session
        .edit(|doc| doc.set_grid_quantity(&row, GridSize::GG, 7))
        .unwrap();

    let reopened = fx.techpacks().open(today()).unwrap();
    assert_eq!(&reopened, session.document());
    assert_eq!(reopened.print_locations.local2.art, "Costas grande");
    assert_eq!(reopened.grid_total(), 7);
}

#[test]
fn older_draft_shape_keeps_new_defaults() {
    let fx = Fixture::new();
    fx.drafts
        .write(
            TechPackDocument::DRAFT_KEY,
            r#"{"reference":"OLD-1","printSpecs":{"touch":"Emborrachado"}}"#,
        )
        .unwrap();

    let doc = fx.techpacks().open(today()).unwrap();
    assert_eq!(doc.reference, "OLD-1");
    assert_eq!(doc.print_specs.touch, Some(PrintTouch::Rubbery));
    assert_eq!(doc.print_locations.local3.name, "INTERNO");
    assert_eq!(doc.date, "2025-06-02");
    assert!(doc.trims.cadarco_limpeza.used);
}

#[test]
fn untracked_frame_does_not_write_draft() {
    let fx = Fixture::new();
    let mut session = TechPackSession::open(fx.techpacks(), today()).unwrap();

    let changed = session.edit_tracked(|_| false).unwrap();
    assert!(!changed);
    assert_eq!(fx.drafts.read(TechPackDocument::DRAFT_KEY).unwrap(), None);

    session
        .edit_tracked(|doc| {
            doc.fabric = "Moletinho".into();
            true
        })
        .unwrap();
    assert_eq!(fx.techpacks().open(today()).unwrap().fabric, "Moletinho");
}

#[test]
fn rejected_field_edit_is_not_saved() {
    let fx = Fixture::new();
    let mut session = TechPackSession::open(fx.techpacks(), today()).unwrap();
    assert!(session.set_field("noSuchField", json!("x")).is_err());
    assert_eq!(fx.drafts.read(TechPackDocument::DRAFT_KEY).unwrap(), None);
}

#[test]
fn techpack_reset_restores_defaults() {
    let fx = Fixture::new();
    let mut session = TechPackSession::open(fx.techpacks(), today()).unwrap();
    session.edit(|doc| doc.product = "Moletom".into()).unwrap();

    session.reset(today()).unwrap();
    assert_eq!(session.document(), &TechPackDocument::new(today()));
    assert_eq!(fx.drafts.read(TechPackDocument::DRAFT_KEY).unwrap(), None);
}

#[test]
fn techpack_library_load_becomes_active_draft() {
    let fx = Fixture::new();
    let service = fx.techpacks();

    let mut doc = TechPackDocument::new(today());
    doc.reference = "SB-200".into();
    doc.product = "Regata".into();
    let row = service.save_to_library(&doc).unwrap();
    assert_eq!(row.title, "Ficha SB-200 - Regata");
    assert_eq!(fx.library.count(DocumentKind::TechPack).unwrap(), 1);

    let loaded = service.load_from_library(&row.id, today()).unwrap();
    assert_eq!(loaded, doc);
    assert_eq!(service.open(today()).unwrap(), doc);
}

#[test]
fn techpack_library_requires_reference() {
    let fx = Fixture::new();
    let err = fx
        .techpacks()
        .save_to_library(&TechPackDocument::new(today()))
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn selective_techpack_print() {
    let mut doc = TechPackDocument::new(today());
    doc.reference = "SB-300".into();
    let dir = TempDir::new().unwrap();
    let job = PrintJob::new(dir.path().to_path_buf()).without_opening();

    let path = job
        .run(
            "Ficha SB-300",
            render_techpack(&doc, &CompanyInfo::default()),
            &"1,3".parse().unwrap(),
        )
        .unwrap();
    let html = std::fs::read_to_string(path).unwrap();
    assert_eq!(html.matches("<section class=\"page\">").count(), 2);
    assert!(html.contains("PÁGINA 1/3"));
    assert!(!html.contains("PÁGINA 2/3"));
    assert!(html.contains("PÁGINA 3/3"));

    let err = job
        .run("Ficha", render_techpack(&doc, &CompanyInfo::default()), &PageSet::only([4]))
        .unwrap_err();
    assert!(err.is_validation());
}
