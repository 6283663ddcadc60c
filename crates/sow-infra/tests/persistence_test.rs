//! File-backed repositories and image encoding against a temp directory

use image::{ImageFormat, Rgba, RgbaImage};
use serde_json::json;
use sow_domain::repository::{DocumentRepository, DraftRepository, NewDocument};
use sow_infra::image_data_uri::{decode_data_uri, decode_preview, encode_image_file};
use sow_infra::persistence::{FileDocumentRepository, FileDraftRepository, MemoryDocumentRepository};
use sow_types::DocumentKind;
use tempfile::TempDir;

fn new_doc(kind: DocumentKind, title: &str) -> NewDocument {
    NewDocument {
        kind,
        title: title.to_string(),
        content: json!({ "title": title }),
    }
}

#[test]
fn draft_store_survives_reopen() {
    let dir = TempDir::new().unwrap();

    let repo = FileDraftRepository::open(dir.path().to_path_buf()).unwrap();
    repo.write("sow_quote_draft", "{\"clientName\":\"Ana\"}").unwrap();
    repo.write("sow_order_counter", "{\"year\":2025,\"sequence\":3}").unwrap();
    repo.remove("sow_order_counter").unwrap();
    repo.remove("never_written").unwrap();
    drop(repo);

    let reopened = FileDraftRepository::open(dir.path().to_path_buf()).unwrap();
    assert_eq!(
        reopened.read("sow_quote_draft").unwrap().as_deref(),
        Some("{\"clientName\":\"Ana\"}")
    );
    assert_eq!(reopened.read("sow_order_counter").unwrap(), None);
}

#[test]
fn corrupt_draft_file_starts_empty() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("drafts.json"), "not json").unwrap();

    let repo = FileDraftRepository::open(dir.path().to_path_buf()).unwrap();
    assert_eq!(repo.read("sow_quote_draft").unwrap(), None);
}

#[test]
fn document_library_lists_newest_first_per_kind() {
    let dir = TempDir::new().unwrap();
    let repo = FileDocumentRepository::open(dir.path().to_path_buf()).unwrap();

    let first = repo.save(new_doc(DocumentKind::Quote, "Orç. 001/2025 - Ana")).unwrap();
    repo.save(new_doc(DocumentKind::TechPack, "Ficha SB-001")).unwrap();
    let third = repo.save(new_doc(DocumentKind::Quote, "Orç. 002/2025 - Bia")).unwrap();
    assert_ne!(first.id, third.id);

    let quotes = repo.list(DocumentKind::Quote).unwrap();
    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[0].id, third.id);
    assert_eq!(quotes[1].id, first.id);
    assert_eq!(repo.count(DocumentKind::TechPack).unwrap(), 1);

    drop(repo);
    let reopened = FileDocumentRepository::open(dir.path().to_path_buf()).unwrap();
    let loaded = reopened.load(&first.id).unwrap().unwrap();
    assert_eq!(loaded.content["title"], "Orç. 001/2025 - Ana");
    assert!(reopened.load("missing").unwrap().is_none());
}

#[test]
fn unreadable_library_is_set_aside_before_saving() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("documents.json");
    let truncated = r#"[{"id":"a","type":"quote","title":"Orç. 001/2025 - Ana","content":{},"created_at":"2025-01-02T10:00:00Z"},{"id":"b","ty"#;
    std::fs::write(&store, truncated).unwrap();

    let repo = FileDocumentRepository::open(dir.path().to_path_buf()).unwrap();
    assert_eq!(repo.count(DocumentKind::Quote).unwrap(), 0);
    repo.save(new_doc(DocumentKind::Quote, "Orç. 002/2025 - Bia")).unwrap();

    let kept = std::fs::read_to_string(dir.path().join("documents.json.corrupt")).unwrap();
    assert_eq!(kept, truncated);
    let reopened = FileDocumentRepository::open(dir.path().to_path_buf()).unwrap();
    assert_eq!(reopened.count(DocumentKind::Quote).unwrap(), 1);
}

#[test]
fn saves_leave_no_temp_files_behind() {
    let dir = TempDir::new().unwrap();
    let drafts = FileDraftRepository::open(dir.path().to_path_buf()).unwrap();
    let library = FileDocumentRepository::open(dir.path().to_path_buf()).unwrap();
    drafts.write("sow_quote_draft", "{}").unwrap();
    library.save(new_doc(DocumentKind::TechPack, "Ficha SB-1")).unwrap();

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["documents.json", "drafts.json"]);
}

#[test]
fn saving_twice_creates_two_rows() {
    let repo = MemoryDocumentRepository::new();
    let a = repo.save(new_doc(DocumentKind::TechPack, "Ficha SB-1")).unwrap();
    let b = repo.save(new_doc(DocumentKind::TechPack, "Ficha SB-1")).unwrap();
    assert_ne!(a.id, b.id);
    assert!(b.created_at > a.created_at);
    assert_eq!(repo.count(DocumentKind::TechPack).unwrap(), 2);
    assert_eq!(repo.list(DocumentKind::TechPack).unwrap()[0].id, b.id);
}

#[test]
fn image_file_becomes_data_uri() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mockup.png");
    let img = RgbaImage::from_pixel(400, 200, Rgba([10, 20, 30, 255]));
    img.save_with_format(&path, ImageFormat::Png).unwrap();

    let uri = encode_image_file(&path).unwrap();
    assert!(uri.starts_with("data:image/png;base64,"));

    let (mime, bytes) = decode_data_uri(&uri).unwrap();
    assert_eq!(mime, "image/png");
    assert_eq!(bytes, std::fs::read(&path).unwrap());

    let preview = decode_preview(&uri, 100).unwrap();
    assert_eq!((preview.width(), preview.height()), (100, 50));
}

#[test]
fn unknown_bytes_fall_back_to_extension() {
    let dir = TempDir::new().unwrap();
    let svg = dir.path().join("logo.svg");
    std::fs::write(&svg, "<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();
    assert!(encode_image_file(&svg).unwrap().starts_with("data:image/svg+xml;base64,"));

    let blob = dir.path().join("arte.xyz");
    std::fs::write(&blob, [1u8, 2, 3]).unwrap();
    assert!(encode_image_file(&blob)
        .unwrap()
        .starts_with("data:application/octet-stream;base64,"));
}

#[test]
fn malformed_data_uris_are_rejected() {
    assert!(decode_data_uri("http://example.com/a.png").is_err());
    assert!(decode_data_uri("data:image/png;base64").is_err());
    assert!(decode_data_uri("data:image/png,plain").is_err());
    assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
}
