use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use test_log::test;

use super::*;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

#[test]
fn test_parse_path_only() {
    let attachment: Attachment = "assets/logo.png".parse().unwrap();
    assert_eq!(attachment, Attachment::new("assets/logo.png"));
}

#[test]
fn test_parse_path_with_mime_type() {
    let attachment: Attachment = "assets/logo.svg:image/svg+xml".parse().unwrap();
    assert_eq!(
        attachment,
        Attachment::new("assets/logo.svg").with_mime_type("image/svg+xml")
    );
}

#[test]
fn test_parse_keeps_colons_that_are_not_mime_types() {
    let attachment: Attachment = r"C:\designs\mockup.png".parse().unwrap();
    assert_eq!(attachment, Attachment::new(r"C:\designs\mockup.png"));

    let attachment: Attachment = "notes:draft.txt".parse().unwrap();
    assert_eq!(attachment, Attachment::new("notes:draft.txt"));
}

#[test]
fn test_detect_mime_type() {
    assert_eq!(detect_mime_type(PNG_SIGNATURE), "image/png");
    assert_eq!(detect_mime_type(b"plain words"), "text/plain");
    assert_eq!(detect_mime_type(&[0xc3, 0x28, 0xa0, 0xa1]), "application/octet-stream");
}

#[test(tokio::test)]
async fn test_to_part_encodes_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mockup.png");
    std::fs::write(&path, PNG_SIGNATURE).unwrap();

    let part = Attachment::new(&path).to_part().await.unwrap();

    assert_eq!(part, ContentPart::InlineData {
        mime_type: "image/png".to_owned(),
        data: BASE64_STANDARD.encode(PNG_SIGNATURE),
    });
}

#[test(tokio::test)]
async fn test_declared_mime_type_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("brief.md");
    std::fs::write(&path, "# Brief").unwrap();

    let part = Attachment::new(&path)
        .with_mime_type("text/markdown")
        .to_part()
        .await
        .unwrap();

    assert_matches!(part, ContentPart::InlineData { mime_type, .. } if mime_type == "text/markdown");
}

#[test(tokio::test)]
async fn test_missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.png");

    let error = resolve_all(&[Attachment::new(&path)]).await.unwrap_err();

    assert_matches!(&error, Error::Attachment { path: p, .. } if p == &path);
    assert!(error.to_string().contains("missing.png"));
}

#[test(tokio::test)]
async fn test_resolve_all_preserves_order() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.txt");
    let second = dir.path().join("b.txt");
    std::fs::write(&first, "first").unwrap();
    std::fs::write(&second, "second").unwrap();

    let parts = resolve_all(&[Attachment::new(&first), Attachment::new(&second)])
        .await
        .unwrap();

    let data = parts
        .into_iter()
        .map(|part| match part {
            ContentPart::InlineData { data, .. } => data,
            ContentPart::Text(_) => panic!("expected inline data"),
        })
        .collect::<Vec<_>>();

    assert_eq!(data, vec![
        BASE64_STANDARD.encode("first"),
        BASE64_STANDARD.encode("second"),
    ]);
}
