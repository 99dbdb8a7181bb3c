//! Upload then delete through the in-memory store; delete must remove exactly what
//! upload wrote.

use std::collections::BTreeSet;
use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
use mediashelf_core::{FileAsset, StorageBackend, UploadConfig, VariantSource};
use mediashelf_processing::{DeleteOrchestrator, UploadError, UploadOrchestrator};
use mediashelf_storage::MemoryStorage;

fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 90, 255])
    }));
    let img = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format).unwrap();
    buffer
}

fn base_config() -> UploadConfig {
    let mut config = UploadConfig::default();
    config.store.backend = StorageBackend::Memory;
    config
}

fn dimensioned(text: &str) -> UploadConfig {
    UploadConfig {
        variants: Some(VariantSource::parse_dimensions(text).unwrap()),
        ..base_config()
    }
}

fn labeled(json: &str) -> UploadConfig {
    UploadConfig {
        variants: Some(VariantSource::parse_presets(json).unwrap()),
        ..base_config()
    }
}

struct Harness {
    storage: MemoryStorage,
    uploader: UploadOrchestrator,
    deleter: DeleteOrchestrator,
}

fn harness(config: UploadConfig) -> Harness {
    let storage = MemoryStorage::with_base_url("https://bucket.s3.test");
    let config = Arc::new(config);
    Harness {
        uploader: UploadOrchestrator::new(Arc::new(storage.clone()), Arc::clone(&config)).unwrap(),
        deleter: DeleteOrchestrator::new(Arc::new(storage.clone()), config).unwrap(),
        storage,
    }
}

async fn assert_round_trip(config: UploadConfig, mut file: FileAsset) -> Vec<String> {
    let h = harness(config);
    h.uploader.upload(&mut file).await.unwrap();
    let uploaded: BTreeSet<String> = h.storage.put_log().into_iter().collect();

    let report = h.deleter.delete(&file).await;
    let deleted: BTreeSet<String> = h.storage.remove_log().into_iter().collect();

    assert!(report.is_success());
    assert!(report.already_absent.is_empty());
    assert_eq!(uploaded, deleted);
    assert!(h.storage.is_empty());
    uploaded.into_iter().collect()
}

#[tokio::test]
async fn test_round_trip_dimensioned_with_auxiliary() {
    let mut config = dimensioned("150x150\n300x300");
    config.auxiliary_format_enabled = true;
    let file = FileAsset::new("abc123", ".png", "image/png", encoded(400, 320, ImageFormat::Png));

    let keys = assert_round_trip(config, file).await;
    assert_eq!(keys.len(), 5);
}

#[tokio::test]
async fn test_round_trip_dimensioned_without_auxiliary() {
    let config = dimensioned("64x64");
    let file = FileAsset::new("abc", ".jpg", "image/jpeg", encoded(100, 100, ImageFormat::Jpeg))
        .with_path("gallery");

    let keys = assert_round_trip(config, file).await;
    assert_eq!(keys, vec!["gallery/abc-64x64.jpg", "gallery/abc.jpg"]);
}

#[tokio::test]
async fn test_round_trip_labeled() {
    let mut config = labeled(
        r#"[{"name":"thumbnail","options":{"width":245,"height":156,"fit":"inside","withoutEnlargement":true}},
            {"name":"large","options":{"width":1000}}]"#,
    );
    config.auxiliary_format_enabled = true;
    config.key_prefix = "media/".to_string();
    let file = FileAsset::new("abc", ".jpeg", "image/jpeg", encoded(300, 200, ImageFormat::Jpeg));

    let keys = assert_round_trip(config, file).await;
    assert_eq!(
        keys,
        vec![
            "media/abc.jpeg",
            "media/large_abc.jpeg",
            "media/large_abc.webp",
            "media/thumbnail_abc.jpeg",
            "media/thumbnail_abc.webp",
        ]
    );
}

#[tokio::test]
async fn test_round_trip_auxiliary_original() {
    let mut config = dimensioned("32x32");
    config.auxiliary_format_enabled = true;
    config.auxiliary_original = true;
    let file = FileAsset::new("abc", ".png", "image/png", encoded(50, 40, ImageFormat::Png));

    let keys = assert_round_trip(config, file).await;
    assert_eq!(
        keys,
        vec!["abc-32x32.png", "abc-32x32.webp", "abc.png", "abc.webp"]
    );
}

#[tokio::test]
async fn test_four_derived_assets_with_distinct_keys() {
    let mut config = dimensioned("150x150\n300x300");
    config.auxiliary_format_enabled = true;
    config.quality = 80;
    let h = harness(config);
    let mut file = FileAsset::new("abc123", ".png", "image/png", encoded(600, 600, ImageFormat::Png));

    let report = h.uploader.upload(&mut file).await.unwrap();

    assert_eq!(
        report.variant_keys,
        vec![
            "abc123-150x150.png",
            "abc123-150x150.webp",
            "abc123-300x300.png",
            "abc123-300x300.webp",
        ]
    );
    for (key, size, format) in [
        ("abc123-150x150.png", 150, ImageFormat::Png),
        ("abc123-150x150.webp", 150, ImageFormat::WebP),
        ("abc123-300x300.png", 300, ImageFormat::Png),
        ("abc123-300x300.webp", 300, ImageFormat::WebP),
    ] {
        let object = h.storage.get(key).unwrap();
        let decoded = image::load_from_memory_with_format(&object.data, format).unwrap();
        assert_eq!(decoded.dimensions(), (size, size), "{key}");
    }
}

#[tokio::test]
async fn test_disabled_variants_single_submission() {
    let mut config = dimensioned("150x150");
    config.variants_enabled = false;
    config.auxiliary_format_enabled = true;
    let h = harness(config);
    let mut file = FileAsset::new("abc", ".jpg", "image/jpeg", encoded(200, 200, ImageFormat::Jpeg));

    let report = h.uploader.upload(&mut file).await.unwrap();

    assert!(report.variant_keys.is_empty());
    assert_eq!(h.storage.put_log(), vec!["abc.jpg"]);
    assert_eq!(h.storage.get("abc.jpg").unwrap().content_type, "image/jpeg");
}

#[tokio::test]
async fn test_non_image_is_primary_only() {
    let mut config = dimensioned("150x150");
    config.auxiliary_format_enabled = true;
    config.auxiliary_original = true;
    let h = harness(config);
    let mut file = FileAsset::new("report", ".pdf", "application/pdf", b"%PDF-1.7".to_vec());

    let report = h.uploader.upload(&mut file).await.unwrap();

    assert!(report.render_failures.is_empty());
    assert_eq!(h.storage.put_log(), vec!["report.pdf"]);
}

#[tokio::test]
async fn test_derivative_is_not_reprocessed() {
    let mut config = dimensioned("150x150");
    config.auxiliary_format_enabled = true;
    let h = harness(config);
    let mut file = FileAsset::new(
        "abc-150x150",
        ".png",
        "image/png",
        encoded(150, 150, ImageFormat::Png),
    );

    h.uploader.upload(&mut file).await.unwrap();
    assert_eq!(h.storage.put_log(), vec!["abc-150x150.png"]);

    let mut config = labeled(r#"[{"name":"avatar","options":{"width":10}}]"#);
    config.auxiliary_format_enabled = true;
    let h = harness(config);
    for hash in ["thumbnail_abc", "avatar_abc"] {
        let mut file = FileAsset::new(hash, ".png", "image/png", encoded(20, 20, ImageFormat::Png));
        h.uploader.upload(&mut file).await.unwrap();
    }
    assert_eq!(h.storage.put_log(), vec!["thumbnail_abc.png", "avatar_abc.png"]);
}

#[tokio::test]
async fn test_public_url_prefers_custom_domain() {
    let mut config = dimensioned("10x10");
    config.custom_domain = Some("https://cdn.example.com/".to_string());
    config.key_prefix = "assets/".to_string();
    let h = harness(config);
    let mut file = FileAsset::new("abc", ".png", "image/png", encoded(20, 20, ImageFormat::Png));

    let report = h.uploader.upload(&mut file).await.unwrap();
    assert_eq!(report.public_url, "https://cdn.example.com/assets/abc.png");
    assert_eq!(file.public_url.as_deref(), Some("https://cdn.example.com/assets/abc.png"));

    let mut config = dimensioned("10x10");
    config.custom_domain = Some("-".to_string());
    let h = harness(config);
    let mut file = FileAsset::new("abc", ".png", "image/png", encoded(20, 20, ImageFormat::Png));
    h.uploader.upload(&mut file).await.unwrap();
    assert_eq!(file.public_url.as_deref(), Some("https://bucket.s3.test/abc.png"));
}

#[tokio::test]
async fn test_variant_failure_propagates_with_key() {
    let mut config = dimensioned("10x10\n20x20");
    config.auxiliary_format_enabled = true;
    let h = harness(config);
    h.storage.fail_on("abc-20x20.webp");
    let mut file = FileAsset::new("abc", ".png", "image/png", encoded(40, 40, ImageFormat::Png));

    let err = h.uploader.upload(&mut file).await.unwrap_err();

    match &err {
        UploadError::Store { key, .. } => assert_eq!(key, "abc-20x20.webp"),
        other => panic!("unexpected error: {other}"),
    }
    // The primary is stored and published; siblings are not rolled back
    assert!(file.public_url.is_some());
    assert!(h.storage.contains("abc.png"));
    assert!(h.storage.contains("abc-10x10.webp"));

    // Delete still cleans up everything that made it; the injected failure also
    // applies to removing the key that was never stored
    let report = h.deleter.delete(&file).await;
    assert_eq!(report.removed.len(), 4);
    assert_eq!(report.failures.len(), 1);
    assert!(h.storage.is_empty());
}

#[tokio::test]
async fn test_delete_with_nothing_stored() {
    let mut config = dimensioned("10x10");
    config.auxiliary_format_enabled = true;
    let h = harness(config);
    let file = FileAsset::new("abc", ".png", "image/png", Vec::new());

    let report = h.deleter.delete(&file).await;

    assert_eq!(report.already_absent.len(), 3);
    assert!(report.into_result().is_ok());
}

#[tokio::test]
async fn test_corrupt_image_still_uploads_primary() {
    let mut config = dimensioned("10x10");
    config.auxiliary_format_enabled = true;
    let h = harness(config);
    let mut file = FileAsset::new("abc", ".png", "image/png", b"not really a png".to_vec());

    let report = h.uploader.upload(&mut file).await.unwrap();

    assert_eq!(report.render_failures.len(), 1);
    assert!(report.variant_keys.is_empty());
    assert_eq!(h.storage.put_log(), vec!["abc.png"]);
    assert!(file.public_url.is_some());
}

#[tokio::test]
async fn test_no_upscaling_past_source() {
    let h = harness(dimensioned("300x300"));
    let mut file = FileAsset::new("small", ".png", "image/png", encoded(120, 80, ImageFormat::Png));

    h.uploader.upload(&mut file).await.unwrap();

    let object = h.storage.get("small-300x300.png").unwrap();
    let decoded = image::load_from_memory(&object.data).unwrap();
    let (w, h) = decoded.dimensions();
    assert!(w <= 120 && h <= 80, "got {w}x{h}");
}

#[test]
fn test_malformed_variant_line_rejected() {
    let vars = vec![
        ("MEDIASHELF_STORAGE_BACKEND".to_string(), "memory".to_string()),
        ("MEDIASHELF_VARIANTS".to_string(), "150x150\nabcxdef".to_string()),
    ];
    let err = UploadConfig::from_vars(vars).unwrap_err();
    assert!(err.to_string().contains("abcxdef"));
}
