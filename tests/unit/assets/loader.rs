use std::io::Cursor;

use super::*;

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_asset_path("a/b.webp").unwrap(), "a/b.webp");
    assert_eq!(normalize_asset_path("a\\b.webp").unwrap(), "a/b.webp");
    assert_eq!(
        normalize_asset_path("/giant-frames/./Sequence 01_100.webp").unwrap(),
        "giant-frames/Sequence 01_100.webp"
    );
    assert!(normalize_asset_path("../x.webp").is_err());
    assert!(normalize_asset_path("/").is_err());
    assert!(normalize_asset_path("").is_err());
}

#[test]
fn memory_loader_hits_and_misses() {
    let mut loader = MemoryLoader::new();
    loader
        .insert("/frames/01.webp", PreparedImage::solid(2, 2, [0, 0, 0, 255]))
        .unwrap();
    assert_eq!(loader.len(), 1);

    let img = loader.load("frames/01.webp").unwrap();
    assert_eq!((img.width, img.height), (2, 2));
    assert!(matches!(
        loader.load("frames/02.webp"),
        Err(ScrollyteError::Asset(_))
    ));
}

#[test]
fn fs_loader_reads_and_decodes_png() {
    let tmp = std::env::temp_dir().join(format!(
        "scrollyte_loader_test_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(tmp.join("seq")).unwrap();

    let img = image::RgbaImage::from_raw(3, 1, vec![255u8; 12]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(tmp.join("seq/01.png"), &buf).unwrap();

    let loader = FsLoader::new(&tmp);
    let prepared = loader.load("/seq/01.png").unwrap();
    assert_eq!((prepared.width, prepared.height), (3, 1));
    assert!(matches!(
        loader.load("/seq/02.png"),
        Err(ScrollyteError::Asset(_))
    ));

    let _ = std::fs::remove_dir_all(&tmp);
}

#[test]
fn placeholder_frames_are_opaque_and_stable() {
    let loader = PlaceholderLoader::new(8, 4);
    let a = loader.load("/giant-frames/Sequence 01_100.webp").unwrap();
    let again = loader.load("giant-frames/Sequence 01_100.webp").unwrap();
    assert_eq!((a.width, a.height), (8, 4));
    assert_eq!(a.rgba8_premul[3], 255);
    assert_eq!(a.rgba8_premul, again.rgba8_premul);
    assert!(loader.load("../escape.webp").is_err());
}
