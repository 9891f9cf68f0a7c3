use super::*;

#[test]
fn sampling_38_to_24_spans_full_range() {
    let idx = sample_indices(38, 24);
    assert_eq!(idx.len(), 24);
    assert_eq!(idx[0], 1);
    assert_eq!(idx[23], 38);
    assert!(idx.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn sampling_shape_holds_across_sizes() {
    for total in 2..=130u32 {
        for sampled in 2..=total.min(40) {
            let idx = sample_indices(total, sampled);
            assert_eq!(idx.len(), sampled as usize, "{total}/{sampled}");
            assert_eq!(idx[0], 1);
            assert_eq!(*idx.last().unwrap(), total);
            assert!(idx.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}

#[test]
fn sampling_one_to_one_is_identity() {
    let idx = sample_indices(88, 88);
    assert_eq!(idx, (1..=88).collect::<Vec<_>>());
}

#[test]
fn sampling_degenerate_counts() {
    assert_eq!(sample_indices(10, 1), vec![1]);
    assert!(sample_indices(10, 0).is_empty());
    assert!(sample_indices(0, 3).is_empty());
}

#[test]
fn naming_schemes() {
    let padded = FrameNaming::Padded {
        width: 2,
        prefix: String::new(),
        suffix: ".webp".into(),
    };
    assert_eq!(padded.file_name(7).unwrap(), "07.webp");
    assert_eq!(padded.file_name(38).unwrap(), "38.webp");
    assert!(padded.file_name(0).is_err());

    let hero = FrameManifest::hero();
    let paths = hero.sampled_paths().unwrap();
    assert_eq!(paths.len(), 88);
    assert_eq!(paths[0], "/giant-frames/Sequence 01_100.webp");
    assert_eq!(paths[87], "/giant-frames/Sequence 01_187.webp");

    let chameleon = FrameManifest::creature(Creature::Chameleon, 24);
    let paths = chameleon.sampled_paths().unwrap();
    assert_eq!(paths[0], "/How we can help characters/Cameleon/Comp 300.webp");
    assert_eq!(paths[23], "/How we can help characters/Cameleon/Comp 363.webp");

    let octopus = FrameManifest::creature(Creature::Octopus, 24);
    let paths = octopus.sampled_paths().unwrap();
    assert!(paths[0].ends_with("20260130133400.webp"));
    assert!(paths[23].ends_with("20260130133463.webp"));
}

#[test]
fn validation_rejects_bad_shapes() {
    let mut m = FrameManifest::creature(Creature::Pufferfish, 24);
    assert!(m.validate().is_ok());

    m.sampled_count = 0;
    assert!(m.validate().is_err());

    m.sampled_count = 39;
    assert!(m.validate().is_err());

    let short = FrameManifest {
        base_path: String::new(),
        naming: FrameNaming::Listed {
            files: vec!["a.webp".into()],
        },
        total_frames: 2,
        sampled_count: 2,
    };
    assert!(short.sampled_paths().is_err());
}

#[test]
fn manifest_json_shape() {
    let json = r#"{
        "base_path": "/seq",
        "naming": { "kind": "padded", "width": 3, "suffix": ".png" },
        "total_frames": 10,
        "sampled_count": 4
    }"#;
    let m: FrameManifest = serde_json::from_str(json).unwrap();
    assert_eq!(m.sampled_paths().unwrap()[3], "/seq/010.png");
}
