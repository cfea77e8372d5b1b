use super::*;

fn names(slots: &[AssetSlot]) -> Vec<&str> {
    slots.iter().map(|s| s.file_name.as_str()).collect()
}

#[test]
fn source_table_matches_required_sizes() {
    let expect = [
        ("icon_small_back", vec![(400, 240), (800, 480)]),
        ("icon_large_front", vec![(1280, 768), (2560, 1536)]),
        ("top_shelf", vec![(1920, 720), (3840, 1440)]),
        ("top_shelf_wide", vec![(2320, 720), (4640, 1440)]),
        ("launch_image", vec![(1920, 1080)]),
    ];
    for (id, sizes) in expect {
        let fam = SlotFamily::by_id(id).unwrap();
        let got: Vec<_> = fam
            .slots()
            .unwrap()
            .iter()
            .map(|s| (s.size.width, s.size.height))
            .collect();
        assert_eq!(got, sizes, "{id}");
    }
    assert!(SlotFamily::by_id("nope").is_none());
}

#[test]
fn source_file_names() {
    let slots = SlotFamily::by_id("icon_small_middle").unwrap().slots().unwrap();
    assert_eq!(names(&slots), ["Icon_Small_Middle.png", "Icon_Small_Middle@2x.png"]);
    assert_eq!(slots[0].label, "Icon Small Middle @1x");
    assert_eq!(slots[1].scale, 2);
    assert_eq!(slots[0].alpha, AlphaMode::Keep);

    let slots = SlotFamily::by_id("top_shelf_wide").unwrap().slots().unwrap();
    assert_eq!(
        names(&slots),
        [
            "Top_Shelf_TopShelfWide_2320x720.png",
            "Top_Shelf_TopShelfWide_4640x1440.png"
        ]
    );
    assert_eq!(slots[0].alpha, AlphaMode::Drop);

    let slots = SlotFamily::by_id("launch_image").unwrap().slots().unwrap();
    assert_eq!(names(&slots), ["LaunchImage.png"]);
}

#[test]
fn family_ids_are_unique() {
    let mut ids: Vec<_> = SOURCE_FAMILIES.iter().map(|f| f.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), SOURCE_FAMILIES.len());
}

#[test]
fn catalog_subpaths_follow_brand_asset_layout() {
    let slot = &SlotFamily::by_id("icon_large_back").unwrap().slots().unwrap()[0];
    assert_eq!(
        slot.catalog_subpath,
        "App Icon - Large.imagestack/Back.imagestacklayer/Content.imageset"
    );
    assert_eq!(
        FamilyKind::TopShelfWide.catalog_subpath(),
        "Top Shelf Image Wide.imageset"
    );
}

#[test]
fn procedural_icon_targets_export_three_layers_per_scale() {
    let small = &PROCEDURAL_TARGETS[0];
    assert_eq!(
        names(&small.slots_at(1).unwrap()),
        ["Small_0_Back.png", "Small_1_Text.png", "Small_2_Logo.png"]
    );
    let at2 = small.slots_at(2).unwrap();
    assert_eq!(
        names(&at2),
        ["Small_0_Back@2x.png", "Small_1_Text@2x.png", "Small_2_Logo@2x.png"]
    );
    assert!(at2.iter().all(|s| s.size == Size::new(800, 480).unwrap()));
    assert_eq!(
        at2[1].catalog_subpath,
        "App Icon - Small.imagestack/Middle.imagestacklayer/Content.imageset"
    );
}

#[test]
fn procedural_banners_are_single_scale_and_flattened() {
    let flat: Vec<_> = PROCEDURAL_TARGETS[2..]
        .iter()
        .flat_map(|t| {
            assert_eq!(t.scales, &[1]);
            t.slots_at(1).unwrap()
        })
        .collect();
    assert_eq!(names(&flat), ["TopShelf.png", "TopShelfWide.png", "LaunchImage.png"]);
    assert!(flat.iter().all(|s| s.alpha == AlphaMode::Drop));
    assert_eq!(flat[2].size, Size::new(1920, 1080).unwrap());
}
