//! The fixed output table: which files exist, at which sizes, and where they go in a catalog.

use crate::assets::encode::AlphaMode;
use crate::compose::layers::LayerRole;
use crate::foundation::core::Size;
use crate::foundation::error::IconStackResult;

/// Icon variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IconSize {
    Small,
    Large,
}

impl IconSize {
    pub fn label(self) -> &'static str {
        match self {
            IconSize::Small => "Small",
            IconSize::Large => "Large",
        }
    }

    /// 1× pixel size.
    pub const fn base(self) -> (u32, u32) {
        match self {
            IconSize::Small => (400, 240),
            IconSize::Large => (1280, 768),
        }
    }
}

/// What one family of slots holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FamilyKind {
    IconLayer(IconSize, LayerRole),
    TopShelf,
    TopShelfWide,
    LaunchImage,
}

impl FamilyKind {
    /// Icon layers keep transparency; banners and launch images are opaque.
    pub fn alpha_mode(self) -> AlphaMode {
        match self {
            FamilyKind::IconLayer(..) => AlphaMode::Keep,
            _ => AlphaMode::Drop,
        }
    }

    /// Directory of the matching image set, relative to the catalog root.
    pub fn catalog_subpath(self) -> String {
        match self {
            FamilyKind::IconLayer(size, role) => format!(
                "App Icon - {}.imagestack/{}.imagestacklayer/Content.imageset",
                size.label(),
                role.label()
            ),
            FamilyKind::TopShelf => "Top Shelf Image.imageset".to_owned(),
            FamilyKind::TopShelfWide => "Top Shelf Image Wide.imageset".to_owned(),
            FamilyKind::LaunchImage => "LaunchImage.imageset".to_owned(),
        }
    }
}

/// One logical asset and the scales it is exported at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotFamily {
    /// Stable key used in configuration (`sources`, `only`).
    pub id: &'static str,
    pub kind: FamilyKind,
    /// 1× size in pixels.
    pub base: (u32, u32),
    pub scales: &'static [u32],
}

/// One output file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetSlot {
    /// Id of the family the slot belongs to.
    pub family: &'static str,
    /// Human-readable name, e.g. `Icon Small Back @1x`.
    pub label: String,
    pub size: Size,
    pub scale: u32,
    pub file_name: String,
    pub alpha: AlphaMode,
    pub catalog_subpath: String,
}

const BOTH: &[u32] = &[1, 2];
const SINGLE: &[u32] = &[1];

const fn icon(id: &'static str, size: IconSize, role: LayerRole) -> SlotFamily {
    SlotFamily {
        id,
        kind: FamilyKind::IconLayer(size, role),
        base: size.base(),
        scales: BOTH,
    }
}

/// Families produced from source images, in processing order.
pub const SOURCE_FAMILIES: [SlotFamily; 9] = [
    icon("icon_small_back", IconSize::Small, LayerRole::Back),
    icon("icon_small_middle", IconSize::Small, LayerRole::Middle),
    icon("icon_small_front", IconSize::Small, LayerRole::Front),
    icon("icon_large_back", IconSize::Large, LayerRole::Back),
    icon("icon_large_middle", IconSize::Large, LayerRole::Middle),
    icon("icon_large_front", IconSize::Large, LayerRole::Front),
    SlotFamily {
        id: "top_shelf",
        kind: FamilyKind::TopShelf,
        base: (1920, 720),
        scales: BOTH,
    },
    SlotFamily {
        id: "top_shelf_wide",
        kind: FamilyKind::TopShelfWide,
        base: (2320, 720),
        scales: BOTH,
    },
    SlotFamily {
        id: "launch_image",
        kind: FamilyKind::LaunchImage,
        base: (1920, 1080),
        scales: SINGLE,
    },
];

impl SlotFamily {
    /// Look up a source family by id.
    pub fn by_id(id: &str) -> Option<&'static SlotFamily> {
        SOURCE_FAMILIES.iter().find(|f| f.id == id)
    }

    /// Size at `scale`.
    pub fn size_at(&self, scale: u32) -> IconStackResult<Size> {
        Size::new(self.base.0, self.base.1)?.scaled(scale)
    }

    /// Expand into one slot per scale, with source-mode file names.
    pub fn slots(&self) -> IconStackResult<Vec<AssetSlot>> {
        self.scales
            .iter()
            .map(|&scale| {
                let size = self.size_at(scale)?;
                let (label, file_name) = match self.kind {
                    FamilyKind::IconLayer(icon, role) => (
                        format!("Icon {} {}", icon.label(), role.label()),
                        format!(
                            "Icon_{}_{}{}.png",
                            icon.label(),
                            role.label(),
                            scale_suffix(scale)
                        ),
                    ),
                    FamilyKind::TopShelf => (
                        "Top Shelf".to_owned(),
                        format!("Top_Shelf_TopShelf_{}x{}.png", size.width, size.height),
                    ),
                    FamilyKind::TopShelfWide => (
                        "Top Shelf Wide".to_owned(),
                        format!("Top_Shelf_TopShelfWide_{}x{}.png", size.width, size.height),
                    ),
                    FamilyKind::LaunchImage => {
                        ("Launch Image".to_owned(), "LaunchImage.png".to_owned())
                    }
                };
                Ok(AssetSlot {
                    family: self.id,
                    label: format!("{label} @{scale}x"),
                    size,
                    scale,
                    file_name,
                    alpha: self.kind.alpha_mode(),
                    catalog_subpath: self.kind.catalog_subpath(),
                })
            })
            .collect()
    }
}

/// How a procedural target is exported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProceduralKind {
    /// Every layer is its own file.
    IconLayers(IconSize),
    /// One opaque composite.
    Flattened(FamilyKind),
}

/// One procedurally rendered asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProceduralTarget {
    pub id: &'static str,
    pub kind: ProceduralKind,
    pub base: (u32, u32),
    pub scales: &'static [u32],
}

/// Procedural targets, in processing order. Banners and the launch image are 1× only.
pub const PROCEDURAL_TARGETS: [ProceduralTarget; 5] = [
    ProceduralTarget {
        id: "icon_small",
        kind: ProceduralKind::IconLayers(IconSize::Small),
        base: (400, 240),
        scales: BOTH,
    },
    ProceduralTarget {
        id: "icon_large",
        kind: ProceduralKind::IconLayers(IconSize::Large),
        base: (1280, 768),
        scales: BOTH,
    },
    ProceduralTarget {
        id: "top_shelf",
        kind: ProceduralKind::Flattened(FamilyKind::TopShelf),
        base: (1920, 720),
        scales: SINGLE,
    },
    ProceduralTarget {
        id: "top_shelf_wide",
        kind: ProceduralKind::Flattened(FamilyKind::TopShelfWide),
        base: (2320, 720),
        scales: SINGLE,
    },
    ProceduralTarget {
        id: "launch_image",
        kind: ProceduralKind::Flattened(FamilyKind::LaunchImage),
        base: (1920, 1080),
        scales: SINGLE,
    },
];

impl ProceduralTarget {
    /// Size at `scale`.
    pub fn size_at(&self, scale: u32) -> IconStackResult<Size> {
        Size::new(self.base.0, self.base.1)?.scaled(scale)
    }

    /// Slots written for `scale`: three per icon size (one per layer role, back to front) or one
    /// flattened file.
    pub fn slots_at(&self, scale: u32) -> IconStackResult<Vec<AssetSlot>> {
        let size = self.size_at(scale)?;
        let suffix = scale_suffix(scale);
        Ok(match self.kind {
            ProceduralKind::IconLayers(icon) => LayerRole::ALL
                .iter()
                .map(|&role| AssetSlot {
                    family: self.id,
                    label: format!("{} {} @{scale}x", icon.label(), procedural_layer_name(role)),
                    size,
                    scale,
                    file_name: format!(
                        "{}_{}_{}{suffix}.png",
                        icon.label(),
                        role.index(),
                        procedural_layer_name(role)
                    ),
                    alpha: AlphaMode::Keep,
                    catalog_subpath: FamilyKind::IconLayer(icon, role).catalog_subpath(),
                })
                .collect(),
            ProceduralKind::Flattened(kind) => {
                let stem = match kind {
                    FamilyKind::TopShelf => "TopShelf",
                    FamilyKind::TopShelfWide => "TopShelfWide",
                    _ => "LaunchImage",
                };
                vec![AssetSlot {
                    family: self.id,
                    label: format!("{stem} @{scale}x"),
                    size,
                    scale,
                    file_name: format!("{stem}{suffix}.png"),
                    alpha: AlphaMode::Drop,
                    catalog_subpath: kind.catalog_subpath(),
                }]
            }
        })
    }
}

fn procedural_layer_name(role: LayerRole) -> &'static str {
    match role {
        LayerRole::Back => "Back",
        LayerRole::Middle => "Text",
        LayerRole::Front => "Logo",
    }
}

fn scale_suffix(scale: u32) -> String {
    if scale == 1 {
        String::new()
    } else {
        format!("@{scale}x")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/manifest.rs"]
mod tests;
