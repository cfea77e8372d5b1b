use crate::compose::blend::over_in_place;
use crate::foundation::buffer::PixelBuffer;
use crate::foundation::core::{Rgba8, Size};
use crate::foundation::error::{IconStackError, IconStackResult};

/// Stacking position of a layer inside one asset.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LayerRole {
    /// Background (index 0).
    Back,
    /// Middle layer, text in procedural icons (index 1).
    Middle,
    /// Front layer, gloss in procedural icons (index 2).
    Front,
}

impl LayerRole {
    /// All roles, back to front.
    pub const ALL: [LayerRole; 3] = [LayerRole::Back, LayerRole::Middle, LayerRole::Front];

    /// Stacking index, 0 at the back.
    pub fn index(self) -> u8 {
        match self {
            LayerRole::Back => 0,
            LayerRole::Middle => 1,
            LayerRole::Front => 2,
        }
    }

    /// Title-case name used in slot labels and file names.
    pub fn label(self) -> &'static str {
        match self {
            LayerRole::Back => "Back",
            LayerRole::Middle => "Middle",
            LayerRole::Front => "Front",
        }
    }
}

/// A named buffer with a stacking role and opacity.
#[derive(Clone, Debug)]
pub struct Layer {
    /// Human-readable name (for logs).
    pub name: String,
    /// Stacking position.
    pub role: LayerRole,
    /// Multiplier applied to the layer's own alpha when blended, in `[0, 1]`.
    pub opacity: f32,
    /// Pixels.
    pub buffer: PixelBuffer,
}

impl Layer {
    /// Fully opaque layer.
    pub fn new(name: impl Into<String>, role: LayerRole, buffer: PixelBuffer) -> Self {
        Self {
            name: name.into(),
            role,
            opacity: 1.0,
            buffer,
        }
    }

    /// Same layer with a different opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Layer dimensions.
    pub fn size(&self) -> Size {
        self.buffer.size()
    }
}

/// "Over"-composite `layers` in slice order (first = bottom) into a new buffer.
///
/// Inputs are not modified. Every layer must share the first layer's size.
pub fn composite(layers: &[Layer]) -> IconStackResult<PixelBuffer> {
    let first = layers
        .first()
        .ok_or_else(|| IconStackError::validation("composite needs at least one layer"))?;
    check_same_size(layers)?;

    let mut out = PixelBuffer::new(first.size())?;
    for layer in layers {
        over_in_place(&mut out, &layer.buffer, layer.opacity)?;
    }
    Ok(out)
}

/// [`composite`], then drop transparency: the result sits over opaque black with alpha 255.
pub fn flatten(layers: &[Layer]) -> IconStackResult<PixelBuffer> {
    let composed = composite(layers)?;
    let mut out = PixelBuffer::filled(composed.size(), Rgba8::new(0, 0, 0, 255))?;
    over_in_place(&mut out, &composed, 1.0)?;
    for px in out.data_mut().chunks_exact_mut(4) {
        px[3] = 255;
    }
    Ok(out)
}

fn check_same_size(layers: &[Layer]) -> IconStackResult<()> {
    let Some(first) = layers.first() else {
        return Ok(());
    };
    for layer in &layers[1..] {
        if layer.size() != first.size() {
            return Err(IconStackError::dimension_mismatch(format!(
                "layer '{}' is {} but '{}' is {}",
                layer.name,
                layer.size(),
                first.name,
                first.size()
            )));
        }
    }
    Ok(())
}

/// Back, middle and front layers of one asset.
#[derive(Clone, Debug)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    /// Build a stack; layers are ordered by [`LayerRole::index`] and must share a size.
    pub fn new(mut layers: Vec<Layer>) -> IconStackResult<Self> {
        if layers.is_empty() {
            return Err(IconStackError::validation("layer stack is empty"));
        }
        layers.sort_by_key(|l| l.role.index());
        for pair in layers.windows(2) {
            if pair[0].role == pair[1].role {
                return Err(IconStackError::validation(format!(
                    "duplicate {:?} layer in stack",
                    pair[0].role
                )));
            }
        }
        check_same_size(&layers)?;
        Ok(Self { layers })
    }

    /// Shared layer size.
    pub fn size(&self) -> Size {
        self.layers[0].size()
    }

    /// Layers back to front.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer with `role`, if present.
    pub fn get(&self, role: LayerRole) -> Option<&Layer> {
        self.layers.iter().find(|l| l.role == role)
    }

    /// Composite all layers, keeping transparency.
    pub fn composite(&self) -> IconStackResult<PixelBuffer> {
        composite(&self.layers)
    }

    /// Composite all layers into an opaque buffer.
    pub fn flatten(&self) -> IconStackResult<PixelBuffer> {
        flatten(&self.layers)
    }

    /// Give up ownership of the layers, back to front.
    pub fn into_layers(self) -> Vec<Layer> {
        self.layers
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/layers.rs"]
mod tests;
