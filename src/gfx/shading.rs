//! The fragment shading model, evaluated on the CPU.
//!
//! This is the reference for what the GPU shader computes per pixel. The frontend's WGSL
//! mirrors these functions line for line, and the tests here pin down the contract.

use crate::{
    gfx::{Sampler, TextureSlot},
    math::{Vector2, Vector3, Vector4},
};

/// Colour used when a draw call asks for a texture slot that does not exist.
pub const ERROR_COLOR: Vector4 = Vector4::new(1.0, 0.2, 0.2, 1.0);

/// Slots 1 and 2 are drawn darkened by this much.
pub const DARKENED_SLOT_TINT: Vector4 = Vector4::new(0.4, 0.4, 0.4, 1.0);

pub const DIFFUSE_WEIGHT: f32 = 0.7;
pub const AMBIENT_WEIGHT: f32 = 0.25;
pub const SPECULAR_WEIGHT: f32 = 0.9;
pub const SPECULAR_EXPONENT: f32 = 20.0;

/// How a draw call picks the base colour fed into lighting.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TextureSelector {
    /// Visualize the surface normal as a colour.
    NormalDebug,
    /// The primitive's own colour.
    SolidColor,
    /// Visualize texture coordinates.
    UvDebug,
    /// Sample a bound texture. Slots outside `0..TextureSlot::COUNT` draw [`ERROR_COLOR`].
    Texture(u32),
}

impl Default for TextureSelector {
    #[inline]
    fn default() -> TextureSelector {
        TextureSelector::SolidColor
    }
}

impl TextureSelector {
    /// The integer encoding shared with the shader: `-3` normal, `-2` solid, `-1` uv,
    /// `0..` texture slots.
    pub fn from_raw(raw: i32) -> TextureSelector {
        match raw {
            -3 => TextureSelector::NormalDebug,
            -2 => TextureSelector::SolidColor,
            -1 => TextureSelector::UvDebug,
            slot if slot >= 0 => TextureSelector::Texture(slot as u32),
            other => {
                log::warn!("Texture selector {} is out of range, drawing the error color", other);
                TextureSelector::Texture(u32::MAX)
            }
        }
    }

    pub fn to_raw(self) -> i32 {
        match self {
            TextureSelector::NormalDebug => -3,
            TextureSelector::SolidColor => -2,
            TextureSelector::UvDebug => -1,
            TextureSelector::Texture(slot) if slot <= i32::MAX as u32 => slot as i32,
            TextureSelector::Texture(_) => i32::MAX,
        }
    }

    /// The texture slot this selector samples, if it names a valid one.
    #[inline]
    pub fn slot(self) -> Option<TextureSlot> {
        match self {
            TextureSelector::Texture(index) => TextureSlot::new(index as usize),
            _ => None,
        }
    }
}

/// The interpolated inputs of one shaded point.
#[derive(Copy, Clone, Debug, Default)]
pub struct Fragment {
    /// Model-space position (`M * p`, before the global rotation).
    pub position: Vector3,
    /// Unit normal after the normal matrix.
    pub normal: Vector3,
    pub uv: Vector2,
}

/// Everything lighting needs that is shared by every draw in a frame.
#[derive(Copy, Clone, Debug)]
pub struct LightUniforms {
    pub position: Vector3,
    pub color: Vector3,
    pub camera_position: Vector3,
    pub light_on: bool,
    /// Already normalized.
    pub spot_direction: Vector3,
    pub spot_cos_cutoff: f32,
    pub spot_exponent: f32,
    pub spotlight_on: bool,
}

impl Default for LightUniforms {
    fn default() -> LightUniforms {
        LightUniforms {
            position: Vector3::new(0.0, 1.0, 1.1),
            color: Vector3::splat(1.0),
            camera_position: Vector3::new(0.0, 0.0, 5.0),
            light_on: true,
            spot_direction: Vector3::down(),
            spot_cos_cutoff: 30f32.to_radians().cos(),
            spot_exponent: 10.0,
            spotlight_on: false,
        }
    }
}

/// Pick the base colour for a fragment according to its selector.
pub fn base_color<S: Sampler + ?Sized>(
    selector: TextureSelector,
    color: Vector4,
    fragment: &Fragment,
    sampler: &S,
) -> Vector4 {
    match selector {
        TextureSelector::NormalDebug => ((fragment.normal + Vector3::splat(1.0)) / 2.0).widened(1.0),
        TextureSelector::SolidColor => color,
        TextureSelector::UvDebug => Vector4::new(fragment.uv.x(), fragment.uv.y(), 1.0, 1.0),
        TextureSelector::Texture(_) => match selector.slot() {
            Some(slot) if slot.is_darkened() => DARKENED_SLOT_TINT * sampler.sample(slot, fragment.uv),
            Some(slot) => sampler.sample(slot, fragment.uv),
            None => ERROR_COLOR,
        },
    }
}

/// Spotlight attenuation at a point: 1 with the spotlight off, 0 outside the cone, and
/// `cos^exponent` inside it (the cone edge itself counts as inside).
pub fn spot_factor(light: &LightUniforms, position: Vector3) -> f32 {
    if !light.spotlight_on {
        return 1.0;
    }
    let to_light = (light.position - position).normalized();
    let spot_cosine = light.spot_direction.dot(-to_light);
    if spot_cosine >= light.spot_cos_cutoff {
        spot_cosine.powf(light.spot_exponent)
    } else {
        0.0
    }
}

/// The specular term before light colour and spotlight.
pub fn specular(light: &LightUniforms, fragment: &Fragment) -> f32 {
    let to_light = (light.position - fragment.position).normalized();
    let normal = fragment.normal.normalized();
    let reflected = (-to_light).reflect(normal);
    let to_eye = (light.camera_position - fragment.position).normalized();
    reflected.dot(to_eye).max(0.0).powf(SPECULAR_EXPONENT) * SPECULAR_WEIGHT
}

/// Phong lighting with an optional spotlight.
///
/// With the light "off" there is no specular and no spotlight, but the diffuse term is still
/// computed from the light position.
pub fn shade(light: &LightUniforms, base: Vector4, fragment: &Fragment) -> Vector4 {
    let base = base.narrowed();
    let to_light = (light.position - fragment.position).normalized();
    let normal = fragment.normal.normalized();
    let n_dot_l = normal.dot(to_light).max(0.0);

    let diffuse = base * light.color * (n_dot_l * DIFFUSE_WEIGHT);
    let ambient = base * AMBIENT_WEIGHT;

    let rgb = if light.light_on {
        let spot = spot_factor(light, fragment.position);
        light.color * (specular(light, fragment) * spot) + diffuse * spot + ambient
    } else {
        diffuse + ambient
    };
    rgb.widened(1.0)
}
