use std::str::FromStr;

use glam::{Vec3, Vec4};

use crate::{colorspace::ColorSpaceDescriptor, error::CubeError};

/// The solid color a cube collapses every input to.
///
/// Components are nominally in `[0.0, 1.0]` but are never clamped, so wide
/// gamut and extended range colors pass through as given.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl TargetColor {
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        TargetColor {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub const fn opaque(red: f32, green: f32, blue: f32) -> Self {
        TargetColor::new(red, green, blue, 1.0)
    }

    pub fn from_rgba8([r, g, b, a]: [u8; 4]) -> Self {
        TargetColor::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    pub fn rgb(self) -> Vec3 {
        Vec3::new(self.red, self.green, self.blue)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// Re-express this color from `from` in `to`, keeping alpha.
    pub fn converted(self, from: &ColorSpaceDescriptor, to: &ColorSpaceDescriptor) -> Self {
        from.convert(self.rgb(), to).extend(self.alpha).into()
    }
}

impl From<Vec4> for TargetColor {
    fn from(v: Vec4) -> Self {
        TargetColor::new(v.x, v.y, v.z, v.w)
    }
}

impl From<TargetColor> for Vec4 {
    fn from(c: TargetColor) -> Self {
        Vec4::from_array(c.to_array())
    }
}

impl From<[f32; 4]> for TargetColor {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        TargetColor::new(r, g, b, a)
    }
}

/// Parses `#rrggbb` or `#rrggbbaa`; the leading `#` is optional.
impl FromStr for TargetColor {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CubeError::InvalidColor(s.to_owned());
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !matches!(hex.len(), 6 | 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let mut rgba = [u8::MAX; 4];
        for (slot, i) in rgba.iter_mut().zip((0..hex.len()).step_by(2)) {
            *slot = u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid())?;
        }
        Ok(TargetColor::from_rgba8(rgba))
    }
}
