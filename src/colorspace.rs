//! Color space tags and the capability query used to resolve them.
//!
//! A [`ColorSpace`] is only a tag. Building a cube in a given space requires
//! resolving that tag to a [`ColorSpaceDescriptor`] through a
//! [`ColorSpaceProvider`], which may decline: a host that cannot describe the
//! space makes the cube unavailable rather than faulting.

use std::{fmt, str::FromStr};

use glam::{Mat3, Vec3};

use crate::{error::CubeError, utils::Transfer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ColorSpace {
    /// sRGB primaries, sRGB transfer.
    Srgb,
    LinearSrgb,
    /// P3 primaries with a D65 white point and the sRGB transfer.
    #[default]
    DisplayP3,
    LinearDisplayP3,
}

impl ColorSpace {
    pub const ALL: [ColorSpace; 4] = [
        ColorSpace::Srgb,
        ColorSpace::LinearSrgb,
        ColorSpace::DisplayP3,
        ColorSpace::LinearDisplayP3,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorSpace::Srgb => "srgb",
            ColorSpace::LinearSrgb => "linear-srgb",
            ColorSpace::DisplayP3 => "display-p3",
            ColorSpace::LinearDisplayP3 => "linear-display-p3",
        }
    }

    pub fn is_linear(self) -> bool {
        matches!(self, ColorSpace::LinearSrgb | ColorSpace::LinearDisplayP3)
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorSpace {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ColorSpace::ALL
            .into_iter()
            .find(|space| space.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CubeError::UnknownColorSpace(s.to_owned()))
    }
}

// Linear Display P3 <-> linear sRGB, D65 on both sides.
const P3_TO_SRGB: [[f32; 3]; 3] = [
    [1.224_940_1, -0.224_940_4, 0.0],
    [-0.042_056_9, 1.042_057_1, 0.0],
    [-0.019_637_6, -0.078_636_1, 1.098_273_5],
];
const SRGB_TO_P3: [[f32; 3]; 3] = [
    [0.822_462_1, 0.177_538_0, 0.0],
    [0.033_194_1, 0.966_805_8, 0.0],
    [0.017_082_7, 0.072_397_4, 0.910_519_9],
];

fn from_rows(rows: &[[f32; 3]; 3]) -> Mat3 {
    Mat3::from_cols_array_2d(rows).transpose()
}

/// A resolved color space: its encoding and how its linear values relate to
/// linear sRGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSpaceDescriptor {
    space: ColorSpace,
    to_linear_srgb: Mat3,
    from_linear_srgb: Mat3,
}

impl ColorSpaceDescriptor {
    /// The descriptor this crate knows for `space`.
    pub fn builtin(space: ColorSpace) -> Self {
        let (to_linear_srgb, from_linear_srgb) = match space {
            ColorSpace::Srgb | ColorSpace::LinearSrgb => (Mat3::IDENTITY, Mat3::IDENTITY),
            ColorSpace::DisplayP3 | ColorSpace::LinearDisplayP3 => {
                (from_rows(&P3_TO_SRGB), from_rows(&SRGB_TO_P3))
            }
        };
        ColorSpaceDescriptor {
            space,
            to_linear_srgb,
            from_linear_srgb,
        }
    }

    pub fn space(&self) -> ColorSpace {
        self.space
    }

    pub fn to_linear_srgb(&self, rgb: Vec3) -> Vec3 {
        let linear = if self.space.is_linear() {
            rgb
        } else {
            rgb.decode_srgb()
        };
        self.to_linear_srgb * linear
    }

    pub fn from_linear_srgb(&self, rgb: Vec3) -> Vec3 {
        let linear = self.from_linear_srgb * rgb;
        if self.space.is_linear() {
            linear
        } else {
            linear.encode_srgb()
        }
    }

    /// Re-express `rgb` from this space in `target`. Values are not clamped,
    /// so colors outside the target gamut come out below 0.0 or above 1.0.
    pub fn convert(&self, rgb: Vec3, target: &ColorSpaceDescriptor) -> Vec3 {
        if self.space == target.space {
            return rgb;
        }
        target.from_linear_srgb(self.to_linear_srgb(rgb))
    }
}

/// Resolves color space tags into descriptors, or reports them unavailable.
pub trait ColorSpaceProvider {
    fn descriptor(&self, space: ColorSpace) -> Option<ColorSpaceDescriptor>;
}

/// Resolves every [`ColorSpace`] to its builtin descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinColorSpaces;

impl ColorSpaceProvider for BuiltinColorSpaces {
    fn descriptor(&self, space: ColorSpace) -> Option<ColorSpaceDescriptor> {
        Some(ColorSpaceDescriptor::builtin(space))
    }
}

impl<F> ColorSpaceProvider for F
where
    F: Fn(ColorSpace) -> Option<ColorSpaceDescriptor>,
{
    fn descriptor(&self, space: ColorSpace) -> Option<ColorSpaceDescriptor> {
        self(space)
    }
}
