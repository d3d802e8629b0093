//! Dense 3D color lookup tables ("color cubes").
//!
//! A cube of dimension `N` stores `N³` RGBA cells as a flat `f32` buffer.
//! Cell `(r, g, b)` sits at offset `4 * (b*N*N + g*N + r)`: red varies
//! fastest and blue slowest, the layout color-cube filter engines expect.

use glam::{Vec3, Vec4};

use crate::{
    color::TargetColor,
    colorspace::{BuiltinColorSpaces, ColorSpace, ColorSpaceProvider},
    error::CubeError,
};

pub const DEFAULT_DIMENSION: usize = 64;
/// 256³ cells is already a 256 MiB table.
pub const MAX_DIMENSION: usize = 256;
pub const CHANNELS: usize = 4;

/// Flat offset of cell `(r, g, b)` in a cube of the given dimension.
#[inline]
pub fn offset(dimension: usize, r: usize, g: usize, b: usize) -> usize {
    CHANNELS * (b * dimension * dimension + g * dimension + r)
}

/// Number of steps per channel, checked to lie in `1..=MAX_DIMENSION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dimension(usize);

impl Dimension {
    pub const DEFAULT: Dimension = Dimension(DEFAULT_DIMENSION);

    pub fn new(n: usize) -> Result<Self, CubeError> {
        if n == 0 || n > MAX_DIMENSION {
            return Err(CubeError::InvalidDimension {
                requested: i64::try_from(n).unwrap_or(i64::MAX),
                max: MAX_DIMENSION,
            });
        }
        Ok(Dimension(n))
    }

    pub fn get(self) -> usize {
        self.0
    }

    pub fn cells(self) -> usize {
        self.0 * self.0 * self.0
    }

    /// Number of `f32` values in a table of this dimension.
    pub fn values(self) -> usize {
        self.cells() * CHANNELS
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Dimension::DEFAULT
    }
}

macro_rules! impl_dimension_try_from {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<$ty> for Dimension {
                type Error = CubeError;

                fn try_from(n: $ty) -> Result<Self, Self::Error> {
                    let invalid = CubeError::InvalidDimension {
                        requested: i64::try_from(n).unwrap_or(i64::MAX),
                        max: MAX_DIMENSION,
                    };
                    usize::try_from(n)
                        .ok()
                        .and_then(|n| Dimension::new(n).ok())
                        .ok_or(invalid)
                }
            }
        )*
    };
}

impl_dimension_try_from!(i32, i64, u32, usize);

#[derive(Debug, Clone, PartialEq)]
pub struct ColorCubeTable {
    dimension: Dimension,
    data: Vec<f32>,
    color_space: ColorSpace,
}

impl ColorCubeTable {
    /// Evaluates `f` once per cell, passing the cell's normalized `(r, g, b)`
    /// coordinate in `[0, 1]`.
    pub fn from_fn<F>(dimension: Dimension, color_space: ColorSpace, mut f: F) -> Self
    where
        F: FnMut(Vec3) -> Vec4,
    {
        let n = dimension.get();
        let step = if n > 1 { 1.0 / (n - 1) as f32 } else { 0.0 };
        let mut data = vec![0.0f32; dimension.values()];
        for b in 0..n {
            for g in 0..n {
                for r in 0..n {
                    let i = offset(n, r, g, b);
                    let coord = Vec3::new(r as f32, g as f32, b as f32) * step;
                    data[i..i + CHANNELS].copy_from_slice(&f(coord).to_array());
                }
            }
        }
        ColorCubeTable {
            dimension,
            data,
            color_space,
        }
    }

    /// A cube mapping every input color to `target`.
    pub fn solid(target: TargetColor, dimension: Dimension, color_space: ColorSpace) -> Self {
        let value = Vec4::from(target);
        ColorCubeTable::from_fn(dimension, color_space, |_| value)
    }

    /// Wraps an existing buffer laid out in cube order.
    pub fn from_data(
        dimension: Dimension,
        data: Vec<f32>,
        color_space: ColorSpace,
    ) -> Result<Self, CubeError> {
        if data.len() != dimension.values() {
            return Err(CubeError::DataLength {
                expected: dimension.values(),
                actual: data.len(),
            });
        }
        Ok(ColorCubeTable {
            dimension,
            data,
            color_space,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension.get()
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// The table as raw native-endian `f32` bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    pub fn cell(&self, r: usize, g: usize, b: usize) -> Option<Vec4> {
        let n = self.dimension();
        if r >= n || g >= n || b >= n {
            return None;
        }
        Some(self.cell_unchecked(r, g, b))
    }

    #[inline]
    fn cell_unchecked(&self, r: usize, g: usize, b: usize) -> Vec4 {
        let i = offset(self.dimension(), r, g, b);
        Vec4::from_slice(&self.data[i..i + CHANNELS])
    }

    fn grid_position(&self, rgb: Vec3) -> Vec3 {
        let max = (self.dimension() - 1) as f32;
        let rgb = Vec3::select(rgb.is_nan_mask(), Vec3::ZERO, rgb);
        rgb.clamp(Vec3::ZERO, Vec3::ONE) * max
    }

    /// Value of the cell closest to `rgb`.
    pub fn lookup_nearest(&self, rgb: Vec3) -> Vec4 {
        let p = self.grid_position(rgb).round();
        self.cell_unchecked(p.x as usize, p.y as usize, p.z as usize)
    }

    /// Trilinear blend of the eight cells surrounding `rgb`.
    pub fn lookup_trilinear(&self, rgb: Vec3) -> Vec4 {
        let last = self.dimension() - 1;
        let p = self.grid_position(rgb);
        let lo = p.floor();
        let t = p - lo;
        let (r0, g0, b0) = (lo.x as usize, lo.y as usize, lo.z as usize);
        let (r1, g1, b1) = ((r0 + 1).min(last), (g0 + 1).min(last), (b0 + 1).min(last));

        let c = |r, g, b| self.cell_unchecked(r, g, b);
        let c00 = mix(c(r0, g0, b0), c(r1, g0, b0), t.x);
        let c10 = mix(c(r0, g1, b0), c(r1, g1, b0), t.x);
        let c01 = mix(c(r0, g0, b1), c(r1, g0, b1), t.x);
        let c11 = mix(c(r0, g1, b1), c(r1, g1, b1), t.x);
        mix(mix(c00, c10, t.y), mix(c01, c11, t.y), t.z)
    }
}

// Exact when both ends are equal, which keeps solid cubes solid.
#[inline]
fn mix(a: Vec4, b: Vec4, t: f32) -> Vec4 {
    a + (b - a) * t
}

/// Builds solid color cubes.
///
/// ```
/// use cubetint::{ColorCubeBuilder, ColorSpace, TargetColor};
///
/// let table = ColorCubeBuilder::new()
///     .dimension(16)
///     .color_space(ColorSpace::Srgb)
///     .build(TargetColor::opaque(1.0, 0.5, 0.0))
///     .unwrap();
/// assert_eq!(table.data().len(), 4 * 16 * 16 * 16);
/// ```
#[derive(Debug, Clone)]
pub struct ColorCubeBuilder<P = BuiltinColorSpaces> {
    dimension: Result<Dimension, CubeError>,
    color_space: ColorSpace,
    provider: P,
}

impl ColorCubeBuilder {
    pub fn new() -> Self {
        ColorCubeBuilder {
            dimension: Ok(Dimension::DEFAULT),
            color_space: ColorSpace::default(),
            provider: BuiltinColorSpaces,
        }
    }
}

impl Default for ColorCubeBuilder {
    fn default() -> Self {
        ColorCubeBuilder::new()
    }
}

impl<P> ColorCubeBuilder<P>
where
    P: ColorSpaceProvider,
{
    /// Invalid values are reported by [`build`](Self::build).
    pub fn dimension<D>(mut self, dimension: D) -> Self
    where
        D: TryInto<Dimension, Error = CubeError>,
    {
        self.dimension = dimension.try_into();
        self
    }

    pub fn color_space(mut self, color_space: ColorSpace) -> Self {
        self.color_space = color_space;
        self
    }

    /// Replaces the capability query used to resolve color spaces.
    pub fn provider<Q>(self, provider: Q) -> ColorCubeBuilder<Q>
    where
        Q: ColorSpaceProvider,
    {
        ColorCubeBuilder {
            dimension: self.dimension,
            color_space: self.color_space,
            provider,
        }
    }

    pub fn build(&self, target: TargetColor) -> Result<ColorCubeTable, CubeError> {
        let dimension = self.dimension.clone()?;
        let descriptor = self
            .provider
            .descriptor(self.color_space)
            .ok_or(CubeError::UnsupportedColorSpace(self.color_space))?;
        tracing::debug!(
            dimension = dimension.get(),
            color_space = %descriptor.space(),
            ?target,
            "building solid color cube"
        );
        Ok(ColorCubeTable::solid(target, dimension, descriptor.space()))
    }

    /// Like [`build`](Self::build), but first converts `target` from `from`
    /// into the cube's color space.
    pub fn build_converted(
        &self,
        target: TargetColor,
        from: ColorSpace,
    ) -> Result<ColorCubeTable, CubeError> {
        let dimension = self.dimension.clone()?;
        let source = self
            .provider
            .descriptor(from)
            .ok_or(CubeError::UnsupportedColorSpace(from))?;
        let descriptor = self
            .provider
            .descriptor(self.color_space)
            .ok_or(CubeError::UnsupportedColorSpace(self.color_space))?;
        let target = target.converted(&source, &descriptor);
        tracing::debug!(
            dimension = dimension.get(),
            from = %from,
            color_space = %descriptor.space(),
            ?target,
            "building converted solid color cube"
        );
        Ok(ColorCubeTable::solid(target, dimension, descriptor.space()))
    }
}

/// Builds a Display P3 solid cube of the given dimension.
pub fn build<D>(target: TargetColor, dimension: D) -> Result<ColorCubeTable, CubeError>
where
    D: TryInto<Dimension, Error = CubeError>,
{
    ColorCubeBuilder::new().dimension(dimension).build(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colorspace::ColorSpaceDescriptor;

    #[test]
    fn dimension_bounds() {
        assert!(Dimension::new(1).is_ok());
        assert!(Dimension::new(MAX_DIMENSION).is_ok());
        assert_eq!(
            Dimension::try_from(0i32),
            Err(CubeError::InvalidDimension {
                requested: 0,
                max: MAX_DIMENSION
            })
        );
        assert_eq!(
            Dimension::try_from(-3i64),
            Err(CubeError::InvalidDimension {
                requested: -3,
                max: MAX_DIMENSION
            })
        );
        assert_eq!(
            Dimension::try_from(257u32),
            Err(CubeError::InvalidDimension {
                requested: 257,
                max: MAX_DIMENSION
            })
        );
        assert_eq!(Dimension::try_from(64usize).map(Dimension::values), Ok(4 * 64 * 64 * 64));
        assert_eq!(Dimension::default().get(), DEFAULT_DIMENSION);
        let one = Dimension::new(1).unwrap();
        assert_eq!((one.cells(), one.values()), (1, 4));
    }

    #[test]
    fn default_build() {
        let table = ColorCubeBuilder::new()
            .build(TargetColor::opaque(0.0, 0.0, 1.0))
            .unwrap();
        assert_eq!(table.dimension(), 64);
        assert_eq!(table.data().len(), 1_048_576);
        assert_eq!(table.color_space(), ColorSpace::DisplayP3);
    }

    #[test]
    fn invalid_dimension_wins_over_missing_color_space() {
        let err = ColorCubeBuilder::new()
            .provider(|_: ColorSpace| -> Option<ColorSpaceDescriptor> { None })
            .dimension(0)
            .build(TargetColor::default())
            .unwrap_err();
        assert!(matches!(err, CubeError::InvalidDimension { .. }));
    }

    #[test]
    fn missing_color_space() {
        let err = ColorCubeBuilder::new()
            .provider(|_: ColorSpace| -> Option<ColorSpaceDescriptor> { None })
            .dimension(4)
            .build(TargetColor::default())
            .unwrap_err();
        assert_eq!(err, CubeError::UnsupportedColorSpace(ColorSpace::DisplayP3));
    }

    #[test]
    fn converted_requires_both_spaces() {
        let only_p3 = |space: ColorSpace| {
            (space == ColorSpace::DisplayP3).then(|| ColorSpaceDescriptor::builtin(space))
        };
        let builder = ColorCubeBuilder::new().dimension(2).provider(only_p3);
        assert_eq!(
            builder.build_converted(TargetColor::opaque(1.0, 0.0, 0.0), ColorSpace::Srgb),
            Err(CubeError::UnsupportedColorSpace(ColorSpace::Srgb))
        );
        assert!(builder
            .build_converted(TargetColor::opaque(1.0, 0.0, 0.0), ColorSpace::DisplayP3)
            .is_ok());
    }

    #[test]
    fn converted_cells_hold_converted_color() {
        let table = ColorCubeBuilder::new()
            .dimension(3)
            .build_converted(TargetColor::new(1.0, 0.0, 0.0, 0.5), ColorSpace::Srgb)
            .unwrap();
        let cell = table.cell(2, 1, 0).unwrap();
        assert!((cell.x - 0.9175).abs() < 1e-3);
        assert!((cell.y - 0.2003).abs() < 1e-3);
        assert_eq!(cell.w, 0.5);
        assert!(table.data().chunks_exact(4).all(|c| c == cell.to_array()));
    }

    #[test]
    fn identity_cube_lookups() {
        let dim = Dimension::new(5).unwrap();
        let table = ColorCubeTable::from_fn(dim, ColorSpace::Srgb, |rgb| rgb.extend(1.0));
        assert_eq!(table.cell(4, 0, 2), Some(Vec4::new(1.0, 0.0, 0.5, 1.0)));
        assert_eq!(table.cell(5, 0, 0), None);

        let rgb = Vec3::new(0.1, 0.6, 0.33);
        let out = table.lookup_trilinear(rgb);
        assert!((out.truncate() - rgb).abs().max_element() < 1e-6, "{out}");
        assert_eq!(table.lookup_nearest(rgb), Vec4::new(0.0, 0.5, 0.25, 1.0));
    }

    #[test]
    fn lookups_clamp_input() {
        let dim = Dimension::new(3).unwrap();
        let table = ColorCubeTable::from_fn(dim, ColorSpace::Srgb, |rgb| rgb.extend(1.0));
        let out = table.lookup_trilinear(Vec3::new(-1.0, 2.0, f32::NAN));
        assert_eq!(out, Vec4::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(table.lookup_nearest(Vec3::splat(7.0)), Vec4::ONE);
    }

    #[test]
    fn from_data_checks_length() {
        let dim = Dimension::new(2).unwrap();
        assert_eq!(
            ColorCubeTable::from_data(dim, vec![0.0; 31], ColorSpace::Srgb),
            Err(CubeError::DataLength {
                expected: 32,
                actual: 31
            })
        );
        let table = ColorCubeTable::from_data(dim, vec![0.25; 32], ColorSpace::Srgb).unwrap();
        assert_eq!(table.lookup_trilinear(Vec3::splat(0.5)), Vec4::splat(0.25));
    }

    #[test]
    fn bytes_match_floats() {
        let table = build(TargetColor::opaque(1.0, 0.0, 0.0), 2).unwrap();
        let bytes = table.as_bytes();
        assert_eq!(bytes.len(), 32 * 4);
        assert_eq!(&bytes[..4], &1.0f32.to_ne_bytes());
        assert_eq!(&bytes[4..8], &0.0f32.to_ne_bytes());
    }
}
