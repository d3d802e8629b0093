//! Applying a color cube to a rendered image.
//!
//! Source pixels are read as values in the table's color space; no
//! conversion happens between the image and the cube.

use glam::Vec4;
use image::{DynamicImage, RgbaImage};

use crate::{
    color::TargetColor,
    colorspace::ColorSpaceProvider,
    cube::{ColorCubeBuilder, ColorCubeTable},
    error::{CubeError, FilterError},
    extract::{FragColor, Uniforms},
    App, Image,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    Nearest,
    #[default]
    Trilinear,
}

/// How the table's alpha combines with the source pixel's alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlphaMode {
    /// The table alpha is the output alpha.
    #[default]
    Replace,
    /// The table alpha is scaled by the source alpha, keeping the shape of
    /// whatever was drawn.
    PreserveCoverage,
}

#[derive(Debug, Clone)]
pub struct ColorCubeFilter {
    table: ColorCubeTable,
    interpolation: Interpolation,
    alpha: AlphaMode,
}

impl ColorCubeFilter {
    pub fn new(table: ColorCubeTable) -> Self {
        ColorCubeFilter {
            table,
            interpolation: Interpolation::default(),
            alpha: AlphaMode::default(),
        }
    }

    /// A filter recoloring everything to `target`, using a default cube.
    pub fn solid(target: TargetColor) -> Result<Self, CubeError> {
        Ok(ColorCubeFilter::new(ColorCubeBuilder::new().build(target)?))
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_alpha_mode(mut self, alpha: AlphaMode) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn table(&self) -> &ColorCubeTable {
        &self.table
    }

    pub fn apply(&self, color: Vec4) -> Vec4 {
        let rgb = color.truncate();
        let out = match self.interpolation {
            Interpolation::Nearest => self.table.lookup_nearest(rgb),
            Interpolation::Trilinear => self.table.lookup_trilinear(rgb),
        };
        match self.alpha {
            AlphaMode::Replace => out,
            AlphaMode::PreserveCoverage => out.truncate().extend(out.w * color.w),
        }
    }
}

/// Fragment running the [`ColorCubeFilter`] held in the app's uniforms.
pub fn color_cube(
    FragColor(color): FragColor,
    Uniforms(filter): Uniforms<ColorCubeFilter>,
) -> Vec4 {
    filter.apply(color)
}

/// Recolors `image` to `target` with a default cube.
pub fn recolor(image: impl Into<Image>, target: TargetColor) -> Result<RgbaImage, FilterError> {
    let filter = ColorCubeFilter::solid(target)?;
    App::new(filter)?.render(image, color_cube)
}

/// Like [`recolor`], but runs on the thread pool of an existing `app`.
pub fn recolor_with<T>(
    app: &App<T>,
    image: impl Into<Image>,
    target: TargetColor,
) -> Result<RgbaImage, FilterError>
where
    T: Send + Sync,
{
    let filter = ColorCubeFilter::solid(target)?;
    app.with_uniforms(filter).render(image, color_cube)
}

/// Recolors `image` to `target`, or hands it back unfiltered when the cube
/// cannot be built or applied on this host.
pub fn recolor_or_passthrough<P>(
    image: &DynamicImage,
    target: TargetColor,
    builder: &ColorCubeBuilder<P>,
) -> RgbaImage
where
    P: ColorSpaceProvider,
{
    let filtered = builder
        .build(target)
        .map_err(FilterError::from)
        .and_then(|table| App::new(ColorCubeFilter::new(table)))
        .and_then(|app| app.render(image.clone(), color_cube));
    match filtered {
        Ok(out) => out,
        Err(err) => {
            tracing::warn!(%err, "color cube unavailable, leaving image unfiltered");
            image.to_rgba8()
        }
    }
}
