use std::sync::Arc;

use glam::{UVec2, Vec2, Vec4};
use image::RgbaImage;

/// Everything a fragment can see about the pixel it is shading.
pub struct Context<'a, U> {
    pub(crate) app: &'a crate::App<U>,
    pub(crate) image: &'a RgbaImage,
    pub(crate) fragcoord: UVec2,
    pub(crate) fragcolor: Vec4,
}

pub trait FromContext<'a, U> {
    fn from_context(ctx: &'a Context<'a, U>) -> Self;
}

pub struct Fragcoord(pub UVec2);

impl<'a, U> FromContext<'a, U> for Fragcoord {
    fn from_context(ctx: &'a Context<'a, U>) -> Self {
        Fragcoord(ctx.fragcoord)
    }
}

pub struct Resolution(pub Vec2);

impl<'a, U> FromContext<'a, U> for Resolution {
    fn from_context(ctx: &'a Context<'a, U>) -> Self {
        let (w, h) = ctx.image.dimensions();
        Resolution(Vec2::new(w as f32, h as f32))
    }
}

pub struct Uv(pub Vec2);

impl<'a, U> FromContext<'a, U> for Uv {
    fn from_context(ctx: &'a Context<'a, U>) -> Self {
        let Resolution(res) = Resolution::from_context(ctx);
        Uv(ctx.fragcoord.as_vec2() / res)
    }
}

/// Shared, read-only uniforms of the running [`App`](crate::App).
pub struct Uniforms<U>(pub Arc<U>);

impl<'a, U> FromContext<'a, U> for Uniforms<U> {
    fn from_context(ctx: &'a Context<'a, U>) -> Self {
        Uniforms(Arc::clone(&ctx.app.uniforms))
    }
}

/// The source pixel, normalized to `[0, 1]`.
pub struct FragColor(pub Vec4);

impl<'a, U> FromContext<'a, U> for FragColor {
    fn from_context(ctx: &'a Context<'a, U>) -> Self {
        FragColor(ctx.fragcolor)
    }
}

pub trait Handler<T, U> {
    fn handle(&self, ctx: &Context<'_, U>) -> Vec4;
}

macro_rules! impl_handler {
    ($($name:ident),*) => {
        impl<$($name,)* U, F> Handler<($($name,)*), U> for F
        where
            F: Fn($($name),*) -> Vec4,
            $($name: for<'a> FromContext<'a, U>,)*
        {
            fn handle(&self, ctx: &Context<'_, U>) -> Vec4 {
                self($($name::from_context(ctx),)*)
            }
        }
    };
}

impl_handler!(T1);
impl_handler!(T1, T2);
impl_handler!(T1, T2, T3);
impl_handler!(T1, T2, T3, T4);
impl_handler!(T1, T2, T3, T4, T5);
impl_handler!(T1, T2, T3, T4, T5, T6);
impl_handler!(T1, T2, T3, T4, T5, T6, T7);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9);
