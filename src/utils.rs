/// sRGB transfer function.
///
/// Both directions mirror around zero, so extended-range values below 0.0
/// and above 1.0 survive a round trip instead of being clipped.
pub trait Transfer {
    fn decode_srgb(self) -> Self;
    fn encode_srgb(self) -> Self;
}

impl Transfer for f32 {
    fn decode_srgb(self) -> Self {
        let a = self.abs();
        let v = if a <= 0.04045 {
            a / 12.92
        } else {
            ((a + 0.055) / 1.055).powf(2.4)
        };
        v.copysign(self)
    }
    fn encode_srgb(self) -> Self {
        let a = self.abs();
        let v = if a <= 0.003_130_8 {
            a * 12.92
        } else {
            1.055 * a.powf(1.0 / 2.4) - 0.055
        };
        v.copysign(self)
    }
}

impl Transfer for glam::Vec3 {
    fn decode_srgb(self) -> Self {
        glam::Vec3::new(self.x.decode_srgb(), self.y.decode_srgb(), self.z.decode_srgb())
    }
    fn encode_srgb(self) -> Self {
        glam::Vec3::new(self.x.encode_srgb(), self.y.encode_srgb(), self.z.encode_srgb())
    }
}

// alpha is linear coverage and passes through untouched
impl Transfer for glam::Vec4 {
    fn decode_srgb(self) -> Self {
        self.truncate().decode_srgb().extend(self.w)
    }
    fn encode_srgb(self) -> Self {
        self.truncate().encode_srgb().extend(self.w)
    }
}
