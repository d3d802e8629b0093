use cubetint::{filter::color_cube, prelude::*};

use rayon::iter::{IntoParallelIterator, ParallelIterator};

// Draws a plain gray progress indicator, then tints a copy of it for each
// system color. Every recolor builds its own cube, so they run in parallel,
// all sharing the one thread pool of the app that drew the track.

const PALETTE: [(&str, [u8; 4]); 9] = [
    ("gray", [142, 142, 147, 255]),
    ("red", [255, 59, 48, 255]),
    ("orange", [255, 149, 0, 255]),
    ("yellow", [255, 204, 0, 255]),
    ("green", [40, 205, 65, 255]),
    ("blue", [0, 122, 255, 255]),
    ("indigo", [88, 86, 214, 255]),
    ("purple", [175, 82, 222, 255]),
    ("pink", [255, 45, 85, 255]),
];

struct Progress {
    value: f32,
}

fn indicator(Uv(uv): Uv, Resolution(res): Resolution, Uniforms(p): Uniforms<Progress>) -> Vec4 {
    // rounded track, half a bar height of radius at each end
    let radius = 0.5 * res.y;
    let px = uv * res;
    let cx = px.x.clamp(radius, res.x - radius);
    let dist = Vec2::new(px.x - cx, px.y - radius).length();
    let coverage = (radius - dist).clamp(0.0, 1.0);
    let fill = if uv.x <= p.value { 1.0 } else { 0.25 };
    Vec4::new(0.5, 0.5, 0.5, coverage * fill)
}

fn main() {
    tracing_subscriber::fmt::init();
    let out_dir = std::env::temp_dir().join("cubetint");
    std::fs::create_dir_all(&out_dir).expect("failed to create output directory");

    let app = App::new(Progress { value: 0.6 }).expect("failed to start app");
    let track = app
        .render(image::RgbaImage::new(320, 12), indicator)
        .expect("failed to draw indicator");

    PALETTE
        .into_par_iter()
        .map(|(name, rgba)| {
            let table = ColorCubeBuilder::new()
                .dimension(32)
                .build_converted(TargetColor::from_rgba8(rgba), ColorSpace::Srgb)?;
            let filter = ColorCubeFilter::new(table).with_alpha_mode(AlphaMode::PreserveCoverage);
            let file = std::fs::File::create(out_dir.join(format!("progress_{name}.png")))?;
            app.with_uniforms(filter).run(track.clone(), color_cube, file)
        })
        .collect::<Result<Vec<_>, FilterError>>()
        .expect("failed to recolor indicator");
    println!("wrote {} indicators to {}", PALETTE.len(), out_dir.display());
}
