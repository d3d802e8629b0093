use cubetint::{filter::color_cube, prelude::*};

// cargo run --example recolor -- <input> <output.png> [#rrggbb[aa]] [dimension]
fn main() {
    tracing_subscriber::fmt::init();
    let mut args = std::env::args().skip(1);
    let input = args.next().expect("missing input image");
    let output = args.next().expect("missing output path");
    let color: TargetColor = args
        .next()
        .as_deref()
        .unwrap_or("#ff3b30")
        .parse()
        .expect("invalid color");
    let dimension: i64 = args
        .next()
        .map(|d| d.parse().expect("invalid dimension"))
        .unwrap_or(64);

    let table = ColorCubeBuilder::new()
        .dimension(dimension)
        .build_converted(color, ColorSpace::Srgb)
        .expect("failed to build color cube");
    let filter = ColorCubeFilter::new(table).with_alpha_mode(AlphaMode::PreserveCoverage);

    let file = std::fs::File::create(&output).expect("failed to create output");
    App::new(filter)
        .expect("failed to start app")
        .run(input.as_str(), color_cube, file)
        .expect("failed to recolor image");
}
