use std::collections::HashSet;

use cubetint::{
    cube::{self, offset, MAX_DIMENSION},
    ColorCubeBuilder, ColorSpace, CubeError, TargetColor,
};

fn assert_constant(data: &[f32], color: TargetColor) {
    for (i, cell) in data.chunks_exact(4).enumerate() {
        assert_eq!(cell, color.to_array(), "cell {i}");
    }
}

#[test]
fn every_cell_holds_the_target() {
    let colors = [
        TargetColor::opaque(0.0, 0.0, 0.0),
        TargetColor::new(1.0, 1.0, 1.0, 0.0),
        TargetColor::new(0.11, 0.52, 0.93, 0.4),
    ];
    for color in colors {
        for n in [1, 3, 8, 17] {
            let table = cube::build(color, n).unwrap();
            assert_constant(table.data(), color);
            for (r, g, b) in [(0, 0, 0), (n as usize - 1, 0, 0), (1 % n as usize, n as usize - 1, 0)] {
                assert_eq!(table.cell(r, g, b).unwrap().to_array(), color.to_array());
            }
        }
    }
}

#[test]
fn length_is_four_n_cubed() {
    for n in [1usize, 2, 5, 16, 64] {
        let table = cube::build(TargetColor::default(), n).unwrap();
        assert_eq!(table.data().len(), 4 * n * n * n);
        assert_eq!(table.dimension(), n);
    }
}

#[test]
fn offsets_are_unique_and_in_range() {
    let n = 7;
    let mut seen = HashSet::new();
    for b in 0..n {
        for g in 0..n {
            for r in 0..n {
                let o = offset(n, r, g, b);
                assert_eq!(o, 4 * (b * n * n + g * n + r));
                assert!(o < 4 * n * n * n);
                assert_eq!(o % 4, 0);
                assert!(seen.insert(o), "collision at ({r}, {g}, {b})");
            }
        }
    }
    assert_eq!(seen.len(), n * n * n);
}

#[test]
fn builds_are_bit_identical() {
    let color = TargetColor::new(0.3, 0.6, 0.9, 0.75);
    let a = cube::build(color, 12).unwrap();
    let b = cube::build(color, 12).unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());
    assert_eq!(a, b);
}

#[test]
fn dimension_one() {
    let color = TargetColor::new(0.25, 0.5, 0.75, 1.0);
    let table = cube::build(color, 1).unwrap();
    assert_eq!(table.data(), &[0.25f32, 0.5, 0.75, 1.0][..]);
}

#[test]
fn non_positive_dimensions_are_rejected() {
    for n in [0i64, -1, -64, i64::MIN] {
        assert_eq!(
            cube::build(TargetColor::default(), n).unwrap_err(),
            CubeError::InvalidDimension {
                requested: n,
                max: MAX_DIMENSION
            }
        );
    }
}

#[test]
fn oversized_dimensions_are_rejected() {
    let err = cube::build(TargetColor::default(), MAX_DIMENSION + 1).unwrap_err();
    assert!(matches!(err, CubeError::InvalidDimension { requested: 257, .. }));
    assert!(cube::build(TargetColor::default(), usize::MAX).is_err());
}

#[test]
fn red_two_by_two() {
    let red = TargetColor::new(1.0, 0.0, 0.0, 1.0);
    let table = cube::build(red, 2).unwrap();
    assert_eq!(table.data().len(), 32);
    for cell in table.data().chunks_exact(4) {
        assert_eq!(cell, [1.0f32, 0.0, 0.0, 1.0]);
    }
    assert_eq!(offset(2, 0, 0, 0), 0);
    assert_eq!(offset(2, 1, 0, 0), 4);
    assert_eq!(offset(2, 0, 1, 0), 8);
    assert_eq!(offset(2, 1, 1, 1), 28);
}

#[test]
fn out_of_range_components_pass_through() {
    let color = TargetColor::new(1.2, -0.1, 0.5, 1.0);
    let table = cube::build(color, 4).unwrap();
    assert_eq!(table.data().len(), 256);
    for cell in table.data().chunks_exact(4) {
        assert_eq!(cell, [1.2f32, -0.1, 0.5, 1.0]);
    }
}

#[test]
fn tags_the_requested_color_space() {
    let table = ColorCubeBuilder::new()
        .dimension(2)
        .build(TargetColor::default())
        .unwrap();
    assert_eq!(table.color_space(), ColorSpace::DisplayP3);

    let table = ColorCubeBuilder::new()
        .dimension(2)
        .color_space(ColorSpace::LinearSrgb)
        .build(TargetColor::default())
        .unwrap();
    assert_eq!(table.color_space(), ColorSpace::LinearSrgb);
}

#[test]
fn unavailable_color_space_is_recoverable() {
    let builder = ColorCubeBuilder::new()
        .dimension(2)
        .provider(|_: ColorSpace| -> Option<cubetint::ColorSpaceDescriptor> { None });
    let color = TargetColor::opaque(1.0, 0.0, 0.0);
    let first = builder.build(color).unwrap_err();
    assert_eq!(first, CubeError::UnsupportedColorSpace(ColorSpace::DisplayP3));
    assert_eq!(builder.build(color).unwrap_err(), first);
}

#[test]
fn concurrent_builds_are_independent() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let color = TargetColor::opaque(i as f32 / 8.0, 0.5, 1.0);
                (color, cube::build(color, 9).unwrap())
            })
        })
        .collect();
    for handle in handles {
        let (color, table) = handle.join().unwrap();
        assert_constant(table.data(), color);
    }
}
