// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw lists the device sends for each callback, observed on the
//! recording canvas.

use imagedev_canvas_ref::{Event, RefCanvas, RefFrame};
use imagedev_device::{
    DeviceConfig, DeviceError, DeviceManager, FontFace, GraphicsContext, GraphicsDevice,
    HostColor, ImageHandle, LineEnd, LineJoinCode, LineType, create_device,
};
use imagedev_drawable::{Drawable, FontStyle, LineCap, LineJoin, PenState};

fn record(
    gc: &GraphicsContext,
    draw: impl FnOnce(&mut dyn GraphicsDevice, &GraphicsContext) -> Result<(), DeviceError>,
) -> Vec<(Drawable, PenState)> {
    let mut host = DeviceManager::new();
    let image: ImageHandle<RefFrame> =
        create_device(&mut host, RefCanvas, &DeviceConfig::default()).unwrap();
    host.with_active(|dev| {
        dev.new_page(gc)?;
        draw(dev, gc)
    })
    .unwrap();
    let sequence = image.lock().unwrap();
    sequence
        .last_frame()
        .unwrap()
        .events()
        .iter()
        .filter_map(|event| match event {
            Event::Geometry { drawable, pen, .. } => Some((drawable.clone(), pen.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn rect_is_flipped_to_upper_left_first() {
    let drawn = record(&GraphicsContext::default(), |dev, gc| {
        dev.rect(0.0, 10.0, 5.0, 0.0, gc)
    });
    assert_eq!(
        drawn[0].0,
        Drawable::Rectangle {
            upper_left_x: 0.0,
            upper_left_y: 0.0,
            lower_right_x: 5.0,
            lower_right_y: 10.0,
        }
    );
}

#[test]
fn circle_uses_a_perimeter_point() {
    let drawn = record(&GraphicsContext::default(), |dev, gc| {
        dev.circle(10.0, 10.0, 3.0, gc)
    });
    assert_eq!(
        drawn[0].0,
        Drawable::Circle {
            origin_x: 10.0,
            origin_y: 10.0,
            perim_x: 10.0,
            perim_y: 13.0,
        }
    );
}

#[test]
fn line_styles_reach_the_pen() {
    let cases = [
        (LineType::SOLID, vec![]),
        (LineType::BLANK, vec![]),
        (LineType::DASHED, vec![6.0, 3.6]),
        (LineType::DOTTED, vec![1.2, 2.4]),
        (LineType::DOTDASH, vec![6.0, 3.6, 2.4, 3.6]),
        (LineType::LONGDASH, vec![9.6, 3.6]),
        (LineType::TWODASH, vec![6.0, 2.4, 6.0, 6.0]),
    ];
    for (lty, dashes) in cases {
        let gc = GraphicsContext {
            lwd: 1.2,
            lty,
            lend: LineEnd::SQUARE,
            ljoin: LineJoinCode::BEVEL,
            lmitre: 4.0,
            ..GraphicsContext::default()
        };
        let drawn = record(&gc, |dev, gc| dev.line(0.0, 0.0, 10.0, 0.0, gc));
        let pen = &drawn[0].1;
        assert_eq!(pen.dash_array.len(), dashes.len(), "{lty:?}");
        for (got, want) in pen.dash_array.iter().zip(&dashes) {
            assert!((got - want).abs() < 1e-9, "{lty:?}: {got} != {want}");
        }
        assert_eq!(pen.stroke_width, 1.2);
        assert_eq!(pen.line_cap, LineCap::Square);
        assert_eq!(pen.line_join, LineJoin::Bevel);
        assert_eq!(pen.miter_limit, 4.0);
    }
}

#[test]
fn faces_select_weight_and_slant() {
    for (face, weight, style) in [
        (FontFace::PLAIN, 400, FontStyle::Normal),
        (FontFace::BOLD, 600, FontStyle::Normal),
        (FontFace::ITALIC, 400, FontStyle::Italic),
        (FontFace::BOLD_ITALIC, 600, FontStyle::Italic),
    ] {
        let gc = GraphicsContext {
            fontface: face,
            ps: 10.0,
            cex: 1.5,
            ..GraphicsContext::default()
        };
        let drawn = record(&gc, |dev, gc| dev.polygon(&[], gc));
        let pen = &drawn[0].1;
        assert_eq!(pen.font.weight, weight, "{face:?}");
        assert_eq!(pen.font.style, style, "{face:?}");
        assert_eq!(pen.point_size, 15.0);
    }
}

#[test]
fn polyline_is_never_filled() {
    let gc = GraphicsContext {
        fill: HostColor::rgb(0, 0, 255),
        ..GraphicsContext::default()
    };
    let drawn = record(&gc, |dev, gc| {
        dev.polyline(&imagedev_drawable::coordinates(&[0.0, 5.0], &[0.0, 5.0]), gc)?;
        dev.polygon(&imagedev_drawable::coordinates(&[0.0, 5.0, 5.0], &[0.0, 0.0, 5.0]), gc)
    });
    assert!(matches!(drawn[0].0, Drawable::Polyline(_)));
    assert_eq!(drawn[0].1.fill, None);
    assert!(drawn[1].1.fill.is_some(), "fill must not leak out of the polyline call");
}

#[test]
fn unavailable_stroke_keeps_the_frame_pen() {
    let gc = GraphicsContext {
        col: HostColor::NA,
        ..GraphicsContext::default()
    };
    let drawn = record(&gc, |dev, gc| dev.line(0.0, 0.0, 1.0, 1.0, gc));
    assert_eq!(drawn[0].1.stroke, None);
}
