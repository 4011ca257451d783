// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end pixel checks of the device drawing with the CPU canvas.

use imagedev_canvas_cpu::{CpuCanvas, CpuFrame, FontBook, output};
use imagedev_device::{
    DeviceConfig, DeviceError, DeviceManager, GraphicsContext, HostColor, ImageHandle,
    create_device,
};
use imagedev_drawable::{Frame, Point};

const WHITE: [u8; 4] = [255, 255, 255, 255];

fn dejavu() -> FontBook {
    let mut book = FontBook::new();
    for data in [
        include_bytes!("../../assets/fonts/dejavu/DejaVuSans.ttf").as_slice(),
        include_bytes!("../../assets/fonts/dejavu/DejaVuSans-Bold.ttf").as_slice(),
        include_bytes!("../../assets/fonts/dejavu/DejaVuSans-Oblique.ttf").as_slice(),
        include_bytes!("../../assets/fonts/dejavu/DejaVuSans-BoldOblique.ttf").as_slice(),
    ] {
        book.add_font(data.to_vec());
    }
    book.with_default_family("DejaVu Sans")
}

fn open(width: u32, height: u32) -> (DeviceManager, ImageHandle<CpuFrame>) {
    let mut host = DeviceManager::new();
    let config = DeviceConfig::default().with_size(width, height);
    let image = create_device(&mut host, CpuCanvas::new(dejavu()), &config).unwrap();
    (host, image)
}

fn page_gc() -> GraphicsContext {
    GraphicsContext {
        fill: HostColor::WHITE,
        ..GraphicsContext::default()
    }
}

fn fill_only(color: HostColor) -> GraphicsContext {
    GraphicsContext {
        col: HostColor::NA,
        fill: color,
        ..GraphicsContext::default()
    }
}

fn pixel(image: &ImageHandle<CpuFrame>, x: u32, y: u32) -> [u8; 4] {
    let sequence = image.lock().unwrap();
    sequence.last_frame().unwrap().pixel(x, y).unwrap()
}

#[test]
fn diagonal_line_on_white_page() {
    let (mut host, image) = open(200, 100);
    host.with_active(|dev| {
        dev.new_page(&page_gc())?;
        dev.line(0.0, 0.0, 200.0, 100.0, &GraphicsContext::default())
    })
    .unwrap();

    assert_eq!(image.lock().unwrap().len(), 1);
    let darkest = (49..=51).map(|y| pixel(&image, 100, y)[0]).min().unwrap();
    assert!(darkest < 100, "line should darken its midpoint, got {darkest}");
    assert_eq!(pixel(&image, 199, 0), WHITE);
    assert_eq!(pixel(&image, 0, 99), WHITE);
}

#[test]
fn clip_keeps_background_outside_inset() {
    let (mut host, image) = open(100, 100);
    host.with_active(|dev| {
        dev.new_page(&page_gc())?;
        dev.clip(10.0, 90.0, 90.0, 10.0)?;
        dev.rect(0.0, 100.0, 100.0, 0.0, &fill_only(HostColor::rgb(255, 0, 0)))
    })
    .unwrap();

    assert_eq!(pixel(&image, 50, 50), [255, 0, 0, 255]);
    assert_eq!(pixel(&image, 12, 12), [255, 0, 0, 255]);
    for (x, y) in [(5, 5), (10, 50), (95, 95), (50, 89), (0, 0)] {
        assert_eq!(pixel(&image, x, y), WHITE, "({x}, {y}) is outside the clip");
    }
}

#[test]
fn clip_persists_across_calls_until_replaced() {
    let (mut host, image) = open(60, 60);
    let red = fill_only(HostColor::rgb(255, 0, 0));
    host.with_active(|dev| {
        dev.new_page(&page_gc())?;
        dev.clip(0.0, 30.0, 30.0, 0.0)?;
        dev.rect(0.0, 60.0, 60.0, 0.0, &red)?;
        dev.clip(0.0, 60.0, 60.0, 0.0)?;
        dev.circle(45.0, 45.0, 5.0, &red)
    })
    .unwrap();
    assert_eq!(pixel(&image, 15, 15), [255, 0, 0, 255]);
    assert_eq!(pixel(&image, 40, 15), WHITE);
    assert_eq!(pixel(&image, 45, 45), [255, 0, 0, 255]);
}

#[test]
fn winding_decides_whether_holes_are_filled() {
    let square = |lo: f64, hi: f64| {
        [
            Point::new(lo, lo),
            Point::new(hi, lo),
            Point::new(hi, hi),
            Point::new(lo, hi),
        ]
    };
    let points: Vec<Point> = square(10.0, 90.0)
        .into_iter()
        .chain(square(30.0, 70.0))
        .collect();
    let black = fill_only(HostColor::BLACK);

    for (winding, center) in [(false, WHITE), (true, [0, 0, 0, 255])] {
        let (mut host, image) = open(100, 100);
        host.with_active(|dev| {
            dev.new_page(&page_gc())?;
            dev.path(&points, &[4, 4], winding, &black)
        })
        .unwrap();
        assert_eq!(pixel(&image, 20, 20), [0, 0, 0, 255]);
        assert_eq!(pixel(&image, 50, 50), center, "winding = {winding}");
    }
}

#[test]
fn raster_lands_measured_from_the_bottom() {
    let (mut host, image) = open(20, 20);
    let red = HostColor::rgb(255, 0, 0).0;
    host.with_active(|dev| {
        dev.new_page(&page_gc())?;
        dev.raster(&[red; 4], 2, 2, 5.0, 2.0, 2.0, 2.0, 0.0, false, &page_gc())
    })
    .unwrap();
    assert_eq!(pixel(&image, 5, 18), [255, 0, 0, 255]);
    assert_eq!(pixel(&image, 6, 19), [255, 0, 0, 255]);
    assert_eq!(pixel(&image, 5, 17), WHITE);
    assert_eq!(pixel(&image, 7, 18), WHITE);
}

#[test]
fn character_metrics_match_string_width() {
    let (mut host, _image) = open(100, 100);
    let gc = GraphicsContext::default();
    let (metric, width, by_code_point) = host
        .with_active(|dev| {
            dev.new_page(&page_gc())?;
            Ok((
                dev.metric_info(i32::from(b'A'), &gc)?,
                dev.str_width("A", &gc)?,
                dev.metric_info(-0x41, &gc)?,
            ))
        })
        .unwrap();
    assert!(metric.ascent > 0.0, "{metric:?}");
    assert!(metric.descent >= 0.0, "{metric:?}");
    assert!(metric.width > 0.0, "{metric:?}");
    assert!((metric.width - width).abs() < 1e-9, "{} != {width}", metric.width);
    assert_eq!(metric, by_code_point);
}

#[test]
fn wider_text_with_larger_expansion() {
    let (mut host, _image) = open(100, 100);
    let small = GraphicsContext::default();
    let large = GraphicsContext {
        cex: 2.0,
        ..GraphicsContext::default()
    };
    let (a, b) = host
        .with_active(|dev| {
            dev.new_page(&page_gc())?;
            Ok((dev.str_width_utf8("plot", &small)?, dev.str_width("plot", &large)?))
        })
        .unwrap();
    assert!((b - 2.0 * a).abs() < 1e-6, "{b} should be twice {a}");
}

#[test]
fn text_marks_the_page() {
    let (mut host, image) = open(120, 60);
    host.with_active(|dev| {
        dev.new_page(&page_gc())?;
        dev.text_utf8(10.0, 40.0, "Hello", 0.0, 0.0, &GraphicsContext::default())
    })
    .unwrap();
    let sequence = image.lock().unwrap();
    let frame = sequence.last_frame().unwrap();
    let inked = (10..70)
        .flat_map(|x| (25..42).map(move |y| (x, y)))
        .filter(|&(x, y)| frame.pixel(x, y).is_some_and(|p| p[0] < 128))
        .count();
    assert!(inked > 10, "expected glyph pixels, found {inked}");
    assert_eq!(frame.pixel(110, 5), Some(WHITE));
}

#[test]
fn every_page_is_a_frame() {
    let (mut host, image) = open(64, 48);
    for _ in 0..3 {
        host.with_active(|dev| dev.new_page(&page_gc())).unwrap();
    }
    let sequence = image.lock().unwrap();
    assert_eq!(sequence.len(), 3);
    assert!(sequence.iter().all(|f| (f.width(), f.height()) == (64, 48)));

    let mut bytes = Vec::new();
    output::write_apng(&sequence, &mut bytes).unwrap();
    let reader = png::Decoder::new(bytes.as_slice()).read_info().unwrap();
    let frames = reader.info().animation_control.as_ref().map(|c| c.num_frames);
    assert_eq!(frames, Some(3));
}

#[test]
fn failed_callbacks_leave_the_device_usable() {
    let (mut host, image) = open(10, 10);
    let number = host.active().unwrap();
    let gc = GraphicsContext::default();

    let early = host.with_active(|dev| dev.line(0.0, 0.0, 5.0, 5.0, &gc));
    assert!(matches!(early, Err(DeviceError::NoPages)));
    assert_eq!(host.active(), Some(number));

    host.with_active(|dev| {
        dev.new_page(&page_gc())?;
        dev.line(0.0, 0.0, 5.0, 5.0, &gc)
    })
    .unwrap();

    let size = host.with_active(|dev| Ok(dev.size())).unwrap();
    assert_eq!(size, host.with_active(|dev| Ok(dev.size())).unwrap());
    assert_eq!((size.right, size.bottom), (10.0, 10.0));

    host.close_device(number).unwrap();
    assert!(host.is_empty());
    assert_eq!(image.lock().unwrap().len(), 1, "pages outlive the device");
}

#[test]
fn closed_device_refuses_to_draw() {
    let (mut host, _image) = open(10, 10);
    let gc = GraphicsContext::default();
    host.with_active(|dev| {
        dev.new_page(&page_gc())?;
        dev.close();
        Ok(())
    })
    .unwrap();
    let after = host.with_active(|dev| dev.polygon(&[Point::ORIGIN], &gc));
    assert!(matches!(after, Err(DeviceError::Closed)));
    assert!(host.with_active(|dev| Ok(dev.size())).is_ok());
}

#[test]
fn transparent_background_page() {
    let (mut host, image) = open(8, 8);
    host.with_active(|dev| dev.new_page(&GraphicsContext::default()))
        .unwrap();
    assert_eq!(pixel(&image, 4, 4)[3], 0);
}
