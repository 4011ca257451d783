// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drive an image device through a few pages of plotting calls and write the
//! result as PNG files plus an animated PNG.
//!
//! Usage: `cargo run -p imagedev_demos -- [output-dir]`. Set `RUST_LOG=trace`
//! to see every device callback.

use std::error::Error;
use std::f64::consts::TAU;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use imagedev_canvas_cpu::{CpuCanvas, FontBook, manipulate, output};
use imagedev_device::{
    DeviceConfig, DeviceError, DeviceManager, FontFace, GraphicsContext, GraphicsDevice,
    HostColor, LineType, create_device,
};
use imagedev_drawable::{Point, coordinates};

const WIDTH_PX: u32 = 480;
const HEIGHT_PX: u32 = 320;
const WIDTH: f64 = WIDTH_PX as f64;
const HEIGHT: f64 = HEIGHT_PX as f64;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let out_dir = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("imagedev-demo"), PathBuf::from);
    fs::create_dir_all(&out_dir)?;

    let mut fonts = FontBook::system();
    if fonts.is_empty() {
        let assets = concat!(env!("CARGO_MANIFEST_DIR"), "/../assets/fonts/dejavu");
        fonts.load_dir(assets)?;
        fonts = fonts.with_default_family("DejaVu Sans");
    }

    let mut host = DeviceManager::new();
    let config = DeviceConfig::default().with_size(WIDTH_PX, HEIGHT_PX);
    let image = create_device(&mut host, CpuCanvas::new(fonts), &config)?;

    host.with_active(|dev| {
        shapes_page(dev)?;
        text_page(dev)?;
        spiral_page(dev)
    })?;
    if let Some(number) = host.active() {
        host.close_device(number)?;
    }

    let sequence = image.lock().map_err(|_| DeviceError::Poisoned)?;
    let written = output::save_pngs(&sequence, &out_dir, "page")?;
    tracing::info!("wrote {} pages to {}", written.len(), out_dir.display());

    let animated = manipulate::delay(&sequence, 80);
    let apng = out_dir.join("pages.png");
    output::write_apng(&animated, BufWriter::new(File::create(&apng)?))?;
    tracing::info!("wrote {}", apng.display());

    let soft = manipulate::blur(&sequence, 2.0)?;
    output::save_pngs(&soft, &out_dir, "blurred")?;
    Ok(())
}

fn page() -> GraphicsContext {
    GraphicsContext {
        fill: HostColor::WHITE,
        ..GraphicsContext::default()
    }
}

fn shapes_page(dev: &mut dyn GraphicsDevice) -> Result<(), DeviceError> {
    dev.new_page(&page())?;
    dev.clip(20.0, WIDTH - 20.0, HEIGHT - 20.0, 20.0)?;

    let filled = GraphicsContext {
        fill: HostColor::rgba(70, 130, 180, 200),
        lwd: 2.0,
        ..GraphicsContext::default()
    };
    dev.rect(40.0, 140.0, 160.0, 40.0, &filled)?;
    dev.circle(260.0, 90.0, 50.0, &filled)?;

    let star: Vec<Point> = (0_i32..10)
        .map(|i| {
            let r = if i % 2 == 0 { 60.0 } else { 25.0 };
            let a = TAU * f64::from(i) / 10.0 - TAU / 4.0;
            Point::new(390.0 + r * a.cos(), 100.0 + r * a.sin())
        })
        .collect();
    dev.polygon(
        &star,
        &GraphicsContext {
            fill: HostColor::rgb(240, 200, 40),
            ..GraphicsContext::default()
        },
    )?;

    for (lty, row) in [
        LineType::SOLID,
        LineType::DASHED,
        LineType::DOTTED,
        LineType::DOTDASH,
        LineType::LONGDASH,
        LineType::TWODASH,
    ]
    .into_iter()
    .zip(0_u8..)
    {
        let y = 190.0 + 18.0 * f64::from(row);
        let gc = GraphicsContext {
            lty,
            lwd: 2.0,
            ..GraphicsContext::default()
        };
        dev.line(40.0, y, WIDTH - 40.0, y, &gc)?;
    }
    Ok(())
}

fn text_page(dev: &mut dyn GraphicsDevice) -> Result<(), DeviceError> {
    dev.new_page(&page())?;
    let faces = [
        (FontFace::PLAIN, "plain"),
        (FontFace::BOLD, "bold"),
        (FontFace::ITALIC, "italic"),
        (FontFace::BOLD_ITALIC, "bold italic"),
    ];
    let mut y = 60.0;
    for (face, label) in faces {
        let gc = GraphicsContext {
            fontface: face,
            cex: 1.5,
            ..GraphicsContext::default()
        };
        dev.text(40.0, y, label, 0.0, 0.0, &gc)?;
        let width = dev.str_width(label, &gc)?;
        let metric = dev.metric_info(-i32::from(b'M'), &gc)?;
        let underline = GraphicsContext {
            col: HostColor::rgb(200, 40, 40),
            ..GraphicsContext::default()
        };
        dev.line(40.0, y + metric.descent, 40.0 + width, y + metric.descent, &underline)?;
        y += 50.0;
    }
    dev.text_utf8(
        400.0,
        280.0,
        "rotated",
        45.0,
        0.0,
        &GraphicsContext::default(),
    )
}

fn spiral_page(dev: &mut dyn GraphicsDevice) -> Result<(), DeviceError> {
    dev.new_page(&page())?;
    let (xs, ys): (Vec<f64>, Vec<f64>) = (0_i32..400)
        .map(|i| {
            let t = f64::from(i) / 40.0;
            let r = 8.0 * t;
            (WIDTH / 2.0 + r * t.cos(), HEIGHT / 2.0 + r * t.sin())
        })
        .unzip();
    let gc = GraphicsContext {
        col: HostColor::rgb(30, 30, 120),
        lwd: 1.5,
        ..GraphicsContext::default()
    };
    dev.polyline(&coordinates(&xs, &ys), &gc)?;

    let checker: Vec<u32> = (0..64)
        .map(|i| {
            if (i % 8 + i / 8) % 2 == 0 {
                HostColor::BLACK.0
            } else {
                HostColor::TRANSPARENT_WHITE.0
            }
        })
        .collect();
    dev.raster(&checker, 8, 8, 20.0, 28.0, 8.0, 8.0, 0.0, false, &gc)
}
