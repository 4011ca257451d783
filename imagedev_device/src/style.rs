// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping from host style codes to drawable style values.
//!
//! Unknown codes fall back to defaults; none of these functions fail.

use imagedev_drawable::{FontSpec, FontStyle, LineCap, LineJoin};

use crate::{FontFace, GraphicsContext, LineEnd, LineJoinCode, LineType};

/// Weight used for bold faces.
pub const BOLD_WEIGHT: u16 = 600;
/// Weight used for regular faces.
pub const REGULAR_WEIGHT: u16 = 400;

/// Dash pattern for a line type, scaled by the line width.
///
/// Solid, blank and unknown types give an empty (solid) pattern.
pub fn line_type(lty: LineType, lwd: f64) -> Vec<f64> {
    let units: &[f64] = match lty {
        LineType::DASHED => &[5.0, 3.0],
        LineType::DOTTED => &[1.0, 2.0],
        LineType::DOTDASH => &[5.0, 3.0, 2.0, 3.0],
        LineType::LONGDASH => &[8.0, 3.0],
        LineType::TWODASH => &[5.0, 2.0, 5.0, 5.0],
        _ => &[],
    };
    units.iter().map(|unit| unit * lwd).collect()
}

/// Cap for a host line end code. Defaults to round.
pub fn line_cap(lend: LineEnd) -> LineCap {
    match lend {
        LineEnd::BUTT => LineCap::Butt,
        LineEnd::SQUARE => LineCap::Square,
        _ => LineCap::Round,
    }
}

/// Join for a host line join code. Defaults to round.
pub fn line_join(ljoin: LineJoinCode) -> LineJoin {
    match ljoin {
        LineJoinCode::MITRE => LineJoin::Miter,
        LineJoinCode::BEVEL => LineJoin::Bevel,
        _ => LineJoin::Round,
    }
}

/// Italic for the italic faces, normal otherwise.
pub fn font_style(face: FontFace) -> FontStyle {
    match face {
        FontFace::ITALIC | FontFace::BOLD_ITALIC => FontStyle::Italic,
        _ => FontStyle::Normal,
    }
}

/// Semi-bold for the bold faces, regular otherwise.
pub fn font_weight(face: FontFace) -> u16 {
    match face {
        FontFace::BOLD | FontFace::BOLD_ITALIC => BOLD_WEIGHT,
        _ => REGULAR_WEIGHT,
    }
}

/// Effective point size: `ps * cex`.
pub fn point_size(gc: &GraphicsContext) -> f64 {
    gc.ps * gc.cex
}

/// Font selection for a graphics context.
pub fn font_spec(gc: &GraphicsContext) -> FontSpec {
    FontSpec {
        family: gc.fontfamily.clone(),
        style: font_style(gc.fontface),
        weight: font_weight(gc.fontface),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashes_scale_with_width() {
        let w = 2.5;
        assert_eq!(line_type(LineType::DASHED, w), [5.0 * w, 3.0 * w]);
        assert_eq!(line_type(LineType::DOTTED, w), [w, 2.0 * w]);
        assert_eq!(
            line_type(LineType::DOTDASH, w),
            [5.0 * w, 3.0 * w, 2.0 * w, 3.0 * w]
        );
        assert_eq!(line_type(LineType::LONGDASH, w), [8.0 * w, 3.0 * w]);
        assert_eq!(
            line_type(LineType::TWODASH, w),
            [5.0 * w, 2.0 * w, 5.0 * w, 5.0 * w]
        );
    }

    #[test]
    fn solid_blank_and_unknown_are_empty() {
        assert!(line_type(LineType::SOLID, 3.0).is_empty());
        assert!(line_type(LineType::BLANK, 3.0).is_empty());
        assert!(line_type(LineType(0x1234_5678), 3.0).is_empty());
    }

    #[test]
    fn caps_and_joins_default_to_round() {
        assert_eq!(line_cap(LineEnd::BUTT), LineCap::Butt);
        assert_eq!(line_cap(LineEnd::SQUARE), LineCap::Square);
        assert_eq!(line_cap(LineEnd::ROUND), LineCap::Round);
        assert_eq!(line_cap(LineEnd(42)), LineCap::Round);

        assert_eq!(line_join(LineJoinCode::MITRE), LineJoin::Miter);
        assert_eq!(line_join(LineJoinCode::BEVEL), LineJoin::Bevel);
        assert_eq!(line_join(LineJoinCode(0)), LineJoin::Round);
    }

    #[test]
    fn faces_map_to_weight_and_style() {
        for code in -1..8 {
            let face = FontFace(code);
            let bold = code == 2 || code == 4;
            let italic = code == 3 || code == 4;
            assert_eq!(font_weight(face) == BOLD_WEIGHT, bold, "face {code}");
            assert_eq!(font_style(face) == FontStyle::Italic, italic, "face {code}");
        }
    }

    #[test]
    fn point_size_applies_expansion() {
        let gc = GraphicsContext {
            ps: 10.0,
            cex: 1.5,
            fontface: FontFace::BOLD_ITALIC,
            fontfamily: "serif".into(),
            ..GraphicsContext::default()
        };
        assert_eq!(point_size(&gc), 15.0);
        let spec = font_spec(&gc);
        assert_eq!(spec.family, "serif");
        assert_eq!(spec.weight, BOLD_WEIGHT);
        assert_eq!(spec.style, FontStyle::Italic);
    }
}
