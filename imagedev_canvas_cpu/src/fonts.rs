// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font registration, selection and glyph layout.

use std::io;
use std::path::Path;

use imagedev_drawable::{FontSpec, FontStyle, TypeMetric};
use kurbo::{Affine, BezPath};
use peniko::{Blob, FontData};
use skrifa::instance::{LocationRef, Size};
use skrifa::metrics::GlyphMetrics;
use skrifa::outline::OutlinePen;
use skrifa::string::StringId;
use skrifa::{FontRef, GlyphId, MetadataProvider};

/// Upper bound on faces read from a single font collection file.
const MAX_COLLECTION_FACES: u32 = 64;

/// Horizontal shear applied when an italic is requested from an upright face.
const SYNTHETIC_OBLIQUE_SKEW: f64 = -0.2;

/// Directories scanned by [`FontBook::system`].
#[cfg(target_os = "macos")]
const SYSTEM_FONT_DIRS: &[&str] = &["/System/Library/Fonts", "/Library/Fonts"];

#[cfg(target_os = "windows")]
const SYSTEM_FONT_DIRS: &[&str] = &["C:\\Windows\\Fonts"];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const SYSTEM_FONT_DIRS: &[&str] = &["/usr/share/fonts", "/usr/local/share/fonts"];

/// Families tried, in order, as the default when none is configured.
const PREFERRED_DEFAULTS: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
];

/// Names that select the default family rather than a specific one.
const GENERIC_FAMILIES: &[&str] = &["sans", "sans-serif", "sansserif", "helvetica"];

/// One face registered in a [`FontBook`].
#[derive(Clone, Debug)]
pub struct FontFace {
    /// Font bytes and collection index.
    pub font: FontData,
    /// Family name read from the font.
    pub family: String,
    /// Weight read from the font (400 regular, 700 bold).
    pub weight: u16,
    /// Slant read from the font.
    pub style: FontStyle,
}

impl FontFace {
    fn parse(data: &Blob<u8>, index: u32) -> Option<Self> {
        let font = FontRef::from_index(data.as_ref(), index).ok()?;
        let family = font
            .localized_strings(StringId::TYPOGRAPHIC_FAMILY_NAME)
            .english_or_first()
            .or_else(|| {
                font.localized_strings(StringId::FAMILY_NAME)
                    .english_or_first()
            })?
            .to_string();
        let attributes = font.attributes();
        let style = match attributes.style {
            skrifa::attribute::Style::Normal => FontStyle::Normal,
            skrifa::attribute::Style::Italic => FontStyle::Italic,
            skrifa::attribute::Style::Oblique(_) => FontStyle::Oblique,
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "weights are clamped to the OpenType range before casting"
        )]
        let weight = attributes.weight.value().clamp(1.0, 1000.0) as u16;
        Some(Self {
            font: FontData::new(data.clone(), index),
            family,
            weight,
            style,
        })
    }

    /// Parsed font for this face.
    pub fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(self.font.data.as_ref(), self.font.index).ok()
    }

    /// Measure `text` at `size` pixels per em.
    pub fn measure(&self, text: &str, size: f64) -> TypeMetric {
        let Some(font) = self.font_ref() else {
            return TypeMetric::default();
        };
        #[allow(clippy::cast_possible_truncation, reason = "font sizes fit in f32")]
        let px = Size::new(size as f32);
        let metrics = font.metrics(px, LocationRef::default());
        let ascent = f64::from(metrics.ascent);
        let descent = f64::from(-metrics.descent).max(0.0);
        let glyphs = GlyphMetrics::new(&font, px, LocationRef::default());
        let charmap = font.charmap();
        let text_width = text
            .chars()
            .map(|ch| {
                let gid = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
                f64::from(glyphs.advance_width(gid).unwrap_or(0.0))
            })
            .sum();
        TypeMetric {
            ascent,
            descent,
            text_width,
            text_height: ascent + descent + f64::from(metrics.leading),
        }
    }

    /// Outline of `text` laid out left to right with its baseline origin at
    /// `(0, 0)`, in y-down coordinates, along with its advance width.
    pub fn outline(&self, text: &str, size: f64) -> (BezPath, f64) {
        let mut pen = FlipPen {
            path: BezPath::new(),
            x: 0.0,
        };
        let Some(font) = self.font_ref() else {
            return (pen.path, 0.0);
        };
        #[allow(clippy::cast_possible_truncation, reason = "font sizes fit in f32")]
        let px = Size::new(size as f32);
        let glyphs = GlyphMetrics::new(&font, px, LocationRef::default());
        let outlines = font.outline_glyphs();
        let charmap = font.charmap();
        for ch in text.chars() {
            let gid = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
            if let Some(glyph) = outlines.get(gid) {
                // A glyph that fails to draw leaves a gap, like a blank.
                if let Err(err) = glyph.draw(px, &mut pen) {
                    tracing::warn!(
                        family = %self.family,
                        glyph = gid.to_u32(),
                        "failed to outline {ch:?}: {err}"
                    );
                }
            }
            pen.x += f64::from(glyphs.advance_width(gid).unwrap_or(0.0));
        }
        let advance = pen.x;
        (pen.path, advance)
    }
}

/// Collects glyph outlines into a y-down path, offset by the pen position.
struct FlipPen {
    path: BezPath,
    x: f64,
}

impl FlipPen {
    fn point(&self, x: f32, y: f32) -> (f64, f64) {
        (self.x + f64::from(x), -f64::from(y))
    }
}

impl OutlinePen for FlipPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(self.point(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(self.point(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.path.quad_to(self.point(x1, y1), self.point(x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.path
            .curve_to(self.point(x1, y1), self.point(x2, y2), self.point(x, y));
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

/// Set of fonts available to a canvas.
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    faces: Vec<FontFace>,
    default_family: Option<String>,
}

impl FontBook {
    /// Creates an empty font book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a font book from the platform's font directories.
    ///
    /// Unreadable files are skipped. The default family is the first of a
    /// short list of common sans-serif families that is present.
    pub fn system() -> Self {
        let mut book = Self::new();
        for dir in SYSTEM_FONT_DIRS {
            let dir = Path::new(dir);
            if dir.is_dir() {
                if let Err(err) = book.load_dir(dir) {
                    tracing::warn!("failed to scan font directory {}: {err}", dir.display());
                }
            }
        }
        if let Some(family) = PREFERRED_DEFAULTS
            .iter()
            .find(|family| book.has_family(family))
        {
            book.default_family = Some((*family).to_string());
        }
        tracing::debug!(
            faces = book.faces.len(),
            default_family = ?book.default_family(),
            "loaded system fonts"
        );
        book
    }

    /// Sets the family used when a font request names no family or an
    /// unknown one.
    pub fn with_default_family(mut self, family: impl Into<String>) -> Self {
        self.default_family = Some(family.into());
        self
    }

    /// Family used when a request names no family, if any font is loaded.
    pub fn default_family(&self) -> Option<&str> {
        self.default_family
            .as_deref()
            .or_else(|| self.faces.first().map(|face| face.family.as_str()))
    }

    /// Registers every face in a font or font collection. Returns the number
    /// of faces added.
    pub fn add_font(&mut self, data: Vec<u8>) -> usize {
        let blob = Blob::from(data);
        let before = self.faces.len();
        for index in 0..MAX_COLLECTION_FACES {
            match FontFace::parse(&blob, index) {
                Some(face) => self.faces.push(face),
                None => break,
            }
        }
        self.faces.len() - before
    }

    /// Registers the faces in a font file.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> io::Result<usize> {
        let path = path.as_ref();
        let added = self.add_font(std::fs::read(path)?);
        if added == 0 {
            tracing::warn!("no usable font faces in {}", path.display());
        }
        Ok(added)
    }

    /// Registers every font file under `dir`, recursively.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> io::Result<usize> {
        let mut added = 0;
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                added += self.load_dir(&path)?;
            } else if is_font_file(&path) {
                match self.load_file(&path) {
                    Ok(n) => added += n,
                    Err(err) => tracing::warn!("skipping font {}: {err}", path.display()),
                }
            }
        }
        Ok(added)
    }

    /// Number of registered faces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Returns `true` if no face is registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Registered faces.
    pub fn faces(&self) -> &[FontFace] {
        &self.faces
    }

    /// Returns `true` if a face of `family` is registered.
    pub fn has_family(&self, family: &str) -> bool {
        self.faces
            .iter()
            .any(|face| face.family.eq_ignore_ascii_case(family))
    }

    /// Best face for a request.
    ///
    /// Empty and generic family names select the default family. A named
    /// family that is not registered falls back to the default family. Within
    /// a family, faces with the requested slant are preferred, then the
    /// closest weight.
    pub fn select(&self, spec: &FontSpec) -> Option<&FontFace> {
        let requested = spec.family.trim();
        let generic = requested.is_empty()
            || GENERIC_FAMILIES
                .iter()
                .any(|name| name.eq_ignore_ascii_case(requested));
        let family = if !generic && self.has_family(requested) {
            requested
        } else {
            if !generic {
                tracing::warn!(
                    "font family {requested:?} is not available, using {:?}",
                    self.default_family()
                );
            }
            self.default_family()?
        };
        let candidates = self
            .faces
            .iter()
            .filter(|face| face.family.eq_ignore_ascii_case(family));
        let best = candidates.min_by_key(|face| {
            let slant = slant_distance(face.style, spec.style);
            (slant, face.weight.abs_diff(spec.weight))
        });
        best.or_else(|| self.faces.first())
    }

    /// Extra transform to apply to outlines drawn with `face` for `spec`.
    ///
    /// Upright faces used for slanted requests are sheared.
    pub fn synthesis(face: &FontFace, spec: &FontSpec) -> Affine {
        if face.style == FontStyle::Normal && spec.style != FontStyle::Normal {
            Affine::skew(SYNTHETIC_OBLIQUE_SKEW, 0.0)
        } else {
            Affine::IDENTITY
        }
    }
}

fn slant_distance(have: FontStyle, want: FontStyle) -> u8 {
    match (have, want) {
        (a, b) if a == b => 0,
        (FontStyle::Italic, FontStyle::Oblique) | (FontStyle::Oblique, FontStyle::Italic) => 1,
        _ => 2,
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ["ttf", "otf", "ttc", "otc"]
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}
