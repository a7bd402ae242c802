//! Typeface JSON fonts.
//!
//! A typeface file maps every character to an outline string made of drawing
//! commands in font units:
//!
//! - `m x y` starts a new contour
//! - `l x y` draws a line
//! - `q x y cx cy` draws a quadratic curve ending in `(x, y)`
//! - `b x y c1x c1y c2x c2y` draws a cubic curve ending in `(x, y)`
//!
//! Outer contours run clockwise, holes counter-clockwise.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use futures::{
    FutureExt,
    future::{LocalBoxFuture, Shared},
};
use serde::Deserialize;

use crate::{
    geometry::{Shape, clean_contour, point_in_polygon, signed_area},
    resources::load_string,
};

/// Glyph used for characters the font does not cover.
pub const FALLBACK_GLYPH: &str = "?";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typeface {
    pub glyphs: HashMap<String, Glyph>,
    #[serde(default)]
    pub family_name: String,
    pub resolution: f32,
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub underline_thickness: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Glyph {
    /// Horizontal advance in font units.
    pub ha: f32,
    /// Outline commands, absent for blanks such as the space.
    #[serde(default)]
    pub o: Option<String>,
}

impl Typeface {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let typeface: Typeface = serde_json::from_str(json)?;
        if typeface.resolution <= 0.0 {
            anyhow::bail!("Typeface {} has no resolution", typeface.family_name);
        }
        Ok(typeface)
    }

    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        let mut buf = [0u8; 4];
        self.glyphs
            .get(c.encode_utf8(&mut buf) as &str)
            .or_else(|| self.glyphs.get(FALLBACK_GLYPH))
    }

    /// Lay out `text` at `size` and return one shape per filled region.
    ///
    /// Newlines start a new line below the current one. Characters without a
    /// glyph and without a fallback glyph are skipped with a warning.
    pub fn shapes(&self, text: &str, size: f32, curve_segments: u32) -> anyhow::Result<Vec<Shape>> {
        let scale = size / self.resolution;
        let line_height = (self.bounding_box.y_max - self.bounding_box.y_min
            + self.underline_thickness)
            * scale;

        let mut shapes = Vec::new();
        let mut offset = [0.0f32, 0.0f32];
        for c in text.chars() {
            if c == '\n' {
                offset[0] = 0.0;
                offset[1] -= line_height;
                continue;
            }
            let Some(glyph) = self.glyph(c) else {
                log::warn!("Character {:?} is missing in font {}", c, self.family_name);
                continue;
            };
            if let Some(outline) = &glyph.o {
                let contours = parse_outline(outline, scale, offset, curve_segments)?;
                shapes.extend(to_shapes(contours));
            }
            offset[0] += glyph.ha * scale;
        }
        Ok(shapes)
    }
}

/// Turn an outline string into flattened, closed contours.
pub fn parse_outline(
    outline: &str,
    scale: f32,
    offset: [f32; 2],
    curve_segments: u32,
) -> anyhow::Result<Vec<Vec<[f32; 2]>>> {
    let segments = curve_segments.max(1);
    let mut tokens = outline.split_whitespace();
    let mut contours: Vec<Vec<[f32; 2]>> = Vec::new();
    let mut current: Vec<[f32; 2]> = Vec::new();

    let point = |tokens: &mut std::str::SplitWhitespace<'_>| -> anyhow::Result<[f32; 2]> {
        let x: f32 = next_number(tokens)?;
        let y: f32 = next_number(tokens)?;
        Ok([x * scale + offset[0], y * scale + offset[1]])
    };

    while let Some(action) = tokens.next() {
        match action {
            "m" => {
                if current.len() > 2 {
                    contours.push(std::mem::take(&mut current));
                }
                current.clear();
                current.push(point(&mut tokens)?);
            }
            "l" => {
                let p = point(&mut tokens)?;
                current.push(p);
            }
            "q" => {
                let end = point(&mut tokens)?;
                let control = point(&mut tokens)?;
                let start = current.last().copied().unwrap_or(end);
                for i in 1..=segments {
                    let t = i as f32 / segments as f32;
                    current.push(quadratic(start, control, end, t));
                }
            }
            "b" => {
                let end = point(&mut tokens)?;
                let c1 = point(&mut tokens)?;
                let c2 = point(&mut tokens)?;
                let start = current.last().copied().unwrap_or(end);
                for i in 1..=segments {
                    let t = i as f32 / segments as f32;
                    current.push(cubic(start, c1, c2, end, t));
                }
            }
            other => anyhow::bail!("Unknown outline command {:?}", other),
        }
    }
    if current.len() > 2 {
        contours.push(current);
    }

    Ok(contours
        .iter()
        .map(|contour| clean_contour(contour))
        .filter(|contour| contour.len() > 2)
        .collect())
}

fn next_number(tokens: &mut std::str::SplitWhitespace<'_>) -> anyhow::Result<f32> {
    let token = tokens
        .next()
        .ok_or_else(|| anyhow::anyhow!("Outline ended in the middle of a command"))?;
    Ok(token.parse()?)
}

fn quadratic(p0: [f32; 2], c: [f32; 2], p1: [f32; 2], t: f32) -> [f32; 2] {
    let k = 1.0 - t;
    [
        k * k * p0[0] + 2.0 * k * t * c[0] + t * t * p1[0],
        k * k * p0[1] + 2.0 * k * t * c[1] + t * t * p1[1],
    ]
}

fn cubic(p0: [f32; 2], c1: [f32; 2], c2: [f32; 2], p1: [f32; 2], t: f32) -> [f32; 2] {
    let k = 1.0 - t;
    let a = k * k * k;
    let b = 3.0 * k * k * t;
    let c = 3.0 * k * t * t;
    let d = t * t * t;
    [
        a * p0[0] + b * c1[0] + c * c2[0] + d * p1[0],
        a * p0[1] + b * c1[1] + c * c2[1] + d * p1[1],
    ]
}

/// Group contours into outlines with holes.
///
/// Clockwise contours are solid. Fonts that wind the other way are detected by
/// the absence of any clockwise contour. Every hole goes to the solid that
/// contains its first point, or to the most recent solid if none does.
pub fn to_shapes(contours: Vec<Vec<[f32; 2]>>) -> Vec<Shape> {
    if contours.is_empty() {
        return Vec::new();
    }
    let clockwise_solids = contours.iter().any(|c| signed_area(c) < 0.0);
    let is_solid = |c: &[[f32; 2]]| {
        let area = signed_area(c);
        if clockwise_solids { area < 0.0 } else { area > 0.0 }
    };

    let mut shapes: Vec<Shape> = Vec::new();
    let mut holes: Vec<Vec<[f32; 2]>> = Vec::new();
    let mut orphan_owner: Vec<Option<usize>> = Vec::new();
    for contour in contours {
        if is_solid(&contour) {
            shapes.push(Shape::new(contour));
        } else {
            orphan_owner.push(shapes.len().checked_sub(1));
            holes.push(contour);
        }
    }

    for (hole, fallback) in holes.into_iter().zip(orphan_owner) {
        let owner = shapes
            .iter()
            .position(|shape| point_in_polygon(hole[0], &shape.outline))
            .or(fallback)
            .or(if shapes.is_empty() { None } else { Some(0) });
        match owner {
            Some(idx) => shapes[idx].holes.push(hole),
            None => log::warn!("Dropping a glyph hole without an enclosing outline"),
        }
    }
    shapes
}

type FontLoad = Shared<LocalBoxFuture<'static, Result<Arc<Typeface>, Arc<anyhow::Error>>>>;
type FontLoader = Arc<dyn Fn(String) -> LocalBoxFuture<'static, anyhow::Result<Typeface>>>;

/// Parsed typefaces by font name, shared by every label.
///
/// Each font is fetched at most once: labels asking for a font that is still
/// loading wait on the same load.
#[derive(Clone)]
pub struct FontCache {
    fonts: Arc<Mutex<HashMap<String, FontLoad>>>,
    loader: FontLoader,
}

impl Default for FontCache {
    fn default() -> Self {
        Self::with_loader(|name| async move { load_typeface(&name).await }.boxed_local())
    }
}

impl FontCache {
    /// Cache loading `fonts/<name>.json` from the assets.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_loader(
        loader: impl Fn(String) -> LocalBoxFuture<'static, anyhow::Result<Typeface>> + 'static,
    ) -> Self {
        Self {
            fonts: Arc::new(Mutex::new(HashMap::new())),
            loader: Arc::new(loader),
        }
    }

    pub fn insert(&self, name: &str, typeface: Typeface) -> Arc<Typeface> {
        let typeface = Arc::new(typeface);
        let ready: FontLoad = futures::future::ready(Ok(typeface.clone()))
            .boxed_local()
            .shared();
        if let Ok(mut fonts) = self.fonts.lock() {
            fonts.insert(name.to_string(), ready);
        }
        typeface
    }

    /// The typeface if it finished loading.
    pub fn get(&self, name: &str) -> Option<Arc<Typeface>> {
        let fonts = self.fonts.lock().ok()?;
        match fonts.get(name)?.peek()? {
            Ok(typeface) => Some(typeface.clone()),
            Err(_) => None,
        }
    }

    /// Return the cached typeface, join a load in flight or start loading it.
    pub async fn get_or_load(&self, name: &str) -> anyhow::Result<Arc<Typeface>> {
        let load = {
            let mut fonts = self
                .fonts
                .lock()
                .map_err(|_| anyhow::anyhow!("Font cache poisoned"))?;
            fonts
                .entry(name.to_string())
                .or_insert_with(|| {
                    let load = (self.loader)(name.to_string());
                    async move { load.await.map(Arc::new).map_err(Arc::new) }
                        .boxed_local()
                        .shared()
                })
                .clone()
        };
        match load.await {
            Ok(typeface) => Ok(typeface),
            Err(e) => {
                // Failed loads are forgotten so a later label can retry
                if let Ok(mut fonts) = self.fonts.lock() {
                    if fonts.get(name).is_some_and(|l| l.peek().is_some_and(Result::is_err)) {
                        fonts.remove(name);
                    }
                }
                Err(anyhow::anyhow!("{:#}", e))
            }
        }
    }
}

async fn load_typeface(name: &str) -> anyhow::Result<Typeface> {
    let json = load_string(&font_path(name)).await?;
    let typeface = Typeface::from_json(&json)?;
    log::info!("Loaded font {}", name);
    Ok(typeface)
}

pub fn font_path(name: &str) -> String {
    format!("fonts/{}.json", name)
}
