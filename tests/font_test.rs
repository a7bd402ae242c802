use std::{
    cell::Cell,
    rc::Rc,
    sync::atomic::{AtomicUsize, Ordering},
    sync::Arc,
    task::Poll,
};

use futures::FutureExt;
use particle_ocean::{
    geometry::signed_area,
    resources::font::{FontCache, Typeface, font_path, parse_outline, to_shapes},
};

// A tiny typeface in the usual units: an "o" made of a square with a square
// hole, a plain square as the fallback glyph and a blank space.
const TYPEFACE: &str = r#"{
    "glyphs": {
        "o": { "ha": 120, "x_min": 0, "x_max": 100, "o": "m 0 0 l 0 100 l 100 100 l 100 0 m 25 25 l 75 25 l 75 75 l 25 75 " },
        "?": { "ha": 60, "x_min": 0, "x_max": 50, "o": "m 0 0 l 0 50 l 50 50 l 50 0 " },
        " ": { "ha": 40, "x_min": 0, "x_max": 0 }
    },
    "familyName": "Test Sans",
    "ascender": 90,
    "descender": -10,
    "underlinePosition": -10,
    "underlineThickness": 5,
    "boundingBox": { "yMin": -10, "xMin": 0, "yMax": 95, "xMax": 120 },
    "resolution": 100,
    "original_font_information": {}
}"#;

fn typeface() -> Typeface {
    Typeface::from_json(TYPEFACE).unwrap()
}

#[test]
fn should_parse_typeface_json() {
    let font = typeface();
    assert_eq!(font.family_name, "Test Sans");
    assert_eq!(font.resolution, 100.0);
    assert_eq!(font.glyphs.len(), 3);
    assert!(font.glyphs[" "].o.is_none());
}

#[test]
fn should_reject_non_typeface_json() {
    assert!(Typeface::from_json("[1, 2, 3]").is_err());
    assert!(Typeface::from_json("{\"glyphs\": {}, \"resolution\": 0, \"boundingBox\": {\"xMin\": 0, \"xMax\": 0, \"yMin\": 0, \"yMax\": 0}}").is_err());
}

#[test]
fn should_parse_closed_contours() {
    let contours = parse_outline(
        "m 0 0 l 0 100 l 100 100 l 100 0 m 25 25 l 75 25 l 75 75 l 25 75",
        1.0,
        [0.0, 0.0],
        12,
    )
    .unwrap();
    assert_eq!(contours.len(), 2);
    assert_eq!(contours[0].len(), 4);
    assert!(signed_area(&contours[0]) < 0.0);
    assert!(signed_area(&contours[1]) > 0.0);
}

#[test]
fn should_flatten_curves_with_control_points_after_end_points() {
    // quadratic from (0,0) to (100,0) bulging towards (50,100)
    let contours = parse_outline("m 0 0 q 100 0 50 100", 1.0, [0.0, 0.0], 4).unwrap();
    assert_eq!(contours.len(), 1);
    let contour = &contours[0];
    assert_eq!(contour.len(), 5);
    assert_eq!(contour[4], [100.0, 0.0]);
    // the midpoint of the curve sits halfway to the control point
    assert_eq!(contour[2], [50.0, 50.0]);

    let cubic = parse_outline("m 0 0 b 90 0 0 90 90 90", 1.0, [0.0, 0.0], 2).unwrap();
    assert_eq!(cubic[0].last(), Some(&[90.0, 0.0]));
    assert_eq!(cubic[0][1], [45.0, 67.5]);
}

#[test]
fn should_scale_and_offset_outline() {
    let contours = parse_outline("m 0 0 l 0 10 l 10 10", 2.0, [5.0, -1.0], 12).unwrap();
    assert_eq!(contours[0], vec![[5.0, -1.0], [5.0, 19.0], [25.0, 19.0]]);
}

#[test]
fn should_fail_on_truncated_outline() {
    assert!(parse_outline("m 0 0 l 10", 1.0, [0.0, 0.0], 12).is_err());
    assert!(parse_outline("m 0 0 x 1 1", 1.0, [0.0, 0.0], 12).is_err());
}

#[test]
fn should_group_hole_into_enclosing_outline() {
    let contours = parse_outline(
        "m 0 0 l 0 100 l 100 100 l 100 0 m 25 25 l 75 25 l 75 75 l 25 75",
        1.0,
        [0.0, 0.0],
        12,
    )
    .unwrap();
    let shapes = to_shapes(contours);
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].holes.len(), 1);
}

#[test]
fn should_lay_out_characters_with_advance() {
    let font = typeface();
    let shapes = font.shapes("o o", 100.0, 12).unwrap();
    assert_eq!(shapes.len(), 2);
    let min_x = |i: usize| {
        shapes[i]
            .outline
            .iter()
            .map(|p| p[0])
            .fold(f32::INFINITY, f32::min)
    };
    assert_eq!(min_x(0), 0.0);
    // "o" advances 120, the space 40
    assert_eq!(min_x(1), 160.0);
}

#[test]
fn should_fall_back_to_question_mark_glyph() {
    let font = typeface();
    assert_eq!(font.glyph('#').map(|g| g.ha), Some(60.0));
    let shapes = font.shapes("#", 200.0, 12).unwrap();
    assert_eq!(shapes.len(), 1);
    assert!(shapes[0].holes.is_empty());
    let max_y = shapes[0]
        .outline
        .iter()
        .map(|p| p[1])
        .fold(f32::NEG_INFINITY, f32::max);
    assert_eq!(max_y, 100.0);
}

#[test]
fn should_break_lines() {
    let font = typeface();
    let shapes = font.shapes("?\n?", 100.0, 12).unwrap();
    assert_eq!(shapes.len(), 2);
    let min_y = shapes[1]
        .outline
        .iter()
        .map(|p| p[1])
        .fold(f32::INFINITY, f32::min);
    // (95 - -10 + 5) font units at scale 1
    assert_eq!(min_y, -110.0);
}

#[test]
fn should_serve_cached_fonts_without_loading() {
    let cache = FontCache::new();
    assert!(cache.get("Test Sans").is_none());
    cache.insert("Test Sans", typeface());
    let font = futures::executor::block_on(cache.get_or_load("Test Sans")).unwrap();
    assert_eq!(font.family_name, "Test Sans");
    assert_eq!(font_path("Test Sans"), "fonts/Test Sans.json");
}

#[test]
fn should_report_missing_font_file() {
    let cache = FontCache::new();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let result = runtime.block_on(cache.get_or_load("definitely not a font"));
    assert!(result.is_err());
}

/// Completes on the second poll, so concurrent callers overlap with the load.
async fn yield_once() {
    let yielded = Cell::new(false);
    futures::future::poll_fn(|cx| {
        if yielded.replace(true) {
            Poll::Ready(())
        } else {
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    })
    .await
}

#[test]
fn should_load_each_font_once_for_concurrent_labels() {
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = loads.clone();
    let cache = FontCache::with_loader(move |name| {
        counter.fetch_add(1, Ordering::SeqCst);
        async move {
            yield_once().await;
            assert_eq!(name, "Test Sans");
            Ok(typeface())
        }
        .boxed_local()
    });

    let requests = (0..5).map(|_| cache.get_or_load("Test Sans"));
    let fonts = futures::executor::block_on(futures::future::join_all(requests));
    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert!(fonts.iter().all(|f| f.as_ref().is_ok_and(|f| f.family_name == "Test Sans")));
    assert!(cache.get("Test Sans").is_some());
}

#[test]
fn should_retry_font_after_failed_load() {
    let attempts = Rc::new(Cell::new(0));
    let counter = attempts.clone();
    let cache = FontCache::with_loader(move |_| {
        counter.set(counter.get() + 1);
        let attempt = counter.get();
        async move {
            if attempt == 1 {
                anyhow::bail!("network down");
            }
            Ok(typeface())
        }
        .boxed_local()
    });

    assert!(futures::executor::block_on(cache.get_or_load("Test Sans")).is_err());
    assert!(cache.get("Test Sans").is_none());
    assert!(futures::executor::block_on(cache.get_or_load("Test Sans")).is_ok());
    assert_eq!(attempts.get(), 2);
}
