use std::io::{BufReader, Cursor};

/**
 * This module contains all logic for loading meshes, fonts and config from external files.
 *
 * Natively everything is read from `./assets`, on the web it is fetched relative to
 * `<origin>/assets/`.
 */
pub mod font;

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("No window available"))?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("Page origin is not readable"))?;
    let base = reqwest::Url::parse(&format!("{}/assets/", origin))?;
    Ok(base.join(file_name)?)
}

#[cfg(not(target_arch = "wasm32"))]
fn asset_path(file_name: &str) -> std::path::PathBuf {
    std::path::Path::new("./").join("assets").join(file_name)
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    #[cfg(target_arch = "wasm32")]
    let txt = {
        let url = format_url(file_name)?;
        let response = reqwest::get(url).await?.error_for_status()?;
        response.text().await?
    };
    #[cfg(not(target_arch = "wasm32"))]
    let txt = tokio::fs::read_to_string(asset_path(file_name)).await?;

    Ok(txt)
}

/// Parse OBJ source and return the vertex positions of its first model.
///
/// Materials are ignored: point clouds take their colour from the scene palette.
pub async fn parse_obj_positions(obj_text: String, file_name: &str) -> anyhow::Result<Vec<[f32; 3]>> {
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));

    let (models, _materials) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: false,
            single_index: true,
            ..Default::default()
        },
        |_| async move { Err(tobj::LoadError::OpenFileFailed) },
    )
    .await?;

    let model = models
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("{} contains no objects", file_name))?;
    let positions: Vec<[f32; 3]> = model
        .mesh
        .positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    if positions.is_empty() {
        anyhow::bail!("{} contains no vertices", file_name);
    }
    Ok(positions)
}

/// Load an OBJ asset and return the vertex positions of its first model.
pub async fn load_obj_positions(file_name: &str) -> anyhow::Result<Vec<[f32; 3]>> {
    let obj_text = load_string(file_name).await?;
    parse_obj_positions(obj_text, file_name).await
}
