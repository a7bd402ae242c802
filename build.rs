use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::{Path, PathBuf};

const FISH_MODELS: u32 = 15;
const FONTS: &[&str] = &["HelveticaNeueLT Std Med Ext_Bold"];

/// The scene still starts without these, so missing files only warn.
fn check_assets(assets: &Path) {
    let fish = (1..=FISH_MODELS).map(|n| format!("models/TropicalFish{:02}.obj", n));
    let fonts = FONTS.iter().map(|name| format!("fonts/{}.json", name));
    for file in fish.chain(fonts) {
        if !assets.join(&file).exists() {
            println!("cargo:warning=asset {} is missing", file);
        }
    }
}

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join("assets");
    if !assets_src.exists() {
        println!("cargo:warning=no assets/ directory, fish and labels will not load");
        return Ok(());
    }
    check_assets(&assets_src);

    // Bundled next to the build output for packaging the web build
    let out_dir = env::var("OUT_DIR")?;
    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    copy_items(&[assets_src], out_dir, &copy_options)?;

    Ok(())
}
