// Copies the static site (page, styles, audio) to `dist/` so it can be
// deployed next to the wasm-pack output.
use std::path::Path;

use fs_extra::dir::{self, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    let static_dir = Path::new("static");
    let out_dir = Path::new("dist");
    if !static_dir.exists() {
        return;
    }
    if out_dir.exists() {
        if let Err(err) = dir::remove(out_dir) {
            println!("cargo:warning=could not clear dist/: {err}");
        }
    }
    if let Err(err) = dir::create_all(out_dir, false) {
        println!("cargo:warning=could not create dist/: {err}");
        return;
    }

    let options = CopyOptions::new().content_only(true).overwrite(true);
    if let Err(err) = dir::copy(static_dir, out_dir, &options) {
        println!("cargo:warning=copying static/ failed: {err}");
    }
}
