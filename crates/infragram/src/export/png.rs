//! PNG export.
//!
//! Rasterizes the SVG produced by [`SvgSurface`](super::svg::SvgSurface)
//! with resvg. The pixel size is the SVG's `width`/`height`, which already
//! include the output scale.

use log::{debug, info};

use super::Error;

/// Rasterizes an SVG document into PNG bytes.
///
/// System fonts are loaded so text renders with the requested families where
/// they are installed.
///
/// # Errors
///
/// Returns [`Error::SvgParse`] if the SVG is rejected, or [`Error::Raster`]
/// if the image is empty or cannot be encoded.
pub fn rasterize(svg: &str) -> Result<Vec<u8>, Error> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    debug!(fonts = opt.fontdb.len(); "Font database loaded");

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|err| Error::SvgParse(err.to_string()))?;
    let size = tree.size().to_int_size();

    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height()).ok_or_else(|| {
        Error::Raster(format!(
            "cannot allocate a {}x{} image",
            size.width(),
            size.height()
        ))
    })?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::default(),
        &mut pixmap.as_mut(),
    );

    let png = pixmap
        .encode_png()
        .map_err(|err| Error::Raster(err.to_string()))?;
    info!(width = size.width(), height = size.height(), bytes = png.len(); "PNG encoded");
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_rasterize_uses_svg_size() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 5" width="20" height="10"><rect x="0" y="0" width="10" height="5" fill="red"/></svg>"#;
        let png = rasterize(svg).unwrap();

        assert_eq!(png[..8], PNG_SIGNATURE);
        // IHDR width and height, big endian
        assert_eq!(u32::from_be_bytes([png[16], png[17], png[18], png[19]]), 20);
        assert_eq!(u32::from_be_bytes([png[20], png[21], png[22], png[23]]), 10);
    }

    #[test]
    fn test_rasterize_rejects_garbage() {
        assert!(matches!(rasterize("not svg"), Err(Error::SvgParse(_))));
    }
}
