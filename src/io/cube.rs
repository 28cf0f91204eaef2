//! Density cubes stored as FITS files.
//!
//! The pipeline reads four header cards besides the image shape:
//!
//! - `CDELT1`: pixel scale in parsec per pixel
//! - `NAXIS1`: grid size (all three axes must match)
//! - `XOFF`, `YOFF`: offset of the true centre from the grid centre, in parsec

use std::path::Path;

use crate::domain::{CubeGeometry, DensityCube};
use crate::error::{AppError, AppResult};
use crate::io::fits::{FitsHeader, FitsImage, HeaderValue, parse_fits, read_fits, write_fits};

/// Load a density cube and its geometry from a FITS file.
pub fn read_cube(path: &Path) -> AppResult<DensityCube> {
    let image = read_fits(path)?;
    cube_from_image(image, &path.display().to_string())
}

/// Same as `read_cube` for an in-memory file.
pub fn parse_cube(bytes: &[u8], name: &str) -> AppResult<DensityCube> {
    let image = parse_fits(bytes, Path::new(name))?;
    cube_from_image(image, name)
}

pub fn cube_from_image(image: FitsImage, name: &str) -> AppResult<DensityCube> {
    if image.shape.len() != 3 {
        return Err(AppError::invalid_grid(format!(
            "{name}: expected a 3D image, got NAXIS = {}",
            image.shape.len()
        )));
    }
    let [nx, ny, nz] = [image.shape[0], image.shape[1], image.shape[2]];
    if nx != ny || ny != nz {
        return Err(AppError::invalid_grid(format!(
            "{name}: grid is not cubic ({nx} x {ny} x {nz})"
        )));
    }

    let geometry = geometry_from_header(&image.header, name)?;
    if geometry.npix != nx {
        return Err(AppError::invalid_grid(format!(
            "{name}: NAXIS1 = {} disagrees with data shape {nx}",
            geometry.npix
        )));
    }
    DensityCube::new(geometry, image.data)
}

/// Pull the pixel scale, grid size and centre offsets out of a header.
pub fn geometry_from_header(header: &FitsHeader, name: &str) -> AppResult<CubeGeometry> {
    let real = |key: &str| {
        header
            .get_f64(key)
            .ok_or_else(|| AppError::missing_metadata(key, name))
    };
    let npix = header
        .get_i64("NAXIS1")
        .filter(|n| *n >= 0)
        .ok_or_else(|| AppError::missing_metadata("NAXIS1", name))?;

    Ok(CubeGeometry {
        pixel_scale_pc: real("CDELT1")?,
        npix: npix as usize,
        x_offset_pc: real("XOFF")?,
        y_offset_pc: real("YOFF")?,
    })
}

/// Build the FITS representation of a cube, with its geometry cards.
pub fn cube_to_image(cube: &DensityCube, extra: &[(&str, HeaderValue, &str)]) -> FitsImage {
    let g = cube.geometry();
    let n = g.npix;
    let mut header = FitsHeader::default();
    for key in ["NAXIS1", "NAXIS2", "NAXIS3"] {
        header.set(key, HeaderValue::Integer(n as i64), "");
    }
    for key in ["CDELT1", "CDELT2", "CDELT3"] {
        header.set(key, HeaderValue::Real(g.pixel_scale_pc), "pixel scale (pc)");
    }
    header.set("XOFF", HeaderValue::Real(g.x_offset_pc), "x offset of centre (pc)");
    header.set("YOFF", HeaderValue::Real(g.y_offset_pc), "y offset of centre (pc)");
    header.set("BUNIT", HeaderValue::Text("cm-3".to_string()), "electron density");
    for (key, value, comment) in extra {
        header.set(key, value.clone(), comment);
    }

    FitsImage {
        header,
        shape: vec![n, n, n],
        data: cube.data().to_vec(),
    }
}

pub fn write_cube(path: &Path, cube: &DensityCube, extra: &[(&str, HeaderValue, &str)]) -> AppResult<()> {
    write_fits(path, &cube_to_image(cube, extra))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::fits::encode_fits;

    fn geometry() -> CubeGeometry {
        CubeGeometry {
            pixel_scale_pc: 0.02,
            npix: 4,
            x_offset_pc: 0.01,
            y_offset_pc: -0.005,
        }
    }

    #[test]
    fn cube_round_trips_through_fits_bytes() {
        let data: Vec<f64> = (0..64).map(|i| i as f64 * 0.5).collect();
        let cube = DensityCube::new(geometry(), data).unwrap();
        let bytes = encode_fits(&cube_to_image(&cube, &[]));
        let back = parse_cube(&bytes, "mem.fits").unwrap();
        assert_eq!(back, cube);
    }

    #[test]
    fn missing_offset_card_is_reported() {
        let cube = DensityCube::filled(geometry(), 1.0).unwrap();
        let mut image = cube_to_image(&cube, &[]);
        image.header.cards.retain(|c| c.key != "YOFF");
        let err = cube_from_image(image, "noyoff.fits").unwrap_err();
        match err {
            AppError::MissingMetadata { key, .. } => assert_eq!(key, "YOFF"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_cubic_images_are_rejected() {
        let image = FitsImage {
            header: cube_to_image(&DensityCube::filled(geometry(), 0.0).unwrap(), &[]).header,
            shape: vec![4, 4, 6],
            data: vec![0.0; 96],
        };
        let err = cube_from_image(image, "box.fits").unwrap_err();
        assert!(matches!(err, AppError::InvalidGrid { .. }), "{err}");
    }

    #[test]
    fn two_dimensional_images_are_rejected() {
        let image = FitsImage {
            header: FitsHeader::default(),
            shape: vec![4, 4],
            data: vec![0.0; 16],
        };
        assert!(matches!(
            cube_from_image(image, "flat.fits"),
            Err(AppError::InvalidGrid { .. })
        ));
    }
}
