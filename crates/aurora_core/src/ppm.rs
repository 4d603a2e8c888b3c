//! Binary PPM (P6) reading and writing.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use aurora_math::{Color, ColorExt};

use crate::image::{Image, ImageError, ImageResult};

/// Write an image as 8-bit binary PPM. Channels are clipped to [0, 1].
pub fn write_ppm(path: impl AsRef<Path>, image: &Image) -> ImageResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P6 {} {} 255", image.width(), image.height())?;
    writer.write_all(&image.to_rgb8())?;
    writer.flush()?;
    Ok(())
}

/// Read a binary PPM, normalizing samples by the file's maxval.
///
/// Both 8-bit and 16-bit (maxval above 255) rasters are accepted.
pub fn read_ppm(path: impl AsRef<Path>) -> ImageResult<Image> {
    let bytes = fs::read(path)?;
    parse_ppm(&bytes)
}

fn parse_ppm(bytes: &[u8]) -> ImageResult<Image> {
    let mut header = HeaderReader { bytes, pos: 0 };

    let magic = header.token()?;
    if magic != b"P6" {
        return Err(format_error(format!(
            "unsupported magic '{}'",
            String::from_utf8_lossy(magic)
        )));
    }
    let width = header.number()?;
    let height = header.number()?;
    let maxval = header.number()?;
    if maxval == 0 || maxval > u32::from(u16::MAX) {
        return Err(format_error(format!("unsupported maxval {maxval}")));
    }
    // Samples above 255 take two bytes, most significant first
    let sample_size = if maxval > 255 { 2 } else { 1 };

    // Exactly one whitespace byte separates the header from the raster
    let start = header.pos + 1;
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3 * sample_size))
        .ok_or_else(|| format_error(format!("{width}x{height} raster is too large")))?;
    let raster = start
        .checked_add(len)
        .and_then(|end| bytes.get(start..end))
        .ok_or_else(|| format_error(format!("truncated raster, expected {len} bytes")))?;

    let scale = 1.0 / maxval as f32;
    let samples: Vec<f32> = match sample_size {
        1 => raster.iter().map(|&b| f32::from(b)).collect(),
        _ => raster
            .chunks_exact(2)
            .map(|b| f32::from(u16::from_be_bytes([b[0], b[1]])))
            .collect(),
    };
    let pixels = samples
        .chunks_exact(3)
        .map(|rgb| (Color::new(rgb[0], rgb[1], rgb[2]) * scale).saturate())
        .collect();

    Image::from_pixels(width, height, pixels)
}

fn format_error(message: String) -> ImageError {
    ImageError::Format(message)
}

/// Whitespace-separated header tokens with `#` comments skipped.
struct HeaderReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> HeaderReader<'a> {
    fn token(&mut self) -> ImageResult<&'a [u8]> {
        loop {
            match self.bytes.get(self.pos) {
                Some(b'#') => {
                    while !matches!(self.bytes.get(self.pos), None | Some(b'\n')) {
                        self.pos += 1;
                    }
                }
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(_) => break,
                None => return Err(format_error("unexpected end of header".into())),
            }
        }

        let start = self.pos;
        while matches!(self.bytes.get(self.pos), Some(b) if !b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        Ok(&self.bytes[start..self.pos])
    }

    fn number(&mut self) -> ImageResult<u32> {
        let token = self.token()?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                format_error(format!(
                    "invalid header number '{}'",
                    String::from_utf8_lossy(token)
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("aurora_{name}_{}.ppm", std::process::id()))
    }

    #[test]
    fn test_write_header_and_raster() {
        let mut image = Image::new(2, 1);
        image.set(0, 0, Color::new(1.0, 0.0, 0.5));
        image.set(1, 0, Color::new(2.0, -1.0, 0.0));
        let path = temp_path("write");

        write_ppm(&path, &image).unwrap();
        let bytes = fs::read(&path).unwrap();
        let _ = fs::remove_file(&path);

        let header = b"P6 2 1 255\n";
        assert_eq!(&bytes[..header.len()], header);
        assert_eq!(&bytes[header.len()..], &[255, 0, 127, 255, 0, 0]);
    }

    #[test]
    fn test_write_then_read() {
        let mut image = Image::new(3, 2);
        image.set(2, 1, Color::ONE);
        image.set(0, 1, Color::new(0.0, 1.0, 0.0));
        let path = temp_path("reload");

        write_ppm(&path, &image).unwrap();
        let reloaded = read_ppm(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(reloaded, image);
    }

    #[test]
    fn test_parse_comments_and_maxval() {
        let mut bytes = b"P6\n# made by hand\n1 1\n# depth\n15\n".to_vec();
        bytes.extend_from_slice(&[15, 0, 3]);

        let image = parse_ppm(&bytes).unwrap();
        let c = image.get(0, 0);
        assert!((c.x - 1.0).abs() < 1e-6);
        assert_eq!(c.y, 0.0);
        assert!((c.z - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_parse_rejects_bad_files() {
        assert!(matches!(parse_ppm(b"P3 1 1 255\n0 0 0"), Err(ImageError::Format(_))));
        assert!(matches!(parse_ppm(b"P6 1 1 0\n\0\0\0"), Err(ImageError::Format(_))));
        assert!(matches!(parse_ppm(b"P6 2 2 255\n\0\0\0"), Err(ImageError::Format(_))));
        assert!(matches!(parse_ppm(b"P6 x 1 255\n\0\0\0"), Err(ImageError::Format(_))));
        assert!(matches!(parse_ppm(b"P6 1"), Err(ImageError::Format(_))));
        assert!(matches!(parse_ppm(b"P6 1 1 65536\n\0\0\0"), Err(ImageError::Format(_))));
        assert!(matches!(
            parse_ppm(b"P6 4294967295 4294967295 255\n\0\0\0"),
            Err(ImageError::Format(_))
        ));
    }

    #[test]
    fn test_parse_sixteen_bit() {
        let mut bytes = b"P6 2 1 1000\n".to_vec();
        bytes.extend_from_slice(&[0x03, 0xE8, 0x01, 0xF4, 0x00, 0x00]);
        bytes.extend_from_slice(&[0x00, 0xFA, 0xFF, 0xFF, 0x00, 0x64]);

        let image = parse_ppm(&bytes).unwrap();
        let a = image.get(0, 0);
        assert!((a.x - 1.0).abs() < 1e-6);
        assert!((a.y - 0.5).abs() < 1e-6);
        assert_eq!(a.z, 0.0);

        // 0xFFFF exceeds maxval and is clamped
        let b = image.get(1, 0);
        assert!((b.x - 0.25).abs() < 1e-6);
        assert_eq!(b.y, 1.0);
        assert!((b.z - 0.1).abs() < 1e-6);

        // Sixteen-bit rasters hold two bytes per sample
        assert!(matches!(parse_ppm(&bytes[..bytes.len() - 1]), Err(ImageError::Format(_))));
    }
}
