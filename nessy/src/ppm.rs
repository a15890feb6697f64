//! Raw grayscale PPM (P6) frame output. The framebuffer holds one byte per
//! pixel; each byte is replicated across the three P6 channels.

use std::io::{self, Write};
use std::path::Path;

use crate::ppu::{FRAME_HEIGHT, FRAME_WIDTH};

pub fn write_frame(path: &Path, framebuffer: &[u8]) -> io::Result<()> {
    debug_assert_eq!(framebuffer.len(), FRAME_WIDTH * FRAME_HEIGHT);

    let mut file = std::fs::File::create(path)?;
    write!(file, "P6\n{FRAME_WIDTH} {FRAME_HEIGHT}\n255\n")?;

    let mut rgb = Vec::with_capacity(framebuffer.len() * 3);
    for &byte in framebuffer {
        rgb.extend_from_slice(&[byte, byte, byte]);
    }
    file.write_all(&rgb)
}

pub fn frame_path(dir: &Path, frame_index: u32) -> std::path::PathBuf {
    dir.join(format!("frame_{frame_index:03}.ppm"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn writes_well_formed_p6_header_and_body() {
        let dir = std::env::temp_dir();
        let path = dir.join("nessy_ppm_test.ppm");
        let framebuffer = vec![0u8; FRAME_WIDTH * FRAME_HEIGHT];
        write_frame(&path, &framebuffer).unwrap();

        let mut contents = Vec::new();
        std::fs::File::open(&path).unwrap().read_to_end(&mut contents).unwrap();
        let header = format!("P6\n{FRAME_WIDTH} {FRAME_HEIGHT}\n255\n");
        assert!(contents.starts_with(header.as_bytes()));
        assert_eq!(contents.len(), header.len() + FRAME_WIDTH * FRAME_HEIGHT * 3);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn frame_path_zero_pads_index() {
        let path = frame_path(Path::new("/tmp"), 7);
        assert_eq!(path, Path::new("/tmp/frame_007.ppm"));
    }
}
