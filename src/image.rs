use crate::cpu::MEMORY_SIZE;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("memory image must be exactly {} bytes, but it was {len}", MEMORY_SIZE)]
    WrongSize { len: usize },
    #[error("could not read memory image {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/**
 * A complete 64k memory image, exactly as the CPU will see it. Any other size is rejected when
 * the image is built, so everything downstream (engine construction, resets) can rely on the
 * length without checking again.
 */
#[derive(Clone, PartialEq, Eq)]
pub struct MemoryImage {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl MemoryImage {
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<MemoryImage, ImageError> {
        let path = path.as_ref();
        log::debug!("Reading memory image from {}", path.display());
        let data = fs::read(path).map_err(|source| ImageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        MemoryImage::try_from(data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }
}

/* builders and accessors for setting up tests */
#[cfg(test)]
impl MemoryImage {
    pub fn zeroed() -> MemoryImage {
        MemoryImage::from_array(Box::new([0; MEMORY_SIZE]))
    }

    pub fn from_array(bytes: Box<[u8; MEMORY_SIZE]>) -> MemoryImage {
        MemoryImage { bytes }
    }

    /* an otherwise zeroed image with `program` copied in at `start` */
    pub fn with_program(start: u16, program: &[u8]) -> MemoryImage {
        let mut image = MemoryImage::zeroed();
        let mut address = start;
        for &byte in program {
            image.bytes[address as usize] = byte;
            address = address.wrapping_add(1);
        }
        image
    }

    pub fn set(&mut self, address: u16, value: u8) {
        self.bytes[address as usize] = value;
    }

    pub fn get(&self, address: u16) -> u8 {
        self.bytes[address as usize]
    }
}

impl TryFrom<Vec<u8>> for MemoryImage {
    type Error = ImageError;

    fn try_from(data: Vec<u8>) -> Result<Self, Self::Error> {
        let len = data.len();
        let bytes: Box<[u8; MEMORY_SIZE]> = data
            .into_boxed_slice()
            .try_into()
            .map_err(|_| ImageError::WrongSize { len })?;
        Ok(MemoryImage { bytes })
    }
}

impl fmt::Debug for MemoryImage {
    /* 64k of bytes is not useful in a debug print */
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryImage")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_exact_size_accepted() {
        let image = MemoryImage::try_from(vec![0x42; MEMORY_SIZE]).unwrap();
        assert_eq!(image.get(0x0000), 0x42);
        assert_eq!(image.get(0xffff), 0x42);
        assert_eq!(image.as_bytes().len(), MEMORY_SIZE);
    }

    #[test]
    fn test_wrong_sizes_rejected() {
        for len in [0, 1, MEMORY_SIZE - 1, MEMORY_SIZE + 1] {
            match MemoryImage::try_from(vec![0; len]) {
                Err(ImageError::WrongSize { len: reported }) => assert_eq!(reported, len),
                other => panic!("expected a size error for {len} bytes, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_with_program() {
        let image = MemoryImage::with_program(0x0500, &[0xa9, 0x05, 0x60]);
        assert_eq!(image.get(0x04ff), 0x00);
        assert_eq!(image.get(0x0500), 0xa9);
        assert_eq!(image.get(0x0501), 0x05);
        assert_eq!(image.get(0x0502), 0x60);
        assert_eq!(image.get(0x0503), 0x00);

        /* writes past the top of memory wrap to the bottom */
        let wrapped = MemoryImage::with_program(0xffff, &[0x11, 0x22]);
        assert_eq!(wrapped.get(0xffff), 0x11);
        assert_eq!(wrapped.get(0x0000), 0x22);
    }

    #[test]
    fn test_read_file() {
        let dir = std::env::temp_dir().join(format!("sixfive-image-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let good = dir.join("good.bin");
        let mut contents = vec![0; MEMORY_SIZE];
        contents[0x0500] = 0xea;
        fs::File::create(&good).unwrap().write_all(&contents).unwrap();
        assert_eq!(MemoryImage::read_file(&good).unwrap().get(0x0500), 0xea);

        let short = dir.join("short.bin");
        fs::write(&short, [0u8; 10]).unwrap();
        assert!(matches!(
            MemoryImage::read_file(&short),
            Err(ImageError::WrongSize { len: 10 })
        ));

        let missing = dir.join("missing.bin");
        assert!(matches!(
            MemoryImage::read_file(&missing),
            Err(ImageError::Io { .. })
        ));

        fs::remove_dir_all(&dir).unwrap();
    }
}
