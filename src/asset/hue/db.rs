use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::*;
use measure_time::*;
use static_assertions::const_assert_eq;
use std::cmp;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Error, ErrorKind, prelude::*};
use std::path::Path;

use super::{Hue, RECORD_LEN};
use crate::fs::FileSystem;
use crate::util::VecExt;

pub const FILE_NAME: &str = "hues.mul";

pub const HUE_COUNT: usize = 3000;
pub const HUES_PER_BLOCK: usize = 8;
pub const BLOCK_LEN: usize = 4 + HUES_PER_BLOCK * RECORD_LEN;
pub const MAX_BLOCK_COUNT: usize = HUE_COUNT / HUES_PER_BLOCK;
const_assert_eq!(BLOCK_LEN, 708);
const_assert_eq!(MAX_BLOCK_COUNT, 375);

/// Hue references may carry flags above the index bits.
pub const INDEX_MASK: i32 = 0x3fff;

/// Opaque per-block value, written back as it was read.
pub type BlockHeader = i32;

/// The hue table. Always holds `HUE_COUNT` hues, the ones missing from the file are `Hue::new()`.
///
/// Not synchronized. To reload, build a new `HueDb` and replace the old one with it.
#[derive(Clone, Debug)]
pub struct HueDb {
    hues: Box<[Hue]>,
    headers: Vec<BlockHeader>,
}

impl HueDb {
    /// Table of empty hues that can't be saved.
    pub fn new() -> Self {
        Self {
            hues: Vec::from_fn(HUE_COUNT, Hue::new).into_boxed_slice(),
            headers: Vec::new(),
        }
    }

    /// Loads `hues.mul` from `fs`. If the file doesn't exist the table is empty.
    pub fn load(fs: &FileSystem) -> io::Result<Self> {
        let len = match fs.metadata(FILE_NAME) {
            Ok(m) => m.len(),
            Err(e) => if e.kind() == ErrorKind::NotFound {
                info!("{} not found, all hues are empty", FILE_NAME);
                return Ok(Self::new());
            } else {
                return Err(e);
            }
        };
        let r = Self::read(&mut fs.reader(FILE_NAME)?, len)?;
        info!("loaded {} hues from {}", r.loaded_count(), FILE_NAME);
        Ok(r)
    }

    pub fn read_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let f = File::open(path)?;
        let len = f.metadata()?.len();
        Self::read(&mut BufReader::new(f), len)
    }

    /// Reads hue blocks from `rd` which is `len` bytes long. Trailing bytes that don't make up
    /// a whole block and blocks past `MAX_BLOCK_COUNT` are ignored.
    pub fn read(rd: &mut impl Read, len: u64) -> io::Result<Self> {
        debug_time!("HueDb::read()");

        let block_count = cmp::min(len / BLOCK_LEN as u64, MAX_BLOCK_COUNT as u64) as usize;
        let mut headers = Vec::with_capacity(block_count);
        let mut hues = Vec::with_capacity(HUE_COUNT);
        for _ in 0..block_count {
            headers.push(rd.read_i32::<LittleEndian>()?);
            for _ in 0..HUES_PER_BLOCK {
                let index = hues.len();
                hues.push(Hue::read(index, rd)?);
            }
        }
        debug!("read {} hue blocks", block_count);
        for index in hues.len()..HUE_COUNT {
            hues.push(Hue::new(index));
        }

        Ok(Self {
            hues: hues.into_boxed_slice(),
            headers,
        })
    }

    /// Fails with `InvalidInput` if the table wasn't read from a file. The file isn't created in
    /// this case.
    pub fn write_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        self.check_writable()?;
        let mut wr = BufWriter::new(File::create(path)?);
        self.write(&mut wr)?;
        wr.flush()
    }

    /// Writes the blocks that were read, each with its original header.
    pub fn write(&self, wr: &mut impl Write) -> io::Result<()> {
        debug_time!("HueDb::write()");

        self.check_writable()?;
        for (header, hues) in self.headers.iter().zip(self.hues.chunks(HUES_PER_BLOCK)) {
            wr.write_i32::<LittleEndian>(*header)?;
            for hue in hues {
                hue.write(wr)?;
            }
        }
        Ok(())
    }

    /// Returns hue by its raw reference. Bits above `INDEX_MASK` are dropped. Indices that are
    /// still out of range resolve to hue 0.
    pub fn get(&self, index: i32) -> &Hue {
        &self.hues[Self::resolve_index(index)]
    }

    pub fn get_mut(&mut self, index: i32) -> &mut Hue {
        &mut self.hues[Self::resolve_index(index)]
    }

    pub fn hues(&self) -> &[Hue] {
        &self.hues
    }

    pub fn headers(&self) -> &[BlockHeader] {
        &self.headers
    }

    /// Number of hues that came from the file.
    pub fn loaded_count(&self) -> usize {
        self.headers.len() * HUES_PER_BLOCK
    }

    fn resolve_index(index: i32) -> usize {
        let index = index & INDEX_MASK;
        if index >= 0 && (index as usize) < HUE_COUNT {
            index as usize
        } else {
            0
        }
    }

    fn check_writable(&self) -> io::Result<()> {
        if self.headers.is_empty() {
            Err(Error::new(ErrorKind::InvalidInput,
                "hue table has no block headers, it must be read from a file before writing"))
        } else {
            Ok(())
        }
    }
}

impl Default for HueDb {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;
    use crate::util::test::hues_file;

    fn read(data: &[u8]) -> HueDb {
        HueDb::read(&mut Cursor::new(data), data.len() as u64).unwrap()
    }

    #[test]
    fn read_() {
        let db = read(&hues_file(3));
        assert_eq!(db.headers(), &[0x1000_0000, 0x1000_0001, 0x1000_0002]);
        assert_eq!(db.loaded_count(), 24);
        assert_eq!(db.hues().len(), HUE_COUNT);
        for (i, hue) in db.hues().iter().enumerate() {
            assert_eq!(hue.index(), i);
        }
        assert_eq!(db.get(23).name(), b"hue23");
        assert_eq!(db.get(23).colors[0].to_stored(), 23);
        assert_eq!(db.get(24), &Hue::new(24));
        assert_eq!(db.get(2999), &Hue::new(2999));
    }

    #[test]
    fn read_ignores_partial_block() {
        let mut data = hues_file(2);
        data.extend_from_slice(&[1; BLOCK_LEN - 1]);
        let db = read(&data);
        assert_eq!(db.headers().len(), 2);
        assert_eq!(db.get(16), &Hue::new(16));
    }

    #[test]
    fn read_caps_block_count() {
        let data = hues_file(MAX_BLOCK_COUNT + 1);
        let db = read(&data);
        assert_eq!(db.headers().len(), MAX_BLOCK_COUNT);
        assert_eq!(db.loaded_count(), HUE_COUNT);
        assert_eq!(db.get(2999).name(), b"hue2999");

        let mut act = Vec::new();
        db.write(&mut act).unwrap();
        assert_eq!(&act[..], &data[..MAX_BLOCK_COUNT * BLOCK_LEN]);
    }

    #[test]
    fn read_short_stream() {
        let data = hues_file(2);
        let err = HueDb::read(&mut Cursor::new(&data[..BLOCK_LEN]), data.len() as u64)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn read_write() {
        let data = hues_file(10);
        let db = read(&data);
        let mut act = Vec::new();
        db.write(&mut act).unwrap();
        assert_eq!(act, data);
    }

    #[test]
    fn edit_and_write() {
        let data = hues_file(1);
        let mut db = read(&data);
        db.get_mut(3).set_name(&b"Edited"[..]);
        db.get_mut(3).colors[0] = crate::graphics::color::HueColor::from_stored(0x7fff);

        let mut act = Vec::new();
        db.write(&mut act).unwrap();
        assert_eq!(act.len(), data.len());
        let db = read(&act);
        assert_eq!(db.get(3).name(), b"Edited");
        assert_eq!(db.get(3).colors[0].to_stored(), 0x7fff);
        assert_eq!(db.get(2).name(), b"hue2");
    }

    #[test]
    fn write_without_read() {
        let db = HueDb::new();
        let mut act = Vec::new();
        let err = db.write(&mut act).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(act.is_empty());
    }

    #[test]
    fn write_file_without_read() {
        let path = std::env::temp_dir().join(format!("hues-unwritable-{}.mul", std::process::id()));
        let err = HueDb::new().write_file(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(!path.exists());
    }

    #[test]
    fn get() {
        let db = read(&hues_file(2));
        assert_eq!(db.get(5).index(), 5);
        assert_eq!(db.get(0x4000 | 5).index(), 5);
        assert_eq!(db.get(0x8000 | 0x4000 | 5).index(), 5);
        assert_eq!(db.get(2999).index(), 2999);
        assert_eq!(db.get(3000).index(), 0);
        assert_eq!(db.get(0x3fff).index(), 0);
        // -1 & 0x3fff == 0x3fff
        assert_eq!(db.get(-1).index(), 0);
        assert_eq!(db.get(-1).name(), b"hue0");
        assert_eq!(db.get(i32::min_value() | 7).index(), 7);
    }

    #[test]
    fn new_is_empty() {
        let db = HueDb::new();
        assert!(db.headers().is_empty());
        assert_eq!(db.loaded_count(), 0);
        assert_eq!(db.hues().len(), HUE_COUNT);
        assert!(db.hues().iter().enumerate().all(|(i, h)| h == &Hue::new(i)));
    }

    #[test]
    fn load() {
        let dir = std::env::temp_dir().join(format!("hues-db-load-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut fs = FileSystem::new();
        fs.register_provider(crate::fs::std::new_provider(&dir).unwrap());

        let missing = HueDb::load(&fs);
        std::fs::write(dir.join(FILE_NAME), hues_file(2)).unwrap();
        let present = HueDb::load(&fs);
        std::fs::remove_dir_all(&dir).unwrap();

        let missing = missing.unwrap();
        assert!(missing.headers().is_empty());
        assert_eq!(missing.get(1), &Hue::new(1));

        let present = present.unwrap();
        assert_eq!(present.loaded_count(), 16);
        assert_eq!(present.get(15).name(), b"hue15");
    }

    #[test]
    fn read_write_file() {
        let data = hues_file(4);
        let dir = std::env::temp_dir().join(format!("hues-db-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let src = dir.join("src.mul");
        let dst = dir.join("dst.mul");
        std::fs::write(&src, &data).unwrap();

        let db = HueDb::read_file(&src).unwrap();
        db.write_file(&dst).unwrap();
        let act = std::fs::read(&dst).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
        assert_eq!(act, data);
    }
}
