pub mod db;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::*;
use static_assertions::const_assert_eq;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, prelude::*};
use std::path::Path;

use crate::graphics::color::{HueColor, Rgb24};
use crate::graphics::remap::{self, PixelBufMut, Ramp, RemapMode, RAMP_LEN};
use crate::graphics::spectrum;
use crate::util::array2d::Array2d;
use crate::util::trim_ascii;

pub const NAME_LEN: usize = 20;

/// Size of a single hue record in `hues.mul`.
pub const RECORD_LEN: usize = RAMP_LEN * 2 + 2 * 2 + NAME_LEN;
const_assert_eq!(RECORD_LEN, 88);

/// Number of lines in the text export: name, table start, table end and the ramp.
pub const TEXT_FIELD_COUNT: usize = 3 + RAMP_LEN;

const DEFAULT_NAME: &[u8] = b"Null";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Hue {
    index: usize,
    pub colors: Ramp,
    pub table_start: HueColor,
    pub table_end: HueColor,
    name: Vec<u8>,
}

impl Hue {
    /// Creates the empty hue that stands in for indices not present in the file.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            colors: [HueColor::default(); RAMP_LEN],
            table_start: HueColor::default(),
            table_end: HueColor::default(),
            name: DEFAULT_NAME.into(),
        }
    }

    pub fn read(index: usize, rd: &mut impl Read) -> io::Result<Self> {
        let mut colors = [HueColor::default(); RAMP_LEN];
        for c in colors.iter_mut() {
            *c = HueColor::from_stored(rd.read_u16::<LittleEndian>()?);
        }
        let table_start = HueColor::from_stored(rd.read_u16::<LittleEndian>()?);
        let table_end = HueColor::from_stored(rd.read_u16::<LittleEndian>()?);

        let mut name = [0; NAME_LEN];
        rd.read_exact(&mut name)?;
        let len = name.iter().position(|&c| c == 0).unwrap_or(NAME_LEN);
        let name = name[..len].iter()
            .map(|&c| if c == b'\n' { b' ' } else { c })
            .collect();

        Ok(Self {
            index,
            colors,
            table_start,
            table_end,
            name,
        })
    }

    pub fn write(&self, wr: &mut impl Write) -> io::Result<()> {
        for c in self.colors.iter() {
            wr.write_u16::<LittleEndian>(c.to_stored())?;
        }
        wr.write_u16::<LittleEndian>(self.table_start.to_stored())?;
        wr.write_u16::<LittleEndian>(self.table_end.to_stored())?;

        let mut name = [0; NAME_LEN];
        let len = self.name.len().min(NAME_LEN);
        name[..len].copy_from_slice(&self.name[..len]);
        wr.write_all(&name)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Raw name bytes in the game's code page.
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    pub fn name_lossy(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.name)
    }

    /// Line breaks are replaced with spaces as they are on load.
    /// Names longer than `NAME_LEN` bytes are truncated when written.
    pub fn set_name(&mut self, name: impl Into<Vec<u8>>) {
        let mut name = name.into();
        for c in &mut name {
            if *c == b'\n' {
                *c = b' ';
            }
        }
        self.name = name;
    }

    /// Returns ramp entry `i` as 8-bit RGB.
    pub fn color(&self, i: usize) -> Rgb24 {
        self.colors[i].to_rgb24()
    }

    pub fn apply_to(&self, buf: &mut PixelBufMut, mode: RemapMode) {
        remap::apply_ramp(buf, &self.colors, mode);
    }

    /// Panics if `width` is zero.
    pub fn spectrum(&self, width: usize, height: usize) -> Array2d<Rgb24> {
        spectrum::spectrum(&self.colors, width, height)
    }

    /// Writes the hue as text: name, table start, table end, then the ramp colors.
    /// Colors are written in their on-disk form, one decimal number per line.
    pub fn export(&self, wr: &mut impl Write) -> io::Result<()> {
        wr.write_all(&self.name)?;
        wr.write_all(b"\n")?;
        writeln!(wr, "{}", self.table_start.to_stored())?;
        writeln!(wr, "{}", self.table_end.to_stored())?;
        for c in self.colors.iter() {
            writeln!(wr, "{}", c.to_stored())?;
        }
        Ok(())
    }

    pub fn export_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut wr = BufWriter::new(File::create(path)?);
        self.export(&mut wr)?;
        wr.flush()
    }

    /// Reads text written by `export()`. Lines are trimmed. The first line is the name. A line that
    /// isn't a valid `u16` is skipped and the field it was meant for is filled from the next line.
    /// Reading stops when all fields are filled, lines after that are ignored.
    /// Returns the number of skipped lines.
    pub fn import(&mut self, rd: &mut impl BufRead) -> io::Result<usize> {
        let mut field = 0;
        let mut skipped = 0;
        for (line_num, line) in rd.split(b'\n').enumerate() {
            if field >= TEXT_FIELD_COUNT {
                break;
            }
            let line = line?;
            let line = trim_ascii(&line);
            if field == 0 {
                self.set_name(line);
                field += 1;
                continue;
            }
            let v = match btoi::btoi::<u16>(line) {
                Ok(v) => HueColor::from_stored(v),
                Err(_) => {
                    debug!("hue {}: skipping malformed line {}: {:?}",
                        self.index, line_num + 1, String::from_utf8_lossy(line));
                    skipped += 1;
                    continue;
                }
            };
            match field {
                1 => self.table_start = v,
                2 => self.table_end = v,
                _ => self.colors[field - 3] = v,
            }
            field += 1;
        }
        Ok(skipped)
    }

    /// Like `import()` but a missing file leaves the hue unchanged.
    pub fn import_file(&mut self, path: impl AsRef<Path>) -> io::Result<usize> {
        let path = path.as_ref();
        let f = match File::open(path) {
            Ok(f) => f,
            Err(e) => if e.kind() == io::ErrorKind::NotFound {
                debug!("hue {}: nothing to import, `{}` doesn't exist",
                    self.index, path.display());
                return Ok(0);
            } else {
                return Err(e);
            }
        };
        let skipped = self.import(&mut BufReader::new(f))?;
        if skipped > 0 {
            warn!("hue {}: skipped {} malformed line(s) in `{}`",
                self.index, skipped, path.display());
        }
        Ok(skipped)
    }
}
