#![deny(non_snake_case)]

use byteorder::{ByteOrder, LittleEndian};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::*;
use std::fs::File;
use std::io::{self, BufWriter, Error, ErrorKind, prelude::*};
use std::path::Path;
use std::process;

use hues::asset::hue::db::{HueDb, FILE_NAME, HUE_COUNT};
use hues::fs::{self, FileSystem};
use hues::graphics::remap::{PixelBufMut, RemapMode};

fn arg<'a>(m: &'a ArgMatches, name: &str) -> io::Result<&'a str> {
    m.value_of(name)
        .ok_or_else(|| Error::new(ErrorKind::InvalidInput, format!("missing <{}>", name)))
}

fn parse_arg<T: std::str::FromStr>(m: &ArgMatches, name: &str) -> io::Result<T> {
    let v = arg(m, name)?;
    v.parse().map_err(|_| Error::new(ErrorKind::InvalidInput,
        format!("invalid <{}>: {}", name, v)))
}

fn list(db: &HueDb, named_only: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for hue in db.hues() {
        if named_only && (hue.name().is_empty() || hue.name() == b"Null") {
            continue;
        }
        writeln!(out, "{:4} {}", hue.index(), hue.name_lossy())?;
    }
    Ok(())
}

fn show(db: &HueDb, index: i32) -> io::Result<()> {
    let hue = db.get(index);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "index:       {}", hue.index())?;
    writeln!(out, "name:        {}", hue.name_lossy())?;
    writeln!(out, "table start: {}", hue.table_start.to_stored())?;
    writeln!(out, "table end:   {}", hue.table_end.to_stored())?;
    for (i, c) in hue.colors.iter().enumerate() {
        let (r, g, b) = c.to_rgb24().colors();
        writeln!(out, "{:2}: 0x{:04x} #{:02x}{:02x}{:02x}", i, c.to_stored(), r, g, b)?;
    }
    Ok(())
}

fn read_pixels(path: &str, width: usize, height: usize) -> io::Result<Vec<u16>> {
    let mut data = Vec::new();
    File::open(path)?.read_to_end(&mut data)?;
    if Some(data.len()) != width.checked_mul(height).and_then(|v| v.checked_mul(2)) {
        return Err(Error::new(ErrorKind::InvalidData,
            format!("{} is {} bytes long, expected {}x{} 16-bit pixels",
                path, data.len(), width, height)));
    }
    let mut pixels = vec![0; width * height];
    LittleEndian::read_u16_into(&data, &mut pixels);
    Ok(pixels)
}

fn remap(db: &HueDb, m: &ArgMatches) -> io::Result<()> {
    let hue = db.get(parse_arg(m, "index")?);
    let width = parse_arg(m, "width")?;
    let height = parse_arg(m, "height")?;
    let mode = RemapMode::new(m.is_present("gray-only"));

    let mut pixels = read_pixels(arg(m, "input")?, width, height)?;
    hue.apply_to(&mut PixelBufMut::new(&mut pixels, width, height, width)?, mode);
    info!("applied hue {} ({}) in {:?} mode", hue.index(), hue.name_lossy(), mode);

    let mut data = vec![0; pixels.len() * 2];
    LittleEndian::write_u16_into(&pixels, &mut data);
    File::create(arg(m, "output")?)?.write_all(&data)
}

fn spectrum(db: &HueDb, m: &ArgMatches) -> io::Result<()> {
    let hue = db.get(parse_arg(m, "index")?);
    let width: usize = parse_arg(m, "width")?;
    let height = parse_arg(m, "height")?;
    if width == 0 {
        return Err(Error::new(ErrorKind::InvalidInput, "<width> must not be 0"));
    }
    let img = hue.spectrum(width, height);
    let mut wr = BufWriter::new(File::create(arg(m, "output")?)?);
    for c in img.iter() {
        wr.write_all(&[c.r(), c.g(), c.b()])?;
    }
    wr.flush()
}

fn run(m: &ArgMatches) -> io::Result<()> {
    let data_dir = arg(m, "data-dir")?;
    let mut fs = FileSystem::new();
    fs.register_provider(fs::std::new_provider(data_dir)?);
    if let Some(path) = fs.resolve(FILE_NAME) {
        info!("reading {}", path.display());
    }
    let mut db = HueDb::load(&fs)?;

    match m.subcommand() {
        ("list", Some(m)) => list(&db, m.is_present("named")),
        ("show", Some(m)) => show(&db, parse_arg(m, "index")?),
        ("export", Some(m)) => {
            let hue = db.get(parse_arg(m, "index")?);
            hue.export_file(arg(m, "file")?)?;
            info!("exported hue {} ({})", hue.index(), hue.name_lossy());
            Ok(())
        }
        ("import", Some(m)) => {
            let hue = db.get_mut(parse_arg(m, "index")?);
            let skipped = hue.import_file(arg(m, "file")?)?;
            println!("imported hue {} ({}), skipped {} line(s)",
                hue.index(), hue.name_lossy(), skipped);
            db.write_file(Path::new(arg(m, "out-dir")?).join(FILE_NAME))
        }
        ("resave", Some(m)) => db.write_file(Path::new(arg(m, "out-dir")?).join(FILE_NAME)),
        ("remap", Some(m)) => remap(&db, m),
        ("spectrum", Some(m)) => spectrum(&db, m),
        (cmd, _) => Err(Error::new(ErrorKind::InvalidInput, format!("unknown command: {}", cmd))),
    }
}

fn main() {
    env_logger::init();

    let index_arg = || Arg::with_name("index")
        .required(true)
        .allow_hyphen_values(true)
        .help("Hue index, higher bits are ignored");
    let size_args = || vec![
        Arg::with_name("width").required(true),
        Arg::with_name("height").required(true),
    ];
    let about_index = format!("Hue index is masked with 0x3fff, indices >= {} resolve to 0", HUE_COUNT);
    let matches = App::new("hues")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspects and edits hues.mul")
        .after_help(&about_index[..])
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(Arg::with_name("data-dir")
            .short("d")
            .long("data-dir")
            .takes_value(true)
            .default_value(".")
            .help("Directory with game files"))
        .subcommand(SubCommand::with_name("list")
            .about("Lists hue names")
            .arg(Arg::with_name("named")
                .long("named")
                .help("Skips empty hues")))
        .subcommand(SubCommand::with_name("show")
            .about("Prints hue colors")
            .arg(index_arg()))
        .subcommand(SubCommand::with_name("export")
            .about("Writes hue to a text file")
            .arg(index_arg())
            .arg(Arg::with_name("file").required(true)))
        .subcommand(SubCommand::with_name("import")
            .about("Reads hue from a text file and saves hues.mul to <out-dir>")
            .arg(index_arg())
            .arg(Arg::with_name("file").required(true))
            .arg(Arg::with_name("out-dir").required(true)))
        .subcommand(SubCommand::with_name("resave")
            .about("Saves hues.mul to <out-dir> unchanged")
            .arg(Arg::with_name("out-dir").required(true)))
        .subcommand(SubCommand::with_name("remap")
            .about("Applies hue to raw 16-bit little-endian pixels")
            .arg(index_arg())
            .args(&size_args())
            .arg(Arg::with_name("input").required(true))
            .arg(Arg::with_name("output").required(true))
            .arg(Arg::with_name("gray-only")
                .long("gray-only")
                .help("Recolors gray pixels only")))
        .subcommand(SubCommand::with_name("spectrum")
            .about("Writes hue spectrum as raw 24-bit RGB pixels")
            .arg(index_arg())
            .args(&size_args())
            .arg(Arg::with_name("output").required(true)))
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
