// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io;
use std::process;

use clap::{crate_version, value_t, App, Arg, ArgMatches};
use failure::{Error, ResultExt};
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageEncoder};
use log::info;

use seamcarve::imageio::{energy_to_image, grid_to_image, image_to_grid};
use seamcarve::{calculate_energy, CarveConfig, EnergyKind, SeamCarver};

fn app() -> App<'static, 'static> {
    App::new("seamcarve")
        .version(crate_version!())
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Content-aware image narrowing by seam carving")
        .arg(
            Arg::with_name("input")
                .help("The image to carve")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("width")
                .help("Width to carve the image down to")
                .short("w")
                .long("width")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("height")
                .help("Height of the result (rows below it are cropped; defaults to the input height)")
                .long("height")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("output")
                .help("Where to write the result; format follows the extension. Binary PGM on stdout if absent")
                .short("o")
                .long("output")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("energy-map")
                .help("Also write the starting energy map to this file")
                .long("energy-map")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("sigma")
                .help("Spread of the Gaussian blur")
                .long("sigma")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("inset")
                .help("Rows and columns on each side kept out of the seam search")
                .long("inset")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("guard")
                .help("Columns at the left and right edges priced out of the seam search")
                .long("guard")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("guard-value")
                .help("Cost given to the guard columns")
                .long("guard-value")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("energy")
                .help("How pixel energy is measured")
                .long("energy")
                .takes_value(true)
                .possible_values(&["blur", "gradient"]),
        )
}

fn config_from(matches: &ArgMatches) -> Result<CarveConfig, Error> {
    let mut config = CarveConfig::default();
    if matches.is_present("sigma") {
        config = config.with_sigma(value_t!(matches, "sigma", f32)?);
    }
    if matches.is_present("inset") {
        config = config.with_inset(value_t!(matches, "inset", usize)?);
    }
    if matches.is_present("guard") {
        config = config.with_guard_width(value_t!(matches, "guard", usize)?);
    }
    if matches.is_present("guard-value") {
        config = config.with_guard_value(value_t!(matches, "guard-value", f32)?);
    }
    if let Some(kind) = matches.value_of("energy") {
        config = config.with_energy(kind.parse::<EnergyKind>()?);
    }
    config.validate()?;
    Ok(config)
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let config = config_from(matches)?;
    let input = matches.value_of("input").unwrap_or_default();

    let source = image::open(input).with_context(|_| format!("could not read {}", input))?;
    let grid = image_to_grid(&source)?;
    let (width, height) = grid.dimensions();
    info!("loaded {} ({}x{})", input, width, height);

    let newwidth = value_t!(matches, "width", usize)?;
    let newheight = if matches.is_present("height") {
        value_t!(matches, "height", usize)?
    } else {
        height
    };

    if let Some(path) = matches.value_of("energy-map") {
        let energy = calculate_energy(&grid, config.energy, config.sigma)?;
        energy_to_image(&energy)
            .save(path)
            .with_context(|_| format!("could not write energy map to {}", path))?;
    }

    let carved = SeamCarver::new(config).carve(grid, newwidth, newheight)?;
    let result = grid_to_image(&carved);

    match matches.value_of("output") {
        Some(path) => result
            .save(path)
            .with_context(|_| format!("could not write {}", path))?,
        None => {
            let stdout = io::stdout();
            PnmEncoder::new(stdout.lock())
                .with_subtype(PnmSubtype::Graymap(SampleEncoding::Binary))
                .write_image(
                    result.as_raw(),
                    result.width(),
                    result.height(),
                    ExtendedColorType::L8,
                )
                .context("could not write to stdout")?;
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = app().get_matches();
    if let Err(err) = run(&matches) {
        let mut causes = err.iter_chain();
        if let Some(first) = causes.next() {
            eprintln!("seamcarve: {}", first);
        }
        for cause in causes {
            eprintln!("  caused by: {}", cause);
        }
        process::exit(1);
    }
}
