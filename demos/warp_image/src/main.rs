use argh::FromArgs;
use std::path::{Path, PathBuf};

use quadwarp::{
    geometry::Point2d,
    image::{ImageSize, RgbImage},
    imgproc::{
        warp::{warp_full, warp_to_template},
        WarpConfig,
    },
};

/// Warp a quadrilateral of an image onto a template, or the whole image onto
/// a second set of points.
#[derive(FromArgs)]
struct Args {
    /// path to the input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to write the warped image
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// a source point as `x,y`, repeated for every point
    #[argh(option, short = 's', from_str_fn(parse_point))]
    source: Vec<Point2d>,

    /// template size as `WIDTHxHEIGHT`, warps the source quad onto it
    #[argh(option, short = 't', from_str_fn(parse_size))]
    template: Option<ImageSize>,

    /// a destination point as `x,y`, repeated; warps the whole image onto them
    #[argh(option, short = 'd', from_str_fn(parse_point))]
    destination: Vec<Point2d>,

    /// optional JSON file with the warp configuration
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,
}

fn parse_point(value: &str) -> Result<Point2d, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{value}`"))?;
    let x = x.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok(Point2d::new(x, y))
}

fn parse_size(value: &str) -> Result<ImageSize, String> {
    let (w, h) = value
        .split_once('x')
        .ok_or_else(|| format!("expected `WIDTHxHEIGHT`, got `{value}`"))?;
    Ok(ImageSize {
        width: w.trim().parse().map_err(|e: std::num::ParseIntError| e.to_string())?,
        height: h.trim().parse().map_err(|e: std::num::ParseIntError| e.to_string())?,
    })
}

fn read_image(path: &Path) -> Result<RgbImage, Box<dyn std::error::Error>> {
    let img = image::open(path)?.to_rgb8();
    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };
    Ok(RgbImage::new(size, img.into_raw())?)
}

fn write_image(path: &Path, img: &RgbImage) -> Result<(), Box<dyn std::error::Error>> {
    image::save_buffer(
        path,
        img.as_slice(),
        img.width() as u32,
        img.height() as u32,
        image::ColorType::Rgb8,
    )?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let config = match &args.config {
        Some(path) => serde_json::from_str::<WarpConfig>(&std::fs::read_to_string(path)?)?,
        None => WarpConfig::default(),
    };

    let img = read_image(&args.input)?;
    log::info!("read {} from {}", img.size(), args.input.display());

    let warped = match (args.template, args.destination.is_empty()) {
        (Some(template), true) => warp_to_template(&img, &args.source, template, &config)?,
        (None, false) => {
            let full = warp_full(&img, &args.source, &args.destination, &config)?;
            println!(
                "canvas origin at ({}, {}), size {}x{}",
                full.bounds.min_x, full.bounds.min_y, full.bounds.width, full.bounds.height
            );
            full.image
        }
        _ => return Err("pass exactly one of --template or --destination".into()),
    };

    write_image(&args.output, &warped)?;
    log::info!("wrote {} to {}", warped.size(), args.output.display());

    Ok(())
}
