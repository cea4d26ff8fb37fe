use clap::{Parser, Subcommand};
use icokit::{EncodeOptions, IcoEncoder, IconSize, Resampling, SourceImage};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

//===========================================================================//

#[derive(Parser)]
#[command(name = "icotool", about = "Builds and takes apart ICO files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Creates an ICO file from an image
    Create {
        /// Source image (PNG, JPEG, GIF, BMP or WebP)
        image: PathBuf,
        /// Icon size to include; repeat for several (default: 16, 32, 48)
        #[arg(short, long = "size", value_name = "N|WxH")]
        sizes: Vec<String>,
        /// Use nearest-neighbor scaling instead of Lanczos
        #[arg(long)]
        pixelated: bool,
        /// Sets output path (default: the image path with an .ico extension)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Extracts one image from an ICO file as PNG
    Extract {
        ico: PathBuf,
        #[arg(default_value_t = 0)]
        index: usize,
        /// Sets output path
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Lists images in an ICO file
    List { ico: PathBuf },
}

//===========================================================================//

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    match Cli::parse().command {
        Command::Create { image, sizes, pixelated, output } => {
            let sizes = if sizes.is_empty() {
                IconSize::STANDARD.to_vec()
            } else {
                sizes
                    .iter()
                    .map(|size| parse_size(size))
                    .collect::<Result<Vec<_>, _>>()?
            };
            let resampling = if pixelated {
                Resampling::Nearest
            } else {
                Resampling::Lanczos3
            };
            let encoder = IcoEncoder::new(
                EncodeOptions::default().with_resampling(resampling),
            );
            let source = SourceImage::from_bytes(&fs::read(&image)?)?;
            let ico = encoder.encode(&source, &sizes)?;
            let out_path = output.unwrap_or_else(|| image.with_extension("ico"));
            fs::write(&out_path, ico)?;
            println!("Wrote {:?} with {} image(s)", out_path, sizes.len());
        }
        Command::Extract { ico, index, output } => {
            let png = icokit::decode_first_as_png(&fs::read(&ico)?, index)?;
            let out_path = output.unwrap_or_else(|| {
                PathBuf::from(format!("{}.{}.png", ico.display(), index))
            });
            fs::write(&out_path, png)?;
            println!("Wrote {:?}", out_path);
        }
        Command::List { ico } => {
            let images = icokit::decode(&fs::read(&ico)?)?;
            if images.is_empty() {
                println!("No images found in {:?}", ico);
            }
            for (index, image) in images.iter().enumerate() {
                println!(
                    "{:5}: {} {}, {} bytes",
                    index,
                    image.size(),
                    image.format().extension().to_uppercase(),
                    image.data().len()
                );
            }
        }
    }
    Ok(())
}

fn parse_size(text: &str) -> Result<IconSize, String> {
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|error| format!("Invalid size {:?}: {}", text, error))
    };
    let size = match text.split_once(&['x', 'X'][..]) {
        Some((width, height)) => IconSize::new(parse(width)?, parse(height)?),
        None => IconSize::square(parse(text)?),
    };
    size.validate().map_err(|error| error.to_string())?;
    Ok(size)
}

//===========================================================================//
