use argh::FromArgs;
use std::path::PathBuf;
use std::time::Instant;

use gaussblur::{
    image::Rgb8,
    imgproc::{
        filter::{ConvolutionMethod, GaussianBlur, GaussianBlurConfig},
        parallel::ExecutionStrategy,
    },
    io::functional as F,
};

#[derive(FromArgs)]
/// Blur an image with a gaussian filter
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output image (.jpg, .jpeg or .png)
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// the kernel size, a positive odd integer
    #[argh(option, default = "15")]
    kernel_size: usize,

    /// the sigma for the gaussian filter
    #[argh(option, default = "5.0")]
    sigma: f64,

    /// the convolution method: direct or separable
    #[argh(option, default = "String::from(\"direct\")")]
    method: String,

    /// number of worker threads, all cores if not set
    #[argh(option)]
    threads: Option<usize>,

    /// the JPEG quality, from 0 to 100
    #[argh(option, default = "95")]
    quality: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let method = match args.method.to_lowercase().as_str() {
        "direct" => ConvolutionMethod::Direct,
        "separable" => ConvolutionMethod::Separable,
        _ => {
            return Err(format!("Invalid method: {}", args.method).into());
        }
    };

    let strategy = match args.threads {
        Some(n) => ExecutionStrategy::Fixed(n),
        None => ExecutionStrategy::Auto,
    };

    // validate the parameters before touching the input file
    let config = GaussianBlurConfig::new(args.kernel_size, args.sigma)
        .with_method(method)
        .with_strategy(strategy);
    let blur = GaussianBlur::new(config)?;

    // read the image
    let image: Rgb8 = F::read_image_any_rgb8(&args.input)?;
    log::info!("loaded {} ({})", args.input.display(), image.size());

    let start = Instant::now();
    let blurred = blur.apply(&image)?;
    log::info!(
        "blurred with kernel {} sigma {} ({:?}) in {:?}",
        args.kernel_size,
        args.sigma,
        method,
        start.elapsed()
    );

    F::write_image_rgb8(&args.output, &blurred, args.quality)?;
    log::info!("wrote {}", args.output.display());

    Ok(())
}
