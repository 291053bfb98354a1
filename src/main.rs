use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use deepforest::image_utils::image_conversion::DataFormat;
use deepforest::image_utils::image_io::is_supported_image;
use deepforest::object_detection::object_detection_utils::read_classes_txt_file;
use deepforest::{ImageSource, PredictionOutput, PredictionParameters, RetinaNet, predict_image};
use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*};
use walkdir::WalkDir;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TableFormat {
    Csv,
    Json,
}

impl TableFormat {
    fn extension(self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Json => "json",
        }
    }
}

/// Predict bounding boxes on an image, or on every image under a directory, with an ONNX detector.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// onnx model file
    #[arg(long)]
    model: PathBuf,
    /// image file, or a directory searched recursively for images
    #[arg(long)]
    image: PathBuf,
    /// text file with one class name per line
    #[arg(long)]
    classes: Option<PathBuf>,
    /// json file with prediction parameters
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    score_threshold: Option<f32>,
    #[arg(long)]
    max_detections: Option<usize>,
    /// the model takes (batch, channel, row, column) input
    #[arg(long)]
    channels_first: bool,
    /// write images with the boxes drawn on them instead of tables
    #[arg(long)]
    plot: bool,
    #[arg(long, value_enum, default_value_t = TableFormat::Csv)]
    format: TableFormat,
    /// output file, or output directory for directory input; tables go to stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    // setup tracing
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(io::stderr)
        .compact();
    let filter_layer = {
        let filter = EnvFilter::from_default_env();
        if env::var("RUST_LOG").is_err() {
            filter.add_directive(LevelFilter::INFO.into())
        } else {
            filter
        }
    };
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let args = Args::parse();
    let parameters = load_parameters(&args)?;
    if args.image.is_dir() {
        if let Some(output_dir) = &args.output {
            check_output_dir(&args.image, output_dir, parameters.return_plot)?;
        }
    }

    if !args.model.exists() {
        bail!(
            "Model path does not exist, or cannot be read: {}",
            args.model.display()
        );
    }
    let data_format = if args.channels_first {
        DataFormat::ChannelsFirst
    } else {
        DataFormat::ChannelsLast
    };
    let model_name = args
        .model
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    let mut model = RetinaNet::new(&args.model, data_format, model_name)
        .with_context(|| format!("failed to load model '{}'", args.model.display()))?;
    info!(model = model.model_name(), ?data_format, "model ready");

    if args.image.is_dir() {
        let output_dir = args
            .output
            .as_deref()
            .context("--output is required when --image is a directory")?;
        predict_directory(&mut model, &args, output_dir, &parameters)
    } else {
        let output = predict_image(&mut model, ImageSource::Path(args.image.clone()), &parameters)
            .with_context(|| format!("failed to predict on '{}'", args.image.display()))?;
        write_output(output, args.output.as_deref(), args.format)
    }
}

/// Defaults, then the config file, then the class file, then individual flags.
fn load_parameters(args: &Args) -> Result<PredictionParameters> {
    let mut parameters = match &args.config {
        Some(path) => PredictionParameters::from_json_file(path)
            .with_context(|| format!("failed to load config file '{}'", path.display()))?,
        None => PredictionParameters::default(),
    };
    if let Some(path) = &args.classes {
        parameters.classes = read_classes_txt_file(path)
            .with_context(|| format!("failed to read classes file '{}'", path.display()))?;
    }
    if let Some(score_threshold) = args.score_threshold {
        parameters.score_threshold = score_threshold;
    }
    if let Some(max_detections) = args.max_detections {
        parameters.max_detections = max_detections;
    }
    parameters.return_plot = args.plot;
    parameters.validate()?;
    Ok(parameters)
}

/// Plots keep the input file names, so writing them inside the input tree would overwrite the
/// inputs or feed the plots back into the walk.
fn check_output_dir(image_dir: &Path, output_dir: &Path, plot: bool) -> Result<()> {
    if !plot {
        return Ok(());
    }
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create '{}'", output_dir.display()))?;
    let image_dir = image_dir.canonicalize()?;
    let output_dir = output_dir.canonicalize()?;
    if output_dir.starts_with(&image_dir) {
        bail!(
            "Output directory {} is inside the image directory {}, plots would overwrite the images.",
            output_dir.display(),
            image_dir.display()
        );
    }
    Ok(())
}

fn predict_directory(
    model: &mut RetinaNet,
    args: &Args,
    output_dir: &Path,
    parameters: &PredictionParameters,
) -> Result<()> {
    let mut num_images = 0;
    for entry in WalkDir::new(&args.image).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_supported_image(entry.path()) {
            continue;
        }
        let relative = entry.path().strip_prefix(&args.image)?;
        let destination = if parameters.return_plot {
            output_dir.join(relative)
        } else {
            output_dir.join(relative).with_extension(args.format.extension())
        };
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        let output = predict_image(
            model,
            ImageSource::Path(entry.path().to_path_buf()),
            parameters,
        )
        .with_context(|| format!("failed to predict on '{}'", entry.path().display()))?;
        write_output(output, Some(&destination), args.format)?;
        num_images += 1;
    }
    info!(
        num_images,
        output = %output_dir.display(),
        "finished predicting directory"
    );
    Ok(())
}

fn write_output(
    output: PredictionOutput,
    destination: Option<&Path>,
    format: TableFormat,
) -> Result<()> {
    match output {
        PredictionOutput::Plot(image) => {
            let path = destination.context("--output is required with --plot")?;
            image
                .save(path)
                .with_context(|| format!("failed to save plot '{}'", path.display()))?;
            info!(path = %path.display(), "saved plot");
        }
        PredictionOutput::Table(table) => {
            let writer: Box<dyn Write> = match destination {
                Some(path) => Box::new(BufWriter::new(File::create(path).with_context(
                    || format!("failed to create '{}'", path.display()),
                )?)),
                None => Box::new(io::stdout().lock()),
            };
            match format {
                TableFormat::Csv => table.write_csv(writer)?,
                TableFormat::Json => table.write_json(writer)?,
            }
            info!(rows = table.len(), "wrote detections");
        }
    }
    Ok(())
}
