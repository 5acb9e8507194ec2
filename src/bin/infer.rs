//! Command line tool to score comments with a trained model

use anyhow::{anyhow, Result};
use burn::backend::{libtorch::LibTorchDevice, LibTorch};
use burn_toxicity::{
    cli::models::Model,
    pipelines::multi_label_classification::{self, Config, LABELS},
    utils::files::read_lines,
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: infer [OPTIONS] [TEXT]...

Arguments:
  TEXT                 Comments to classify

Options:
  -h, --help           Print help
  -m, --model          The model that was trained (defaults to 'bert-base-uncased')
  -d, --data-dir       The path to the top-level data directory (defaults to 'data')
  -f, --file           Read comments from a file, one per line
  --cpu                Run on the CPU instead of the first CUDA device
";

#[derive(Debug)]
struct Args {
    /// Prints the usage menu
    help: bool,

    /// The model that was trained
    model: Option<String>,

    /// The top-level data directory
    data_dir: Option<String>,

    /// A file with one comment per line
    file: Option<String>,

    /// Run on the CPU
    cpu: bool,

    /// Comments given on the command line
    texts: Vec<String>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = Arguments::from_env();

    let args = Args {
        help: pargs.contains(["-h", "--help"]),
        model: pargs.opt_value_from_str(["-m", "--model"])?,
        data_dir: pargs.opt_value_from_str(["-d", "--data-dir"])?,
        file: pargs.opt_value_from_str(["-f", "--file"])?,
        cpu: pargs.contains("--cpu"),
        texts: pargs
            .finish()
            .into_iter()
            .map(|text| text.to_string_lossy().into_owned())
            .collect(),
    };

    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = parse_args()?;

    if args.help {
        println!("{}", HELP);
        return Ok(());
    }

    let model = match &args.model {
        Some(model) => Model::try_from(model.as_str())?,
        None => Model::default(),
    };

    let mut config = Config::new().with_model_name(model.to_string());
    if let Some(data_dir) = &args.data_dir {
        config.data_dir = data_dir.to_string();
    }

    let mut texts = args.texts;
    if let Some(file) = &args.file {
        texts.extend(read_lines(file).await?);
    }

    if texts.is_empty() {
        return Err(anyhow!("Nothing to classify, pass TEXT or --file"));
    }

    let device = if args.cpu {
        LibTorchDevice::Cpu
    } else {
        LibTorchDevice::Cuda(0)
    };

    let predictions =
        multi_label_classification::infer::<LibTorch>(device, &config.artifact_dir(), &texts)?;

    // Print out predictions for each text
    for (i, (text, prediction)) in texts.iter().zip(predictions).enumerate() {
        println!("\n=== Item {i} ===\n- Text: {text}");

        for (label, probability) in LABELS.iter().zip(prediction) {
            println!("- {label}: {probability:.4}");
        }
    }

    Ok(())
}
