//! Command line tool to fine-tune a model for toxic comment classification

use anyhow::anyhow;
use burn::backend::{libtorch::LibTorchDevice, Autodiff, LibTorch};
use burn_toxicity::{
    cli::{datasets::Dataset, models::Model},
    datasets::{jigsaw, LoadableDataset},
    pipelines::multi_label_classification::{self, Config},
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: train DATASET [OPTIONS]

Arguments:
  DATASET              The dataset to use (e.g., 'jigsaw')

Options:
  -h, --help           Print help
  -m, --model          The model to use (defaults to 'bert-base-uncased')
  -d, --data-dir       The path to the top-level data directory (defaults to 'data')
  -n, --num-epochs     Number of epochs to train for (defaults to 1)
  -b, --batch-size     Batch size (defaults to 16)
  -l, --max-seq-len    Maximum sequence length, in tokens (defaults to 128)
  --lr                 Initial learning rate (defaults to 2e-5)
  --seed               Seed for the validation split and shuffling (defaults to 42)
  --valid-fraction     Share of the examples held out for validation (defaults to 0.1)
  --cpu                Train on the CPU instead of the first CUDA device
";

#[derive(Debug)]
struct Args {
    dataset: String,
    model: Option<String>,
    data_dir: Option<String>,
    num_epochs: Option<usize>,
    batch_size: Option<usize>,
    max_seq_len: Option<usize>,
    learning_rate: Option<f64>,
    seed: Option<u64>,
    valid_fraction: Option<f64>,
    cpu: bool,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            model: pargs.opt_value_from_str(["-m", "--model"])?,
            data_dir: pargs.opt_value_from_str(["-d", "--data-dir"])?,
            num_epochs: pargs.opt_value_from_str(["-n", "--num-epochs"])?,
            batch_size: pargs.opt_value_from_str(["-b", "--batch-size"])?,
            max_seq_len: pargs.opt_value_from_str(["-l", "--max-seq-len"])?,
            learning_rate: pargs.opt_value_from_str("--lr")?,
            seed: pargs.opt_value_from_str("--seed")?,
            valid_fraction: pargs.opt_value_from_str("--valid-fraction")?,
            cpu: pargs.contains("--cpu"),
            dataset: pargs.free_from_str().map_err(|e| match e {
                pico_args::Error::MissingArgument => anyhow!("Missing required argument: DATASET"),
                _ => anyhow!("{}", e),
            })?,
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            return Err(anyhow!("Unexpected arguments: {:?}", remaining));
        }

        Ok(Some(args))
    }

    /// Apply the command line overrides to the default configuration
    fn config(&self, model: &Model) -> Config {
        let mut config = Config::new().with_model_name(model.to_string());

        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.to_string();
        }

        if let Some(num_epochs) = self.num_epochs {
            config.num_epochs = num_epochs;
        }

        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }

        if let Some(max_seq_len) = self.max_seq_len {
            config.max_seq_len = max_seq_len;
        }

        if let Some(learning_rate) = self.learning_rate {
            config.learning_rate = learning_rate;
        }

        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        if let Some(valid_fraction) = self.valid_fraction {
            config.valid_fraction = valid_fraction;
        }

        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let Some(args) = Args::parse()? else {
        print!("{}", HELP);

        return Ok(());
    };

    let model = match &args.model {
        Some(model) => Model::try_from(model.as_str())?,
        None => Model::default(),
    };

    let dataset = Dataset::try_from(args.dataset.as_str())?;

    let config = args.config(&model);

    let device = if args.cpu {
        LibTorchDevice::Cpu
    } else {
        LibTorchDevice::Cuda(0)
    };

    match dataset {
        Dataset::Jigsaw => {
            let labeled = jigsaw::Dataset::load(&config.data_dir, "train").await?;
            let (train, valid) = labeled.split(config.valid_fraction, config.seed)?;

            let evaluation = multi_label_classification::train::<
                Autodiff<LibTorch>,
                jigsaw::Item,
                jigsaw::Dataset,
            >(device, train, valid, config)
            .await?;

            println!("{}", evaluation.to_json()?);
        }
    }

    Ok(())
}
