use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn, Level};

use ferrite_backprop::data::{corner_probe, four_corners, gaussian_blobs};
use ferrite_backprop::softmax_regression::{initial_parameters, linear_classifier_accuracy, train_softmax_classifier};
use ferrite_backprop::{train_loop, ExperimentConfig, MinimizerKind, Network, Result};

#[derive(Parser)]
#[command(name = "ferrite-backprop")]
#[command(about = "Hand-derived backpropagation and softmax regression on synthetic 2-D data")]
struct Args {
    /// JSON experiment config; fields it omits keep their defaults.
    #[arg(long, global = true)]
    config: Option<String>,

    /// Seed for data generation and initialisation. Random when absent.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Write the per-iteration loss history of `mlp` to this JSON file.
    #[arg(long, global = true)]
    loss_out: Option<String>,

    /// Log every iteration.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Train Linear → Sigmoid → Linear → Softmax on four-corner data with gradient descent.
    Mlp {
        #[arg(long)]
        iterations: Option<usize>,
        #[arg(long)]
        learning_rate: Option<f64>,
    },
    /// Fit a linear softmax classifier with a general-purpose minimiser.
    Softmax {
        #[arg(long, value_enum)]
        minimizer: Option<MinimizerArg>,
        /// 3 or 4 classes.
        #[arg(long)]
        num_class: Option<usize>,
        /// Scatter of each class blob.
        #[arg(long)]
        sigma: Option<f64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MinimizerArg {
    Bfgs,
    NelderMead,
}

impl From<MinimizerArg> for MinimizerKind {
    fn from(arg: MinimizerArg) -> Self {
        match arg {
            MinimizerArg::Bfgs => MinimizerKind::Bfgs,
            MinimizerArg::NelderMead => MinimizerKind::NelderMead,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => ExperimentConfig::load_json(path)?,
        None => ExperimentConfig::default(),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match args.cmd {
        Cmd::Mlp { iterations, learning_rate } => {
            if let Some(n) = iterations {
                config.train.iterations = n;
            }
            if let Some(lr) = learning_rate {
                config.train.learning_rate = lr;
            }
            run_mlp(&config, args.loss_out.as_deref(), &mut rng)
        }
        Cmd::Softmax { minimizer, num_class, sigma } => {
            if let Some(m) = minimizer {
                config.minimizer = m.into();
            }
            if let Some(c) = num_class {
                config.blobs.num_class = c;
            }
            if let Some(s) = sigma {
                config.blobs.sigma = s;
            }
            if args.loss_out.is_some() {
                warn!("--loss-out only applies to mlp; no loss history is written");
            }
            run_softmax(&config, &mut rng)
        }
    }
}

fn run_mlp(config: &ExperimentConfig, loss_out: Option<&str>, rng: &mut StdRng) -> Result<()> {
    let clusters = &config.clusters;
    let train = four_corners(clusters.points_per_cluster, clusters.sigma, rng)?;
    info!(samples = train.len(), sigma = clusters.sigma, "generated four-corner training data");

    let mut network = Network::new(&config.network, rng)?;
    let history = train_loop(&mut network, &train.points, &train.labels, &config.train)?;

    if let Some(path) = loss_out {
        history.save_json(path)?;
        info!(path, "wrote loss history");
    }

    let mut rounds_correct = 0usize;
    let mut samples_correct = 0usize;
    let mut samples_total = 0usize;
    for _ in 0..clusters.test_rounds {
        let probe = corner_probe(clusters.test_sigma, rng)?;
        let predicted = network.predict(&probe.points)?;
        let hits = predicted.iter().zip(probe.labels.iter()).filter(|(p, y)| p == y).count();
        samples_correct += hits;
        samples_total += probe.len();
        if hits == probe.len() {
            rounds_correct += 1;
        }
    }

    println!("first loss:      {:.6}", history.first().unwrap_or(f64::NAN));
    println!("last loss:       {:.6}", history.last().unwrap_or(f64::NAN));
    if clusters.test_rounds > 0 {
        println!("round accuracy:  {:.1} %", 100.0 * rounds_correct as f64 / clusters.test_rounds as f64);
        println!("sample accuracy: {:.1} %", 100.0 * samples_correct as f64 / samples_total as f64);
    }
    Ok(())
}

fn run_softmax(config: &ExperimentConfig, rng: &mut StdRng) -> Result<()> {
    let blobs = &config.blobs;
    println!("number of classes: {}  sigma for data scatter: {}", blobs.num_class, blobs.sigma);

    let train = gaussian_blobs(blobs.train_size(), blobs.num_class, blobs.sigma, rng)?;
    let test = gaussian_blobs(blobs.test_size(), blobs.num_class, blobs.sigma, rng)?;
    let w0 = initial_parameters(blobs.num_class, train.num_features(), config.softmax_init_std(), rng)?;

    info!(minimizer = ?config.minimizer, params = w0.len(), "training softmax classifier");
    let fit = match config.minimizer {
        MinimizerKind::Bfgs => {
            train_softmax_classifier(&config.bfgs, &w0, &train.points, &train.labels, blobs.num_class)?
        }
        MinimizerKind::NelderMead => {
            train_softmax_classifier(&config.nelder_mead, &w0, &train.points, &train.labels, blobs.num_class)?
        }
    };

    let accuracy = linear_classifier_accuracy(&fit.minimum.x, &test.points, &test.labels, blobs.num_class)?;
    println!("training loss:   {:.6}", fit.minimum.fun);
    println!("converged:       {}", fit.minimum.converged);
    println!("accuracy of softmax loss: {:.1} %", accuracy * 100.0);
    Ok(())
}
