use std::{process::ExitCode, time::SystemTime};

use clap::{Parser, ValueEnum};
use log::{error, info};
use ndarray::{Array2, ArrayView2};
use simforest::{
    cluster::{ClusterParamsBuilder, Linkage, SimilarityForestCluster},
    data::read_points,
    forest::{self, SimilarityForestParams},
    Projection, SimForestResult,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Output {
    Labels,
    Condensed,
    Square,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Similarity forest dissimilarities and clustering")]
struct Args {
    /// CSV file with one point per row
    #[arg(short, long)]
    input: String,

    #[arg(long)]
    has_headers: bool,

    #[arg(short, long, default_value_t = 20)]
    n_estimators: usize,

    /// dot, sqeuclidean or rbf
    #[arg(short, long, default_value = "dot")]
    projection: String,

    /// Negative means unbounded
    #[arg(short = 'd', long, default_value_t = -1, allow_negative_numbers = true)]
    max_depth: i64,

    #[arg(short, long)]
    bootstrap: bool,

    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    #[arg(short = 'k', long, default_value_t = 3)]
    n_clusters: usize,

    /// single, complete or average
    #[arg(short, long, default_value = "single")]
    linkage: String,

    #[arg(short, long, value_enum, default_value_t = Output::Labels)]
    output: Output,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> SimForestResult<()> {
    let projection: Projection = args.projection.parse()?;
    let linkage: Linkage = args.linkage.parse()?;
    let max_depth = usize::try_from(args.max_depth).ok();

    let x = read_points(&args.input, args.has_headers)?;
    info!("read {} points with {} features", x.nrows(), x.ncols());

    let params = ClusterParamsBuilder::new()
        .n_estimators(args.n_estimators)
        .projection(projection)
        .max_depth(max_depth)
        .bootstrap(args.bootstrap)
        .seed(args.seed)
        .n_clusters(args.n_clusters)
        .linkage(linkage)
        .build();

    let start = SystemTime::now();
    match args.output {
        Output::Labels => {
            let clusters = SimilarityForestCluster::fit_predict(x.view(), &params)?;
            for label in clusters.labels() {
                println!("{}", label);
            }
        }
        Output::Condensed => {
            let forest = forest::fit(x.view(), &params.forest_params)?;
            for d in forest.predict_condensed(x.view())? {
                println!("{}", d);
            }
        }
        Output::Square => print_matrix(square(x.view(), &params.forest_params)?),
    }
    if let Ok(elapsed) = start.elapsed() {
        info!("time elapsed: {:?}", elapsed);
    }

    Ok(())
}

fn square(x: ArrayView2<f64>, params: &SimilarityForestParams) -> SimForestResult<Array2<f64>> {
    let forest = forest::fit(x, params)?;
    forest.predict_square(x)
}

fn print_matrix(m: Array2<f64>) {
    for row in m.rows() {
        let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        println!("{}", line.join(","));
    }
}
