use clap::{arg, command, value_parser, Command};
use lbm_aero as lbm;
use rayon::ThreadPoolBuilder;

fn main() {
    let matches = command!()
        .arg(
            arg!(
                -n --number_of_threads <NUMBER_OF_THREADS> "Sets the number of threads used by the solver"
            )
            .required(false)
            .value_parser(value_parser!(usize)),
        )
        .subcommand(
            Command::new("run")
                .about("Runs the wind tunnel simulation")
                .arg(
                    arg!(
                        -s --steps <STEPS> "Sets the number of time steps"
                    )
                    .required(false)
                    .value_parser(value_parser!(usize))
                    .default_value("1000"),
                )
                .arg(
                    arg!(
                        -b --benchmark "Runs the benchmark"
                    )
                    .required(false),
                ),
        )
        .get_matches();

    if let Some(&num_threads) = matches.get_one::<usize>("number_of_threads") {
        if let Err(e) = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            eprintln!("Error while building the thread pool: {e}.");
            std::process::exit(1);
        }
    }

    match matches.subcommand() {
        Some(("run", sub_matches)) => {
            let steps = sub_matches.get_one::<usize>("steps").copied().unwrap_or(1000);
            match sub_matches.get_flag("benchmark") {
                false => lbm::d2q9::run(steps),
                true => lbm::d2q9::run_benchmark(steps),
            }
        }
        _ => {
            eprintln!("Error: no subcommand given. Please, use `run`.");
            std::process::exit(1);
        }
    }
}
