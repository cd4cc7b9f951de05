// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use log::info;
use std::{env, error::Error, path::PathBuf};

use vo_frame_metrics::dataset::frame_metrics;
use vo_frame_metrics::math::stats::Stats;

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if let Err(error) = my_run(&args) {
        eprintln!("{:?}", error);
        std::process::exit(1);
    }
}

const USAGE: &str = "Usage: ./frame_metrics_summary frame_metrics.csv";

fn my_run(args: &[String]) -> Result<(), Box<dyn Error>> {
    // Check that the arguments are correct.
    let table_path = check_args(args)?;

    // Read the whole table.
    let records = frame_metrics::read(&table_path)?;
    info!("Loaded {} frames from {}", records.len(), table_path.display());

    // Print one line of statistics per column, ignoring empty cells.
    println!("column,count,mean,std,min,max");
    for column in frame_metrics::columns(&records) {
        let stats: Stats = records
            .iter()
            .filter_map(|record| record.get(column))
            .map(|value| value.as_f64())
            .collect();
        println!(
            "{},{},{},{},{},{}",
            column,
            stats.nb_data(),
            display(stats.mean()),
            display(stats.std()),
            display(stats.min()),
            display(stats.max())
        );
    }
    Ok(())
}

/// Verify that command line arguments are correct.
fn check_args(args: &[String]) -> Result<PathBuf, String> {
    if let [_, table_path_str] = args {
        let table_path = PathBuf::from(table_path_str);
        if table_path.is_file() {
            Ok(table_path)
        } else {
            eprintln!("{}", USAGE);
            Err(format!(
                "The metrics table does not exist or is not reachable: {}",
                table_path_str
            ))
        }
    } else {
        eprintln!("{}", USAGE);
        Err("Wrong number of arguments".to_string())
    }
}

fn display(value: Option<f64>) -> String {
    value.map(|x| x.to_string()).unwrap_or_default()
}
