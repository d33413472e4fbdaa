use crate::LbmError;
use colored::*;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DATA_PATH: &'static str = "./data";

pub const PRE_PROCESSING_PATH: &'static str = "./pre_processing";

pub const CASE_CONDITIONS_FILE: &'static str = "case_conditions.jou";

pub const POST_PROCESSING_PATH: &'static str = "./post_processing";

pub const RESIDUALS_FILE: &'static str = "residuals.dat";

pub const BENCHMARK_FILE: &'static str = "benchmark_elapsed_time.dat";

pub fn create_case_directories() -> io::Result<()> {
    let list_of_paths = [DATA_PATH, PRE_PROCESSING_PATH, POST_PROCESSING_PATH];
    for path_str in list_of_paths {
        let path = Path::new(path_str);
        if !path.exists() {
            println!("Creating the {} path.\n", path_str.yellow().bold());
            fs::create_dir_all(path)?;
        } else {
            println!("The {} path already exists.\n", path_str.yellow().bold());
        }
    }
    Ok(())
}

pub fn read_case_conditions() -> io::Result<HashMap<String, String>> {
    let path = Path::new(PRE_PROCESSING_PATH).join(CASE_CONDITIONS_FILE);
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(extract_parameters(&contents))
}

pub fn extract_parameters(contents: &str) -> HashMap<String, String> {
    contents
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.starts_with("#"))
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let mut parts = line.splitn(2, "=");
            let key = parts.next()?.trim().to_string();
            let value = parts.next().unwrap_or("").trim().to_string();
            Some((key, value))
        })
        .collect::<HashMap<String, String>>()
}

/// Parses `key`, falling back to `default` when the key is absent.
pub fn parse_parameter<T: FromStr>(
    parameters: &HashMap<String, String>,
    key: &str,
    default: T,
) -> Result<T, LbmError> {
    match parameters.get(key) {
        Some(value) => value.parse::<T>().map_err(|_| LbmError::InvalidParameter {
            key: key.to_string(),
            value: value.clone(),
        }),
        None => Ok(default),
    }
}

/// Parses a whitespace separated pair such as `0.1 0.0`.
pub fn parse_pair<T: FromStr + Copy>(
    parameters: &HashMap<String, String>,
    key: &str,
    default: [T; 2],
) -> Result<[T; 2], LbmError> {
    let Some(value) = parameters.get(key) else {
        return Ok(default);
    };
    let invalid = || LbmError::InvalidParameter {
        key: key.to_string(),
        value: value.clone(),
    };
    let parts = value
        .split_whitespace()
        .map(|x| x.parse::<T>().map_err(|_| invalid()))
        .collect::<Result<Vec<T>, LbmError>>()?;
    match parts.as_slice() {
        [a, b] => Ok([*a, *b]),
        _ => Err(invalid()),
    }
}

pub fn write_inside_loop_elapsed_time(
    elapsed_times: &[(&str, Duration)],
    time_step: &usize,
) -> io::Result<()> {
    let path = Path::new(POST_PROCESSING_PATH).join(BENCHMARK_FILE);
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if *time_step == 0 {
        write!(file, "{:>8}", "step")?;
        for (key, _) in elapsed_times {
            write!(file, " {:>16}", key)?;
        }
        writeln!(file)?;
    }
    write!(file, "{:>8}", time_step)?;
    for (_, value) in elapsed_times {
        write!(file, " {:>16.8e}", value.as_secs_f64())?;
    }
    writeln!(file)?;
    Ok(())
}
