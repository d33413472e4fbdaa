use super::{Lattice, Simulation, D};
use crate::global_variables::*;
use crate::post::PostResult;
use crate::{LbmError, Residuals};
use colored::*;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

impl Simulation {
    pub fn build_case_conditions() -> Result<Simulation, LbmError> {
        crate::io::create_case_directories()?;
        let case_conditions_path =
            Path::new(crate::io::PRE_PROCESSING_PATH).join(crate::io::CASE_CONDITIONS_FILE);
        let case_conditions_path_str = case_conditions_path.to_string_lossy();
        if case_conditions_path.exists() {
            println!(
                "Reading the case conditions file: {}.\n",
                case_conditions_path_str.yellow().bold()
            );
        } else {
            let default_case_conditions = format!(
                r#"case_name                        = {CASE_NAME}

nx                               = {DEFAULT_NX}
ny                               = {DEFAULT_NY}

viscosity                        = {DEFAULT_VISCOSITY}
free_stream_velocity             = {} {}

obstacle_origin                  = {} {}
# obstacle_file                  = obstacle.dat

tracers                          = true
streamlines                      = true
"#,
                DEFAULT_FREE_STREAM_VELOCITY[0],
                DEFAULT_FREE_STREAM_VELOCITY[1],
                DEFAULT_NX / 4,
                DEFAULT_NY / 2,
            );
            let mut file = File::create(&case_conditions_path)?;
            println!(
                "Creating the default case conditions file: {}.\n",
                case_conditions_path_str.yellow().bold()
            );
            write!(file, "{}", default_case_conditions)?;
        }
        let conditions = crate::io::read_case_conditions()?;
        let mut simulation = Simulation::from_conditions(&conditions)?;
        if let Some(obstacle_file) = conditions.get("obstacle_file") {
            let path = Path::new(crate::io::PRE_PROCESSING_PATH).join(obstacle_file);
            println!(
                "Reading the obstacle file: {}.\n",
                path.to_string_lossy().yellow().bold()
            );
            let offsets = read_obstacle_file(&path)?;
            simulation.bind_obstacle(&offsets)?;
        }
        Ok(simulation)
    }

    pub fn print_stability_warnings(&self) {
        let lattice = self.lattice();
        let [ux, uy] = lattice.free_stream_velocity();
        let speed = (ux * ux + uy * uy).sqrt();
        if speed > STABLE_VELOCITY_LIMIT {
            println!(
                "{} the free stream speed {:.4} is not well below the lattice speed of sound {:.4}.\n",
                "Warning:".red().bold(),
                speed,
                CS_2.sqrt()
            );
        }
        if lattice.tau < STABLE_TAU_LIMIT {
            println!(
                "{} the relaxation time {:.4} is too close to 0.5.\n",
                "Warning:".red().bold(),
                lattice.tau
            );
        }
    }

    pub fn print_residuals(&self, residuals: &Residuals) {
        if self.time_step % 100 == 1 {
            let duration = self.simulation_time.elapsed().as_secs_f64();
            println!("\n{} {:.2} s.", "Elapsed time:".cyan().bold(), duration);
            println!(
                "\n{:>8} {:>16} {:>16} {:>16}\n",
                "step".cyan().bold(),
                "density".cyan().bold(),
                "velocity_x".cyan().bold(),
                "velocity_y".cyan().bold()
            );
        }
        println!(
            "{:>8} {:>16.8e} {:>16.8e} {:>16.8e}",
            self.time_step, residuals.density, residuals.velocity[0], residuals.velocity[1]
        );
    }

    pub fn write_residuals(&self, residuals: &Residuals) -> io::Result<()> {
        let data_path = Path::new(crate::io::DATA_PATH);
        let path = data_path.join(crate::io::RESIDUALS_FILE);
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if file.metadata()?.len() == 0 {
            writeln!(
                file,
                "{:>8} {:>16} {:>16} {:>16}",
                "step", "density", "velocity_x", "velocity_y"
            )?;
        }
        writeln!(
            file,
            "{:>8} {:>16.8e} {:>16.8e} {:>16.8e}",
            self.time_step, residuals.density, residuals.velocity[0], residuals.velocity[1]
        )?;
        Ok(())
    }

    pub fn write_post_processing<F>(&self, function: F, file_name: &str) -> io::Result<()>
    where
        F: Fn(&Lattice) -> Vec<PostResult>,
    {
        let post_results = &function(self.lattice());
        let post_processing_path = Path::new(crate::io::POST_PROCESSING_PATH);
        let path = post_processing_path.join(file_name);
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if file.metadata()?.len() == 0 {
            write!(file, "{:>8}", "step")?;
            for post_result in post_results {
                write!(file, " {:>16}", post_result.name)?;
            }
            writeln!(file)?;
        }
        write!(file, "{:>8}", self.time_step)?;
        for post_result in post_results {
            write!(file, " {:>16.8e}", post_result.value)?;
        }
        writeln!(file)?;
        Ok(())
    }

    pub fn write_post_processing_from_each_n_steps<F>(
        &self,
        n: usize,
        function: F,
        file_name: &str,
    ) -> io::Result<()>
    where
        F: Fn(&Lattice) -> Vec<PostResult>,
    {
        if self.time_step % n == 0 {
            self.write_post_processing(function, file_name)?;
        }
        Ok(())
    }

    pub fn print_summary(&self) {
        let lattice = self.lattice();
        println!(
            "\n{} {} after {} steps ({:.2} s).\n",
            "Case:".cyan().bold(),
            self.case_name,
            self.time_step,
            self.simulation_time.elapsed().as_secs_f64()
        );
        let post_results = [
            super::post::compute_mean_density(lattice),
            super::post::compute_max_velocity(lattice),
            super::post::compute_max_curl(lattice),
            super::post::compute_solid_fraction(lattice),
        ];
        for post_result in post_results.iter().flatten() {
            println!("{post_result}");
        }
        if self.show_streamlines() {
            let streamlines = self.streamlines();
            let points = streamlines.iter().map(Vec::len).sum::<usize>();
            println!("streamlines: {} seeds, {} points", streamlines.len(), points);
        }
        if self.show_tracers() {
            println!("tracers: {}", self.tracers().len());
        }
    }
}

/// Reads obstacle offsets, one `dx dy` pair per line, relative to the
/// obstacle origin.
pub fn read_obstacle_file<P: AsRef<Path>>(path: P) -> Result<Vec<[Float; D]>, LbmError> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    parse_obstacle_offsets(&contents)
}

pub fn parse_obstacle_offsets(contents: &str) -> Result<Vec<[Float; D]>, LbmError> {
    contents
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.starts_with("#"))
        .filter(|line| !line.is_empty())
        .map(|line| {
            let invalid = || LbmError::InvalidParameter {
                key: String::from("obstacle offset"),
                value: line.to_string(),
            };
            let values = line
                .split_whitespace()
                .map(|x| x.parse::<Float>().map_err(|_| invalid()))
                .collect::<Result<Vec<Float>, LbmError>>()?;
            match values.as_slice() {
                [dx, dy] => Ok([*dx, *dy]),
                _ => Err(invalid()),
            }
        })
        .collect()
}
