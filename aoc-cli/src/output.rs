//! Output formatting for solver results

use crate::runner::SolverResult;
use chrono::TimeDelta;

/// Output formatter for solver results
pub struct OutputFormatter {
    quiet: bool,
    start_time: std::time::Instant,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            start_time: std::time::Instant::now(),
        }
    }

    /// Announce the run (full mode only)
    pub fn print_header(&self, solvers: usize) {
        if !self.quiet {
            println!("Running {} solver(s)...", solvers);
        }
    }

    /// Format and print a single result; failures go to stderr
    pub fn print_result(&self, result: &SolverResult) {
        match self.format_result(result) {
            Ok(line) => println!("{}", line),
            Err(line) => eprintln!("{}", line),
        }
    }

    /// The stdout line for an answer, or the stderr line for a failure
    pub fn format_result(&self, result: &SolverResult) -> Result<String, String> {
        if self.quiet {
            self.format_quiet(result)
        } else {
            self.format_full(result)
        }
    }

    fn format_quiet(&self, result: &SolverResult) -> Result<String, String> {
        match (&result.answer, result.part) {
            (Ok(answer), Some(part)) => Ok(format!("part {}: {}", part, answer)),
            (Ok(answer), None) => Ok(answer.clone()),
            (Err(e), _) => Err(format!("Error: {}", e)),
        }
    }

    fn format_full(&self, result: &SolverResult) -> Result<String, String> {
        let prefix = match result.part {
            Some(part) => format!("Day {:02} part {}", result.day, part),
            None => format!("Day {:02}", result.day),
        };

        match &result.answer {
            Ok(answer) => {
                let parse_timing = result
                    .parse_duration
                    .map(|d| format!("parse: {}, ", format_duration(d)))
                    .unwrap_or_default();
                Ok(format!(
                    "{}: {} ({}solve: {})",
                    prefix,
                    answer,
                    parse_timing,
                    format_duration(result.solve_duration)
                ))
            }
            Err(e) => Err(format!("{}: Error - {}", prefix, e)),
        }
    }

    /// Print a summary after all results
    pub fn print_summary(&self, results: &[SolverResult]) {
        if self.quiet {
            return;
        }
        println!();
        for line in self.summary_lines(results) {
            println!("{}", line);
        }
    }

    fn summary_lines(&self, results: &[SolverResult]) -> Vec<String> {
        let successes = results.iter().filter(|r| r.answer.is_ok()).count();
        let failures = results.len() - successes;

        let total_parse_time: TimeDelta = results
            .iter()
            .filter(|r| r.answer.is_ok())
            .filter_map(|r| r.parse_duration)
            .sum();
        let total_solve_time: TimeDelta = results
            .iter()
            .filter(|r| r.answer.is_ok())
            .map(|r| r.solve_duration)
            .sum();

        vec![
            "--- Summary ---".to_string(),
            format!("Parts: {} solved, {} failed", successes, failures),
            format!("Total parse time: {}", format_duration(total_parse_time)),
            format!("Total solve time: {}", format_duration(total_solve_time)),
            format!(
                "Elapsed wall-clock time: {}",
                format_std_duration(self.start_time.elapsed())
            ),
        ]
    }
}

/// Format a TimeDelta for display
fn format_duration(d: TimeDelta) -> String {
    let Some(micros) = d.num_microseconds() else {
        return "N/A".to_string();
    };

    if micros < 0 {
        return format!("-{}", format_duration(-d));
    }

    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", micros as f64 / 1_000_000.0)
    }
}

/// Format a std::time::Duration for display (used for wall-clock time)
fn format_std_duration(d: std::time::Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{:.2}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
