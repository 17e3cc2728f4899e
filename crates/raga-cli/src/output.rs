//! JSON output formatting

use raga_core::AnalysisReport;
use serde::Serialize;

/// Outcome of analyzing one input file
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Report(AnalysisReport),
    Error(String),
}

/// One entry of the `results` array in the `ragaid` output
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl FileReport {
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }
}

/// `ragaid` output: counts plus one entry per input file
#[derive(Serialize)]
struct BatchOutput<'a> {
    analyzed: usize,
    failed: usize,
    results: &'a [FileReport],
}

/// Render a batch of file reports as pretty JSON
pub fn render_json(results: &[FileReport]) -> serde_json::Result<String> {
    let failed = results.iter().filter(|r| r.is_error()).count();
    let output = BatchOutput {
        analyzed: results.len() - failed,
        failed,
        results,
    };
    serde_json::to_string_pretty(&output)
}

/// Print a batch of file reports to stdout
pub fn print_json_results(results: &[FileReport]) {
    match render_json(results) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing results: {}", e),
    }
}
