//! The `floradoc analyze` command.

mod input;
mod report;
pub mod types;

pub use types::OutputFormat;

use clap::Args;
use floradoc_core::{
    AnalysisOutcome, AnalysisRecord, Analyzer, Config, ErrorKind, RecordWriter, TimedOutcome,
};
use std::fs::File;
use std::io::{BufWriter, IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

use report::TextReport;

/// Arguments for the `analyze` command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Image files or `data:` URIs to diagnose
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (defaults to `output.format` from the config file)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Gemini API key (overrides the config file)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model name
    #[arg(long)]
    pub model: Option<String>,
}

/// Where results go: the text report or JSON/JSONL records.
pub enum Sink<W: Write> {
    Text { out: W, report: TextReport },
    Records(RecordWriter<W>),
}

impl<W: Write> Sink<W> {
    fn outcome(&mut self, input: &str, timed: &TimedOutcome) -> std::io::Result<()> {
        match self {
            Sink::Text { out, report } => report.render(out, input, &timed.outcome),
            Sink::Records(writer) => writer.push(AnalysisRecord::from_timed(input, timed)),
        }
    }

    fn input_error(&mut self, input: &str, message: &str) -> std::io::Result<()> {
        match self {
            Sink::Text { out, report } => report.render_input_error(out, input, message),
            Sink::Records(writer) => {
                writer.push(AnalysisRecord::failure(input, ErrorKind::InvalidInput, message))
            }
        }
    }

    fn finish(&mut self) -> std::io::Result<()> {
        match self {
            Sink::Text { out, .. } => out.flush(),
            Sink::Records(writer) => writer.finish(),
        }
    }
}

/// Execute the analyze command.
pub async fn execute(args: AnalyzeArgs, config: &Config) -> anyhow::Result<()> {
    let analyzer = Analyzer::from_config(
        &config.gemini,
        args.api_key.as_deref(),
        args.model.as_deref(),
    )?;

    let format = args
        .format
        .or_else(|| OutputFormat::from_config(&config.output.format))
        .unwrap_or(OutputFormat::Text);
    let pretty = args.pretty || config.output.pretty;

    let (out, colored): (Box<dyn Write>, bool) = match &args.output {
        Some(path) => (Box::new(BufWriter::new(File::create(path)?)), false),
        None => (
            Box::new(std::io::stdout().lock()),
            std::io::stdout().is_terminal(),
        ),
    };
    let mut sink = match format.record_format() {
        Some(record_format) => Sink::Records(RecordWriter::new(out, record_format, pretty)),
        None => Sink::Text {
            out,
            report: TextReport::new(colored),
        },
    };

    run(&analyzer, &args.inputs, config.max_file_size_bytes(), &mut sink).await
}

/// Analyze `inputs` one after another into `sink`.
///
/// Only one request is ever in flight. Inputs that fail to load are
/// reported without calling the service. Returns an error if any input
/// failed.
pub async fn run<W: Write>(
    analyzer: &Analyzer,
    inputs: &[String],
    max_file_size_bytes: u64,
    sink: &mut Sink<W>,
) -> anyhow::Result<()> {
    tracing::info!(
        "Analyzing {} image(s) with {}",
        inputs.len(),
        analyzer.model()
    );

    let mut failed = 0usize;
    for raw in inputs {
        let label = input::label_for(raw);

        let loaded = match input::load(raw, max_file_size_bytes).await {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!("Skipping {label}: {e:#}");
                sink.input_error(&label, &format!("{e:#}"))?;
                failed += 1;
                continue;
            }
        };

        let spinner = create_spinner(&loaded.label);
        let timed = analyzer.analyze_timed(&loaded.image).await;
        spinner.finish_and_clear();

        if let AnalysisOutcome::Failure(err) = &timed.outcome {
            tracing::error!(
                "Analysis of {} failed ({}) after {}ms: {err}",
                loaded.label,
                err.kind(),
                timed.latency_ms
            );
            failed += 1;
        }
        sink.outcome(&loaded.label, &timed)?;
    }
    sink.finish()?;

    if failed > 0 {
        anyhow::bail!("{failed} of {} image(s) could not be analyzed", inputs.len());
    }
    Ok(())
}

/// Spinner shown on stderr while a request is in flight.
fn create_spinner(label: &str) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap(),
    );
    pb.set_message(format!("Analyzing plant health: {label}"));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use floradoc_core::{AnalysisRequest, InferenceClient, InferenceResponse, TransportError};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    const TOMATO: &str = r#"{"isPlant":true,"plantName":"Tomato","condition":"Early Blight","confidence":87,"symptoms":["brown spots"],"treatments":{"organic":["neem oil"],"chemical":["copper fungicide"]}}"#;
    const PNG_URI: &str = "data:image/png;base64,iVBORw0KGgo=";
    const MB: u64 = 1024 * 1024;

    /// Answers with the queued texts in order and counts calls.
    struct ScriptedClient {
        answers: Mutex<VecDeque<&'static str>>,
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl InferenceClient for ScriptedClient {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-model"
        }

        async fn generate(
            &self,
            _request: &AnalysisRequest,
        ) -> Result<InferenceResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let text = self.answers.lock().unwrap().pop_front();
            Ok(InferenceResponse {
                text: text.map(String::from),
                model: "scripted-model".to_string(),
                tokens_used: None,
                latency_ms: 1,
            })
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(5)
        }
    }

    fn scripted(answers: &[&'static str]) -> (Analyzer, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let client = ScriptedClient {
            answers: Mutex::new(answers.iter().copied().collect()),
            calls: calls.clone(),
        };
        (Analyzer::new(Box::new(client)), calls)
    }

    fn jsonl_sink() -> Sink<Vec<u8>> {
        Sink::Records(RecordWriter::new(
            Vec::new(),
            floradoc_core::OutputFormat::JsonLines,
            false,
        ))
    }

    fn records(sink: Sink<Vec<u8>>) -> Vec<serde_json::Value> {
        let Sink::Records(writer) = sink else {
            panic!("expected a record sink");
        };
        String::from_utf8(writer.into_inner())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_mixed_inputs_report_each_and_fail_overall() {
        let (analyzer, calls) = scripted(&[TOMATO, "The leaf looks sick."]);
        let inputs = vec![
            PNG_URI.to_string(),
            "/nonexistent/floradoc/leaf.jpg".to_string(),
            PNG_URI.to_string(),
        ];
        let mut sink = jsonl_sink();

        let err = run(&analyzer, &inputs, MB, &mut sink).await.unwrap_err();
        assert!(err.to_string().contains("2 of 3"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let records = records(sink);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0]["input"], "data-uri");
        assert_eq!(records[0]["status"], "success");
        assert_eq!(records[0]["verdict"], "diseased");
        assert_eq!(records[0]["model"], "scripted-model");
        assert!(records[0]["latency_ms"].is_u64());

        assert_eq!(records[1]["input"], "/nonexistent/floradoc/leaf.jpg");
        assert_eq!(records[1]["status"], "failure");
        assert_eq!(records[1]["error"]["kind"], "invalid_input");
        assert!(records[1].get("model").is_none());

        assert_eq!(records[2]["status"], "failure");
        assert_eq!(records[2]["error"]["kind"], "malformed_response");
    }

    #[tokio::test]
    async fn test_all_inputs_succeed() {
        let (analyzer, calls) = scripted(&[TOMATO, TOMATO]);
        let inputs = vec![PNG_URI.to_string(), PNG_URI.to_string()];
        let mut sink = jsonl_sink();

        run(&analyzer, &inputs, MB, &mut sink).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(records(sink).iter().all(|r| r["status"] == "success"));
    }

    #[tokio::test]
    async fn test_unloadable_inputs_never_call_service() {
        let dir = tempfile::tempdir().unwrap();
        let text_file = dir.path().join("notes.txt");
        std::fs::write(&text_file, "not an image").unwrap();

        let (analyzer, calls) = scripted(&[]);
        let inputs = vec![
            text_file.display().to_string(),
            "data:image/png;base64,".to_string(),
        ];
        let mut sink = jsonl_sink();

        assert!(run(&analyzer, &inputs, MB, &mut sink).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(records(sink)
            .iter()
            .all(|r| r["error"]["kind"] == "invalid_input"));
    }

    #[tokio::test]
    async fn test_text_sink_shows_generic_failure_message() {
        let (analyzer, _) = scripted(&[]);
        let mut sink = Sink::Text {
            out: Vec::new(),
            report: TextReport::new(false),
        };

        assert!(run(&analyzer, &[PNG_URI.to_string()], MB, &mut sink)
            .await
            .is_err());

        let Sink::Text { out, .. } = sink else {
            panic!("expected a text sink");
        };
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(AnalysisOutcome::FAILURE_MESSAGE));
    }
}
