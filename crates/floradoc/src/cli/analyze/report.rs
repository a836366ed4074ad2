//! Human-readable diagnosis report.
//!
//! Applies the presentation rules: a non-plant image gets only a notice, a
//! healthy plant gets no treatment plan, and any failure collapses to one
//! generic retry message.

use console::Style;
use floradoc_core::{AnalysisOutcome, DiseaseAnalysisResult, Verdict};
use std::io::{self, Write};

const NOT_A_PLANT_MESSAGE: &str =
    "Couldn't detect a plant in this image. Please upload a clear photo of a leaf or plant.";

/// Text renderer for analysis outcomes.
pub struct TextReport {
    heading: Style,
    label: Style,
    good: Style,
    warn: Style,
    bad: Style,
    dim: Style,
}

impl TextReport {
    /// `colored` should be false when writing to a file.
    pub fn new(colored: bool) -> Self {
        let pick = |style: Style| if colored { style } else { Style::new() };
        Self {
            heading: pick(Style::new().bold()),
            label: pick(Style::new().dim()),
            good: pick(Style::new().green().bold()),
            warn: pick(Style::new().yellow().bold()),
            bad: pick(Style::new().red().bold()),
            dim: pick(Style::new().dim()),
        }
    }

    /// Render one outcome under the given input label.
    pub fn render<W: Write>(
        &self,
        out: &mut W,
        input: &str,
        outcome: &AnalysisOutcome,
    ) -> io::Result<()> {
        writeln!(out, "{}", self.heading.apply_to(input))?;
        match outcome {
            AnalysisOutcome::Success(result) => self.render_result(out, result)?,
            AnalysisOutcome::Failure(_) => {
                self.render_error(out, AnalysisOutcome::FAILURE_MESSAGE)?;
            }
        }
        writeln!(out)
    }

    /// Render an input that never reached the analyzer.
    pub fn render_input_error<W: Write>(
        &self,
        out: &mut W,
        input: &str,
        message: &str,
    ) -> io::Result<()> {
        writeln!(out, "{}", self.heading.apply_to(input))?;
        self.render_error(out, message)?;
        writeln!(out)
    }

    fn render_error<W: Write>(&self, out: &mut W, message: &str) -> io::Result<()> {
        writeln!(out, "  {}", self.bad.apply_to("✗ Analysis Error"))?;
        writeln!(out, "    {message}")
    }

    fn render_result<W: Write>(&self, out: &mut W, result: &DiseaseAnalysisResult) -> io::Result<()> {
        let verdict = result.verdict();
        if verdict == Verdict::NotAPlant {
            writeln!(out, "  {}", self.bad.apply_to("✗ Not a Plant"))?;
            return writeln!(out, "    {NOT_A_PLANT_MESSAGE}");
        }

        let condition = match verdict {
            Verdict::Healthy => self.good.apply_to(format!("✓ {}", result.condition)),
            _ => self.warn.apply_to(format!("⚠ {}", result.condition)),
        };
        writeln!(
            out,
            "  {} {}",
            self.label.apply_to("Identified Plant:"),
            result.plant_name
        )?;
        writeln!(out, "  {} {condition}", self.label.apply_to("Condition:       "))?;
        writeln!(
            out,
            "  {} {:.0}%",
            self.label.apply_to("Confidence:      "),
            result.confidence
        )?;

        if !result.description.is_empty() {
            writeln!(out)?;
            writeln!(out, "  {}", self.heading.apply_to("Diagnosis Report"))?;
            writeln!(out, "    {}", result.description)?;
        }

        self.render_list(out, "Symptoms", &result.symptoms, 2)?;
        self.render_list(out, "Potential Causes", &result.causes, 2)?;

        if verdict == Verdict::Diseased && !result.treatments.is_empty() {
            writeln!(out)?;
            writeln!(out, "  {}", self.heading.apply_to("Treatment Plan"))?;
            self.render_list(out, "Organic Solutions", &result.treatments.organic, 4)?;
            self.render_list(out, "Chemical Treatments", &result.treatments.chemical, 4)?;
        }

        self.render_list(out, "Prevention Tips", &result.prevention, 2)
    }

    fn render_list<W: Write>(
        &self,
        out: &mut W,
        title: &str,
        items: &[String],
        indent: usize,
    ) -> io::Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        if indent == 2 {
            writeln!(out)?;
        }
        writeln!(out, "{:indent$}{}", "", self.heading.apply_to(title))?;
        for item in items {
            writeln!(out, "{:indent$}  {} {item}", "", self.dim.apply_to("•"))?;
        }
        Ok(())
    }
}
