//! Formatted terminal output for models and fits.
//!
//! We keep formatting code in one place so the model/fitting code stays clean
//! and output changes are localized.

use std::fmt;

use crate::domain::Mode;
use crate::fit::FitReport;
use crate::models::SinusoidModel;

const COLUMN_WIDTH: usize = 20;

/// Short label for a mode, e.g. `[1, 0, -2]` becomes `+f0-2f2`.
///
/// Frequencies are numbered from zero; zero weights are omitted.
pub fn format_mode(mode: &Mode) -> String {
    let mut out = String::new();
    for (index, &weight) in mode.weights().iter().enumerate() {
        match weight {
            0 => {}
            1 => out.push_str(&format!("+f{index}")),
            -1 => out.push_str(&format!("-f{index}")),
            w => out.push_str(&format!("{w:+}f{index}")),
        }
    }
    out
}

/// Fixed-width table: a header, a dash rule, the DC row, then one row per mode.
impl fmt::Display for SinusoidModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = COLUMN_WIDTH;
        let dashes = "-".repeat(w - 4);

        writeln!(f, "{:^w$}{:^w$}{:^w$}{:^w$}", "Mode", "Frequency", "Amplitude", "Phase")?;
        writeln!(f, "{dashes:^w$}{dashes:^w$}{dashes:^w$}{dashes:^w$}")?;
        write!(f, "{:^w$}{:^w$}{:^w$}{:^w$}", "DC", "--", self.dc_offset(), "--")?;

        for (mode, sinusoid) in self.modes().zip(self.sinusoids()) {
            write!(
                f,
                "\n{:^w$}{:^w$}{:^w$}{:^w$}",
                format_mode(mode),
                sinusoid.frequency(),
                sinusoid.amplitude,
                sinusoid.phase,
            )?;
        }
        Ok(())
    }
}

/// One-paragraph summary of a fit, followed by the model table.
pub fn format_fit_summary(model: &SinusoidModel, report: &FitReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Fit: {:?} after {} iterations ({} evaluations)\n",
        report.convergence, report.iterations, report.evaluations
    ));
    out.push_str(&format!("SSE={:.6e} RMSE={:.6e}\n", report.sse, report.rmse));
    out.push_str(&format!("Frequencies: {}\n", fmt_vec(model.frequencies())));
    out.push('\n');
    out.push_str(&model.to_string());
    out.push('\n');
    out
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::ConvergenceReason;

    #[test]
    fn mode_labels() {
        assert_eq!(format_mode(&Mode::from([1, 0, 0])), "+f0");
        assert_eq!(format_mode(&Mode::from([1, 0, 2])), "+f0+2f2");
        assert_eq!(format_mode(&Mode::from([0, -1, -3])), "-f1-3f2");
        assert_eq!(format_mode(&Mode::from([0, 0])), "");
    }

    #[test]
    fn table_layout() {
        let model = SinusoidModel::new([1.5, 2.0], [[1, 0], [1, 1]])
            .unwrap()
            .with_fit_parameters(&[0.25, 1.0, 0.5, 2.0, 3.0])
            .unwrap();
        let text = model.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        for line in &lines {
            assert_eq!(line.chars().count(), 4 * COLUMN_WIDTH, "line {line:?}");
        }
        assert_eq!(&lines[0][..COLUMN_WIDTH], "        Mode        ");
        assert_eq!(&lines[1][..COLUMN_WIDTH], "  ----------------  ");
        assert_eq!(lines[2].split_whitespace().collect::<Vec<_>>(), vec!["DC", "--", "0.25", "--"]);
        assert_eq!(lines[3].split_whitespace().collect::<Vec<_>>(), vec!["+f0", "1.5", "1", "0.5"]);
        assert_eq!(lines[4].split_whitespace().collect::<Vec<_>>(), vec!["+f0+f1", "3.5", "2", "3"]);
    }

    #[test]
    fn empty_model_has_only_dc_row() {
        let text = SinusoidModel::default().to_string();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn summary_mentions_convergence_and_table() {
        let model = SinusoidModel::new([1.0], [[1]]).unwrap();
        let report = FitReport {
            parameters: model.fit_parameters(),
            sse: 0.0,
            rmse: 0.0,
            iterations: 4,
            evaluations: 17,
            convergence: ConvergenceReason::Step,
        };
        let text = format_fit_summary(&model, &report);
        assert!(text.contains("Step after 4 iterations"));
        assert!(text.contains("[1.000000]"));
        assert!(text.contains("Frequency"));
    }
}
