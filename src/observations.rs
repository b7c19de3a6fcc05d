/*!
# Observation Loading

Reads whitespace-separated `x y sigma` rows from a `.txt` file into three parallel
sequences.

How malformed rows are handled depends on [`Rigidity`]:

- [`Rigidity::Lenient`] skips the row (or, for extra trailing tokens, keeps the first
  three) and records a diagnostic, also emitted as a `tracing` warning.
- [`Rigidity::Strict`] aborts the whole load with a typed [`DataError`].

A wrong extension or an unreadable path is fatal in both modes.
*/

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::DataError;

/// Strictness used when reading an observation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rigidity {
    /// Skip malformed rows with a diagnostic.
    #[default]
    Lenient,
    /// Abort on the first malformed row.
    Strict,
}

impl From<bool> for Rigidity {
    fn from(strict: bool) -> Self {
        if strict {
            Rigidity::Strict
        } else {
            Rigidity::Lenient
        }
    }
}

/// Measured `(input, output, sigma)` triples, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Observations {
    inputs: Vec<f64>,
    outputs: Vec<f64>,
    sigmas: Vec<f64>,
    diagnostics: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Input,
    Output,
    Sigma,
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Field::Input => "input",
            Field::Output => "output",
            Field::Sigma => "sigma",
        }
    }
}

enum RowIssue {
    Unreadable(Field),
    NegativeSigma,
    ZeroSigma,
}

impl RowIssue {
    fn into_error(self, line: usize, row: String) -> DataError {
        match self {
            RowIssue::Unreadable(_) => DataError::InvalidRow { line, row },
            RowIssue::NegativeSigma => DataError::NegativeSigma { line, row },
            RowIssue::ZeroSigma => DataError::ZeroSigma { line, row },
        }
    }

    fn diagnostic(&self, line: usize, row: &str) -> String {
        match self {
            RowIssue::Unreadable(field) => format!(
                "Skipping row - Error reading {} data from line {line} : {row}",
                field.label()
            ),
            RowIssue::NegativeSigma => format!(
                "Skipping row - Sigma value is negative where standard deviation is inherently positive in line {line} : {row}"
            ),
            RowIssue::ZeroSigma => format!(
                "Skipping row - Sigma value is zero where standard deviation is inherently positive in line {line} : {row}"
            ),
        }
    }
}

impl Observations {
    /// Builds observations from in-memory sequences.
    ///
    /// Fails if the sequences differ in length or a sigma is not a finite positive
    /// number. Row errors carry the 1-based index of the offending triple as `line`.
    pub fn from_vecs(
        inputs: Vec<f64>,
        outputs: Vec<f64>,
        sigmas: Vec<f64>,
    ) -> Result<Self, DataError> {
        if inputs.len() != outputs.len() || outputs.len() != sigmas.len() {
            return Err(DataError::LengthMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
                sigmas: sigmas.len(),
            });
        }
        for (idx, ((x, y), &sigma)) in inputs.iter().zip(&outputs).zip(&sigmas).enumerate() {
            if let Err(issue) = check_sigma(sigma) {
                return Err(issue.into_error(idx + 1, format!("{x} {y} {sigma}")));
            }
        }
        Ok(Self {
            inputs,
            outputs,
            sigmas,
            diagnostics: Vec::new(),
        })
    }

    /// Loads observations from `path`, which must have a `.txt` extension.
    pub fn load(path: impl AsRef<Path>, rigidity: Rigidity) -> Result<Self, DataError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        if extension != "txt" {
            return Err(DataError::Extension {
                path: path.to_path_buf(),
                found: extension,
            });
        }
        let contents = fs::read_to_string(path).map_err(|source| DataError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let observations = Self::parse(&contents, rigidity)?;
        debug!(
            path = %path.display(),
            num_points = observations.num_points(),
            skipped = observations.diagnostics.len(),
            "loaded observations"
        );
        Ok(observations)
    }

    /// Parses file contents. Line numbers in diagnostics and errors are 1-based.
    pub fn parse(contents: &str, rigidity: Rigidity) -> Result<Self, DataError> {
        let mut obs = Self::default();
        for (idx, row) in contents.lines().enumerate() {
            let line = idx + 1;
            let tokens: Vec<&str> = row.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }

            match parse_triple(&tokens) {
                Ok((x, y, sigma)) => {
                    if tokens.len() > 3 {
                        if rigidity == Rigidity::Strict {
                            return Err(DataError::ExtraData {
                                line,
                                row: row.trim().to_string(),
                            });
                        }
                        obs.note(format!(
                            "Unexpected data exceeding three feature x, y and sigma format in line {line} : {row}"
                        ));
                    }
                    obs.inputs.push(x);
                    obs.outputs.push(y);
                    obs.sigmas.push(sigma);
                }
                Err(issue) => {
                    if rigidity == Rigidity::Strict {
                        return Err(issue.into_error(line, row.trim().to_string()));
                    }
                    obs.note(issue.diagnostic(line, row));
                }
            }
        }
        Ok(obs)
    }

    fn note(&mut self, message: String) {
        warn!("{message}");
        self.diagnostics.push(message);
    }

    pub fn num_points(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    pub fn sigmas(&self) -> &[f64] {
        &self.sigmas
    }

    /// Diagnostics for rows that were skipped or truncated under lenient loading.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Iterates over `(input, output, sigma)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.inputs
            .iter()
            .zip(&self.outputs)
            .zip(&self.sigmas)
            .map(|((&x, &y), &s)| (x, y, s))
    }
}

fn parse_triple(tokens: &[&str]) -> Result<(f64, f64, f64), RowIssue> {
    let field = |i: usize, which: Field| {
        tokens
            .get(i)
            .and_then(|t| t.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .ok_or(RowIssue::Unreadable(which))
    };
    let x = field(0, Field::Input)?;
    let y = field(1, Field::Output)?;
    let sigma = field(2, Field::Sigma)?;
    check_sigma(sigma)?;
    Ok((x, y, sigma))
}

fn check_sigma(sigma: f64) -> Result<(), RowIssue> {
    if !sigma.is_finite() {
        Err(RowIssue::Unreadable(Field::Sigma))
    } else if sigma < 0.0 {
        Err(RowIssue::NegativeSigma)
    } else if sigma == 0.0 {
        Err(RowIssue::ZeroSigma)
    } else {
        Ok(())
    }
}
