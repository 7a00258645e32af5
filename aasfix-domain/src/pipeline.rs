//! The orchestrator: copy, open, run the fixers in order, flush.

use crate::fixers::{Reversibility, builtin_fixers};
use aasfix_package::OpcPackage;
use aasfix_types::{Direction, FixCatalog};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tracing::{debug, info};

/// Errors of a pipeline run.
///
/// Preflight errors (exit code 2) occur before anything is written.
/// Processing errors (exit code 1) abort the run; the output copy already
/// exists at that point and may be partially fixed. The run is not rolled
/// back, matching the copy-then-mutate contract.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("input file {0} does not exist")]
    InputMissing(Utf8PathBuf),

    #[error("output file {0} already exists; this tool will not overwrite existing files")]
    OutputExists(Utf8PathBuf),

    #[error("{0:#}")]
    Processing(#[from] anyhow::Error),
}

impl RunError {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::InputMissing(_) | RunError::OutputExists(_) => 2,
            RunError::Processing(_) => 1,
        }
    }
}

/// Per-fixer result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixerOutcome {
    pub fixer: &'static str,
    pub corrected: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub outcomes: Vec<FixerOutcome>,
}

impl RunSummary {
    pub fn total_corrected(&self) -> u64 {
        self.outcomes.iter().map(|o| o.corrected).sum()
    }
}

/// Copies `input` to `output` and repairs the copy in place.
///
/// The input is never mutated. In the [`Direction::Unfix`] direction the
/// catalog is reversed and one-way fixers are skipped, so defects repaired
/// by a previous fix run stay repaired.
pub fn run(
    input: &Utf8Path,
    output: &Utf8Path,
    direction: Direction,
) -> Result<RunSummary, RunError> {
    if !input.exists() {
        return Err(RunError::InputMissing(input.to_owned()));
    }
    if output.exists() {
        return Err(RunError::OutputExists(output.to_owned()));
    }

    fs::copy(input, output).map_err(anyhow::Error::from)?;
    make_writable(output)?;

    let mut catalog = FixCatalog::builtin();
    if direction == Direction::Unfix {
        catalog.reverse();
    }

    let mut package = OpcPackage::open(output)?;
    let mut summary = RunSummary::default();
    for fixer in builtin_fixers() {
        if direction == Direction::Unfix && fixer.reversibility() == Reversibility::OneWay {
            debug!(fixer = fixer.name(), "skipping one-way fixer in unfix direction");
            continue;
        }
        let corrected = fixer.fix(&mut package, &catalog)?;
        info!(fixer = fixer.name(), corrected, "fixer pass complete");
        summary.outcomes.push(FixerOutcome {
            fixer: fixer.name(),
            corrected,
        });
    }
    package.flush()?;

    Ok(summary)
}

/// The copy inherits the input's permissions; a read-only input must still
/// yield a writable output.
fn make_writable(path: &Utf8Path) -> Result<(), RunError> {
    let metadata = fs::metadata(path).map_err(anyhow::Error::from)?;
    let mut permissions = metadata.permissions();
    if permissions.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(false);
        fs::set_permissions(path, permissions).map_err(anyhow::Error::from)?;
    }
    Ok(())
}
