//! Sample command implementation.

use std::io::Write;

use relay_alerts::samples;

use crate::cli::SampleKind;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Sample command executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleCommand;

impl SampleCommand {
    /// Execute the sample command.
    ///
    /// # Errors
    ///
    /// Returns an error if output fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        kind: SampleKind,
    ) -> Result<(), CliError> {
        format.write(writer, &samples::sample_event(kind.into()))
    }
}
