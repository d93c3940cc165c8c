//! Act command implementation.

use super::{parse_claim_id, Session};
use crate::cli::ActArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use fra_domain::traits::ClaimRepository;
use fra_domain::Action;

/// Execute the act command.
pub fn execute_act<R: ClaimRepository>(
    args: ActArgs,
    session: &Session<'_, R>,
    formatter: &Formatter,
) -> Result<String> {
    let id = parse_claim_id(&args.id)?;
    let action = Action::parse(&args.action).ok_or_else(|| {
        CliError::InvalidInput(format!(
            "Unknown action '{}'. Expected one of: {}",
            args.action,
            Action::ALL
                .iter()
                .map(|a| a.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })?;

    let authority = session.authority()?;
    let claim = session.engine.apply(id, action, &authority, &args.remarks)?;
    formatter.action_applied(&claim)
}
