//! Show and history command implementations.

use super::{parse_claim_id, Session};
use crate::cli::ClaimArgs;
use crate::error::Result;
use crate::output::Formatter;
use fra_domain::traits::ClaimRepository;

/// Execute the show command.
///
/// When a session token is present the output also lists the actions that
/// officer could take now.
pub fn execute_show<R: ClaimRepository>(
    args: ClaimArgs,
    session: &Session<'_, R>,
    formatter: &Formatter,
) -> Result<String> {
    let id = parse_claim_id(&args.id)?;
    let claim = session.engine.get_claim(id)?;
    let actions = match session.optional_authority()? {
        Some(authority) => claim.available_actions(&authority),
        None => Vec::new(),
    };
    formatter.format_claim(&claim, &actions)
}

/// Execute the history command.
pub fn execute_history<R: ClaimRepository>(
    args: ClaimArgs,
    session: &Session<'_, R>,
    formatter: &Formatter,
) -> Result<String> {
    let id = parse_claim_id(&args.id)?;
    let claim = session.engine.get_claim(id)?;
    formatter.format_history(&claim)
}
