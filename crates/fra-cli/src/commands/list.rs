//! List and pending command implementations.

use super::Session;
use crate::cli::ListArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use fra_domain::traits::{ClaimFilter, ClaimRepository};
use fra_domain::Status;

/// Execute the list command.
pub fn execute_list<R: ClaimRepository>(
    args: ListArgs,
    session: &Session<'_, R>,
    formatter: &Formatter,
) -> Result<String> {
    let filter = build_filter(args)?;
    let claims = session.engine.list_claims(&filter)?;
    formatter.format_claims(&claims)
}

/// Execute the pending command.
pub fn execute_pending<R: ClaimRepository>(
    session: &Session<'_, R>,
    formatter: &Formatter,
) -> Result<String> {
    let authority = session.authority()?;
    let claims = session.engine.pending_for(&authority)?;
    formatter.format_claims(&claims)
}

fn build_filter(args: ListArgs) -> Result<ClaimFilter> {
    let statuses = args
        .status
        .iter()
        .map(|s| {
            Status::parse(s)
                .ok_or_else(|| CliError::InvalidInput(format!("Unknown status '{}'", s)))
        })
        .collect::<Result<Vec<_>>>()?;

    if args.limit == Some(0) {
        return Err(CliError::InvalidInput("Limit must be at least 1".to_string()));
    }

    Ok(ClaimFilter {
        statuses,
        state: args.state,
        district: args.district,
        tehsil: args.tehsil,
        gram_panchayat: args.gram_panchayat,
        claim_type: args.claim_type.map(Into::into),
        limit: args.limit,
    })
}
