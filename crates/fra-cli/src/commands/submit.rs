//! Submit command implementation.

use super::Session;
use crate::cli::SubmitArgs;
use crate::error::Result;
use crate::output::Formatter;
use fra_domain::traits::ClaimRepository;
use fra_domain::{Applicant, LandDetails};
use fra_workflow::ClaimApplication;

/// Execute the submit command.
pub fn execute_submit<R: ClaimRepository>(
    args: SubmitArgs,
    session: &Session<'_, R>,
    formatter: &Formatter,
) -> Result<String> {
    let application = ClaimApplication {
        applicant: Applicant {
            name: args.name,
            contact: args.contact,
            identity_number: args.identity,
            village: args.village,
            gram_panchayat: args.gram_panchayat,
            tehsil: args.tehsil,
            district: args.district,
            state: args.state,
        },
        claim_type: args.claim_type.into(),
        land: LandDetails {
            declared_area: args.area,
            unit: args.unit.into(),
            description: args.description,
            compartment_number: args.compartment.filter(|c| !c.trim().is_empty()),
        },
    };

    let claim = session.engine.submit_claim(application)?;
    Ok(formatter.claim_submitted(&claim.id))
}
