//! Boundary command implementation.

use super::{parse_claim_id, Session};
use crate::cli::{BoundaryAction, BoundaryArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use fra_domain::traits::ClaimRepository;
use fra_store::records::shapes_from_json;
use std::fs;
use std::io::{self, Read};

/// Execute a boundary subcommand.
pub fn execute_boundary<R: ClaimRepository>(
    args: BoundaryArgs,
    session: &Session<'_, R>,
    formatter: &Formatter,
) -> Result<String> {
    match args.action {
        BoundaryAction::Save { id, file, stdin } => {
            let id = parse_claim_id(&id)?;
            let json = if stdin {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                buffer
            } else if let Some(path) = file {
                fs::read_to_string(path)?
            } else {
                return Err(CliError::InvalidInput(
                    "Must specify either --file or --stdin".to_string(),
                ));
            };

            let shapes = shapes_from_json(&json)
                .map_err(|e| CliError::InvalidInput(format!("Invalid boundary file: {}", e)))?;
            let authority = session.authority()?;
            let map = session
                .engine
                .save_claim_boundary(id, &authority, shapes)?;
            formatter.boundary_saved(&id, &map)
        }
        BoundaryAction::Show { id } => {
            let id = parse_claim_id(&id)?;
            let map = session.engine.boundaries().get_boundary(id)?;
            formatter.format_boundary(map.as_ref())
        }
        BoundaryAction::Clear { id } => {
            let id = parse_claim_id(&id)?;
            let authority = session.authority()?;
            let removed = session.engine.clear_claim_boundary(id, &authority)?;
            Ok(formatter.boundary_cleared(&id, removed.is_some()))
        }
    }
}
