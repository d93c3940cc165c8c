//! Command implementations.
//!
//! Each command returns its rendered output; `main` prints it.

pub mod act;
pub mod boundary;
pub mod list;
pub mod show;
pub mod submit;

pub use self::act::execute_act;
pub use self::boundary::execute_boundary;
pub use self::list::{execute_list, execute_pending};
pub use self::show::{execute_history, execute_show};
pub use self::submit::execute_submit;

use crate::error::{CliError, Result};
use fra_domain::traits::{AuthorityContext, ClaimRepository};
use fra_domain::{Authority, ClaimId};
use fra_workflow::{StaticAuthority, WorkflowEngine};

/// Everything a command needs to act on behalf of the caller.
pub struct Session<'a, R> {
    /// Workflow engine over the claims database
    pub engine: &'a WorkflowEngine<R>,
    /// Known session tokens
    pub authorities: &'a StaticAuthority,
    /// Token supplied on the command line or environment
    pub token: Option<&'a str>,
}

impl<'a, R: ClaimRepository> Session<'a, R> {
    /// Resolve the acting officer, failing when no token was given.
    pub fn authority(&self) -> Result<Authority> {
        let token = self.token.ok_or(CliError::NoToken)?;
        Ok(self.authorities.resolve(token)?)
    }

    /// Resolve the acting officer if a token was given.
    pub fn optional_authority(&self) -> Result<Option<Authority>> {
        match self.token {
            Some(token) => Ok(Some(self.authorities.resolve(token)?)),
            None => Ok(None),
        }
    }
}

/// Parse a claim ID argument.
pub fn parse_claim_id(input: &str) -> Result<ClaimId> {
    ClaimId::from_string(input.trim())
        .map_err(CliError::InvalidInput)
}
