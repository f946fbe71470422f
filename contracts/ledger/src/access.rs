//! Caller authorization. Every guard authenticates the caller first and only
//! then checks what the caller is allowed to do.

use soroban_sdk::{Address, Env};

use crate::storage;
use crate::types::{LedgerError, Role};

pub fn require_owner(env: &Env, caller: &Address) -> Result<Address, LedgerError> {
    caller.require_auth();
    let owner = storage::get_owner(env)?;
    if *caller != owner {
        return Err(LedgerError::Unauthorized);
    }
    Ok(owner)
}

/// Requires `caller` to hold `role`, failing with `Unauthorized`.
pub fn require_role(env: &Env, caller: &Address, role: Role) -> Result<(), LedgerError> {
    require_role_or(env, caller, role, LedgerError::Unauthorized)
}

/// Agency-initiated movements report a missing role as `NotAgency`.
pub fn require_agency(env: &Env, caller: &Address) -> Result<(), LedgerError> {
    require_role_or(env, caller, Role::Agency, LedgerError::NotAgency)
}

fn require_role_or(
    env: &Env,
    caller: &Address,
    role: Role,
    err: LedgerError,
) -> Result<(), LedgerError> {
    caller.require_auth();
    storage::get_owner(env)?;
    if !storage::has_role(env, role, caller) {
        return Err(err);
    }
    Ok(())
}
