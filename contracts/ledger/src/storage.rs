//! Typed accessors over contract storage.

use soroban_sdk::{Address, Env, IntoVal, String, Symbol, TryFromVal, Val, Vec};

use crate::types::{BudgetData, CompanyRecord, DataKey, LedgerConfig, LedgerError, Role};

// ── configuration (instance) ────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Owner)
}

pub fn get_owner(env: &Env) -> Result<Address, LedgerError> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(LedgerError::NotInitialized)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

pub fn get_config(env: &Env) -> Result<LedgerConfig, LedgerError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(LedgerError::NotInitialized)
}

pub fn set_config(env: &Env, config: &LedgerConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

// ── paged indices (persistent) ──────────────────────────────────────────────
//
// An index is a count key plus one entry per slot, in append order.

fn index_len(env: &Env, count_key: &DataKey) -> u32 {
    env.storage().persistent().get(count_key).unwrap_or(0)
}

fn index_append<T>(env: &Env, count_key: &DataKey, at: impl Fn(u32) -> DataKey, item: &T)
where
    T: IntoVal<Env, Val>,
{
    let len = index_len(env, count_key);
    env.storage().persistent().set(&at(len), item);
    env.storage().persistent().set(count_key, &(len + 1));
}

/// Up to `limit` index entries starting at slot `start`.
fn index_page<T>(
    env: &Env,
    count_key: &DataKey,
    at: impl Fn(u32) -> DataKey,
    start: u32,
    limit: u32,
) -> Vec<T>
where
    T: TryFromVal<Env, Val> + IntoVal<Env, Val>,
{
    let end = index_len(env, count_key).min(start.saturating_add(limit));
    let mut out = Vec::new(env);
    for slot in start..end {
        if let Some(item) = env.storage().persistent().get(&at(slot)) {
            out.push_back(item);
        }
    }
    out
}

fn index_all<T>(env: &Env, count_key: &DataKey, at: impl Fn(u32) -> DataKey) -> Vec<T>
where
    T: TryFromVal<Env, Val> + IntoVal<Env, Val>,
{
    index_page(env, count_key, at, 0, u32::MAX)
}

// ── roles ───────────────────────────────────────────────────────────────────

pub fn has_role(env: &Env, role: Role, who: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::Role(role, who.clone()))
        .unwrap_or(false)
}

pub fn set_role(env: &Env, role: Role, who: &Address, enabled: bool) {
    env.storage()
        .persistent()
        .set(&DataKey::Role(role, who.clone()), &enabled);
    if enabled && role == Role::Agency {
        let listed = DataKey::AgencyListed(who.clone());
        if !env.storage().persistent().has(&listed) {
            env.storage().persistent().set(&listed, &true);
            index_append(env, &DataKey::AgencyCount, DataKey::AgencyAt, who);
        }
    }
}

/// Every address ever granted the agency role.
pub fn agencies(env: &Env) -> Vec<Address> {
    index_all(env, &DataKey::AgencyCount, DataKey::AgencyAt)
}

pub fn get_agency_name(env: &Env, agency: &Address) -> String {
    env.storage()
        .persistent()
        .get(&DataKey::AgencyName(agency.clone()))
        .unwrap_or_else(|| String::from_str(env, ""))
}

pub fn set_agency_name(env: &Env, agency: &Address, name: &String) {
    env.storage()
        .persistent()
        .set(&DataKey::AgencyName(agency.clone()), name);
}

// ── areas ───────────────────────────────────────────────────────────────────

pub fn is_area_known(env: &Env, area: &Symbol) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::AreaActive(area.clone()))
}

pub fn is_area_active(env: &Env, area: &Symbol) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::AreaActive(area.clone()))
        .unwrap_or(false)
}

pub fn set_area_active(env: &Env, area: &Symbol, active: bool) {
    if !is_area_known(env, area) {
        index_append(env, &DataKey::AreaCount, DataKey::AreaAt, area);
    }
    env.storage()
        .persistent()
        .set(&DataKey::AreaActive(area.clone()), &active);
}

/// Every area ever registered, active or not.
pub fn known_areas(env: &Env) -> Vec<Symbol> {
    index_all(env, &DataKey::AreaCount, DataKey::AreaAt)
}

// ── companies ───────────────────────────────────────────────────────────────

pub fn get_company(env: &Env, company: &Address) -> Option<CompanyRecord> {
    env.storage()
        .persistent()
        .get(&DataKey::Company(company.clone()))
}

pub fn set_company(env: &Env, company: &Address, record: &CompanyRecord) {
    let key = DataKey::Company(company.clone());
    if !env.storage().persistent().has(&key) {
        index_append(env, &DataKey::CompanyCount, DataKey::CompanyAt, company);
    }
    env.storage().persistent().set(&key, record);
}

pub fn company_count(env: &Env) -> u32 {
    index_len(env, &DataKey::CompanyCount)
}

/// Registered companies in registration order, `limit` from slot `start`.
pub fn companies_page(env: &Env, start: u32, limit: u32) -> Vec<Address> {
    index_page(env, &DataKey::CompanyCount, DataKey::CompanyAt, start, limit)
}

pub fn companies(env: &Env) -> Vec<Address> {
    index_all(env, &DataKey::CompanyCount, DataKey::CompanyAt)
}

pub fn is_company_area_allowed(env: &Env, company: &Address, area: &Symbol) -> bool {
    env.storage()
        .persistent()
        .get(&DataKey::CompanyArea(company.clone(), area.clone()))
        .unwrap_or(false)
}

pub fn set_company_area(env: &Env, company: &Address, area: &Symbol, allowed: bool) {
    env.storage()
        .persistent()
        .set(&DataKey::CompanyArea(company.clone(), area.clone()), &allowed);
}

// ── budgets ─────────────────────────────────────────────────────────────────

pub fn get_budget(env: &Env, year: u32, area: &Symbol) -> BudgetData {
    env.storage()
        .persistent()
        .get(&DataKey::Budget(year, area.clone()))
        .unwrap_or_default()
}

pub fn set_budget(env: &Env, year: u32, area: &Symbol, budget: &BudgetData) {
    let key = DataKey::Budget(year, area.clone());
    let fresh = !env.storage().persistent().has(&key);
    env.storage().persistent().set(&key, budget);
    if !fresh {
        return;
    }

    // Bounded by the 16-bit year range.
    let mut years = budget_years(env);
    if years.contains(year) {
        return;
    }
    let pos = years.iter().position(|y| y > year).unwrap_or(years.len() as usize);
    years.insert(pos as u32, year);
    env.storage().persistent().set(&DataKey::BudgetYears, &years);
}

/// Years that ever had a budget entry, ascending.
pub fn budget_years(env: &Env) -> Vec<u32> {
    env.storage()
        .persistent()
        .get(&DataKey::BudgetYears)
        .unwrap_or_else(|| Vec::new(env))
}

// ── balances ────────────────────────────────────────────────────────────────

pub fn balance(env: &Env, holder: &Address, area: &Symbol, year: u32) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Balance(holder.clone(), area.clone(), year))
        .unwrap_or(0)
}

fn set_balance(env: &Env, holder: &Address, area: &Symbol, year: u32, amount: i128) {
    env.storage()
        .persistent()
        .set(&DataKey::Balance(holder.clone(), area.clone(), year), &amount);
}

/// Holders that were ever credited for (area, year).
pub fn holders(env: &Env, area: &Symbol, year: u32) -> Vec<Address> {
    index_all(
        env,
        &DataKey::HolderCount(area.clone(), year),
        |slot| DataKey::HolderAt(area.clone(), year, slot),
    )
}

/// Adds `amount` to a tagged balance, registering the holder for supply views.
pub fn credit(
    env: &Env,
    holder: &Address,
    area: &Symbol,
    year: u32,
    amount: i128,
) -> Result<i128, LedgerError> {
    let key = DataKey::Balance(holder.clone(), area.clone(), year);
    let current: Option<i128> = env.storage().persistent().get(&key);
    let updated = current
        .unwrap_or(0)
        .checked_add(amount)
        .ok_or(LedgerError::Overflow)?;
    if current.is_none() {
        index_append(
            env,
            &DataKey::HolderCount(area.clone(), year),
            |slot| DataKey::HolderAt(area.clone(), year, slot),
            holder,
        );
    }
    env.storage().persistent().set(&key, &updated);
    Ok(updated)
}

/// Removes `amount` from a tagged balance, refusing to go negative.
pub fn debit(
    env: &Env,
    holder: &Address,
    area: &Symbol,
    year: u32,
    amount: i128,
) -> Result<i128, LedgerError> {
    let current = balance(env, holder, area, year);
    if current < amount {
        return Err(LedgerError::InsufficientBalance);
    }
    let updated = current - amount;
    set_balance(env, holder, area, year, updated);
    Ok(updated)
}

// ── settlement ──────────────────────────────────────────────────────────────

/// Cumulative amount paid to `company` for (area, year).
pub fn received(env: &Env, company: &Address, area: &Symbol, year: u32) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Received(company.clone(), area.clone(), year))
        .unwrap_or(0)
}

pub fn set_received(env: &Env, company: &Address, area: &Symbol, year: u32, amount: i128) {
    env.storage()
        .persistent()
        .set(&DataKey::Received(company.clone(), area.clone(), year), &amount);
}

pub fn settled(env: &Env, company: &Address, area: &Symbol, year: u32) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Settled(company.clone(), area.clone(), year))
        .unwrap_or(0)
}

pub fn set_settled(env: &Env, company: &Address, area: &Symbol, year: u32, amount: i128) {
    env.storage()
        .persistent()
        .set(&DataKey::Settled(company.clone(), area.clone(), year), &amount);
}
