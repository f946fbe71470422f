#![no_std]

//! Earmark ledger contract: appropriations per (year, area), role-gated
//! issuance to agencies, agency transfers and payments to companies, and the
//! settlement token minted to companies when they are paid.
//!
//! # Invariants
//! * `minted <= cap` for every (year, area) at the moment a mint is admitted.
//!   The cap may later be lowered below `minted`; `remaining` is then zero.
//! * For every (area, year) the balances of all holders sum to `minted`.
//!   Nothing burns earmarked balance, including `settle`.
//! * A balance only moves between holders under the same (area, year) tag.
//!
//! Every entry point validates all preconditions before its first write. An
//! error return aborts the invocation and the host discards its effects.

mod access;
mod events;
mod storage;
mod types;

use soroban_sdk::{
    contract, contractimpl, log, token, Address, BytesN, Env, String, Symbol, Vec,
};

use access::{require_agency, require_owner, require_role};
use events::{
    publish_agency_name_set, publish_area_added, publish_area_removed, publish_budget_set,
    publish_company_area_set, publish_company_upserted, publish_initialized, publish_minted,
    publish_ownership_transferred, publish_paid, publish_role_set, publish_settled,
    publish_transferred, AgencyNameEvent, BudgetSetEvent, CompanyAreaEvent, CompanyUpsertEvent,
    InitializedEvent, MintEvent, OwnershipTransferredEvent, PaymentEvent, RoleSetEvent,
    SettlementEvent, TransferEvent,
};
pub use types::{
    AgencyInfo, BudgetData, BudgetRow, CompanyInfo, CompanyRecord, LedgerConfig, LedgerError,
    Role, DEFAULT_TOKEN_SCALE, MAX_BUDGET_YEAR,
};

fn check_year(year: u32) -> Result<(), LedgerError> {
    if year > MAX_BUDGET_YEAR {
        return Err(LedgerError::InvalidArgument);
    }
    Ok(())
}

fn check_amount(amount: i128) -> Result<(), LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::InvalidArgument);
    }
    Ok(())
}

fn check_area(env: &Env, area: &Symbol) -> Result<(), LedgerError> {
    if *area == Symbol::new(env, "") {
        return Err(LedgerError::InvalidArgument);
    }
    Ok(())
}

fn require_active_area(env: &Env, area: &Symbol) -> Result<(), LedgerError> {
    check_area(env, area)?;
    if !storage::is_area_known(env, area) {
        return Err(LedgerError::UnknownEntity);
    }
    if !storage::is_area_active(env, area) {
        return Err(LedgerError::EntityInactive);
    }
    Ok(())
}

fn company_info(env: &Env, company: &Address, record: CompanyRecord) -> CompanyInfo {
    let mut areas = Vec::new(env);
    for area in storage::known_areas(env).iter() {
        if storage::is_company_area_allowed(env, company, &area) {
            areas.push_back(area);
        }
    }
    CompanyInfo {
        address: company.clone(),
        registry_id: record.registry_id,
        name: record.name,
        active: record.active,
        areas,
    }
}

fn company_infos(env: &Env, companies: Vec<Address>) -> Vec<CompanyInfo> {
    let mut out = Vec::new(env);
    for company in companies.iter() {
        if let Some(record) = storage::get_company(env, &company) {
            out.push_back(company_info(env, &company, record));
        }
    }
    out
}

/// Sum of every holder's balance for (area, year).
fn supply_of(env: &Env, area: &Symbol, year: u32) -> Result<i128, LedgerError> {
    storage::holders(env, area, year)
        .iter()
        .try_fold(0i128, |total, holder| {
            total
                .checked_add(storage::balance(env, &holder, area, year))
                .ok_or(LedgerError::Overflow)
        })
}

#[contract]
pub struct EarmarkLedger;

#[contractimpl]
impl EarmarkLedger {
    // ── configuration ──────────────────────────────────────────────────────

    /// Initialize the ledger with its owner and settlement token.
    ///
    /// `token` must be a Stellar Asset Contract whose admin is this contract;
    /// `token_scale` is the number of token units minted per earmarked unit
    /// paid to a company (see [`DEFAULT_TOKEN_SCALE`]).
    pub fn init(
        env: Env,
        owner: Address,
        token: Address,
        token_scale: i128,
    ) -> Result<(), LedgerError> {
        if storage::is_initialized(&env) {
            return Err(LedgerError::AlreadyInitialized);
        }
        if token_scale <= 0 {
            return Err(LedgerError::InvalidArgument);
        }
        storage::set_owner(&env, &owner);
        storage::set_config(
            &env,
            &LedgerConfig {
                token: token.clone(),
                token_scale,
            },
        );
        publish_initialized(
            &env,
            InitializedEvent {
                owner,
                token,
                token_scale,
            },
        );
        Ok(())
    }

    pub fn owner(env: Env) -> Result<Address, LedgerError> {
        storage::get_owner(&env)
    }

    pub fn token(env: Env) -> Result<Address, LedgerError> {
        Ok(storage::get_config(&env)?.token)
    }

    pub fn token_scale(env: Env) -> Result<i128, LedgerError> {
        Ok(storage::get_config(&env)?.token_scale)
    }

    /// Hand ownership to `new_owner` (current owner only).
    pub fn transfer_ownership(
        env: Env,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), LedgerError> {
        let previous_owner = require_owner(&env, &caller)?;
        storage::set_owner(&env, &new_owner);
        log!(&env, "ownership transferred", previous_owner, new_owner);
        publish_ownership_transferred(
            &env,
            OwnershipTransferredEvent {
                previous_owner,
                new_owner,
            },
        );
        Ok(())
    }

    // ── roles ──────────────────────────────────────────────────────────────

    /// Grant or revoke a role (owner only). Emits `("ledger", "role")`.
    pub fn set_role(
        env: Env,
        caller: Address,
        role: Role,
        who: Address,
        enabled: bool,
    ) -> Result<(), LedgerError> {
        require_owner(&env, &caller)?;
        storage::set_role(&env, role, &who, enabled);
        publish_role_set(&env, RoleSetEvent { role, who, enabled });
        Ok(())
    }

    /// Set the display name of an agency (owner only).
    ///
    /// # Errors
    /// * `NotAgency` – `agency` does not currently hold the agency role
    pub fn set_agency_name(
        env: Env,
        caller: Address,
        agency: Address,
        name: String,
    ) -> Result<(), LedgerError> {
        require_owner(&env, &caller)?;
        if !storage::has_role(&env, Role::Agency, &agency) {
            return Err(LedgerError::NotAgency);
        }
        storage::set_agency_name(&env, &agency, &name);
        publish_agency_name_set(&env, AgencyNameEvent { agency, name });
        Ok(())
    }

    pub fn has_role(env: Env, role: Role, who: Address) -> bool {
        storage::has_role(&env, role, &who)
    }

    pub fn is_legislator(env: Env, who: Address) -> bool {
        storage::has_role(&env, Role::Legislator, &who)
    }

    pub fn is_treasury(env: Env, who: Address) -> bool {
        storage::has_role(&env, Role::Treasury, &who)
    }

    pub fn is_agency(env: Env, who: Address) -> bool {
        storage::has_role(&env, Role::Agency, &who)
    }

    pub fn is_liquidator(env: Env, who: Address) -> bool {
        storage::has_role(&env, Role::Liquidator, &who)
    }

    /// Agency display name, empty when none was set.
    pub fn agency_name(env: Env, agency: Address) -> String {
        storage::get_agency_name(&env, &agency)
    }

    /// Addresses currently holding the agency role, with their names.
    pub fn list_agencies(env: Env) -> Vec<AgencyInfo> {
        let mut out = Vec::new(&env);
        for address in storage::agencies(&env).iter() {
            if storage::has_role(&env, Role::Agency, &address) {
                let name = storage::get_agency_name(&env, &address);
                out.push_back(AgencyInfo { address, name });
            }
        }
        out
    }

    // ── areas ──────────────────────────────────────────────────────────────

    /// Activate a budget area (owner only). Adding an active area is a no-op.
    pub fn add_area(env: Env, caller: Address, area: Symbol) -> Result<(), LedgerError> {
        require_owner(&env, &caller)?;
        check_area(&env, &area)?;
        if storage::is_area_active(&env, &area) {
            return Ok(());
        }
        storage::set_area_active(&env, &area, true);
        publish_area_added(&env, area);
        Ok(())
    }

    /// Deactivate a budget area (owner only). Budgets and balances already
    /// tagged with it stay readable; new appropriations are refused.
    pub fn remove_area(env: Env, caller: Address, area: Symbol) -> Result<(), LedgerError> {
        require_owner(&env, &caller)?;
        check_area(&env, &area)?;
        if !storage::is_area_active(&env, &area) {
            return Ok(());
        }
        storage::set_area_active(&env, &area, false);
        publish_area_removed(&env, area);
        Ok(())
    }

    pub fn is_area(env: Env, area: Symbol) -> bool {
        storage::is_area_active(&env, &area)
    }

    /// Active areas in registration order.
    pub fn list_areas(env: Env) -> Vec<Symbol> {
        let mut out = Vec::new(&env);
        for area in storage::known_areas(&env).iter() {
            if storage::is_area_active(&env, &area) {
                out.push_back(area);
            }
        }
        out
    }

    // ── companies ──────────────────────────────────────────────────────────

    /// Create or overwrite a company registration (owner only).
    /// Deactivating is `active = false`; companies are never deleted.
    pub fn upsert_company(
        env: Env,
        caller: Address,
        company: Address,
        registry_id: BytesN<14>,
        name: String,
        active: bool,
    ) -> Result<(), LedgerError> {
        require_owner(&env, &caller)?;
        let record = CompanyRecord {
            registry_id: registry_id.clone(),
            name: name.clone(),
            active,
        };
        storage::set_company(&env, &company, &record);
        publish_company_upserted(
            &env,
            CompanyUpsertEvent {
                company,
                registry_id,
                name,
                active,
            },
        );
        Ok(())
    }

    /// Allow or disallow a company to be paid in `area` (owner only).
    ///
    /// # Errors
    /// * `UnknownEntity` – company never upserted, or area never added
    pub fn set_company_area(
        env: Env,
        caller: Address,
        company: Address,
        area: Symbol,
        allowed: bool,
    ) -> Result<(), LedgerError> {
        require_owner(&env, &caller)?;
        check_area(&env, &area)?;
        if storage::get_company(&env, &company).is_none() || !storage::is_area_known(&env, &area) {
            return Err(LedgerError::UnknownEntity);
        }
        storage::set_company_area(&env, &company, &area, allowed);
        publish_company_area_set(
            &env,
            CompanyAreaEvent {
                company,
                area,
                allowed,
            },
        );
        Ok(())
    }

    /// Registered and active.
    pub fn is_company(env: Env, company: Address) -> bool {
        storage::get_company(&env, &company)
            .map(|record| record.active)
            .unwrap_or(false)
    }

    pub fn is_company_allowed_for_area(env: Env, company: Address, area: Symbol) -> bool {
        storage::is_company_area_allowed(&env, &company, &area)
    }

    pub fn get_company(env: Env, company: Address) -> Option<CompanyInfo> {
        storage::get_company(&env, &company).map(|record| company_info(&env, &company, record))
    }

    pub fn company_name(env: Env, company: Address) -> String {
        storage::get_company(&env, &company)
            .map(|record| record.name)
            .unwrap_or_else(|| String::from_str(&env, ""))
    }

    /// Every registered company, inactive ones included.
    pub fn list_companies(env: Env) -> Vec<CompanyInfo> {
        company_infos(&env, storage::companies(&env))
    }

    /// Number of registered companies, inactive ones included.
    pub fn company_count(env: Env) -> u32 {
        storage::company_count(&env)
    }

    /// At most `limit` companies in registration order, from index `start`.
    pub fn list_companies_page(env: Env, start: u32, limit: u32) -> Vec<CompanyInfo> {
        company_infos(&env, storage::companies_page(&env, start, limit))
    }

    // ── budgets ────────────────────────────────────────────────────────────

    /// Set the appropriation cap for (year, area) (legislator only).
    ///
    /// The cap is overwritten unconditionally and may go below what was
    /// already minted; `minted` and `realized` are left untouched.
    ///
    /// # Errors
    /// * `Unauthorized` – caller is not a legislator
    /// * `InvalidArgument` – year out of range, malformed area, or negative cap
    /// * `UnknownEntity` / `EntityInactive` – area never added, or removed
    pub fn set_budget(
        env: Env,
        caller: Address,
        year: u32,
        area: Symbol,
        cap: i128,
    ) -> Result<(), LedgerError> {
        require_role(&env, &caller, Role::Legislator)?;
        check_year(year)?;
        if cap < 0 {
            return Err(LedgerError::InvalidArgument);
        }
        require_active_area(&env, &area)?;

        let mut budget = storage::get_budget(&env, year, &area);
        budget.cap = cap;
        storage::set_budget(&env, year, &area, &budget);

        publish_budget_set(&env, BudgetSetEvent { year, area, cap });
        Ok(())
    }

    /// Budget for (year, area); all zeros if never set.
    pub fn get_budget(env: Env, year: u32, area: Symbol) -> BudgetData {
        storage::get_budget(&env, year, &area)
    }

    /// `cap - minted`, clamped at zero.
    pub fn remaining(env: Env, year: u32, area: Symbol) -> i128 {
        storage::get_budget(&env, year, &area).remaining()
    }

    /// Years with at least one non-zero cap or mint, ascending.
    pub fn list_budget_years(env: Env) -> Vec<u32> {
        let areas = storage::known_areas(&env);
        let mut out = Vec::new(&env);
        for year in storage::budget_years(&env).iter() {
            if areas
                .iter()
                .any(|area| !storage::get_budget(&env, year, &area).is_empty())
            {
                out.push_back(year);
            }
        }
        out
    }

    /// Per-area budget rows for `year`, including areas removed since.
    pub fn get_budgets_for_year(env: Env, year: u32) -> Vec<BudgetRow> {
        let mut out = Vec::new(&env);
        for area in storage::known_areas(&env).iter() {
            let budget = storage::get_budget(&env, year, &area);
            if budget.is_empty() {
                continue;
            }
            out.push_back(BudgetRow {
                area,
                cap: budget.cap,
                minted: budget.minted,
                realized: budget.realized,
            });
        }
        out
    }

    // ── issuance and movements ─────────────────────────────────────────────

    /// Issue earmarked funds to an agency (treasury only).
    ///
    /// # Errors
    /// * `Unauthorized` – caller is not treasury
    /// * `InvalidArgument` – non-positive amount or year out of range
    /// * `NotAgency` – recipient does not hold the agency role
    /// * `UnknownEntity` / `EntityInactive` – area never added, or removed
    /// * `OverBudget` – amount exceeds `remaining(year, area)`
    pub fn mint_to_agency(
        env: Env,
        caller: Address,
        agency: Address,
        area: Symbol,
        year: u32,
        amount: i128,
    ) -> Result<(), LedgerError> {
        require_role(&env, &caller, Role::Treasury)?;
        check_amount(amount)?;
        check_year(year)?;
        if !storage::has_role(&env, Role::Agency, &agency) {
            return Err(LedgerError::NotAgency);
        }
        require_active_area(&env, &area)?;

        let mut budget = storage::get_budget(&env, year, &area);
        let remaining = budget.remaining();
        if amount > remaining {
            log!(&env, "mint over budget", year, area, amount, remaining);
            return Err(LedgerError::OverBudget);
        }
        budget.minted += amount;
        storage::set_budget(&env, year, &area, &budget);
        storage::credit(&env, &agency, &area, year, amount)?;

        publish_minted(
            &env,
            MintEvent {
                agency,
                area,
                year,
                amount,
                minted: budget.minted,
            },
        );
        Ok(())
    }

    /// Move earmarked funds between two agencies under the same tag.
    ///
    /// # Errors
    /// * `NotAgency` – caller or `to` lacks the agency role
    /// * `InvalidArgument` – non-positive amount or year out of range
    /// * `InsufficientBalance` – caller holds less than `amount` for the tag
    pub fn transfer_agency_to_agency(
        env: Env,
        caller: Address,
        to: Address,
        area: Symbol,
        year: u32,
        amount: i128,
    ) -> Result<(), LedgerError> {
        require_agency(&env, &caller)?;
        if !storage::has_role(&env, Role::Agency, &to) {
            return Err(LedgerError::NotAgency);
        }
        check_amount(amount)?;
        check_year(year)?;
        check_area(&env, &area)?;

        storage::debit(&env, &caller, &area, year, amount)?;
        storage::credit(&env, &to, &area, year, amount)?;

        publish_transferred(
            &env,
            TransferEvent {
                from: caller,
                to,
                area,
                year,
                amount,
            },
        );
        Ok(())
    }

    /// Pay a company from the caller's earmarked balance.
    ///
    /// The company is credited the earmarked amount (kept for audit) and is
    /// minted `amount * token_scale` settlement tokens.
    ///
    /// # Errors (in check order)
    /// * `NotAgency` – caller lacks the agency role
    /// * `InvalidArgument` – non-positive amount or year out of range
    /// * `NotCompany` / `CompanyInactive` – company unknown or deactivated
    /// * `AreaNotAllowedForCompany` – company not enabled for `area`
    /// * `InsufficientBalance` – caller holds less than `amount` for the tag
    /// * `Overflow` – token amount does not fit in `i128`
    pub fn pay_company(
        env: Env,
        caller: Address,
        company: Address,
        area: Symbol,
        year: u32,
        amount: i128,
    ) -> Result<(), LedgerError> {
        require_agency(&env, &caller)?;
        check_amount(amount)?;
        check_year(year)?;
        check_area(&env, &area)?;

        let record = storage::get_company(&env, &company).ok_or(LedgerError::NotCompany)?;
        if !record.active {
            return Err(LedgerError::CompanyInactive);
        }
        if !storage::is_company_area_allowed(&env, &company, &area) {
            return Err(LedgerError::AreaNotAllowedForCompany);
        }

        if storage::balance(&env, &caller, &area, year) < amount {
            return Err(LedgerError::InsufficientBalance);
        }
        let config = storage::get_config(&env)?;
        let token_amount = amount
            .checked_mul(config.token_scale)
            .ok_or(LedgerError::Overflow)?;
        let received = storage::received(&env, &company, &area, year)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let mut budget = storage::get_budget(&env, year, &area);
        budget.realized = budget
            .realized
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        storage::debit(&env, &caller, &area, year, amount)?;
        storage::credit(&env, &company, &area, year, amount)?;
        storage::set_received(&env, &company, &area, year, received);
        storage::set_budget(&env, year, &area, &budget);

        token::StellarAssetClient::new(&env, &config.token).mint(&company, &token_amount);
        log!(&env, "settlement token minted", company, token_amount);

        publish_paid(
            &env,
            PaymentEvent {
                agency: caller,
                company,
                area,
                year,
                amount,
                token_amount,
            },
        );
        Ok(())
    }

    /// Record that a real-world transfer for a prior payment was reconciled
    /// (liquidator only).
    ///
    /// Attestation only: neither the earmarked balance nor the settlement
    /// token is burned. The cumulative settled amount for (company, area,
    /// year) may not exceed the cumulative amount paid to the company under
    /// that tag, whatever the company did with the balance since.
    ///
    /// # Errors
    /// * `Unauthorized` – caller is not a liquidator
    /// * `InvalidArgument` – non-positive amount or year out of range
    /// * `NotCompany` – company never registered
    /// * `InsufficientBalance` – settlement exceeds what the company was paid
    pub fn settle(
        env: Env,
        caller: Address,
        company: Address,
        area: Symbol,
        year: u32,
        amount: i128,
        offchain_ref: BytesN<32>,
    ) -> Result<(), LedgerError> {
        require_role(&env, &caller, Role::Liquidator)?;
        check_amount(amount)?;
        check_year(year)?;
        check_area(&env, &area)?;
        if storage::get_company(&env, &company).is_none() {
            return Err(LedgerError::NotCompany);
        }

        let settled = storage::settled(&env, &company, &area, year)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        if settled > storage::received(&env, &company, &area, year) {
            return Err(LedgerError::InsufficientBalance);
        }
        storage::set_settled(&env, &company, &area, year, settled);

        publish_settled(
            &env,
            SettlementEvent {
                company,
                area,
                year,
                amount,
                offchain_ref,
            },
        );
        Ok(())
    }

    // ── balance views ──────────────────────────────────────────────────────

    pub fn balance_of(env: Env, holder: Address, area: Symbol, year: u32) -> i128 {
        storage::balance(&env, &holder, &area, year)
    }

    /// Holder's balance for `area` summed over every budget year.
    ///
    /// # Errors
    /// * `Overflow` – the sum across years does not fit in `i128`
    pub fn balance_of_area(env: Env, holder: Address, area: Symbol) -> Result<i128, LedgerError> {
        storage::budget_years(&env)
            .iter()
            .try_fold(0i128, |total, year| {
                total
                    .checked_add(storage::balance(&env, &holder, &area, year))
                    .ok_or(LedgerError::Overflow)
            })
    }

    /// Sum of all holders' balances for (area, year).
    pub fn total_supply(env: Env, area: Symbol, year: u32) -> Result<i128, LedgerError> {
        supply_of(&env, &area, year)
    }

    /// Supply of `area` summed over every budget year.
    ///
    /// # Errors
    /// * `Overflow` – the sum across years does not fit in `i128`
    pub fn total_supply_area(env: Env, area: Symbol) -> Result<i128, LedgerError> {
        storage::budget_years(&env)
            .iter()
            .try_fold(0i128, |total, year| {
                total
                    .checked_add(supply_of(&env, &area, year)?)
                    .ok_or(LedgerError::Overflow)
            })
    }

    /// Cumulative amount paid to `company` for (area, year).
    pub fn received_of(env: Env, company: Address, area: Symbol, year: u32) -> i128 {
        storage::received(&env, &company, &area, year)
    }

    pub fn settled_of(env: Env, company: Address, area: Symbol, year: u32) -> i128 {
        storage::settled(&env, &company, &area, year)
    }

    /// Settlement token balance of `company`.
    pub fn settlement_balance(env: Env, company: Address) -> Result<i128, LedgerError> {
        let config = storage::get_config(&env)?;
        Ok(token::Client::new(&env, &config.token).balance(&company))
    }
}
