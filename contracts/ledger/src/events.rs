//! Event types and topic constants for the earmark ledger.
//! Every state-changing call publishes exactly one event under the `ledger`
//! topic so indexers can follow the ledger incrementally.

use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env, String, Symbol};

use crate::types::Role;

pub const LEDGER: Symbol = symbol_short!("ledger");

pub const INIT: Symbol = symbol_short!("init");
pub const OWNER: Symbol = symbol_short!("owner");
pub const ROLE: Symbol = symbol_short!("role");
pub const AGENCY_NAME: Symbol = symbol_short!("agency_nm");
pub const AREA_ADDED: Symbol = symbol_short!("area_add");
pub const AREA_REMOVED: Symbol = symbol_short!("area_rm");
pub const COMPANY: Symbol = symbol_short!("company");
pub const COMPANY_AREA: Symbol = symbol_short!("co_area");
pub const BUDGET: Symbol = symbol_short!("budget");
pub const MINT: Symbol = symbol_short!("mint");
pub const TRANSFER: Symbol = symbol_short!("transfer");
pub const PAID: Symbol = symbol_short!("paid");
pub const SETTLED: Symbol = symbol_short!("settled");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub token: Address,
    pub token_scale: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipTransferredEvent {
    pub previous_owner: Address,
    pub new_owner: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleSetEvent {
    pub role: Role,
    pub who: Address,
    pub enabled: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AgencyNameEvent {
    pub agency: Address,
    pub name: String,
}

/// Emitted for both area activation and deactivation; the topic tells which.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AreaEvent {
    pub area: Symbol,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompanyUpsertEvent {
    pub company: Address,
    pub registry_id: BytesN<14>,
    pub name: String,
    pub active: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompanyAreaEvent {
    pub company: Address,
    pub area: Symbol,
    pub allowed: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BudgetSetEvent {
    pub year: u32,
    pub area: Symbol,
    pub cap: i128,
}

/// Issuance to an agency. `minted` is the cumulative total for (year, area)
/// after this mint.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MintEvent {
    pub agency: Address,
    pub area: Symbol,
    pub year: u32,
    pub amount: i128,
    pub minted: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferEvent {
    pub from: Address,
    pub to: Address,
    pub area: Symbol,
    pub year: u32,
    pub amount: i128,
}

/// Agency payment to a company. `token_amount` is the settlement token minted
/// to the company alongside the earmarked credit.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PaymentEvent {
    pub agency: Address,
    pub company: Address,
    pub area: Symbol,
    pub year: u32,
    pub amount: i128,
    pub token_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SettlementEvent {
    pub company: Address,
    pub area: Symbol,
    pub year: u32,
    pub amount: i128,
    pub offchain_ref: BytesN<32>,
}

fn publish<T>(env: &Env, kind: Symbol, event: T)
where
    T: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.events().publish((LEDGER, kind), event);
}

pub fn publish_initialized(env: &Env, event: InitializedEvent) {
    publish(env, INIT, event);
}

pub fn publish_ownership_transferred(env: &Env, event: OwnershipTransferredEvent) {
    publish(env, OWNER, event);
}

pub fn publish_role_set(env: &Env, event: RoleSetEvent) {
    publish(env, ROLE, event);
}

pub fn publish_agency_name_set(env: &Env, event: AgencyNameEvent) {
    publish(env, AGENCY_NAME, event);
}

pub fn publish_area_added(env: &Env, area: Symbol) {
    publish(env, AREA_ADDED, AreaEvent { area });
}

pub fn publish_area_removed(env: &Env, area: Symbol) {
    publish(env, AREA_REMOVED, AreaEvent { area });
}

pub fn publish_company_upserted(env: &Env, event: CompanyUpsertEvent) {
    publish(env, COMPANY, event);
}

pub fn publish_company_area_set(env: &Env, event: CompanyAreaEvent) {
    publish(env, COMPANY_AREA, event);
}

pub fn publish_budget_set(env: &Env, event: BudgetSetEvent) {
    publish(env, BUDGET, event);
}

pub fn publish_minted(env: &Env, event: MintEvent) {
    publish(env, MINT, event);
}

pub fn publish_transferred(env: &Env, event: TransferEvent) {
    publish(env, TRANSFER, event);
}

pub fn publish_paid(env: &Env, event: PaymentEvent) {
    publish(env, PAID, event);
}

pub fn publish_settled(env: &Env, event: SettlementEvent) {
    publish(env, SETTLED, event);
}
