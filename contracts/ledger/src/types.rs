//! Core data types for the earmark ledger contract.

use soroban_sdk::{contracterror, contracttype, Address, BytesN, String, Symbol, Vec};

/// Budget years are 16-bit; larger values are rejected.
pub const MAX_BUDGET_YEAR: u32 = u16::MAX as u32;

/// Settlement token units minted per earmarked unit (18 decimals).
pub const DEFAULT_TOKEN_SCALE: i128 = 1_000_000_000_000_000_000;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Legislator = 0,
    Treasury = 1,
    Agency = 2,
    Liquidator = 3,
}

#[contracterror]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum LedgerError {
    Unauthorized = 1,
    AlreadyInitialized = 2,
    NotInitialized = 3,
    UnknownEntity = 4,
    EntityInactive = 5,
    NotAgency = 6,
    NotCompany = 7,
    CompanyInactive = 8,
    AreaNotAllowedForCompany = 9,
    OverBudget = 10,
    InsufficientBalance = 11,
    InvalidArgument = 12,
    Overflow = 13,
}

/// Storage keys. Instance storage holds only `Owner` and `Config`; every
/// registry index and record lives in persistent storage.
///
/// Indices are paged: a count key plus one `*At(slot)` entry per item, in
/// first-registration order. Entries are never removed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Owner,
    Config,
    AreaCount,
    AreaAt(u32),
    AgencyCount,
    AgencyAt(u32),
    /// Set once an address enters the agency index.
    AgencyListed(Address),
    CompanyCount,
    CompanyAt(u32),
    /// Years that ever received a budget, ascending.
    BudgetYears,
    Role(Role, Address),
    AreaActive(Symbol),
    AgencyName(Address),
    Company(Address),
    CompanyArea(Address, Symbol),
    Budget(u32, Symbol),
    Balance(Address, Symbol, u32),
    /// Holders that were ever credited for (area, year).
    HolderCount(Symbol, u32),
    HolderAt(Symbol, u32, u32),
    Received(Address, Symbol, u32),
    Settled(Address, Symbol, u32),
}

/// Settlement token wiring, fixed at `init`.
///
/// * `token` – Stellar Asset Contract administered by this contract.
/// * `token_scale` – token units minted per earmarked unit paid to a company.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerConfig {
    pub token: Address,
    pub token_scale: i128,
}

/// Stored company registration.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompanyRecord {
    /// National registry number (CNPJ), 14 bytes.
    pub registry_id: BytesN<14>,
    pub name: String,
    pub active: bool,
}

/// Company registration joined with its allowed areas.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompanyInfo {
    pub address: Address,
    pub registry_id: BytesN<14>,
    pub name: String,
    pub active: bool,
    pub areas: Vec<Symbol>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AgencyInfo {
    pub address: Address,
    pub name: String,
}

/// Appropriation for one (year, area).
///
/// `minted` is issuance to agencies; `realized` is what agencies have paid
/// out to companies. Neither is ever reduced.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BudgetData {
    pub cap: i128,
    pub minted: i128,
    pub realized: i128,
}

impl BudgetData {
    /// Mintable headroom. Zero when the cap was lowered below `minted`.
    pub fn remaining(&self) -> i128 {
        if self.cap > self.minted {
            self.cap - self.minted
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cap == 0 && self.minted == 0
    }
}

/// One row of the per-year budget report.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BudgetRow {
    pub area: Symbol,
    pub cap: i128,
    pub minted: i128,
    pub realized: i128,
}
