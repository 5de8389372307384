//! Validated state transitions and allocation recalculation for a staffing
//! cost ledger.
//!
//! The [`Store`] owns every collection. Callers submit [`Intent`]s; each one
//! is validated, committed as a new immutable [`Snapshot`] and followed by a
//! recalculation of the allocations whose inputs changed.

pub use allocations::{Allocation, Plan};
pub use coa::{Coa, CoaCategory, CoaInput, CoaSnapshot};
pub use complexity::{ComplexityEdit, ComplexityLevel, ComplexityTable};
pub use cost_centers::{CostCenter, CostCenterInput, CostCenterSnapshot};
pub use costs::{Cost, lowest_tier_for};
pub use currency::Currency;
pub use error::EngineError;
pub use holidays::{Holiday, HolidayCategory, Leave};
pub use intents::{CoaIntent, CollectionIntent, CostCenterIntent, Intent, Keyed};
pub use members::{RoleType, TeamMember};
pub use money::{Money, Priced};
pub use ops::transition;
pub use phases::{Phase, Task};
pub use settings::{CostCenterPolicy, Settings, SettingsPatch, Theme};
pub use snapshot::{CollectionKey, LoadedState, Snapshot};
pub use store::{Clock, FetchTicket, FixedClock, Store, StoreBuilder, SystemClock, Transition};

mod allocations;
pub mod budget;
pub mod change;
mod coa;
pub mod complexity;
mod cost_centers;
mod costs;
mod currency;
pub mod defaults;
mod error;
pub mod hierarchy;
mod holidays;
mod intents;
mod members;
mod money;
mod ops;
mod phases;
pub mod recalc;
mod settings;
mod snapshot;
mod store;
mod util;
pub mod validation;

pub type ResultEngine<T> = Result<T, EngineError>;
