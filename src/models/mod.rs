//! Care-scheduling domain models.
//!
//! Provides the data types shared by the dominance analysis and the conflict
//! core extraction. Every collection type serializes to the persisted JSON
//! shape of its instance file.
//!
//! # Entity Map
//!
//! | Type | File | Shape |
//! |------|------|-------|
//! | `OperatorCalendar` | `operators.json` | Day → CareUnit → Operator → `{start, duration}` |
//! | `Services` | `services.json` | Service → `{careUnit, duration, cost}` |
//! | `Packets` | `packets.json` | Packet → list of Service |
//! | `Priorities` | `priorities.json` | Patient → weight |
//! | `Requests` | `requests.json` | Day → Patient → `{packets}` |
//! | `Results` | `results.json` | Day → `DailyResult` |
//! | `SubsumptionRelation` | `subsumptions.json` | CareUnit → MoreDay → LessDays |
//! | `ConflictCores` | `cores.json` | `core<NN>` → `ConflictCore` |

mod conflict;
mod interval;
mod operator;
mod packet;
mod request;
mod subsumption;

pub use conflict::{ConflictCore, ConflictCores, Multipacket};
pub use interval::{any_overlap, contains, overlaps, total_duration, LabeledWindow, Window};
pub use operator::{CareUnitOperators, DayOperators, OperatorCalendar};
pub use packet::{Packets, Service, Services};
pub use request::{
    DailyResult, DayRequests, PatientRequest, Priorities, Requests, Results, ScheduledService,
    UnusedOperator,
};
pub use subsumption::{CareUnitSubsumptions, SubsumptionRelation};

/// Day identifier (`"0"`, `"1"`, ...). Ordered lexicographically.
pub type DayId = String;
/// Care unit identifier.
pub type CareUnitId = String;
/// Operator identifier, unique within a (day, care unit) pair.
pub type OperatorId = String;
/// Service identifier.
pub type ServiceId = String;
/// Packet identifier.
pub type PacketId = String;
/// Patient identifier.
pub type PatientId = String;
