//! Daily requests and subproblem results.
//!
//! Requests say which packets each patient asks for on a day. Results carry
//! the per-day subproblem outcome, most importantly the packets that could
//! not be completed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{CareUnitId, DayId, OperatorId, PacketId, PatientId, ServiceId};

/// Packets requested by one patient on one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRequest {
    /// Requested packets.
    pub packets: Vec<PacketId>,
}

/// Requests of one day: Patient → request.
pub type DayRequests = BTreeMap<PatientId, PatientRequest>;

/// `requests.json`: Day → Patient → `{packets}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Requests(BTreeMap<DayId, DayRequests>);

impl Requests {
    /// Creates an empty request table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a patient's packet requests for a day.
    pub fn with_request<P: Into<PacketId>>(
        mut self,
        day: impl Into<DayId>,
        patient: impl Into<PatientId>,
        packets: impl IntoIterator<Item = P>,
    ) -> Self {
        self.0
            .entry(day.into())
            .or_default()
            .entry(patient.into())
            .or_default()
            .packets
            .extend(packets.into_iter().map(Into::into));
        self
    }

    /// Requests of one day.
    pub fn day(&self, day: &str) -> Option<&DayRequests> {
        self.0.get(day)
    }

    /// Iterates `(day, requests)` pairs in day order.
    pub fn iter(&self) -> impl Iterator<Item = (&DayId, &DayRequests)> {
        self.0.iter()
    }

    /// Whether `patient` requested `packet` on `day`.
    pub fn is_requested(&self, day: &str, patient: &str, packet: &str) -> bool {
        self.0
            .get(day)
            .and_then(|d| d.get(patient))
            .is_some_and(|r| r.packets.iter().any(|p| p == packet))
    }
}

/// One service placed by the daily subproblem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledService {
    pub patient: PatientId,
    pub service: ServiceId,
    pub operator: OperatorId,
    pub care_unit: CareUnitId,
    pub start: i64,
}

/// An operator left idle by the daily subproblem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusedOperator {
    pub care_unit: CareUnitId,
    pub operator: OperatorId,
}

/// Outcome of one day's subproblem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyResult {
    /// Services that were placed.
    #[serde(default)]
    pub scheduled_services: Vec<ScheduledService>,
    /// Patient → packets not completed that day.
    #[serde(default)]
    pub not_scheduled_packets: BTreeMap<PatientId, Vec<PacketId>>,
    /// Operators with no service.
    #[serde(default)]
    pub unused_operators: Vec<UnusedOperator>,
}

impl DailyResult {
    /// Creates an empty result (everything scheduled).
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks packets of a patient as not completed.
    pub fn with_not_scheduled<P: Into<PacketId>>(
        mut self,
        patient: impl Into<PatientId>,
        packets: impl IntoIterator<Item = P>,
    ) -> Self {
        self.not_scheduled_packets
            .entry(patient.into())
            .or_default()
            .extend(packets.into_iter().map(Into::into));
        self
    }

    /// Whether `packet` of `patient` is an undone obligation.
    pub fn is_not_scheduled(&self, patient: &str, packet: &str) -> bool {
        self.not_scheduled_packets
            .get(patient)
            .is_some_and(|ps| ps.iter().any(|p| p == packet))
    }

    /// Iterates undone `(patient, packet)` pairs in patient order, then
    /// persisted packet order.
    pub fn undone(&self) -> impl Iterator<Item = (&PatientId, &PacketId)> {
        self.not_scheduled_packets
            .iter()
            .flat_map(|(patient, packets)| packets.iter().map(move |p| (patient, p)))
    }
}

/// `results.json`: Day → outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Results(BTreeMap<DayId, DailyResult>);

impl Results {
    /// Creates an empty result table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the outcome of a day.
    pub fn with_day(mut self, day: impl Into<DayId>, result: DailyResult) -> Self {
        self.0.insert(day.into(), result);
        self
    }

    /// Outcome of one day.
    pub fn day(&self, day: &str) -> Option<&DailyResult> {
        self.0.get(day)
    }

    /// Iterates `(day, outcome)` pairs in day order.
    pub fn iter(&self) -> impl Iterator<Item = (&DayId, &DailyResult)> {
        self.0.iter()
    }
}

/// `priorities.json`: Patient → priority weight.
///
/// Only the master problem reads these.
pub type Priorities = BTreeMap<PatientId, i64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_lookup() {
        let requests = Requests::new()
            .with_request("0", "pat00", ["pkt00", "pkt01"])
            .with_request("0", "pat01", ["pkt01"]);

        assert!(requests.is_requested("0", "pat00", "pkt01"));
        assert!(!requests.is_requested("0", "pat01", "pkt00"));
        assert!(!requests.is_requested("1", "pat00", "pkt00"));
        assert_eq!(requests.day("0").unwrap().len(), 2);
    }

    #[test]
    fn test_result_undone_order() {
        let result = DailyResult::new()
            .with_not_scheduled("pat01", ["pkt03"])
            .with_not_scheduled("pat00", ["pkt02", "pkt00"]);

        let undone: Vec<_> = result
            .undone()
            .map(|(pat, pkt)| (pat.as_str(), pkt.as_str()))
            .collect();
        assert_eq!(
            undone,
            vec![("pat00", "pkt02"), ("pat00", "pkt00"), ("pat01", "pkt03")]
        );
        assert!(result.is_not_scheduled("pat00", "pkt00"));
        assert!(!result.is_not_scheduled("pat01", "pkt00"));
    }

    #[test]
    fn test_result_deserialize_defaults() {
        let json = r#"{
            "0": {"notScheduledPackets": {"pat00": ["pkt00"]}},
            "1": {
                "scheduledServices": [
                    {"patient": "pat00", "service": "srv01", "operator": "op0", "careUnit": "cu00", "start": 3}
                ],
                "notScheduledPackets": {},
                "unusedOperators": [{"careUnit": "cu01", "operator": "op1"}]
            }
        }"#;
        let results: Results = serde_json::from_str(json).unwrap();
        let day0 = results.day("0").unwrap();
        assert!(day0.scheduled_services.is_empty());
        assert!(day0.is_not_scheduled("pat00", "pkt00"));

        let day1 = results.day("1").unwrap();
        assert_eq!(day1.scheduled_services[0].care_unit, "cu00");
        assert_eq!(day1.unused_operators[0].operator, "op1");
    }
}
