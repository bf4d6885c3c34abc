//! Obligation / care-unit closure over one day.
//!
//! Obligations ((patient, packet) pairs) and care units form a bipartite
//! graph: an obligation touches every care unit one of its packet's services
//! runs in. Starting from an undone obligation, the closure alternates
//! between the two node kinds and collects every *scheduled* obligation that
//! competes for the same care-unit capacity, directly or transitively.
//!
//! All entities are interned into per-day arenas, so membership tests are
//! index lookups.

use std::collections::HashMap;

use crate::models::{DailyResult, DayRequests, Packets, Services};

/// A (patient, packet) pair requested on the indexed day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Obligation<'a> {
    pub patient: &'a str,
    pub packet: &'a str,
}

/// Arena of one day's obligations and care units with adjacency both ways.
#[derive(Debug)]
pub(crate) struct DayIndex<'a> {
    obligations: Vec<Obligation<'a>>,
    care_units: Vec<&'a str>,
    /// Obligation → care units its packet touches.
    touches: Vec<Vec<usize>>,
    /// Care unit → obligations touching it, in request order.
    touched_by: Vec<Vec<usize>>,
    undone: Vec<bool>,
    /// Undone obligations in result order, one entry per persisted occurrence.
    seeds: Vec<usize>,
}

impl<'a> DayIndex<'a> {
    /// Interns the day's requests, then any undone pair the requests lack.
    ///
    /// Packets and services must resolve in the catalogs. Debug builds
    /// assert it; release builds skip the unknown entries.
    pub fn build(
        requests: Option<&'a DayRequests>,
        result: &'a DailyResult,
        packets: &'a Packets,
        services: &'a Services,
    ) -> Self {
        let mut index = Self {
            obligations: Vec::new(),
            care_units: Vec::new(),
            touches: Vec::new(),
            touched_by: Vec::new(),
            undone: Vec::new(),
            seeds: Vec::new(),
        };
        let mut obligation_ids: HashMap<Obligation<'a>, usize> = HashMap::new();
        let mut unit_ids: HashMap<&'a str, usize> = HashMap::new();

        let requested = requests.into_iter().flat_map(|day| {
            day.iter().flat_map(|(patient, request)| {
                request.packets.iter().map(move |packet| (patient, packet))
            })
        });
        for (patient, packet) in requested.chain(result.undone()) {
            let obligation = Obligation {
                patient: patient.as_str(),
                packet: packet.as_str(),
            };
            if obligation_ids.contains_key(&obligation) {
                continue;
            }
            let id = index.obligations.len();
            obligation_ids.insert(obligation, id);
            index.obligations.push(obligation);
            index.undone.push(result.is_not_scheduled(patient, packet));

            let mut touched = Vec::new();
            let packet_services = packets.services(packet);
            debug_assert!(packet_services.is_some(), "unknown packet '{packet}'");
            for service_id in packet_services.unwrap_or_default() {
                let service = services.get(service_id);
                debug_assert!(service.is_some(), "unknown service '{service_id}'");
                let Some(service) = service else {
                    continue;
                };
                let unit = *unit_ids.entry(service.care_unit.as_str()).or_insert_with(|| {
                    index.care_units.push(service.care_unit.as_str());
                    index.touched_by.push(Vec::new());
                    index.care_units.len() - 1
                });
                if !touched.contains(&unit) {
                    touched.push(unit);
                    index.touched_by[unit].push(id);
                }
            }
            index.touches.push(touched);
        }

        index.seeds = result
            .undone()
            .filter_map(|(patient, packet)| {
                obligation_ids
                    .get(&Obligation {
                        patient: patient.as_str(),
                        packet: packet.as_str(),
                    })
                    .copied()
            })
            .collect();
        index
    }

    pub fn seeds(&self) -> &[usize] {
        &self.seeds
    }

    pub fn obligation(&self, id: usize) -> Obligation<'a> {
        self.obligations[id]
    }

    pub fn care_unit(&self, id: usize) -> &'a str {
        self.care_units[id]
    }

    /// Runs the closure from `seed`.
    pub fn close(&self, seed: usize) -> Closure {
        let mut frontier = Frontier::new(self.obligations.len(), self.care_units.len());
        let mut closure = Closure::default();
        frontier.push(Node::Obligation(seed));

        while let Some(node) = frontier.pop() {
            match node {
                Node::Obligation(id) => {
                    closure.obligations.push(id);
                    for &unit in &self.touches[id] {
                        frontier.push(Node::CareUnit(unit));
                    }
                }
                Node::CareUnit(unit) => {
                    closure.care_units.push(unit);
                    for &id in &self.touched_by[unit] {
                        // Undone obligations seed their own cores.
                        if !self.undone[id] {
                            frontier.push(Node::Obligation(id));
                        }
                    }
                }
            }
        }
        closure
    }
}

/// Visited node ids of one closure, in discovery order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Closure {
    pub obligations: Vec<usize>,
    pub care_units: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    Obligation(usize),
    CareUnit(usize),
}

/// Two cooperating worklists. Care units drain before the next obligation.
struct Frontier {
    obligations: Vec<usize>,
    care_units: Vec<usize>,
    /// Visited or queued.
    seen_obligation: Vec<bool>,
    seen_care_unit: Vec<bool>,
}

impl Frontier {
    fn new(obligations: usize, care_units: usize) -> Self {
        Self {
            obligations: Vec::new(),
            care_units: Vec::new(),
            seen_obligation: vec![false; obligations],
            seen_care_unit: vec![false; care_units],
        }
    }

    fn push(&mut self, node: Node) {
        let (seen, queue, id) = match node {
            Node::Obligation(id) => (&mut self.seen_obligation, &mut self.obligations, id),
            Node::CareUnit(id) => (&mut self.seen_care_unit, &mut self.care_units, id),
        };
        if !seen[id] {
            seen[id] = true;
            queue.push(id);
        }
    }

    fn pop(&mut self) -> Option<Node> {
        self.care_units
            .pop()
            .map(Node::CareUnit)
            .or_else(|| self.obligations.pop().map(Node::Obligation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Requests, Service};

    fn catalog() -> (Services, Packets) {
        let services = Services::new()
            .with_service("srv00", Service::new("cu00", 1))
            .with_service("srv01", Service::new("cu01", 1))
            .with_service("srv02", Service::new("cu02", 1))
            .with_service("srv03", Service::new("cu03", 1));
        let packets = Packets::new()
            .with_packet("pkt00", ["srv00", "srv01"])
            .with_packet("pkt01", ["srv01"])
            .with_packet("pkt02", ["srv01", "srv02"])
            .with_packet("pkt03", ["srv03"]);
        (services, packets)
    }

    fn names<'a>(index: &DayIndex<'a>, closure: &Closure) -> Vec<(&'a str, &'a str)> {
        let mut out: Vec<_> = closure
            .obligations
            .iter()
            .map(|&id| {
                let o = index.obligation(id);
                (o.patient, o.packet)
            })
            .collect();
        out.sort();
        out
    }

    fn units<'a>(index: &DayIndex<'a>, closure: &Closure) -> Vec<&'a str> {
        let mut out: Vec<_> = closure.care_units.iter().map(|&u| index.care_unit(u)).collect();
        out.sort();
        out
    }

    #[test]
    fn test_transitive_pull_through_shared_units() {
        let (services, packets) = catalog();
        let requests = Requests::new()
            .with_request("0", "pat00", ["pkt00"])
            .with_request("0", "pat01", ["pkt02"]) // cu01 + cu02
            .with_request("0", "pat02", ["pkt03"]); // unrelated
        let result = DailyResult::new().with_not_scheduled("pat00", ["pkt00"]);

        let index = DayIndex::build(requests.day("0"), &result, &packets, &services);
        assert_eq!(index.seeds().len(), 1);
        let closure = index.close(index.seeds()[0]);

        assert_eq!(
            names(&index, &closure),
            vec![("pat00", "pkt00"), ("pat01", "pkt02")]
        );
        assert_eq!(units(&index, &closure), vec!["cu00", "cu01", "cu02"]);
    }

    #[test]
    fn test_other_undone_obligations_not_pulled() {
        let (services, packets) = catalog();
        let requests = Requests::new()
            .with_request("0", "pat00", ["pkt00"])
            .with_request("0", "pat01", ["pkt01"]);
        let result = DailyResult::new()
            .with_not_scheduled("pat00", ["pkt00"])
            .with_not_scheduled("pat01", ["pkt01"]);

        let index = DayIndex::build(requests.day("0"), &result, &packets, &services);
        assert_eq!(index.seeds().len(), 2);

        let first = index.close(index.seeds()[0]);
        assert_eq!(names(&index, &first), vec![("pat00", "pkt00")]);
        assert_eq!(units(&index, &first), vec!["cu00", "cu01"]);

        let second = index.close(index.seeds()[1]);
        assert_eq!(names(&index, &second), vec![("pat01", "pkt01")]);
        assert_eq!(units(&index, &second), vec!["cu01"]);
    }

    #[test]
    fn test_unrequested_undone_pair_still_seeds() {
        let (services, packets) = catalog();
        let result = DailyResult::new().with_not_scheduled("pat09", ["pkt03"]);

        let index = DayIndex::build(None, &result, &packets, &services);
        let closure = index.close(index.seeds()[0]);
        assert_eq!(names(&index, &closure), vec![("pat09", "pkt03")]);
        assert_eq!(units(&index, &closure), vec!["cu03"]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "unknown service 'srv99'")]
    fn test_unknown_service_rejected_in_debug() {
        let (services, _) = catalog();
        let packets = Packets::new().with_packet("pkt00", ["srv00", "srv99"]);
        let result = DailyResult::new().with_not_scheduled("pat00", ["pkt00"]);
        DayIndex::build(None, &result, &packets, &services);
    }

    #[test]
    fn test_frontier_drains_care_units_first() {
        let mut frontier = Frontier::new(2, 2);
        frontier.push(Node::Obligation(0));
        frontier.push(Node::CareUnit(1));
        frontier.push(Node::CareUnit(1));
        assert_eq!(frontier.pop(), Some(Node::CareUnit(1)));
        assert_eq!(frontier.pop(), Some(Node::Obligation(0)));
        assert_eq!(frontier.pop(), None);
        frontier.push(Node::Obligation(0));
        assert_eq!(frontier.pop(), None);
    }
}
