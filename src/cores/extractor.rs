//! Conflict core extraction.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use super::closure::DayIndex;
use super::signature::multipackets;
use crate::config::AnalysisConfig;
use crate::exec::map_units;
use crate::models::{
    CareUnitId, ConflictCore, ConflictCores, DayId, OperatorCalendar, Packets, Requests, Results,
    Services, SubsumptionRelation,
};

/// Everything the extraction reads. All references, no ownership.
#[derive(Debug, Clone, Copy)]
pub struct CoreInputs<'a> {
    /// Source of the instance's day list.
    pub calendar: &'a OperatorCalendar,
    pub services: &'a Services,
    pub packets: &'a Packets,
    pub requests: &'a Requests,
    pub results: &'a Results,
    pub subsumptions: &'a SubsumptionRelation,
}

/// Builds one conflict core per undone (day, patient, packet) triple.
///
/// # Algorithm
///
/// For each undone obligation:
/// 1. Close over obligations and care units of the same day, pulling in every
///    scheduled obligation that shares capacity with the seed.
/// 2. Group the visited obligations per patient into multipacket signatures.
/// 3. Extend the trigger day with every day it dominates on *all* affected
///    care units: what failed on the trigger day cannot succeed there.
///
/// Cores are emitted in results order (day, then patient, then persisted
/// packet order). Seeds are independent and may run in parallel.
#[derive(Debug, Clone, Default)]
pub struct CoreExtractor {
    config: AnalysisConfig,
}

impl CoreExtractor {
    /// Creates an extractor.
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Extracts every core of the instance.
    ///
    /// Inputs must pass [`validate_core_inputs`](crate::validation::validate_core_inputs)
    /// first. Packets and services that don't resolve trip a debug assertion;
    /// in release builds they contribute no care units.
    pub fn extract(&self, inputs: CoreInputs<'_>) -> ConflictCores {
        let indexes: HashMap<&str, DayIndex<'_>> = inputs
            .results
            .iter()
            .map(|(day, result)| {
                let index = DayIndex::build(
                    inputs.requests.day(day),
                    result,
                    inputs.packets,
                    inputs.services,
                );
                (day.as_str(), index)
            })
            .collect();

        let seeds: Vec<(&DayId, &DayIndex<'_>, usize)> = inputs
            .results
            .iter()
            .filter_map(|(day, _)| indexes.get(day.as_str()).map(|index| (day, index)))
            .flat_map(|(day, index)| index.seeds().iter().map(move |&seed| (day, index, seed)))
            .collect();

        let cores = map_units(self.config.run_parallel(), &seeds, |&(day, index, seed)| {
            build_core(day, index, seed, &inputs)
        });

        info!(
            days = inputs.results.iter().count(),
            cores = cores.len(),
            "Extracted conflict cores"
        );
        ConflictCores::new(cores)
    }
}

fn build_core(
    day: &DayId,
    index: &DayIndex<'_>,
    seed: usize,
    inputs: &CoreInputs<'_>,
) -> ConflictCore {
    let closure = index.close(seed);

    let obligations = closure.obligations.iter().map(|&id| {
        let o = index.obligation(id);
        (o.patient, o.packet)
    });
    let multipackets = multipackets(obligations, inputs.packets);

    let affected_care_units: Vec<CareUnitId> = closure
        .care_units
        .iter()
        .map(|&unit| index.care_unit(unit).to_owned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let days = propagate_days(
        day,
        inputs.calendar.days(),
        &affected_care_units,
        inputs.subsumptions,
    );

    let seed = index.obligation(seed);
    debug!(
        day = %day,
        patient = seed.patient,
        packet = seed.packet,
        obligations = closure.obligations.len(),
        care_units = affected_care_units.len(),
        days = days.len(),
        "Built conflict core"
    );

    ConflictCore {
        days,
        multipackets,
        affected_care_units,
    }
}

/// The trigger day plus every other day it dominates on every affected unit.
///
/// Result is sorted and deduplicated.
pub fn propagate_days<'a>(
    trigger: &DayId,
    days: impl IntoIterator<Item = &'a DayId>,
    affected_care_units: &[CareUnitId],
    subsumptions: &SubsumptionRelation,
) -> Vec<DayId> {
    let mut out: BTreeSet<DayId> = BTreeSet::new();
    out.insert(trigger.clone());
    for day in days {
        if day == trigger {
            continue;
        }
        let dominated_everywhere = affected_care_units
            .iter()
            .all(|cu| subsumptions.dominates(cu, trigger, day));
        if dominated_everywhere {
            out.insert(day.clone());
        }
    }
    out.into_iter().collect()
}

/// Extracts cores with the default extractor. Same preconditions as
/// [`CoreExtractor::extract`].
pub fn extract_cores(inputs: CoreInputs<'_>) -> ConflictCores {
    CoreExtractor::default().extract(inputs)
}
