//! Multipacket signatures.
//!
//! The obligations of a core are grouped per patient and each group is
//! exploded into its service set. The sorted services joined by `_` name the
//! multipacket, so structurally identical demand collapses into one entry
//! whatever patient holds it and whatever packets it came from.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Multipacket, Packets, ServiceId};

/// Joins sorted service ids into a multipacket signature.
pub fn signature<S: AsRef<str>>(sorted_services: &[S]) -> String {
    sorted_services
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join("_")
}

/// Groups `(patient, packet)` obligations by patient and counts identical
/// service sets.
///
/// Input order does not affect the result.
pub fn multipackets<'a>(
    obligations: impl IntoIterator<Item = (&'a str, &'a str)>,
    packets: &Packets,
) -> BTreeMap<String, Multipacket> {
    let mut by_patient: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (patient, packet) in obligations {
        let services = packets.services(packet).unwrap_or_default();
        by_patient
            .entry(patient)
            .or_default()
            .extend(services.iter().map(String::as_str));
    }

    let mut out: BTreeMap<String, Multipacket> = BTreeMap::new();
    for services in by_patient.into_values() {
        let services: Vec<ServiceId> = services.into_iter().map(str::to_owned).collect();
        out.entry(signature(&services))
            .and_modify(|m| m.times += 1)
            .or_insert(Multipacket { times: 1, services });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packets() -> Packets {
        Packets::new()
            .with_packet("pkt00", ["srv02", "srv01"])
            .with_packet("pkt01", ["srv02"])
            .with_packet("pkt02", ["srv01"])
            .with_packet("pkt03", ["srv01", "srv02"])
    }

    #[test]
    fn test_signature_join() {
        assert_eq!(signature(&["srv01", "srv02"]), "srv01_srv02");
        assert_eq!(signature::<&str>(&[]), "");
    }

    #[test]
    fn test_patient_groups_union_services() {
        let mp = multipackets([("pat00", "pkt01"), ("pat00", "pkt02")], &packets());
        assert_eq!(mp.len(), 1);
        assert_eq!(mp["srv01_srv02"].times, 1);
        assert_eq!(mp["srv01_srv02"].services, vec!["srv01", "srv02"]);
    }

    #[test]
    fn test_identical_sets_merge_across_patients() {
        // Same exploded set from different packet groupings.
        let mp = multipackets(
            [
                ("pat00", "pkt00"),
                ("pat01", "pkt01"),
                ("pat01", "pkt02"),
                ("pat02", "pkt03"),
                ("pat03", "pkt02"),
            ],
            &packets(),
        );
        assert_eq!(mp.len(), 2);
        assert_eq!(mp["srv01_srv02"].times, 3);
        assert_eq!(mp["srv01"].times, 1);
    }

    #[test]
    fn test_order_independent() {
        let forward = multipackets([("pat00", "pkt01"), ("pat01", "pkt02"), ("pat00", "pkt02")], &packets());
        let backward = multipackets([("pat00", "pkt02"), ("pat01", "pkt02"), ("pat00", "pkt01")], &packets());
        assert_eq!(forward, backward);
    }
}
