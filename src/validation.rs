//! Input validation for care-scheduling instances.
//!
//! Both analyses assume well-formed inputs: a dangling reference would make
//! the closure silently skip demand and the resulting cut unsound. These
//! checks run before analysis and report every problem found, not just the
//! first. Detects:
//! - Operators with a negative start, non-positive duration, or an end past `i64::MAX`
//! - Empty packets and packets listing a service twice
//! - References to unknown services, packets, care units, or days
//! - Undone packets that were never requested

use std::collections::BTreeSet;

use crate::cores::CoreInputs;
use crate::models::OperatorCalendar;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// An operator starts before slot 0.
    NegativeStart,
    /// An operator window has zero or negative length.
    NonPositiveDuration,
    /// An operator window ends past the representable time range.
    WindowOverflow,
    /// A packet has no services.
    EmptyPacket,
    /// A packet lists the same service more than once.
    DuplicateService,
    /// A packet references a service that doesn't exist.
    UnknownService,
    /// A service or subsumption references a care unit without operators.
    UnknownCareUnit,
    /// A request or result references a packet that doesn't exist.
    UnknownPacket,
    /// A request, result, or subsumption references a day without a calendar.
    UnknownDay,
    /// A packet is reported undone but was not requested that day.
    UnrequestedPacket,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates operator windows.
pub fn validate_calendar(calendar: &OperatorCalendar) -> ValidationResult {
    let mut errors = Vec::new();
    check_calendar(calendar, &mut errors);
    finish(errors)
}

fn check_calendar(calendar: &OperatorCalendar, errors: &mut Vec<ValidationError>) {
    for (day, units) in calendar.iter() {
        for (cu, operators) in units {
            for (op, window) in operators {
                if window.start < 0 {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::NegativeStart,
                        format!("Operator '{op}' of '{cu}' on day '{day}' starts at {}", window.start),
                    ));
                }
                if window.duration <= 0 {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::NonPositiveDuration,
                        format!(
                            "Operator '{op}' of '{cu}' on day '{day}' has duration {}",
                            window.duration
                        ),
                    ));
                }
                if window.start.checked_add(window.duration).is_none() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::WindowOverflow,
                        format!(
                            "Operator '{op}' of '{cu}' on day '{day}' ends past the time range ({} + {})",
                            window.start, window.duration
                        ),
                    ));
                }
            }
        }
    }
}

/// Validates everything core extraction reads.
///
/// Checks:
/// 1. Operator windows (see [`validate_calendar`])
/// 2. Packets are non-empty, duplicate-free, and reference known services
/// 3. Services run in care units that have operators on some day
/// 4. Requests and results reference known days and packets
/// 5. Every undone packet was requested by that patient on that day
/// 6. Subsumptions reference known care units and days
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_core_inputs(inputs: &CoreInputs<'_>) -> ValidationResult {
    let mut errors = Vec::new();
    check_calendar(inputs.calendar, &mut errors);
    let care_units = inputs.calendar.care_units();

    for (service_id, service) in inputs.services.iter() {
        if !care_units.contains(&service.care_unit) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownCareUnit,
                format!(
                    "Service '{service_id}' references unknown care unit '{}'",
                    service.care_unit
                ),
            ));
        }
    }

    for (packet_id, services) in inputs.packets.iter() {
        if services.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyPacket,
                format!("Packet '{packet_id}' has no services"),
            ));
        }
        let mut seen = BTreeSet::new();
        for service in services {
            if !seen.insert(service.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateService,
                    format!("Packet '{packet_id}' lists service '{service}' twice"),
                ));
            }
            if inputs.services.get(service).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownService,
                    format!("Packet '{packet_id}' references unknown service '{service}'"),
                ));
            }
        }
    }

    for (day, patients) in inputs.requests.iter() {
        if !inputs.calendar.has_day(day) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownDay,
                format!("Requests reference unknown day '{day}'"),
            ));
        }
        for (patient, request) in patients {
            for packet in &request.packets {
                if !inputs.packets.contains(packet) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownPacket,
                        format!("Patient '{patient}' requests unknown packet '{packet}' on day '{day}'"),
                    ));
                }
            }
        }
    }

    for (day, result) in inputs.results.iter() {
        if !inputs.calendar.has_day(day) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownDay,
                format!("Results reference unknown day '{day}'"),
            ));
        }
        for (patient, packet) in result.undone() {
            if !inputs.packets.contains(packet) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownPacket,
                    format!("Patient '{patient}' has unknown undone packet '{packet}' on day '{day}'"),
                ));
            } else if !inputs.requests.is_requested(day, patient, packet) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnrequestedPacket,
                    format!("Patient '{patient}' did not request undone packet '{packet}' on day '{day}'"),
                ));
            }
        }
    }

    for (cu, edges) in inputs.subsumptions.iter() {
        if !care_units.contains(cu) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownCareUnit,
                format!("Subsumptions reference unknown care unit '{cu}'"),
            ));
        }
        let days = edges
            .iter()
            .flat_map(|(more, less)| std::iter::once(more).chain(less));
        for day in days {
            if !inputs.calendar.has_day(day) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownDay,
                    format!("Subsumptions for '{cu}' reference unknown day '{day}'"),
                ));
            }
        }
    }

    finish(errors)
}
