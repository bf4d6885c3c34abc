//! Instance directories on disk.
//!
//! An instance is a directory holding one JSON file per entity collection
//! (`operators.json`, `services.json`, ...). The analyses never touch files;
//! this module loads their inputs and stores their outputs in the persisted
//! shapes documented in [`models`](crate::models).

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cores::CoreInputs;
use crate::error::{Error, Result};
use crate::models::{
    ConflictCores, OperatorCalendar, Packets, Priorities, Requests, Results, Services,
    SubsumptionRelation,
};
use crate::validation::{validate_calendar, validate_core_inputs};

pub const OPERATORS_FILE: &str = "operators.json";
pub const SERVICES_FILE: &str = "services.json";
pub const PACKETS_FILE: &str = "packets.json";
pub const PRIORITIES_FILE: &str = "priorities.json";
pub const REQUESTS_FILE: &str = "requests.json";
pub const RESULTS_FILE: &str = "results.json";
pub const SUBSUMPTIONS_FILE: &str = "subsumptions.json";
pub const CORES_FILE: &str = "cores.json";

/// Lists instance directories under `root`, sorted by name.
///
/// A missing root is an error; an empty one yields an empty list.
pub fn discover_instances(root: &Path) -> Result<Vec<InstanceDir>> {
    if !root.is_dir() {
        return Err(Error::MissingInput {
            path: root.to_path_buf(),
        });
    }
    let io_error = |source| Error::Io {
        path: root.to_path_buf(),
        source,
    };

    let mut dirs = Vec::new();
    for entry in fs::read_dir(root).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_dir() {
            dirs.push(InstanceDir::open(path));
        }
    }
    dirs.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(dirs)
}

/// Every input of core extraction, owned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Instance {
    pub operators: OperatorCalendar,
    pub services: Services,
    pub packets: Packets,
    /// Absent `priorities.json` loads as empty.
    pub priorities: Priorities,
    pub requests: Requests,
    pub results: Results,
    pub subsumptions: SubsumptionRelation,
}

impl Instance {
    /// Borrowed view for [`CoreExtractor`](crate::cores::CoreExtractor).
    pub fn core_inputs(&self) -> CoreInputs<'_> {
        CoreInputs {
            calendar: &self.operators,
            services: &self.services,
            packets: &self.packets,
            requests: &self.requests,
            results: &self.results,
            subsumptions: &self.subsumptions,
        }
    }
}

/// One instance directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDir {
    path: PathBuf,
}

impl InstanceDir {
    /// Wraps a directory path. Nothing is read until a loader is called.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory name, for log lines.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn operators(&self) -> Result<OperatorCalendar> {
        self.read(OPERATORS_FILE)
    }

    pub fn services(&self) -> Result<Services> {
        self.read(SERVICES_FILE)
    }

    pub fn packets(&self) -> Result<Packets> {
        self.read(PACKETS_FILE)
    }

    /// Patient priorities; only the master problem uses them.
    pub fn priorities(&self) -> Result<Priorities> {
        self.read(PRIORITIES_FILE)
    }

    pub fn requests(&self) -> Result<Requests> {
        self.read(REQUESTS_FILE)
    }

    pub fn results(&self) -> Result<Results> {
        self.read(RESULTS_FILE)
    }

    pub fn subsumptions(&self) -> Result<SubsumptionRelation> {
        self.read(SUBSUMPTIONS_FILE)
    }

    pub fn cores(&self) -> Result<ConflictCores> {
        self.read(CORES_FILE)
    }

    /// Loads and validates the operator calendar.
    pub fn load_calendar(&self) -> Result<OperatorCalendar> {
        let calendar = self.operators()?;
        validate_calendar(&calendar)?;
        Ok(calendar)
    }

    /// Loads and validates every input of core extraction.
    pub fn load_instance(&self) -> Result<Instance> {
        let priorities = match self.priorities() {
            Err(Error::MissingInput { .. }) => Priorities::new(),
            other => other?,
        };
        let instance = Instance {
            operators: self.operators()?,
            services: self.services()?,
            packets: self.packets()?,
            priorities,
            requests: self.requests()?,
            results: self.results()?,
            subsumptions: self.subsumptions()?,
        };
        validate_core_inputs(&instance.core_inputs())?;
        Ok(instance)
    }

    pub fn write_subsumptions(&self, relation: &SubsumptionRelation) -> Result<()> {
        self.write(SUBSUMPTIONS_FILE, relation)
    }

    pub fn write_cores(&self, cores: &ConflictCores) -> Result<()> {
        self.write(CORES_FILE, cores)
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<T> {
        let path = self.path.join(file);
        if !path.is_file() {
            return Err(Error::MissingInput { path });
        }
        let reader = fs::File::open(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "Reading");
        serde_json::from_reader(BufReader::new(reader)).map_err(|source| Error::Json { path, source })
    }

    /// Writes pretty JSON with a four-space indent.
    fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.path.join(file);
        let io_error = |source| Error::Io {
            path: path.clone(),
            source,
        };
        let file = fs::File::create(&path).map_err(io_error)?;
        let mut writer = BufWriter::new(file);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        value.serialize(&mut serializer).map_err(|source| Error::Json {
            path: path.clone(),
            source,
        })?;
        writer.flush().map_err(io_error)?;
        debug!(path = %path.display(), "Wrote");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Window;

    /// Fresh scratch directory under the system temp dir.
    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("u-carecut-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_file(dir: &Path, file: &str, json: &str) {
        fs::write(dir.join(file), json).unwrap();
    }

    fn write_instance(dir: &Path) {
        write_file(
            dir,
            OPERATORS_FILE,
            r#"{
                "0": {"cu00": {"op0": {"start": 0, "duration": 10}}, "cu01": {"op0": {"start": 0, "duration": 10}}},
                "1": {"cu00": {"op0": {"start": 0, "duration": 4}, "op1": {"start": 4, "duration": 4}},
                      "cu01": {"op0": {"start": 2, "duration": 5}}}
            }"#,
        );
        write_file(
            dir,
            SERVICES_FILE,
            r#"{
                "srv01": {"careUnit": "cu00", "duration": 2, "cost": 3},
                "srv02": {"careUnit": "cu01", "duration": 2, "cost": 4}
            }"#,
        );
        write_file(dir, PACKETS_FILE, r#"{"pkt00": ["srv01", "srv02"], "pkt01": ["srv02"]}"#);
        write_file(dir, PRIORITIES_FILE, r#"{"pat00": 2, "pat01": 4}"#);
        write_file(
            dir,
            REQUESTS_FILE,
            r#"{"0": {"pat00": {"packets": ["pkt00"]}, "pat01": {"packets": ["pkt01"]}}}"#,
        );
        write_file(
            dir,
            RESULTS_FILE,
            r#"{"0": {"scheduledServices": [], "notScheduledPackets": {"pat00": ["pkt00"], "pat01": ["pkt01"]}, "unusedOperators": []}}"#,
        );
    }

    #[test]
    fn test_missing_file_is_missing_input() {
        let dir = scratch("missing");
        let err = InstanceDir::open(&dir).operators().unwrap_err();
        assert!(matches!(err, Error::MissingInput { .. }));
    }

    #[test]
    fn test_bad_json_is_json_error() {
        let dir = scratch("badjson");
        write_file(&dir, OPERATORS_FILE, "{ not json");
        let err = InstanceDir::open(&dir).operators().unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
    }

    #[test]
    fn test_invalid_calendar_is_malformed() {
        let dir = scratch("malformed");
        write_file(
            &dir,
            OPERATORS_FILE,
            r#"{"0": {"cu00": {"op0": {"start": 0, "duration": 0}}}}"#,
        );
        let err = InstanceDir::open(&dir).load_calendar().unwrap_err();
        assert!(matches!(err, Error::MalformedEntity(_)));
    }

    #[test]
    fn test_pipeline_round_trip() {
        let dir = scratch("pipeline");
        write_instance(&dir);
        let instance_dir = InstanceDir::open(&dir);

        let calendar = instance_dir.load_calendar().unwrap();
        assert_eq!(calendar.operators("1", "cu00").unwrap()["op1"], Window::new(4, 4));
        let relation = crate::dominance::compute_subsumptions(&calendar);
        instance_dir.write_subsumptions(&relation).unwrap();

        let written = fs::read_to_string(dir.join(SUBSUMPTIONS_FILE)).unwrap();
        assert!(written.contains("\n    \"cu00\": {"));
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&written).unwrap(),
            serde_json::json!({"cu00": {"0": ["1"]}, "cu01": {"0": ["1"]}})
        );

        let instance = instance_dir.load_instance().unwrap();
        assert_eq!(instance.priorities["pat01"], 4);
        let cores = crate::cores::extract_cores(instance.core_inputs());
        instance_dir.write_cores(&cores).unwrap();

        let back = instance_dir.cores().unwrap();
        assert_eq!(back, cores);
        assert_eq!(back.len(), 2);
        let first = back.get(0).unwrap();
        assert_eq!(first.affected_care_units, vec!["cu00", "cu01"]);
        assert_eq!(first.days, vec!["0", "1"]);
        assert_eq!(first.multipackets["srv01_srv02"].times, 1);
    }

    #[test]
    fn test_missing_priorities_tolerated() {
        let dir = scratch("nopriorities");
        write_instance(&dir);
        fs::remove_file(dir.join(PRIORITIES_FILE)).unwrap();
        write_file(&dir, SUBSUMPTIONS_FILE, r#"{"cu00": {}, "cu01": {}}"#);
        let instance = InstanceDir::open(&dir).load_instance().unwrap();
        assert!(instance.priorities.is_empty());
    }

    #[test]
    fn test_discover_instances_sorted() {
        let root = scratch("root");
        fs::create_dir_all(root.join("inst-b")).unwrap();
        fs::create_dir_all(root.join("inst-a")).unwrap();
        write_file(&root, "notes.txt", "ignored");

        let dirs = discover_instances(&root).unwrap();
        let names: Vec<_> = dirs.iter().map(InstanceDir::name).collect();
        assert_eq!(names, vec!["inst-a", "inst-b"]);

        assert!(matches!(
            discover_instances(&root.join("absent")),
            Err(Error::MissingInput { .. })
        ));
    }
}
