use serde::{Deserialize, Serialize};

/// Hardware profile selectable for an image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Machine {
    pub identifier: String,
    pub name: String,
    pub cpu_count: u32,
    /// GB
    pub memory_size: u32,
    /// GB
    pub storage_size: u32,
}

struct MachineSpec {
    identifier: &'static str,
    name: &'static str,
    cpu_count: u32,
    memory_size: u32,
    storage_size: u32,
}

const CATALOG: &[MachineSpec] = &[
    MachineSpec {
        identifier: "t2.small",
        name: "Small",
        cpu_count: 1,
        memory_size: 2,
        storage_size: 20,
    },
    MachineSpec {
        identifier: "t2.medium",
        name: "Medium",
        cpu_count: 2,
        memory_size: 4,
        storage_size: 50,
    },
    MachineSpec {
        identifier: "t2.large",
        name: "Large",
        cpu_count: 2,
        memory_size: 8,
        storage_size: 100,
    },
    MachineSpec {
        identifier: "t2.xlarge",
        name: "XLarge",
        cpu_count: 4,
        memory_size: 16,
        storage_size: 200,
    },
    MachineSpec {
        identifier: "t2.2xlarge",
        name: "2XLarge",
        cpu_count: 8,
        memory_size: 32,
        storage_size: 500,
    },
];

impl From<&MachineSpec> for Machine {
    fn from(spec: &MachineSpec) -> Self {
        Self {
            identifier: spec.identifier.to_string(),
            name: spec.name.to_string(),
            cpu_count: spec.cpu_count,
            memory_size: spec.memory_size,
            storage_size: spec.storage_size,
        }
    }
}

pub fn machine_catalog() -> Vec<Machine> {
    CATALOG.iter().map(Machine::from).collect()
}

pub fn find_machine(identifier: &str) -> Option<Machine> {
    CATALOG
        .iter()
        .find(|m| m.identifier == identifier)
        .map(Machine::from)
}
