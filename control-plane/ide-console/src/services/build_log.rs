//! Scripted terminal transcript shown while an image is being drafted.

use chrono::{DateTime, Utc};
use ide_models::{ConnectorSummary, Machine};

const BUILD_PACKAGES: &[&str] = &[
    "build-essential",
    "git",
    "curl",
    "wget",
    "python3",
    "python3-pip",
    "nodejs",
    "npm",
    "docker.io",
    "java-11-openjdk",
];

pub struct BuildDraft<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub machine: &'a Machine,
    pub connector: &'a ConnectorSummary,
}

pub fn render_build_log(
    draft: &BuildDraft<'_>,
    started_at: DateTime<Utc>,
) -> Vec<String> {
    let BuildDraft {
        name,
        description,
        machine,
        connector,
    } = draft;
    let description = if description.trim().is_empty() {
        "No description provided"
    } else {
        description
    };
    let cores = if machine.cpu_count > 1 { "cores" } else { "core" };

    let mut lines = vec![
        "Welcome to Cloud IDE Image Builder".to_string(),
        format!(
            "Terminal session started at {}",
            started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        "$ cd ~/image-builder".to_string(),
        format!(
            "$ ./create-image.sh --name=\"{}\" --provider=\"{}\" --region=\"{}\" --type=\"{}\"",
            name, connector.name, connector.region, connector.service_type
        ),
        format!("[INFO] Authenticating with {}...", connector.name),
        "[INFO] Using credentials from secure vault".to_string(),
        format!(
            "[INFO] Connection established to {} region",
            connector.region
        ),
        format!(
            "$ ./validate-resources.sh --cpu={} --memory={} --storage={}",
            machine.cpu_count, machine.memory_size, machine.storage_size
        ),
        format!("[INFO] CPU: {} {} - VALIDATED", machine.cpu_count, cores),
        format!("[INFO] Memory: {}GB - VALIDATED", machine.memory_size),
        format!("[INFO] Storage: {}GB - VALIDATED", machine.storage_size),
        "[INFO] Resource validation complete. Proceeding with image creation."
            .to_string(),
        "$ sudo ./setup-base-image.sh".to_string(),
        "[INFO] Downloading base image template...".to_string(),
    ];

    lines.extend(
        (0..=100)
            .step_by(10)
            .map(|pct| format!("Progress: {pct}% - Downloading base image")),
    );
    lines.push("[INFO] Base image downloaded successfully".to_string());
    lines.push(
        "$ sudo apt-get update && sudo apt-get install -y build-essential git curl wget"
            .to_string(),
    );
    lines.extend(
        BUILD_PACKAGES
            .iter()
            .map(|pkg| format!("[INFO] Installing {pkg}...")),
    );
    lines.push(
        "[INFO] All system dependencies installed successfully".to_string(),
    );
    lines.push(
        "$ ./configure-environment.sh --ide=code-server --start-on-boot=true"
            .to_string(),
    );
    lines.extend(
        (0..=100)
            .step_by(20)
            .map(|pct| format!("Progress: {pct}% - Configuring environment")),
    );
    lines.push("[INFO] Environment configuration completed".to_string());
    lines.push(format!(
        "$ ./finalize-image.sh --name=\"{name}\" --description=\"{description}\""
    ));
    lines.push(
        "[SUCCESS] Image configuration completed successfully!".to_string(),
    );
    lines.push(format!("[INFO] Image \"{name}\" is ready to be created"));
    lines.push(format!(
        "[INFO] Click 'Create Image' to finalize and save to your {} account",
        connector.name
    ));
    lines
}
