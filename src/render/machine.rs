//! Machines are two plain-text files: a properties file and the script.

use crate::config::MachineSpec;

/// `Machines/<stem>.properties`.
pub fn render_machine_properties(machine: &MachineSpec) -> String {
    format!(
        "favorite = {}\nenabled = {}",
        machine.favorite, machine.enabled
    )
}

/// `Machines/<stem>.machine`: header plus the instructions block, verbatim.
pub fn render_machine_script(id: &str, name: &str, author: &str, machine: &MachineSpec) -> String {
    [
        format!("machine(\"{}\",", quote(id)),
        format!("        displayName:\"{}\",", quote(name)),
        format!("        author: \"{}\",", quote(author)),
        format!("        description: \"{}\")", quote(&machine.desc)),
        "{".to_string(),
        machine.instructions.clone(),
        "}".to_string(),
    ]
    .join("\n")
}

/// Escape a value for a double-quoted script string literal.
fn quote(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}
