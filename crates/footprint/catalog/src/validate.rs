//! One-time consistency checks run when a catalog is built.

use std::collections::{BTreeMap, HashMap};

use crate::error::{CatalogError, Result};
use crate::schema::{
    AtomicHardware, Bandwidth, CatalogData, EmbodiedCoefficient, HardwareDefinition, TableKind,
};

pub(crate) fn validate(data: &CatalogData) -> Result<()> {
    for (name, definition) in &data.hardware {
        match definition {
            HardwareDefinition::Composite { components } => {
                validate_composite(name, components, &data.hardware)?
            }
            HardwareDefinition::Atomic(atomic) => validate_atomic(name, atomic, &data.hardware)?,
        }
    }
    check_composite_cycles(&data.hardware)?;

    for (name, software) in &data.software {
        if !software.file_size_bytes.is_finite() || software.file_size_bytes < 0.0 {
            return Err(CatalogError::invalid(
                TableKind::Software,
                name,
                "file size must be a non-negative number",
            ));
        }
        if let Some(Bandwidth::ByParticipants(table)) = &software.bandwidth {
            if table.is_empty() {
                return Err(CatalogError::invalid(
                    TableKind::Software,
                    name,
                    "bandwidth breakpoint table is empty",
                ));
            }
        }
    }

    Ok(())
}

fn validate_composite(
    name: &str,
    components: &BTreeMap<String, u32>,
    hardware: &BTreeMap<String, HardwareDefinition>,
) -> Result<()> {
    if components.is_empty() {
        return Err(CatalogError::invalid(
            TableKind::Hardware,
            name,
            "composite hardware has no components",
        ));
    }
    for (child, quantity) in components {
        if !hardware.contains_key(child) {
            return Err(CatalogError::invalid(
                TableKind::Hardware,
                name,
                format!("unknown component {}", child),
            ));
        }
        if *quantity == 0 {
            return Err(CatalogError::invalid(
                TableKind::Hardware,
                name,
                format!("component {} has quantity 0", child),
            ));
        }
    }
    Ok(())
}

fn validate_atomic(
    name: &str,
    atomic: &AtomicHardware,
    hardware: &BTreeMap<String, HardwareDefinition>,
) -> Result<()> {
    let invalid = |reason: String| CatalogError::invalid(TableKind::Hardware, name, reason);

    if !atomic.lifetime_years.is_finite() || atomic.lifetime_years < 0.0 {
        return Err(invalid("lifetime must be a non-negative number".into()));
    }
    if !(0.0..=24.0).contains(&atomic.daily_operating_hours) {
        return Err(invalid("daily operating hours must be within 0..=24".into()));
    }
    if atomic.size_dependent {
        match atomic.default_size {
            Some(size) if size.is_finite() && size > 0.0 => {}
            _ => return Err(invalid("size-dependent hardware needs a positive default size".into())),
        }
    }
    if let Some(usage) = &atomic.known_usage {
        if usage.visio_hours < 0.0 || usage.standby_hours < 0.0 {
            return Err(invalid("known usage hours must be non-negative".into()));
        }
    }
    if let Some(EmbodiedCoefficient::AssimilatedTo(target)) = &atomic.embodied {
        if atomic.weight_grams.is_none() {
            return Err(invalid(format!(
                "assimilated to {} but carries no weight",
                target
            )));
        }
        let reference = hardware
            .get(target)
            .ok_or_else(|| invalid(format!("assimilated to unknown hardware {}", target)))?;
        match reference.as_atomic().and_then(|r| r.embodied.as_ref()) {
            Some(EmbodiedCoefficient::Measured(_)) => {}
            _ => {
                return Err(invalid(format!(
                    "assimilation target {} has no measured embodied coefficient",
                    target
                )))
            }
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

/// Rejects composite entries that (transitively) contain themselves.
fn check_composite_cycles(hardware: &BTreeMap<String, HardwareDefinition>) -> Result<()> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    for name in hardware.keys() {
        visit(name, hardware, &mut marks, &mut Vec::new())?;
    }
    Ok(())
}

fn visit<'a>(
    name: &'a str,
    hardware: &'a BTreeMap<String, HardwareDefinition>,
    marks: &mut HashMap<&'a str, Mark>,
    path: &mut Vec<&'a str>,
) -> Result<()> {
    match marks.get(name) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            path.push(name);
            return Err(CatalogError::invalid(
                TableKind::Hardware,
                name,
                format!("composite cycle: {}", path.join(" -> ")),
            ));
        }
        None => {}
    }

    marks.insert(name, Mark::Visiting);
    path.push(name);
    if let Some(HardwareDefinition::Composite { components }) = hardware.get(name) {
        for child in components.keys() {
            visit(child, hardware, marks, path)?;
        }
    }
    path.pop();
    marks.insert(name, Mark::Done);
    Ok(())
}
