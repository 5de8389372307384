use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    Coa, CoaInput, CoaIntent, EngineError, ResultEngine, Snapshot,
    util::{normalize_optional_text, resolve_id},
    validation::validate_coa,
};

pub(super) fn apply(next: &mut Snapshot, op: CoaIntent, now: DateTime<Utc>) -> ResultEngine<()> {
    match op {
        CoaIntent::Set(entries) => next.coa = entries,
        CoaIntent::Add(input) => {
            let mut violations = validate_coa(&input, &next.coa, None);
            let id = resolve_id(input.id.as_deref());
            if next.coa.iter().any(|entry| entry.id == id) {
                violations.push(format!("COA '{id}' already exists"));
            }
            EngineError::check(violations)?;

            let entry = build(id, &input, now, now);
            debug!(code = %entry.code, "coa added");
            next.coa.push(entry);
        }
        CoaIntent::Update { id, input } => {
            let created_at = next
                .coa
                .iter()
                .find(|entry| entry.id == id)
                .map(|entry| entry.created_at)
                .ok_or_else(|| EngineError::KeyNotFound(format!("coa {id}")))?;
            EngineError::check(validate_coa(&input, &next.coa, Some(&id)))?;

            let entry = build(id.clone(), &input, created_at, now);
            debug!(code = %entry.code, "coa updated");
            if let Some(slot) = next.coa.iter_mut().find(|entry| entry.id == id) {
                *slot = entry;
            }
        }
        CoaIntent::Delete(id) => next.coa.retain(|entry| entry.id != id),
    }
    Ok(())
}

fn build(
    id: String,
    input: &CoaInput,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Coa {
    Coa {
        id,
        code: input.code.trim().to_string(),
        name: input.name.trim().to_string(),
        description: normalize_optional_text(input.description.as_deref()),
        category: input.category,
        created_at,
        updated_at,
    }
}
