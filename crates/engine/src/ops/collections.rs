use crate::{CollectionIntent, Snapshot, Task, intents::Keyed};

/// Plain `SET`/`ADD`/`UPDATE`/`DELETE` over one collection.
///
/// `ADD` with an ID already present replaces the older record, so the
/// collection never holds two records with the same ID.
pub(super) fn apply<T: Keyed>(items: &mut Vec<T>, op: CollectionIntent<T>) {
    match op {
        CollectionIntent::Set(all) => *items = all,
        CollectionIntent::Add(item) => {
            items.retain(|existing| existing.key() != item.key());
            items.push(item);
        }
        CollectionIntent::Update(item) => {
            if let Some(slot) = items.iter_mut().find(|existing| existing.key() == item.key()) {
                *slot = item;
            }
        }
        CollectionIntent::Delete(id) => items.retain(|existing| existing.key() != id),
    }
}

/// Tasks also keep the owning phase's `task_ids` in step.
pub(super) fn apply_tasks(next: &mut Snapshot, op: CollectionIntent<Task>) {
    match &op {
        CollectionIntent::Add(task) | CollectionIntent::Update(task) => {
            let previous_phase = next
                .tasks
                .iter()
                .find(|existing| existing.id == task.id)
                .map(|existing| existing.phase_id.clone());
            if matches!(op, CollectionIntent::Update(_)) && previous_phase.is_none() {
                return;
            }
            if let Some(previous) = previous_phase.filter(|phase_id| *phase_id != task.phase_id) {
                unlink(next, &previous, &task.id);
            }
            if let Some(phase) = next.phases.iter_mut().find(|p| p.id == task.phase_id)
                && !phase.task_ids.contains(&task.id)
            {
                phase.task_ids.push(task.id.clone());
            }
        }
        CollectionIntent::Delete(id) => {
            if let Some(phase_id) = next
                .tasks
                .iter()
                .find(|existing| existing.id == *id)
                .map(|existing| existing.phase_id.clone())
            {
                unlink(next, &phase_id, id);
            }
        }
        CollectionIntent::Set(_) => {}
    }
    apply(&mut next.tasks, op);
}

fn unlink(next: &mut Snapshot, phase_id: &str, task_id: &str) {
    if let Some(phase) = next.phases.iter_mut().find(|p| p.id == phase_id) {
        phase.task_ids.retain(|id| id != task_id);
    }
}
