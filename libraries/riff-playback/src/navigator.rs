//! Queue navigation with wraparound
//!
//! Pure functions of a queue snapshot. The controller applies the result
//! through `QueueStore::set_active_id`.

use riff_core::{QueueSnapshot, TrackId};

/// Track after the active one
///
/// Wraps from the last track to the first. An active id that is missing
/// from the queue (or unset) resolves to the first track. `None` only for an
/// empty queue.
pub fn next_track(queue: &QueueSnapshot) -> Option<TrackId> {
    let first = queue.ids.first()?;
    let target = match queue.active_index() {
        Some(index) => queue.ids.get(index + 1).unwrap_or(first),
        None => first,
    };
    Some(target.clone())
}

/// Track before the active one
///
/// Wraps from the first track to the last. An active id that is missing
/// from the queue (or unset) resolves to the first track. `None` only for an
/// empty queue.
pub fn previous_track(queue: &QueueSnapshot) -> Option<TrackId> {
    let first = queue.ids.first()?;
    let target = match queue.active_index() {
        Some(0) => queue.ids.last().unwrap_or(first),
        Some(index) => &queue.ids[index - 1],
        None => first,
    };
    Some(target.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(ids: &[&str], active: Option<&str>) -> QueueSnapshot {
        QueueSnapshot::new(
            ids.iter().map(|id| TrackId::new(*id)).collect(),
            active.map(TrackId::new),
        )
    }

    fn id(s: &str) -> Option<TrackId> {
        Some(TrackId::new(s))
    }

    #[test]
    fn next_advances_and_wraps() {
        assert_eq!(next_track(&queue(&["a", "b", "c"], Some("b"))), id("c"));
        assert_eq!(next_track(&queue(&["a", "b", "c"], Some("c"))), id("a"));
    }

    #[test]
    fn previous_steps_back_and_wraps() {
        assert_eq!(previous_track(&queue(&["a", "b", "c"], Some("b"))), id("a"));
        assert_eq!(previous_track(&queue(&["a", "b", "c"], Some("a"))), id("c"));
    }

    #[test]
    fn missing_active_resolves_to_first() {
        let q = queue(&["a", "b", "c"], Some("gone"));
        assert_eq!(next_track(&q), id("a"));
        assert_eq!(previous_track(&q), id("a"));

        let q = queue(&["a", "b"], None);
        assert_eq!(next_track(&q), id("a"));
        assert_eq!(previous_track(&q), id("a"));
    }

    #[test]
    fn empty_queue_has_no_neighbours() {
        assert_eq!(next_track(&queue(&[], Some("a"))), None);
        assert_eq!(previous_track(&queue(&[], None)), None);
    }

    #[test]
    fn single_track_wraps_onto_itself() {
        let q = queue(&["only"], Some("only"));
        assert_eq!(next_track(&q), id("only"));
        assert_eq!(previous_track(&q), id("only"));
    }
}
