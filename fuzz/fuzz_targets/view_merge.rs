//! Fuzz the view-state merge invariants.
//!
//! Arbitrary hydrate/append sequences over a tiny entry domain (so
//! collisions actually happen) must never produce duplicates and must
//! keep first-occurrence order.

#![no_main]

use std::collections::HashSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use waveport_core::{entry::Entry, view::ViewState};

/// One step of a merge sequence.
#[derive(Debug, Arbitrary)]
enum Step {
    Hydrate(Vec<(u8, u8, u8)>),
    Append(u8, u8, u8),
}

fn entry((author, at, msg): (u8, u8, u8)) -> Entry {
    Entry::new(format!("0x{:02X}", author % 4), u64::from(at % 4), format!("m{}", msg % 4))
}

fuzz_target!(|steps: Vec<Step>| {
    let mut view = ViewState::new();
    for step in steps {
        match step {
            Step::Hydrate(snapshot) => {
                view.hydrate(snapshot.into_iter().map(entry).collect());
            }
            Step::Append(author, at, msg) => {
                let candidate = entry((author, at, msg));
                let already = view.entries().contains(&candidate);
                let inserted = view.append(candidate.clone());
                assert_eq!(inserted, !already, "append must report exactly the fresh inserts");
                if inserted {
                    assert_eq!(view.entries().last(), Some(&candidate), "inserts land at the end");
                }
            }
        }
        let unique: HashSet<&Entry> = view.entries().iter().collect();
        assert_eq!(unique.len(), view.len(), "no two entries may be equal");
    }
});
