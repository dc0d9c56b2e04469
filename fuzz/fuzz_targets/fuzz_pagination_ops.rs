#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pagelink::{Pagination, PaginationOptions, Slot, Surface};

#[derive(Debug, Arbitrary)]
enum Op {
    Length(i16),
    Active(i16),
    Lead(i8),
    Trail(i8),
    Radius(i8),
    Next,
    Previous,
    Activate(u8),
}

#[derive(Debug, Arbitrary)]
struct Input {
    length: u8,
    active: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let mut p = Pagination::new(
        PaginationOptions::default()
            .with_length(input.length)
            .with_active(input.active),
    );
    let mut max_length = p.length();

    for op in input.ops.iter().take(256) {
        match *op {
            Op::Length(n) => {
                p.set_length(n);
            }
            Op::Active(i) => {
                p.set_active(i);
            }
            Op::Lead(n) => {
                p.set_lead_length(n);
            }
            Op::Trail(n) => {
                p.set_trail_length(n);
            }
            Op::Radius(n) => {
                p.set_radius(n);
            }
            Op::Next => {
                p.next();
            }
            Op::Previous => {
                p.previous();
            }
            Op::Activate(i) => {
                if let Some(link) = p.link(usize::from(i)) {
                    p.handle_activation(&pagelink::Activation::click(link));
                }
            }
        }
        max_length = max_length.max(p.length());

        assert!(p.length() >= 1, "length below floor");
        assert!(p.active() < p.length(), "active out of range");
        for index in 0..max_length {
            assert!(p.link(index).is_some(), "link {index} missing");
        }

        let attached = p.surface().attached();
        let window = p.window();
        assert_eq!(
            attached.len(),
            window.len(),
            "surface disagrees with window"
        );
        for (node, slot) in attached.iter().zip(window.slots()) {
            match *slot {
                Slot::Page(index) => assert_eq!(p.index_of(*node), Some(index)),
                Slot::Clip(side) => assert_eq!(*node, p.clip(side)),
            }
        }

        let (length, active, radius) = (p.length(), p.active(), p.radius());
        let trail_start = length.saturating_sub(p.trail_length());
        let pages: Vec<_> = window.pages().collect();
        let union: Vec<_> = (0..length)
            .filter(|&i| {
                i < p.lead_length()
                    || i >= trail_start
                    || (i + radius >= active && i <= active + radius)
            })
            .collect();
        assert_eq!(pages, union, "window is not the range union");

        let flagged = attached
            .iter()
            .filter(|&&node| p.document().has_class(node, "active"))
            .count();
        assert_eq!(flagged, 1, "exactly one visible active link");
    }
});
