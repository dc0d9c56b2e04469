#![no_main]

use libfuzzer_sys::fuzz_target;
use pagelink_surface::document::Document;
use pagelink_surface::markup::parse_fragment;
use pagelink_surface::tree::deepest;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let mut doc = Document::new();
    let Some(node) = parse_fragment(&mut doc, input) else {
        // Nothing usable: the scratch container must not leak.
        assert!(doc.is_empty(), "empty fragment left nodes behind");
        return;
    };

    // The picked node is detached and everything else was discarded.
    assert_eq!(doc.parent(node), None);
    assert!(doc.contains(node));

    let leaf = deepest(&doc, node);
    assert!(doc.is_inclusive_ancestor(node, leaf));

    // Cloning and serializing any parse result must succeed.
    let copy = doc.deep_clone(node).expect("live node clones");
    assert_eq!(doc.outer_html(copy), doc.outer_html(node));
    doc.discard(copy);
    doc.discard(node);
    assert!(doc.is_empty(), "discard leaked nodes");
});
