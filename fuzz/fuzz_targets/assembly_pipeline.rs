#![no_main]

use assembly::{AssemblyConfig, AssemblyEngine};
use document::{Direction, DocumentSink, HtmlDocument, RecordingDocument, SpecKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);

    let mut engine = AssemblyEngine::new(AssemblyConfig::default());
    let mut recorded = RecordingDocument::new();
    engine.begin(0, 0, 0, None);
    engine
        .assemble(&input, &mut recorded)
        .expect("recording document rejects nothing at offset 0");

    // Every element this pass originates is closed again within it.
    let specs = recorded.all_specs();
    let opens = specs
        .iter()
        .filter(|s| s.kind == SpecKind::OpenTag && s.direction == Direction::Originate)
        .count();
    let closes = specs
        .iter()
        .filter(|s| s.kind == SpecKind::CloseTag && s.direction == Direction::Originate)
        .count();
    assert_eq!(opens, closes, "unbalanced pass for {input:?}");

    let mut doc = HtmlDocument::new();
    let mut engine = AssemblyEngine::new(AssemblyConfig::default());
    engine.begin(0, 0, 0, None);
    engine
        .assemble(&input, &mut doc)
        .expect("balanced pass must build");
    assert_eq!(doc.len(), recorded.len());
});
