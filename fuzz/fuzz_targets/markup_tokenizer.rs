#![no_main]

use libfuzzer_sys::fuzz_target;
use markup::{MarkupSink, RawAttribute, TagName, tokenize_into};

#[derive(Default)]
struct Counter {
    events: usize,
    ended: bool,
}

impl MarkupSink for Counter {
    fn open_tag(&mut self, _tag: &TagName, _attrs: &[RawAttribute], _pos: usize) {
        self.events += 1;
    }

    fn close_tag(&mut self, _tag: &TagName, _pos: usize) {
        self.events += 1;
    }

    fn text(&mut self, _text: &str, _pos: usize) {
        self.events += 1;
    }

    fn comment(&mut self, _text: &str, _pos: usize) {
        self.events += 1;
    }

    fn end_of_input(&mut self) {
        assert!(!self.ended, "end of input reported twice");
        self.ended = true;
    }
}

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let mut counter = Counter::default();
    tokenize_into(&input, &mut counter);
    assert!(counter.ended);
});
