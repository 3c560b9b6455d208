use assembly::{AssemblyConfig, AssemblyEngine, AssemblyError, GraftPoint};
use assembly_test_support::format_specs;
use css::StyleSheet;
use document::forms::ToggleModel;
use document::{
    AttrKey, Direction, DocumentCall, DocumentProperty, ElementSpec, FormModel, HtmlDocument,
    RecordingDocument, SpecKind, StructuralViolation,
};
use markup::{MarkupSink, Tag, TagName, attributes, tokenize_into};
use std::cell::RefCell;
use std::rc::Rc;

fn engine() -> AssemblyEngine {
    let mut engine = AssemblyEngine::new(AssemblyConfig::default());
    engine.begin(0, 0, 0, None);
    engine
}

fn assemble(input: &str) -> Vec<ElementSpec> {
    let mut engine = engine();
    tokenize_into(input, &mut engine);
    engine.pending().to_vec()
}

fn count(specs: &[ElementSpec], kind: SpecKind, direction: Direction) -> usize {
    specs
        .iter()
        .filter(|s| s.kind == kind && s.direction == direction)
        .count()
}

fn models(specs: &[ElementSpec]) -> Vec<FormModel> {
    specs
        .iter()
        .filter_map(|s| s.attributes.model().cloned())
        .collect()
}

fn toggles(specs: &[ElementSpec]) -> Vec<Rc<ToggleModel>> {
    models(specs)
        .iter()
        .filter_map(|m| m.as_toggle().cloned())
        .collect()
}

#[test]
fn originate_opens_and_closes_balance() {
    let inputs = [
        "<html><head><title>t</title></head><body><p>a<b>b</b></p><ul><li>x</ul></body></html>",
        "<div><pre>x\ny</pre><isindex><table><tr><td>cell</table></div>",
        "<form><fieldset><legend>L</legend><input><select><option>o</select></fieldset></form>",
        "text only",
        "<p>one<p>two<div>three</div>",
        "</div></p>stray closes",
    ];
    for input in inputs {
        let specs = assemble(input);
        assert_eq!(
            count(&specs, SpecKind::OpenTag, Direction::Originate),
            count(&specs, SpecKind::CloseTag, Direction::Originate),
            "unbalanced for {input:?}: {:#?}",
            format_specs(&specs)
        );
    }
}

#[test]
fn consecutive_text_opens_one_implied_block() {
    let mut engine = engine();
    engine.open_tag(&TagName::known(Tag::Body), &[], 0);
    engine.text("first", 6);
    engine.text("second", 11);
    let implied = engine
        .pending()
        .iter()
        .filter(|s| s.kind == SpecKind::OpenTag && s.name() == Some(Tag::Implied))
        .count();
    assert_eq!(implied, 1);
}

#[test]
fn radios_share_groups_by_name_within_a_form() {
    let specs = assemble(
        r#"<form><input type="radio" name="x"><input type="radio" name="x"><input type="radio"></form>"#,
    );
    let radios = toggles(&specs);
    assert_eq!(radios.len(), 3);
    let (m1, m2, m3) = (&radios[0], &radios[1], &radios[2]);
    let g1 = m1.group().expect("m1 grouped");
    let g2 = m2.group().expect("m2 grouped");
    assert!(Rc::ptr_eq(&g1, &g2));
    assert!(m3.group().is_none());
}

#[test]
fn many_radios_share_one_group() {
    let input = format!(
        "<form>{}</form>",
        r#"<input type="radio" name="g">"#.repeat(5)
    );
    let radios = toggles(&assemble(&input));
    assert_eq!(radios.len(), 5);
    let first = radios[0].group().expect("grouped");
    for radio in &radios[1..] {
        assert!(Rc::ptr_eq(&first, &radio.group().expect("grouped")));
    }
    assert_eq!(first.len(), 5);
}

#[test]
fn radios_in_different_forms_do_not_share() {
    let radios = toggles(&assemble(
        r#"<form><input type="radio" name="g"></form><form><input type="radio" name="g"></form>"#,
    ));
    let a = radios[0].group().expect("grouped");
    let b = radios[1].group().expect("grouped");
    assert!(!Rc::ptr_eq(&a, &b));
}

#[test]
fn checking_a_radio_unchecks_its_group() {
    let radios = toggles(&assemble(
        r#"<form><input type="radio" name="g" checked><input type="radio" name="g"></form>"#,
    ));
    assert!(radios[0].is_selected());
    assert!(!radios[1].is_selected());
    radios[1].set_selected(true);
    assert!(!radios[0].is_selected());
    assert!(radios[1].is_selected());
}

fn select_growth(select_attrs: &[(&str, &str)], kind: &str) {
    let mut engine = engine();
    engine.open_tag(&TagName::known(Tag::Body), &[], 0);
    engine.open_tag(&TagName::known(Tag::Select), &attributes(select_attrs.iter().copied()), 0);
    let model = models(engine.pending()).pop().expect("select model");
    assert_eq!(model.kind_name(), kind);
    assert_eq!(model.option_count(), 0);
    for (i, label) in ["one", "two", "three"].into_iter().enumerate() {
        engine.open_tag(&TagName::known(Tag::Option), &[], 0);
        assert_eq!(model.option_count(), i + 1);
        engine.text(label, 0);
        engine.close_tag(&TagName::known(Tag::Option), 0);
    }
    engine.close_tag(&TagName::known(Tag::Select), 0);
    let labels: Vec<String> = match &model {
        FormModel::Combo(combo) => combo.entries().iter().map(|e| e.label.clone()).collect(),
        FormModel::List(list) => list.entries().iter().map(|e| e.label.clone()).collect(),
        other => panic!("unexpected model {other:?}"),
    };
    assert_eq!(labels, ["one", "two", "three"]);
}

#[test]
fn select_without_multiple_grows_a_combo() {
    select_growth(&[], "combo");
}

#[test]
fn select_multiple_grows_a_list() {
    select_growth(&[("multiple", "")], "list");
}

#[test]
fn optgroups_nest_options_one_level() {
    let specs = assemble(
        r#"<select size="4"><optgroup label="G"><option value="v">A</option></optgroup><option label="B">ignored</select>"#,
    );
    let Some(FormModel::List(list)) = models(&specs).pop() else {
        panic!("expected a list model");
    };
    let entries = list.entries();
    assert_eq!(entries.len(), 3);
    assert!(entries[0].is_group);
    assert_eq!(entries[0].label, "G");
    assert_eq!((entries[1].depth, entries[1].label.as_str()), (1, "A"));
    assert_eq!(entries[1].effective_value(), "v");
    assert_eq!((entries[2].depth, entries[2].label.as_str()), (0, "B"));
}

#[test]
fn textarea_and_button_capture_their_text() {
    let specs = assemble("<p><textarea>line one\nline two</textarea><button> Go  now </button></p>");
    let found = models(&specs);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].as_text().expect("text").text(), "line one\nline two");
    assert_eq!(found[1].as_toggle().expect("toggle").label().as_deref(), Some("Go now"));
    assert!(specs.iter().all(|s| !s.text().contains("Go")));
}

#[test]
fn legend_sets_the_fieldset_legend() {
    let specs = assemble(r#"<fieldset><legend align="right">Who</legend><input></fieldset>"#);
    let Some(FormModel::Fieldset(fieldset)) = models(&specs).into_iter().next() else {
        panic!("expected fieldset model first");
    };
    assert_eq!(fieldset.legend().as_deref(), Some("Who"));
    let attrs = fieldset.legend_attributes().expect("legend attributes");
    assert_eq!(attrs.html("align"), Some("right"));
}

#[test]
fn preformatted_start_end_is_five_specs() {
    let mut engine = engine();
    let pre = TagName::known(Tag::Pre);
    engine.open_tag(&pre, &[], 0);
    engine.close_tag(&pre, 5);
    let specs = engine.pending();
    assert_eq!(specs.len(), 5);
    let kinds: Vec<SpecKind> = specs.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        [
            SpecKind::OpenTag,
            SpecKind::OpenTag,
            SpecKind::ContentRun,
            SpecKind::CloseTag,
            SpecKind::CloseTag
        ]
    );
    assert_eq!(specs[2].text(), "\n");
}

#[test]
fn body_text_creates_once_with_five_specs() {
    let mut engine = engine();
    let body = TagName::known(Tag::Body);
    engine.open_tag(&body, &[], 0);
    engine.text("hi", 6);
    engine.close_tag(&body, 8);
    engine.end_of_input();

    let mut doc = RecordingDocument::new();
    engine.flush(&mut doc).expect("flush");
    assert_eq!(doc.calls.len(), 1);
    let DocumentCall::Create(specs) = &doc.calls[0] else {
        panic!("expected create, got {:?}", doc.calls[0]);
    };
    assert_eq!(
        format_specs(specs),
        [
            "open body",
            "open p-implied",
            "content content \"hi\"",
            "close",
            "close"
        ]
    );
}

#[test]
fn second_flush_without_events_makes_no_call() {
    let mut engine = engine();
    tokenize_into("<p>x</p>", &mut engine);
    let mut doc = RecordingDocument::new();
    engine.flush(&mut doc).expect("first flush");
    engine.flush(&mut doc).expect("second flush");
    assert_eq!(doc.calls.len(), 1);
}

#[test]
fn empty_pass_makes_no_call() {
    let mut engine = engine();
    tokenize_into("   ", &mut engine);
    let mut doc = RecordingDocument::new();
    engine.flush(&mut doc).expect("flush");
    assert!(doc.calls.is_empty());
}

#[test]
fn intermediate_flushes_advance_the_offset() {
    let mut engine = engine();
    let mut doc = HtmlDocument::new();
    engine.open_tag(&TagName::known(Tag::Body), &[], 0);
    engine.open_tag(&TagName::known(Tag::P), &[], 6);
    engine.text("one", 9);
    engine.flush(&mut doc).expect("create");
    assert_eq!(engine.offset(), 3);
    assert_eq!(doc.text(), "one");

    engine.text("two", 12);
    engine.flush(&mut doc).expect("insert");
    assert_eq!(engine.offset(), 6);

    engine.close_tag(&TagName::known(Tag::P), 15);
    engine.close_tag(&TagName::known(Tag::Body), 19);
    engine.end_of_input();
    engine.flush(&mut doc).expect("closing insert");
    assert_eq!(doc.text(), "onetwo");
    let paragraphs = doc.elements_named(Tag::P);
    assert_eq!(paragraphs.len(), 1);
    assert_eq!(doc.children(paragraphs[0]).len(), 2);
}

#[test]
fn recorded_inserts_follow_the_first_create() {
    let mut engine = engine();
    let mut doc = RecordingDocument::new();
    engine.open_tag(&TagName::known(Tag::P), &[], 0);
    engine.text("ab", 3);
    engine.flush(&mut doc).expect("create");
    engine.text("cd", 5);
    engine.flush(&mut doc).expect("insert");
    assert!(matches!(doc.calls[0], DocumentCall::Create(_)));
    assert!(matches!(doc.calls[1], DocumentCall::Insert { offset: 2, .. }));
}

#[test]
fn boundary_limits_the_pass_to_one_element() {
    let mut engine = AssemblyEngine::new(AssemblyConfig::default());
    engine.begin(5, 1, 1, Some(Tag::Body));
    tokenize_into(
        "<html><head><title>t</title></head><body><p>x</p></body><p>after</p></html>",
        &mut engine,
    );
    assert_eq!(
        format_specs(engine.pending()),
        [
            "close join-previous",
            "open join-next",
            "open body",
            "open p",
            "content content \"x\"",
            "close",
            "close"
        ]
    );
}

#[test]
fn missing_boundary_yields_nothing() {
    let mut engine = AssemblyEngine::new(AssemblyConfig::default());
    engine.begin(0, 2, 0, Some(Tag::Table));
    tokenize_into("<p>no table here</p>", &mut engine);
    assert!(engine.pending().is_empty());
}

#[test]
fn graft_specs_precede_content() {
    let mut engine = AssemblyEngine::new(AssemblyConfig::default());
    engine.begin_at(GraftPoint {
        offset: 4,
        pop_depth: 2,
        push_depth: 1,
        boundary: None,
        in_paragraph: true,
    });
    engine.text("x", 0);
    assert_eq!(
        format_specs(engine.pending()),
        [
            "close join-previous",
            "close join-previous",
            "open join-next",
            "content content \"x\""
        ]
    );
}

#[test]
fn read_only_document_fails_and_clears_the_buffer() {
    let mut doc = HtmlDocument::new();
    let mut first = engine();
    first.assemble("<p>x</p>", &mut doc).expect("create");
    doc.set_read_only(true);

    let mut engine = AssemblyEngine::new(AssemblyConfig::default());
    engine.begin(1, 0, 0, None);
    engine.text("more", 0);
    let err = engine.flush(&mut doc).expect_err("read-only");
    assert_eq!(
        err,
        AssemblyError::Structural(StructuralViolation::NotEditable { offset: 1 })
    );
    assert!(engine.pending().is_empty());
    assert_eq!(doc.text(), "x");
}

#[test]
fn abort_discards_the_pass() {
    let mut engine = engine();
    tokenize_into("<div><b>x", &mut engine);
    engine.open_tag(&TagName::known(Tag::P), &[], 0);
    engine.abort();
    assert!(engine.pending().is_empty());
    assert_eq!(engine.state().chars().depth(), 0);
    assert_eq!(engine.state().blocks().depth(), 0);
    let mut doc = RecordingDocument::new();
    engine.flush(&mut doc).expect("flush");
    assert!(doc.calls.is_empty());
}

#[test]
fn head_properties_are_published_at_flush() {
    let mut engine = AssemblyEngine::new(AssemblyConfig {
        base_url: "http://example.com/docs/".parse().ok(),
        ..AssemblyConfig::default()
    });
    engine.begin(0, 0, 0, None);
    tokenize_into(
        concat!(
            "<!-- preamble -->",
            "<head><title> The  Title </title><base href=\"sub/\" target=\"main\">",
            "<meta http-equiv=\"Default-Style\" content=\"compact\"></head>",
            "<body><map name=\"m\"><area href=\"a\"><area href=\"b\"></map></body>",
        ),
        &mut engine,
    );
    let mut doc = HtmlDocument::new();
    engine.flush(&mut doc).expect("flush");
    let props = doc.properties();
    assert_eq!(props.title.as_deref(), Some("The Title"));
    assert_eq!(
        props.base.as_ref().map(|u| u.as_str()),
        Some("http://example.com/docs/sub/")
    );
    assert_eq!(props.base_target.as_deref(), Some("main"));
    assert_eq!(props.default_style.as_deref(), Some("compact"));
    assert_eq!(props.comments, [" preamble "]);
    assert_eq!(props.maps.get("m").map(|m| m.areas.len()), Some(2));
}

#[test]
fn comments_inside_blocks_become_runs() {
    let specs = assemble("<p>a<!--note-->b</p>");
    let comment = specs
        .iter()
        .find(|s| s.name() == Some(Tag::Comment))
        .expect("comment run");
    assert_eq!(comment.attributes.string(&document::AttrKey::Comment), Some("note"));

    let mut doc = RecordingDocument::new();
    let mut engine = engine();
    tokenize_into("<!--outside--><p>x</p>", &mut engine);
    engine.flush(&mut doc).expect("flush");
    assert!(matches!(
        doc.properties().as_slice(),
        [DocumentProperty::AdditionalComment(text)] if text == "outside"
    ));
}

#[test]
fn anchors_without_href_do_nothing() {
    let specs = assemble(r#"<p><a name="n">x</a><a href="h">y</a></p>"#);
    let runs: Vec<_> = specs.iter().filter(|s| s.kind == SpecKind::ContentRun).collect();
    assert!(!runs[0].attributes.contains(&document::AttrKey::Markup(Tag::A)));
    assert!(runs[1].attributes.contains(&document::AttrKey::Markup(Tag::A)));
}

#[test]
fn implicitly_closed_form_ends_its_radio_scope() {
    let radios = toggles(&assemble(concat!(
        r#"<div><form><input type="radio" name="g"></div>"#,
        r#"<form><input type="radio" name="g"></form>"#,
        r#"<input type="radio" name="g">"#,
    )));
    assert_eq!(radios.len(), 3);
    let groups: Vec<_> = radios.iter().map(|r| r.group().expect("grouped")).collect();
    assert!(!Rc::ptr_eq(&groups[0], &groups[1]));
    assert!(!Rc::ptr_eq(&groups[0], &groups[2]));
    assert!(!Rc::ptr_eq(&groups[1], &groups[2]));
}

#[test]
fn implicitly_closed_fieldset_takes_no_later_legend() {
    let specs = assemble("<div><fieldset></div><legend>L</legend>");
    let fieldset = models(&specs)
        .into_iter()
        .find_map(|m| match m {
            FormModel::Fieldset(f) => Some(f),
            _ => None,
        })
        .expect("fieldset model");
    assert_eq!(fieldset.legend(), None);
    assert!(
        specs
            .iter()
            .any(|s| s.kind == SpecKind::ContentRun && s.text() == "L")
    );
}

#[test]
fn implicitly_closed_pre_stops_preserving_whitespace() {
    let specs = assemble("<div><pre>a</div>b  c");
    let last_open = specs
        .iter()
        .rev()
        .find(|s| s.kind == SpecKind::OpenTag)
        .expect("open");
    assert_eq!(last_open.name(), Some(Tag::Implied));
    assert!(!last_open.attributes.flag(&AttrKey::PreserveWhitespace));
    assert!(
        specs
            .iter()
            .any(|s| s.kind == SpecKind::ContentRun && s.text() == "b c")
    );
}

#[test]
fn rejected_flush_delivers_no_properties() {
    let mut doc = HtmlDocument::new();
    engine().assemble("<p>x</p>", &mut doc).expect("create");
    doc.set_read_only(true);

    let mut engine = AssemblyEngine::new(AssemblyConfig::default());
    engine.begin(1, 0, 0, None);
    let err = engine
        .assemble("<title>Replaced</title>more", &mut doc)
        .expect_err("read-only");
    assert!(matches!(
        err,
        AssemblyError::Structural(StructuralViolation::NotEditable { .. })
    ));
    assert_eq!(doc.properties().title, None);

    doc.set_read_only(false);
    engine.flush(&mut doc).expect("nothing left to flush");
    assert_eq!(doc.properties().title, None);
    assert_eq!(doc.text(), "x");
}

#[test]
fn properties_follow_the_structural_call() {
    let mut doc = RecordingDocument::new();
    engine().assemble("<title>T</title>x", &mut doc).expect("flush");
    assert!(matches!(
        doc.calls.as_slice(),
        [DocumentCall::Create(_), DocumentCall::Property(DocumentProperty::Title(t))] if t == "T"
    ));
}

#[test]
fn stylesheet_links_reach_the_importer() {
    let sheet = Rc::new(RefCell::new(StyleSheet::new()));
    let mut engine = AssemblyEngine::new(AssemblyConfig {
        base_url: "http://example.com/docs/".parse().ok(),
        ..AssemblyConfig::default()
    })
    .with_rule_importer(Box::new(Rc::clone(&sheet)));
    engine.begin(0, 0, 0, None);
    tokenize_into(
        concat!(
            r#"<head><link rel="stylesheet" href="a.css">"#,
            r#"<link rel="icon" href="favicon.ico">"#,
            r#"<link rel="stylesheet" type="text/plain" href="b.css">"#,
            r#"<link rel="Alternate StyleSheet" type="text/css" href="/c.css"></head>"#,
        ),
        &mut engine,
    );
    let links: Vec<String> = sheet
        .borrow()
        .pending_links()
        .iter()
        .map(|url| url.to_string())
        .collect();
    assert_eq!(
        links,
        ["http://example.com/docs/a.css", "http://example.com/c.css"]
    );
    let placeholders = engine
        .pending()
        .iter()
        .filter(|s| s.name() == Some(Tag::Link))
        .count();
    assert_eq!(placeholders, 4);
}
