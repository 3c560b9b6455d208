use assembly::{AssemblyConfig, Editor};
use css::StyleSheet;
use document::HtmlDocument;
use document::snapshot::{DocumentSnapshot, SnapshotOptions};
use mimalloc::MiMalloc;
use std::cell::RefCell;
use std::io::{self, Read};
use std::rc::Rc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some("-") | None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
        Some(path) => std::fs::read_to_string(path),
    }
}

fn main() -> io::Result<()> {
    env_logger::init();

    let path = std::env::args().nth(1);
    let input = read_input(path.as_deref())?;
    log::debug!("assembling {} bytes", input.len());

    let sheet = Rc::new(RefCell::new(StyleSheet::new()));
    let editor = Editor::new(AssemblyConfig::default()).with_style_sheet(Rc::clone(&sheet));
    let mut doc = HtmlDocument::new();
    editor
        .parse_document(&mut doc, &input)
        .map_err(io::Error::other)?;

    println!("{}", DocumentSnapshot::new(&doc, SnapshotOptions::default()));
    if let Some(title) = &doc.properties().title {
        println!("title: {title}");
    }
    log::debug!(
        "{} chars, {} style rules",
        doc.len(),
        sheet.borrow().rule_count()
    );
    Ok(())
}
