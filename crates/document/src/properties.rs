//! Document-level properties published by the assembler at flush time.

use crate::attributes::AttributeSet;
use std::collections::BTreeMap;
use url::Url;

/// Named client-side image map and its areas in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageMap {
    pub name: String,
    pub areas: Vec<AttributeSet>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DocumentProperty {
    Title(String),
    Base(Url),
    BaseTarget(String),
    /// Comment seen outside the body.
    AdditionalComment(String),
    /// Preferred style sheet set (`<meta http-equiv="default-style">`).
    DefaultStyle(String),
    ContentStyleType(String),
    ImageMap(ImageMap),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentProperties {
    pub title: Option<String>,
    pub base: Option<Url>,
    pub base_target: Option<String>,
    pub comments: Vec<String>,
    pub default_style: Option<String>,
    pub content_style_type: Option<String>,
    pub maps: BTreeMap<String, ImageMap>,
}

impl DocumentProperties {
    pub fn apply(&mut self, property: DocumentProperty) {
        match property {
            DocumentProperty::Title(title) => self.title = Some(title),
            DocumentProperty::Base(url) => self.base = Some(url),
            DocumentProperty::BaseTarget(target) => self.base_target = Some(target),
            DocumentProperty::AdditionalComment(text) => self.comments.push(text),
            DocumentProperty::DefaultStyle(name) => self.default_style = Some(name),
            DocumentProperty::ContentStyleType(ty) => self.content_style_type = Some(ty),
            DocumentProperty::ImageMap(map) => {
                self.maps.insert(map.name.clone(), map);
            }
        }
    }
}
