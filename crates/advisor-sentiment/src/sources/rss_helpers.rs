//! RSS item extraction and HTML stripping.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::SentimentError;

/// The fields of one RSS `<item>` the news adapter cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FeedItem {
    pub(crate) title: String,
    pub(crate) link: String,
    pub(crate) description: String,
    pub(crate) guid: Option<String>,
    pub(crate) published: Option<String>,
}

impl FeedItem {
    /// Title followed by the plain-text description, when there is one.
    pub(crate) fn text(&self) -> String {
        if self.description.is_empty() || self.description == self.title {
            self.title.clone()
        } else {
            format!("{} {}", self.title, self.description)
        }
    }
}

/// Parse an RSS XML feed into [`FeedItem`]s.
///
/// Items without a title or link are dropped. HTML in descriptions is
/// stripped. Stops after `max_items` items.
///
/// # Errors
///
/// Returns [`SentimentError::Xml`] if the XML is malformed.
pub(crate) fn parse_rss_items(xml: &str, max_items: usize) -> Result<Vec<FeedItem>, SentimentError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut in_item = false;
    let mut current_tag = String::new();
    let mut item = FeedItem::default();
    let mut description_raw = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if name == "item" {
                    in_item = true;
                    item = FeedItem::default();
                    description_raw.clear();
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                if name.as_ref() == b"item" && in_item {
                    in_item = false;
                    item.description = strip_html(&description_raw);
                    if !item.title.is_empty() && !item.link.is_empty() {
                        items.push(std::mem::take(&mut item));
                        if items.len() >= max_items {
                            break;
                        }
                    }
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) if in_item => {
                let text = e.unescape().unwrap_or_default().into_owned();
                assign_field(&mut item, &mut description_raw, &current_tag, &text);
            }
            Ok(Event::CData(e)) if in_item => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                assign_field(&mut item, &mut description_raw, &current_tag, &text);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SentimentError::Xml(e)),
            _ => {}
        }
    }

    Ok(items)
}

fn assign_field(item: &mut FeedItem, description_raw: &mut String, tag: &str, text: &str) {
    match tag {
        "title" => item.title.push_str(text),
        "link" => item.link.push_str(text.trim()),
        "guid" => item.guid = Some(text.trim().to_string()).filter(|g| !g.is_empty()),
        "pubDate" => item.published = Some(text.trim().to_string()),
        "description" => {
            if !description_raw.is_empty() {
                description_raw.push(' ');
            }
            description_raw.push_str(text);
        }
        _ => {}
    }
}

/// Strip HTML tags from a string and normalize whitespace.
pub(crate) fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.replace("&nbsp;", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
