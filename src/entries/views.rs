use askama::Template;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::flash::Flash;
use crate::forms::{format_date, EntryForm};
use crate::entries::repo::Entry;

// Everything a raw entry title needs escaped to live in one path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Percent-encode an entry title for use as a URL path segment.
pub fn encode_title(title: &str) -> String {
    utf8_percent_encode(title, PATH_SEGMENT).to_string()
}

pub struct EntryRow {
    pub title: String,
    pub date: String,
    pub url: String,
}

impl From<Entry> for EntryRow {
    fn from(entry: Entry) -> Self {
        Self {
            url: format!("/entries/{}", encode_title(&entry.title)),
            date: format_date(entry.date),
            title: entry.title,
        }
    }
}

pub struct EntryView {
    pub title: String,
    pub date: String,
    pub minutes: i32,
    pub learned: String,
    pub resources: String,
    pub edit_url: String,
    pub delete_url: String,
}

impl From<Entry> for EntryView {
    fn from(entry: Entry) -> Self {
        let encoded = encode_title(&entry.title);
        Self {
            edit_url: format!("/entries/{encoded}/edit"),
            delete_url: format!("/entries/{encoded}/delete"),
            date: format_date(entry.date),
            minutes: entry.minutes,
            title: entry.title,
            learned: entry.learned,
            resources: entry.resources,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub messages: Vec<Flash>,
    pub current_user: Option<String>,
    pub entries: Vec<EntryRow>,
}

#[derive(Template)]
#[template(path = "detail.html")]
pub struct DetailPage {
    pub messages: Vec<Flash>,
    pub current_user: Option<String>,
    pub can_edit: bool,
    pub entry: EntryView,
}

#[derive(Template)]
#[template(path = "new.html")]
pub struct NewEntryPage {
    pub messages: Vec<Flash>,
    pub current_user: Option<String>,
    pub errors: Vec<String>,
    pub form: EntryForm,
}

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditEntryPage {
    pub messages: Vec<Flash>,
    pub current_user: Option<String>,
    pub errors: Vec<String>,
    /// Title under edit, shown in the page heading.
    pub title: String,
    pub form: EntryForm,
}
