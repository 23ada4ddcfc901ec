//! Message templates.
//!
//! A template is plain text with `__NAME__` placeholders bound to one
//! message:
//!
//! | Placeholder          | Value                                      |
//! |----------------------|--------------------------------------------|
//! | `__TITLE__`          | message title                              |
//! | `__SENDER__`         | sender name                                |
//! | `__RECEIVER__`       | receiver name                              |
//! | `__BIDIRECTIONAL__`  | `true` / `false`                           |
//! | `__ARROW__`          | `<->` / `-->`                              |
//! | `__CONTENT__`        | remaining content                          |
//! | `__DATA__`           | data object as compact JSON                |
//! | `__DATA.key__`       | one data field (strings unquoted)          |
//! | `__ORDER__`          | 0-based position                           |
//! | `__NUMBER__`         | 1-based position                           |
//! | `__LINE__`           | source line                                |
//!
//! Bodies are resolved through a [`TemplateLoader`] and compiled once into
//! segments; [`TemplateStore`] caches the compiled handles.

use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use regex::Regex;
use rustc_hash::FxHashMap;
use serde_json::Value as JsonValue;

use super::TemplateError;
use crate::{debug, embed};
use crate::plot::MessageView;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__([A-Z][A-Z_]*?)(?:\.([A-Za-z0-9_-]+))?__").unwrap());

// ============================================================================
// Compiled Template
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Field {
    Title,
    Sender,
    Receiver,
    Bidirectional,
    Arrow,
    Content,
    Data,
    DataKey(String),
    Order,
    Number,
    Line,
}

impl Field {
    fn parse(name: &str, key: Option<&str>) -> Option<Self> {
        let field = match (name, key) {
            ("DATA", Some(key)) => Self::DataKey(key.to_string()),
            (_, Some(_)) => return None,
            ("TITLE", None) => Self::Title,
            ("SENDER", None) => Self::Sender,
            ("RECEIVER", None) => Self::Receiver,
            ("BIDIRECTIONAL", None) => Self::Bidirectional,
            ("ARROW", None) => Self::Arrow,
            ("CONTENT", None) => Self::Content,
            ("DATA", None) => Self::Data,
            ("ORDER", None) => Self::Order,
            ("NUMBER", None) => Self::Number,
            ("LINE", None) => Self::Line,
            _ => return None,
        };
        Some(field)
    }

    fn write(&self, out: &mut String, view: &MessageView<'_>) {
        match self {
            Self::Title => out.push_str(view.title),
            Self::Sender => out.push_str(view.sender),
            Self::Receiver => out.push_str(view.receiver),
            Self::Bidirectional => out.push_str(if view.bidirectional { "true" } else { "false" }),
            Self::Arrow => out.push_str(view.message.arrow()),
            Self::Content => out.push_str(view.content),
            Self::Data => out.push_str(&serde_json::to_string(view.data).unwrap_or_default()),
            Self::DataKey(key) => match view.data.get(key) {
                Some(JsonValue::String(s)) => out.push_str(s),
                Some(value) => out.push_str(&value.to_string()),
                None => {}
            },
            Self::Order => out.push_str(&view.message.order.to_string()),
            Self::Number => out.push_str(&(view.message.order + 1).to_string()),
            Self::Line => out.push_str(&view.message.source_line.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(Field),
}

/// A compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    id: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Compile a template body. Unknown placeholders are rejected.
    pub fn compile(id: impl Into<String>, body: &str) -> Result<Self, TemplateError> {
        let id = id.into();
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(body) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let name = &caps[1];
            let key = caps.get(2).map(|m| m.as_str());
            let field = Field::parse(name, key).ok_or_else(|| TemplateError::UnknownPlaceholder {
                id: id.clone(),
                name: match key {
                    Some(key) => format!("{name}.{key}"),
                    None => name.to_string(),
                },
            })?;

            if whole.start() > last {
                segments.push(Segment::Text(body[last..whole.start()].to_string()));
            }
            segments.push(Segment::Field(field));
            last = whole.end();
        }
        if last < body.len() {
            segments.push(Segment::Text(body[last..].to_string()));
        }

        Ok(Self { id, segments })
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Render against one message.
    pub fn render(&self, view: &MessageView<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(field) => field.write(&mut out, view),
            }
        }
        out
    }
}

// ============================================================================
// Loaders
// ============================================================================

/// Resolves a template identifier to its body.
pub trait TemplateLoader {
    fn load(&self, id: &str) -> Result<String, TemplateError>;
}

/// Built-in templates only.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedLoader;

impl TemplateLoader for EmbeddedLoader {
    fn load(&self, id: &str) -> Result<String, TemplateError> {
        embed::builtin(id)
            .map(str::to_string)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }
}

/// Templates under a directory, falling back to the built-ins.
///
/// One trailing line break is dropped from file bodies, since template
/// actions add their own.
#[derive(Debug, Clone)]
pub struct DirLoader {
    root: PathBuf,
}

impl DirLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TemplateLoader for DirLoader {
    fn load(&self, id: &str) -> Result<String, TemplateError> {
        let path = self.root.join(id);
        match std::fs::read_to_string(&path) {
            Ok(mut body) => {
                if body.ends_with('\n') {
                    body.pop();
                    if body.ends_with('\r') {
                        body.pop();
                    }
                }
                Ok(body)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => EmbeddedLoader.load(id),
            Err(err) => Err(TemplateError::Io(path, err)),
        }
    }
}

// ============================================================================
// Store
// ============================================================================

/// Compiled template cache.
pub struct TemplateStore {
    loader: Box<dyn TemplateLoader>,
    compiled: RwLock<FxHashMap<String, Arc<Template>>>,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new(EmbeddedLoader)
    }
}

impl TemplateStore {
    pub fn new(loader: impl TemplateLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            compiled: RwLock::new(FxHashMap::default()),
        }
    }

    /// Compile every listed template that is not cached yet.
    pub fn prepare<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> Result<(), TemplateError> {
        for id in ids {
            self.resolve(id)?;
        }
        Ok(())
    }

    /// Cached template, compiling it on first use.
    pub fn resolve(&self, id: &str) -> Result<Arc<Template>, TemplateError> {
        if let Some(template) = self.compiled.read().get(id) {
            return Ok(Arc::clone(template));
        }
        let body = self.loader.load(id)?;
        let template = Arc::new(Template::compile(id, &body)?);
        debug!("template"; "compiled {} ({} segments)", template.id(), template.segments.len());
        self.compiled
            .write()
            .insert(id.to_string(), Arc::clone(&template));
        Ok(template)
    }

    /// Number of compiled templates.
    pub fn len(&self) -> usize {
        self.compiled.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use std::cell::Cell;

    fn render_first(body: &str, text: &str) -> String {
        let plot = parse("t", "t.plot", text).unwrap();
        let template = Template::compile("test", body).unwrap();
        template.render(&plot.view(&plot.messages()[0]))
    }

    #[test]
    fn test_render_fields() {
        let out = render_first(
            "__NUMBER__/__ORDER__ __SENDER__ __ARROW__ __RECEIVER__: __TITLE__ (__CONTENT__) @__LINE__",
            "A B\n|<---| PING hello there",
        );
        assert_eq!(out, "1/0 B --> A: PING (hello there) @2");
    }

    #[test]
    fn test_render_data() {
        let text = "A B\n|<-->| STATUS {\"ok\": true, \"who\": \"bob\"}";
        assert_eq!(
            render_first("__DATA__|__DATA.who__|__DATA.ok__|__DATA.none__|__BIDIRECTIONAL__", text),
            "{\"ok\":true,\"who\":\"bob\"}|bob|true||true"
        );
    }

    #[test]
    fn test_plain_text_untouched() {
        let out = render_first("no placeholders, __lower__ stays", "A B\n|--->| X");
        assert_eq!(out, "no placeholders, __lower__ stays");
    }

    #[test]
    fn test_unknown_placeholder() {
        let err = Template::compile("bad.txt", "hi __WHO__").unwrap_err();
        assert!(matches!(
            err,
            TemplateError::UnknownPlaceholder { ref name, .. } if name == "WHO"
        ));

        let err = Template::compile("bad.txt", "__TITLE.x__").unwrap_err();
        assert!(err.to_string().contains("TITLE.x"));
    }

    #[test]
    fn test_embedded_loader() {
        assert!(EmbeddedLoader.load("transcript.txt").is_ok());
        assert!(matches!(
            EmbeddedLoader.load("missing.txt"),
            Err(TemplateError::NotFound(_))
        ));
    }

    #[test]
    fn test_dir_loader_prefers_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("transcript.txt"), "custom __TITLE__").unwrap();
        std::fs::write(dir.path().join("mine.txt"), "mine\n").unwrap();

        let loader = DirLoader::new(dir.path());
        assert_eq!(loader.load("transcript.txt").unwrap(), "custom __TITLE__");
        assert_eq!(loader.load("mine.txt").unwrap(), "mine");
        assert!(loader.load("show.txt").is_ok());
        assert!(loader.load("nothing.txt").is_err());
    }

    struct CountingLoader<'a>(&'a Cell<usize>);

    impl TemplateLoader for CountingLoader<'static> {
        fn load(&self, _id: &str) -> Result<String, TemplateError> {
            self.0.set(self.0.get() + 1);
            Ok("__TITLE__".to_string())
        }
    }

    #[test]
    fn test_store_compiles_once() {
        let loads: &'static Cell<usize> = Box::leak(Box::new(Cell::new(0)));
        let store = TemplateStore::new(CountingLoader(loads));

        store.prepare(["a.txt", "b.txt", "a.txt"]).unwrap();
        store.resolve("a.txt").unwrap();
        assert_eq!(loads.get(), 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_store_reports_missing() {
        let store = TemplateStore::default();
        assert!(store.prepare(["missing.txt"]).is_err());
        assert!(store.is_empty());
    }
}
