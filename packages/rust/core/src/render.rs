//! Output renderers.
//!
//! Each output format identifier maps to one [`Renderer`]. Identifiers
//! without a renderer are rejected with [`TildegenError::UnsupportedFormat`].

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use handlebars::Handlebars;
use serde::Serialize;

use tildegen_shared::{AggregateDocument, AppConfig, Result, TildegenError};

/// Name the text template is registered under.
const TEMPLATE_NAME: &str = "document";

// ---------------------------------------------------------------------------
// OutputFormat
// ---------------------------------------------------------------------------

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Json,
    Yaml,
    Text,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = TildegenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            "text" => Ok(Self::Text),
            _ => Err(TildegenError::UnsupportedFormat(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Turns the aggregate document into text.
pub trait Renderer {
    /// The format this renderer produces.
    fn format(&self) -> OutputFormat;
    /// Render the document.
    fn render(&self, document: &AggregateDocument) -> Result<String>;
}

/// Compact JSON.
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn render(&self, document: &AggregateDocument) -> Result<String> {
        serde_json::to_string(document)
            .map_err(|e| TildegenError::render(self.format().as_str(), e.to_string()))
    }
}

/// YAML.
pub struct YamlRenderer;

impl Renderer for YamlRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Yaml
    }

    fn render(&self, document: &AggregateDocument) -> Result<String> {
        serde_yaml::to_string(document)
            .map_err(|e| TildegenError::render(self.format().as_str(), e.to_string()))
    }
}

/// Handlebars template; the document is available to it as `data`.
pub struct TextRenderer {
    handlebars: Handlebars<'static>,
}

#[derive(Serialize)]
struct TemplateContext<'a> {
    data: &'a AggregateDocument,
}

impl TextRenderer {
    /// Compile a template from source.
    pub fn new(template: &str) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(|e| TildegenError::parse(format!("invalid template: {e}")))?;
        Ok(Self { handlebars })
    }

    /// Load and compile a template file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let template = std::fs::read_to_string(path).map_err(|e| TildegenError::io(path, e))?;
        Self::new(&template).map_err(|e| match e {
            TildegenError::Parse { message } => {
                TildegenError::parse(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }
}

impl Renderer for TextRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Text
    }

    fn render(&self, document: &AggregateDocument) -> Result<String> {
        self.handlebars
            .render(TEMPLATE_NAME, &TemplateContext { data: document })
            .map_err(|e| TildegenError::render(self.format().as_str(), e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Build the renderer for `format`.
pub fn renderer_for(format: OutputFormat, config: &AppConfig) -> Result<Box<dyn Renderer>> {
    match format {
        OutputFormat::Json => Ok(Box::new(JsonRenderer)),
        OutputFormat::Yaml => Ok(Box::new(YamlRenderer)),
        OutputFormat::Text => {
            let path = config.template.path.as_deref().ok_or_else(|| {
                TildegenError::config("the text format needs template.path to be set")
            })?;
            Ok(Box::new(TextRenderer::from_file(path)?))
        }
    }
}

/// Build the renderer for a format identifier such as `"json"`.
pub fn renderer_for_name(name: &str, config: &AppConfig) -> Result<Box<dyn Renderer>> {
    renderer_for(name.parse()?, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tildegen_shared::{Metadata, UserRecord};

    fn document() -> AggregateDocument {
        let mut metadata = Metadata::new();
        metadata.insert("name".into(), "tilde.example".into());
        let users = vec![
            UserRecord {
                username: "alice".into(),
                title: Some("Alice & co".into()),
                mtime: 1_700_000_000,
            },
            UserRecord::without_index("bob"),
        ];
        let at = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        AggregateDocument::new(metadata, users, at)
    }

    #[test]
    fn format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("YAML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
    }

    #[test]
    fn unknown_format_is_a_typed_error() {
        let err = "xml".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, TildegenError::UnsupportedFormat(ref name) if name == "xml"));

        let result = renderer_for_name("csv", &AppConfig::default());
        assert!(matches!(result, Err(TildegenError::UnsupportedFormat(_))));
    }

    #[test]
    fn json_renderer_output() {
        let json = JsonRenderer.render(&document()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["name"], "tilde.example");
        assert_eq!(value["user_count"], 2);
        assert_eq!(value["last_generated"], "2024-05-01 08:30:00");
        assert_eq!(value["users"][0]["title"], "Alice & co");
        assert!(value["users"][1]["title"].is_null());
        assert_eq!(value["users"][1]["mtime"], 0);
    }

    #[test]
    fn yaml_renderer_output() {
        let yaml = YamlRenderer.render(&document()).unwrap();
        assert!(yaml.contains("name: tilde.example"));
        assert!(yaml.contains("user_count: 2"));
        assert!(yaml.contains("username: bob"));
        assert!(yaml.contains("title: null"));
    }

    #[test]
    fn text_renderer_exposes_data() {
        let renderer = TextRenderer::new(
            "{{data.name}} ({{data.user_count}})\n{{#each data.users}}~{{username}}: {{title}}\n{{/each}}",
        )
        .unwrap();
        let text = renderer.render(&document()).unwrap();
        assert_eq!(text, "tilde.example (2)\n~alice: Alice & co\n~bob: \n");
    }

    #[test]
    fn text_renderer_rejects_broken_template() {
        let result = TextRenderer::new("{{#each data.users}}unterminated");
        assert!(matches!(result, Err(TildegenError::Parse { .. })));
    }

    #[test]
    fn text_format_requires_template_path() {
        let result = renderer_for(OutputFormat::Text, &AppConfig::default());
        assert!(matches!(result, Err(TildegenError::Config { .. })));

        let mut config = AppConfig::default();
        config.template.path = Some("/nonexistent/users.hbs".into());
        let result = renderer_for(OutputFormat::Text, &config);
        assert!(matches!(result, Err(TildegenError::Io { .. })));
    }

    #[test]
    fn registry_maps_each_format() {
        let config = AppConfig::default();
        for format in [OutputFormat::Json, OutputFormat::Yaml] {
            assert_eq!(renderer_for(format, &config).unwrap().format(), format);
        }
    }
}
