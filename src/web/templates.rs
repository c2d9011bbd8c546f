//! Example: Server-side HTML templates with a shared base layout
//!
//! A deliberately small engine over `serde_json::Value` data. Supported
//! actions:
//!
//! - `{{.Field}}`, `{{.A.B}}` and `{{.}}`
//! - pipes into `formatTime` / `formatPrice`
//! - `{{range .Items}}...{{end}}`
//! - `{{define "name"}}...{{end}}` and `{{template "name" .}}`
//!
//! Every interpolated value is HTML-escaped.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http_body_util::Full;
use hyper::{Request, Response, StatusCode};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use super::router::Router;
use super::server::{error_response, handler, html};

const MAX_TEMPLATE_DEPTH: usize = 32;

static NULL: Value = Value::Null;

lazy_static! {
    static ref ACTION: Regex = Regex::new(r"(?s)\{\{\s*(.*?)\s*\}\}").expect("invalid action regex");
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template {template}: unexpected {{{{end}}}}")]
    UnexpectedEnd { template: String },

    #[error("template {template}: unclosed {{{{{action}}}}}")]
    Unclosed { template: String, action: String },

    #[error("template {template}: bad action {{{{{action}}}}}")]
    BadAction { template: String, action: String },

    #[error("no such template {0:?}")]
    UnknownTemplate(String),

    #[error("function {0:?} not defined")]
    UnknownFunction(String),

    #[error("{func}: cannot format {value}")]
    BadArgument { func: String, value: String },

    #[error("templates nested too deeply")]
    TooDeep,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Field { path: Vec<String>, pipes: Vec<String> },
    Range { path: Vec<String>, body: Vec<Node> },
    Template { name: String, path: Vec<String> },
}

fn parse_path(raw: &str) -> Option<Vec<String>> {
    if raw == "." {
        return Some(Vec::new());
    }
    let rest = raw.strip_prefix('.')?;
    let path: Vec<String> = rest.split('.').map(str::to_string).collect();
    path.iter()
        .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_alphanumeric() || c == '_'))
        .then_some(path)
}

fn parse_quoted(raw: &str) -> Option<(&str, &str)> {
    let rest = raw.strip_prefix('"')?;
    let end = rest.find('"')?;
    Some((&rest[..end], rest[end + 1..].trim()))
}

enum Token {
    Text(String),
    Action(String),
}

fn lex(src: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for caps in ACTION.captures_iter(src) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            tokens.push(Token::Text(src[last..whole.start()].to_string()));
        }
        tokens.push(Token::Action(inner.as_str().to_string()));
        last = whole.end();
    }
    if last < src.len() {
        tokens.push(Token::Text(src[last..].to_string()));
    }
    tokens
}

struct Parser<'a> {
    name: &'a str,
    tokens: std::vec::IntoIter<Token>,
    defines: HashMap<String, Vec<Node>>,
}

impl Parser<'_> {
    fn bad(&self, action: &str) -> TemplateError {
        TemplateError::BadAction {
            template: self.name.to_string(),
            action: action.to_string(),
        }
    }

    /// Parses nodes up to the matching `{{end}}` when `opener` is set, else to
    /// the end of input.
    fn parse_block(&mut self, opener: Option<&str>) -> Result<Vec<Node>, TemplateError> {
        let mut nodes = Vec::new();
        while let Some(token) = self.tokens.next() {
            let action = match token {
                Token::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Token::Action(action) => action,
            };

            if action == "end" {
                return match opener {
                    Some(_) => Ok(nodes),
                    None => Err(TemplateError::UnexpectedEnd {
                        template: self.name.to_string(),
                    }),
                };
            } else if let Some(rest) = action.strip_prefix("define ") {
                let (name, _) = parse_quoted(rest.trim()).ok_or_else(|| self.bad(&action))?;
                let name = name.to_string();
                let body = self.parse_block(Some(&action))?;
                self.defines.insert(name, body);
            } else if let Some(rest) = action.strip_prefix("range ") {
                let path = parse_path(rest.trim()).ok_or_else(|| self.bad(&action))?;
                let body = self.parse_block(Some(&action))?;
                nodes.push(Node::Range { path, body });
            } else if let Some(rest) = action.strip_prefix("template ") {
                let (name, arg) = parse_quoted(rest.trim()).ok_or_else(|| self.bad(&action))?;
                let path = if arg.is_empty() {
                    Vec::new()
                } else {
                    parse_path(arg).ok_or_else(|| self.bad(&action))?
                };
                nodes.push(Node::Template {
                    name: name.to_string(),
                    path,
                });
            } else {
                let mut stages = action.split('|').map(str::trim);
                let head = stages.next().unwrap_or_default();
                let path = parse_path(head).ok_or_else(|| self.bad(&action))?;
                let pipes = stages.map(str::to_string).collect();
                nodes.push(Node::Field { path, pipes });
            }
        }

        match opener {
            Some(action) => Err(TemplateError::Unclosed {
                template: self.name.to_string(),
                action: action.to_string(),
            }),
            None => Ok(nodes),
        }
    }
}

/// A named template plus the blocks it defines.
#[derive(Debug, Clone, Default)]
pub struct Template {
    name: String,
    root: Vec<Node>,
    defines: HashMap<String, Vec<Node>>,
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds `src` to the template. Its `define` blocks replace earlier ones of
    /// the same name; its top-level body replaces the current one unless it is
    /// only whitespace.
    pub fn parse(mut self, src: &str) -> Result<Self, TemplateError> {
        let mut parser = Parser {
            name: &self.name,
            tokens: lex(src).into_iter(),
            defines: HashMap::new(),
        };
        let root = parser.parse_block(None)?;
        let defines = parser.defines;

        let has_body = root.iter().any(|node| match node {
            Node::Text(text) => !text.trim().is_empty(),
            _ => true,
        });
        if has_body || self.root.is_empty() {
            self.root = root;
        }
        self.defines.extend(defines);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn execute<T: Serialize + ?Sized>(&self, data: &T) -> Result<String, TemplateError> {
        let data = serde_json::to_value(data).map_err(|err| TemplateError::BadArgument {
            func: "execute".to_string(),
            value: err.to_string(),
        })?;
        let mut out = String::new();
        self.render(&self.root, &data, &mut out, 0)?;
        Ok(out)
    }

    fn render(&self, nodes: &[Node], dot: &Value, out: &mut String, depth: usize) -> Result<(), TemplateError> {
        if depth > MAX_TEMPLATE_DEPTH {
            return Err(TemplateError::TooDeep);
        }
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Field { path, pipes } => {
                    let mut value = lookup(dot, path).cloned().unwrap_or(Value::Null);
                    for func in pipes {
                        value = Value::String(apply(func, &value)?);
                    }
                    out.push_str(&html_escape::encode_safe(&display(&value)));
                }
                Node::Range { path, body } => {
                    if let Some(Value::Array(items)) = lookup(dot, path) {
                        for item in items {
                            self.render(body, item, out, depth + 1)?;
                        }
                    }
                }
                Node::Template { name, path } => {
                    let body = self
                        .defines
                        .get(name)
                        .ok_or_else(|| TemplateError::UnknownTemplate(name.clone()))?;
                    let arg = lookup(dot, path).unwrap_or(&NULL);
                    self.render(body, arg, out, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}

fn lookup<'v>(dot: &'v Value, path: &[String]) -> Option<&'v Value> {
    path.iter().try_fold(dot, |value, key| value.get(key))
}

fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn format_time(value: &Value) -> Result<String, TemplateError> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .ok_or_else(|| TemplateError::BadArgument {
            func: "formatTime".to_string(),
            value: value.to_string(),
        })
}

pub fn format_price(value: &Value) -> Result<String, TemplateError> {
    value
        .as_f64()
        .map(|price| format!("${price:.2}"))
        .ok_or_else(|| TemplateError::BadArgument {
            func: "formatPrice".to_string(),
            value: value.to_string(),
        })
}

fn apply(func: &str, value: &Value) -> Result<String, TemplateError> {
    match func {
        "formatTime" => format_time(value),
        "formatPrice" => format_price(value),
        other => Err(TemplateError::UnknownFunction(other.to_string())),
    }
}

// =============================================================================
// Template set
// =============================================================================

/// Parsed templates cached by name.
#[derive(Debug, Default)]
pub struct TemplateSet {
    templates: RwLock<HashMap<String, Arc<Template>>>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The home and user pages, each layered over the base layout.
    pub fn standard() -> Result<Self, TemplateError> {
        let set = Self::new();
        set.insert(Template::new("home").parse(BASE_TEMPLATE)?.parse(HOME_TEMPLATE)?);
        set.insert(Template::new("user").parse(BASE_TEMPLATE)?.parse(USER_TEMPLATE)?);
        Ok(set)
    }

    pub fn insert(&self, template: Template) {
        self.templates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(template.name.clone(), Arc::new(template));
    }

    pub fn get(&self, name: &str) -> Option<Arc<Template>> {
        self.templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Returns the cached template, parsing `sources` in order on a miss.
    pub fn get_or_parse(&self, name: &str, sources: &[&str]) -> Result<Arc<Template>, TemplateError> {
        if let Some(template) = self.get(name) {
            return Ok(template);
        }
        let template = sources
            .iter()
            .try_fold(Template::new(name), |t, src| t.parse(src))?;
        self.insert(template);
        self.get(name)
            .ok_or_else(|| TemplateError::UnknownTemplate(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.templates.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Pages
// =============================================================================

pub const BASE_TEMPLATE: &str = r#"
<!DOCTYPE html>
<html>
<head>
    <title>{{.Title}}</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 20px; }
        .container { max-width: 800px; margin: 0 auto; }
        .header { background: #f0f0f0; padding: 10px; }
        .content { margin-top: 20px; }
        .footer { margin-top: 20px; padding-top: 20px; border-top: 1px solid #ccc; }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>{{.Title}}</h1>
        </div>
        <div class="content">
            {{template "content" .}}
        </div>
        <div class="footer">
            <p>Generated at {{.Time | formatTime}}</p>
        </div>
    </div>
</body>
</html>
"#;

const HOME_TEMPLATE: &str = r#"
{{define "content"}}
    <p>{{.Content}}</p>
    <h2>Featured Items</h2>
    <ul>
    {{range .Items}}
        <li>{{.Name}} - {{.Price | formatPrice}}</li>
    {{end}}
    </ul>
{{end}}
"#;

const USER_TEMPLATE: &str = r#"
{{define "content"}}
    <h2>User Profile</h2>
    <p><strong>Name:</strong> {{.User.Name}}</p>
    <p><strong>Email:</strong> {{.User.Email}}</p>
{{end}}
"#;

const DYNAMIC_TEMPLATE: &str = r#"
<!DOCTYPE html>
<html>
<head>
    <title>{{.Title}}</title>
</head>
<body>
    <h1>{{.Title}}</h1>
    <p>{{.Content}}</p>
    <p>Current time: {{.Time | formatTime}}</p>
</body>
</html>
"#;

const INHERITED_CONTENT: &str = r#"
{{define "content"}}
    <h2>Inherited Content</h2>
    <p>This content inherits from the base template.</p>
    <p>{{.Content}}</p>
{{end}}
"#;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PageItem {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PageUser {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PageData {
    pub title: String,
    pub content: String,
    pub items: Vec<PageItem>,
    pub time: DateTime<Utc>,
    pub user: PageUser,
}

impl PageData {
    fn titled(title: &str, content: &str) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
            items: Vec::new(),
            time: Utc::now(),
            user: PageUser::default(),
        }
    }
}

pub fn home_data() -> PageData {
    let mut data = PageData::titled("Welcome", "Welcome to our website!");
    data.items = [("Item 1", 19.99), ("Item 2", 29.99), ("Item 3", 39.99)]
        .into_iter()
        .map(|(name, price)| PageItem {
            name: name.to_string(),
            price,
        })
        .collect();
    data
}

pub fn user_data() -> PageData {
    let mut data = PageData::titled("User Profile", "");
    data.user = PageUser {
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
    };
    data
}

fn render_page(template: Result<Arc<Template>, TemplateError>, data: &PageData) -> Response<Full<Bytes>> {
    match template.and_then(|t| t.execute(data)) {
        Ok(page) => html(page),
        Err(err) => {
            error!(%err, "template rendering failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

pub fn home(set: &TemplateSet, _req: Request<Bytes>) -> Response<Full<Bytes>> {
    render_page(
        set.get_or_parse("home", &[BASE_TEMPLATE, HOME_TEMPLATE]),
        &home_data(),
    )
}

pub fn user(set: &TemplateSet, _req: Request<Bytes>) -> Response<Full<Bytes>> {
    render_page(
        set.get_or_parse("user", &[BASE_TEMPLATE, USER_TEMPLATE]),
        &user_data(),
    )
}

/// Parses its template on every request.
pub fn dynamic(_req: Request<Bytes>) -> Response<Full<Bytes>> {
    render_page(
        Template::new("dynamic").parse(DYNAMIC_TEMPLATE).map(Arc::new),
        &PageData::titled("Dynamic Page", "This page was generated dynamically!"),
    )
}

pub fn inheritance(_req: Request<Bytes>) -> Response<Full<Bytes>> {
    let template = Template::new("inheritance")
        .parse(BASE_TEMPLATE)
        .and_then(|t| t.parse(INHERITED_CONTENT))
        .map(Arc::new);
    render_page(
        template,
        &PageData::titled("Template Inheritance", "This is inherited content!"),
    )
}

pub fn router(set: Arc<TemplateSet>) -> Router {
    let home_set = Arc::clone(&set);
    Router::new()
        .route("/", handler(move |req| home(&home_set, req)))
        .route("/user", handler(move |req| user(&set, req)))
        .route("/dynamic", handler(dynamic))
        .route("/inheritance", handler(inheritance))
}

#[cfg(test)]
mod templates_tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::json;

    async fn page(resp: Response<Full<Bytes>>) -> (StatusCode, String) {
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Bytes> {
        Request::builder().uri(uri).body(Bytes::new()).unwrap()
    }

    #[test]
    fn test_fields_and_nested_paths() {
        let t = Template::new("t").parse("Hi {{.User.Name}} ({{.Age}}){{.Missing}}").unwrap();
        let out = t.execute(&json!({"User": {"Name": "Ann"}, "Age": 30})).unwrap();
        assert_eq!(out, "Hi Ann (30)");
    }

    #[test]
    fn test_values_are_escaped() {
        let t = Template::new("t").parse("<p>{{.}}</p>").unwrap();
        let out = t.execute(&json!("<script>alert('x')</script>")).unwrap();
        assert!(!out.contains("<script>"));
        assert!(out.starts_with("<p>&lt;script&gt;"));
    }

    #[test]
    fn test_range_and_pipes() {
        let t = Template::new("t")
            .parse("{{range .Items}}[{{.Name}} {{.Price | formatPrice}}]{{end}}")
            .unwrap();
        let out = t
            .execute(&json!({"Items": [{"Name": "a", "Price": 1.5}, {"Name": "b", "Price": 2}]}))
            .unwrap();
        assert_eq!(out, "[a $1.50][b $2.00]");

        let t = Template::new("t").parse("{{.T | formatTime}}").unwrap();
        assert_eq!(
            t.execute(&json!({"T": "2024-03-05T07:08:09Z"})).unwrap(),
            "2024-03-05 07:08:09"
        );
    }

    #[test]
    fn test_define_and_template_call() {
        let t = Template::new("t")
            .parse(r#"<main>{{template "body" .Page}}</main>"#)
            .unwrap()
            .parse(r#"{{define "body"}}{{.Heading}}{{end}}"#)
            .unwrap();
        assert_eq!(
            t.execute(&json!({"Page": {"Heading": "Hello"}})).unwrap(),
            "<main>Hello</main>"
        );
    }

    #[test]
    fn test_parse_and_execute_errors() {
        assert!(matches!(
            Template::new("t").parse("{{range .Items}}x"),
            Err(TemplateError::Unclosed { .. })
        ));
        assert!(matches!(
            Template::new("t").parse("x{{end}}"),
            Err(TemplateError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            Template::new("t").parse("{{if .X}}"),
            Err(TemplateError::BadAction { .. })
        ));

        let t = Template::new("t").parse(r#"{{template "nope" .}}"#).unwrap();
        assert_eq!(
            t.execute(&json!({})),
            Err(TemplateError::UnknownTemplate("nope".to_string()))
        );

        let t = Template::new("t").parse("{{.X | shout}}").unwrap();
        assert_eq!(
            t.execute(&json!({"X": 1})),
            Err(TemplateError::UnknownFunction("shout".to_string()))
        );

        let t = Template::new("t").parse("{{.X | formatPrice}}").unwrap();
        assert!(matches!(
            t.execute(&json!({"X": "cheap"})),
            Err(TemplateError::BadArgument { .. })
        ));
    }

    #[test]
    fn test_self_recursive_template_is_rejected() {
        let t = Template::new("t")
            .parse(r#"{{define "loop"}}{{template "loop" .}}{{end}}{{template "loop" .}}"#)
            .unwrap();
        assert_eq!(t.execute(&json!({})), Err(TemplateError::TooDeep));
    }

    #[test]
    fn test_template_set_caches() {
        let set = TemplateSet::standard().unwrap();
        assert_eq!(set.len(), 2);
        let first = set.get_or_parse("home", &[]).unwrap();
        let second = set.get_or_parse("home", &[]).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        set.get_or_parse("extra", &["{{.}}"]).unwrap();
        assert_eq!(set.len(), 3);
    }

    #[tokio::test]
    async fn test_home_page() {
        let set = TemplateSet::standard().unwrap();
        let (status, body) = page(home(&set, get("/"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Welcome</title>"));
        assert!(body.contains("<p>Welcome to our website!</p>"));
        assert!(body.contains("<li>Item 1 - $19.99</li>"));
        assert!(body.contains("<li>Item 2 - $29.99</li>"));
        assert!(body.contains("<li>Item 3 - $39.99</li>"));
        assert!(body.contains("Generated at "));
    }

    #[tokio::test]
    async fn test_user_page() {
        let set = TemplateSet::new();
        let (_, body) = page(user(&set, get("/user"))).await;
        assert!(body.contains("<h1>User Profile</h1>"));
        assert!(body.contains("<strong>Name:</strong> John Doe"));
        assert!(body.contains("<strong>Email:</strong> john@example.com"));
        assert_eq!(set.len(), 1);
    }

    #[tokio::test]
    async fn test_dynamic_and_inheritance_pages() {
        let router = router(Arc::new(TemplateSet::new()));

        let (_, body) = page(router.dispatch(get("/dynamic"))).await;
        assert!(body.contains("<h1>Dynamic Page</h1>"));
        assert!(body.contains("This page was generated dynamically!"));
        assert!(body.contains("Current time: "));

        let (_, body) = page(router.dispatch(get("/inheritance"))).await;
        assert!(body.contains("<h1>Template Inheritance</h1>"));
        assert!(body.contains("<h2>Inherited Content</h2>"));
        assert!(body.contains("This content inherits from the base template."));
        assert!(body.contains("This is inherited content!"));
    }
}
