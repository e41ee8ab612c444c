//! JSDoc tag parsing and Markdown rendering.

/// A `@param` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name with any `[ ]` optional marker removed.
    pub name: String,
    /// Declared type, `unknown` when absent.
    pub type_name: String,
    /// Free text after the name.
    pub description: String,
    /// Whether the name was written as `[name]`.
    pub optional: bool,
}

/// A `@returns` / `@return` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Returns {
    /// Declared type, `unknown` when absent.
    pub type_name: String,
    /// Free text after the type.
    pub description: String,
}

/// A `@throws` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Throws {
    /// Error type, `Error` when absent.
    pub type_name: String,
    /// Free text after the type.
    pub description: String,
}

/// A `@property` / `@prop` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name.
    pub name: String,
    /// Declared type.
    pub type_name: String,
    /// Free text after the name.
    pub description: String,
}

/// An `@api {method} path description` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTag {
    /// Upper-cased HTTP method.
    pub method: String,
    /// Route path.
    pub path: String,
    /// Free text after the path.
    pub description: String,
}

/// Parsed JSDoc block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsDoc {
    /// Untagged leading text (or an explicit `@description`).
    pub description: String,
    /// `@param` tags in order.
    pub params: Vec<Param>,
    /// Last `@returns` tag.
    pub returns: Option<Returns>,
    /// `@throws` tags in order.
    pub throws: Vec<Throws>,
    /// `@example` bodies.
    pub examples: Vec<String>,
    /// `@property` tags in order.
    pub properties: Vec<Property>,
    /// `file`, `version`, `author`, `since`, `component`, `function` in first-seen order.
    pub metadata: Vec<(String, String)>,
    /// `@api` tag.
    pub api: Option<ApiTag>,
    /// Every other tag in first-seen order.
    pub tags: Vec<(String, String)>,
}

const METADATA_TAGS: &[&str] = &["file", "version", "author", "since", "component", "function"];
const REMARK_TAGS: &[&str] = &["remarks", "note", "warning", "important"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Section {
    Description,
    Param,
    Returns,
    Example,
    Tag(String),
    Other,
}

impl JsDoc {
    /// Parses a cleaned block body (gutter already stripped).
    ///
    /// Lines that do not start a tag continue the current one; blank lines
    /// are dropped.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        let mut doc = Self::default();
        let mut section = Section::Description;
        let mut description: Vec<&str> = Vec::new();
        let mut example: Option<Vec<String>> = None;

        for line in body.trim().lines().map(str::trim) {
            let Some((tag, content)) = split_tag(line) else {
                if line.is_empty() {
                    continue;
                }
                match &section {
                    Section::Description => description.push(line),
                    Section::Param => {
                        if let Some(p) = doc.params.last_mut() {
                            append(&mut p.description, line);
                        }
                    }
                    Section::Returns => {
                        if let Some(r) = doc.returns.as_mut() {
                            append(&mut r.description, line);
                        }
                    }
                    Section::Example => {
                        if let Some(lines) = example.as_mut() {
                            lines.push(line.to_string());
                        }
                    }
                    Section::Tag(name) => {
                        if let Some((_, value)) = doc.tags.iter_mut().find(|(n, _)| n == name) {
                            append(value, line);
                        }
                    }
                    Section::Other => {}
                }
                continue;
            };

            if section == Section::Description && !description.is_empty() {
                doc.description = description.join("\n");
                description.clear();
            }
            if let Some(lines) = example.take() {
                push_example(&mut doc.examples, &lines);
            }

            section = match tag {
                "param" => {
                    doc.params.push(parse_param(content));
                    Section::Param
                }
                "returns" | "return" => {
                    let (type_name, rest) = split_type(content);
                    doc.returns = Some(Returns {
                        type_name: type_name.unwrap_or("unknown").to_string(),
                        description: rest.to_string(),
                    });
                    Section::Returns
                }
                "throws" => {
                    let (type_name, rest) = split_type(content);
                    doc.throws.push(Throws {
                        type_name: type_name.unwrap_or("Error").to_string(),
                        description: rest.to_string(),
                    });
                    Section::Other
                }
                "example" => {
                    example = Some(if content.is_empty() { Vec::new() } else { vec![content.to_string()] });
                    Section::Example
                }
                "property" | "prop" => {
                    if let (Some(type_name), rest) = split_type(content) {
                        let (name, description) = split_name(rest);
                        if !name.is_empty() {
                            doc.properties.push(Property {
                                name: name.to_string(),
                                type_name: type_name.to_string(),
                                description: description.to_string(),
                            });
                        }
                    }
                    Section::Other
                }
                "api" => {
                    doc.api = parse_api(content);
                    Section::Other
                }
                "description" => {
                    doc.description = content.to_string();
                    Section::Other
                }
                t if METADATA_TAGS.contains(&t) => {
                    set_entry(&mut doc.metadata, t, content);
                    Section::Other
                }
                t => {
                    set_entry(&mut doc.tags, t, content);
                    Section::Tag(t.to_string())
                }
            };
        }

        if !description.is_empty() {
            doc.description = description.join("\n");
        }
        if let Some(lines) = example.take() {
            push_example(&mut doc.examples, &lines);
        }
        doc
    }

    /// First line of the description with any leaked tag removed.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        let first = self.description.lines().next()?.trim();
        let first = match split_tag(first) {
            Some((_, rest)) => rest,
            None => first,
        };
        (!first.is_empty()).then(|| first.to_string())
    }

    /// Metadata value for `key`.
    #[must_use]
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Renders every populated section, separated by blank lines.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if !self.description.is_empty() {
            parts.push(self.description.clone());
        }

        let meta: Vec<String> = self
            .metadata
            .iter()
            .filter_map(|(key, value)| match key.as_str() {
                "version" => Some(format!("**Version**: {value}")),
                "author" => Some(format!("**Author**: {value}")),
                "since" => Some(format!("**Since**: {value}")),
                "file" => Some(format!("**File**: {value}")),
                "component" if !value.is_empty() => Some(format!("**Component**: {value}")),
                _ => None,
            })
            .collect();
        if !meta.is_empty() {
            parts.push(meta.join("\n"));
        }

        if let Some(api) = &self.api {
            let mut line = format!("**API**: `{} {}`", api.method, api.path);
            if !api.description.is_empty() {
                line.push_str(&format!(" - {}", api.description));
            }
            parts.push(line);
        }

        if !self.params.is_empty() {
            parts.push("## Parameters".to_string());
            for p in &self.params {
                let mut line = format!("- **{}** (`{}`)", p.name, p.type_name);
                if p.optional {
                    line.push_str(" *(optional)*");
                }
                if !p.description.is_empty() {
                    line.push_str(&format!(": {}", p.description));
                }
                parts.push(line);
            }
        }

        if let Some(r) = &self.returns {
            parts.push("## Returns".to_string());
            let mut line = format!("`{}`", r.type_name);
            if !r.description.is_empty() {
                line.push_str(&format!(" - {}", r.description));
            }
            parts.push(line);
        }

        if !self.properties.is_empty() {
            parts.push("## Properties".to_string());
            for p in &self.properties {
                let mut line = format!("- **{}** (`{}`)", p.name, p.type_name);
                if !p.description.is_empty() {
                    line.push_str(&format!(": {}", p.description));
                }
                parts.push(line);
            }
        }

        if !self.throws.is_empty() {
            parts.push("## Throws".to_string());
            for t in &self.throws {
                let mut line = format!("- **{}**", t.type_name);
                if !t.description.is_empty() {
                    line.push_str(&format!(": {}", t.description));
                }
                parts.push(line);
            }
        }

        if !self.examples.is_empty() {
            parts.push("## Examples".to_string());
            parts.extend(self.examples.iter().map(|e| format!("```\n{e}\n```")));
        }

        let remarks: Vec<String> = self
            .tags
            .iter()
            .filter(|(name, _)| REMARK_TAGS.contains(&name.as_str()))
            .map(|(name, value)| format!("**{}**: {value}", title_case(name)))
            .collect();
        if !remarks.is_empty() {
            parts.push("## Remarks".to_string());
            parts.extend(remarks);
        }

        parts.join("\n\n")
    }
}

/// Splits `@tag rest` into `(tag, rest)`; `None` for non-tag lines.
fn split_tag(line: &str) -> Option<(&str, &str)> {
    let after = line.strip_prefix('@')?;
    let end = after.find(|c: char| !(c.is_alphanumeric() || c == '_')).unwrap_or(after.len());
    if end == 0 {
        return None;
    }
    let (tag, rest) = after.split_at(end);
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((tag, rest.trim()))
}

/// Splits a leading `{type}` off `content`.
fn split_type(content: &str) -> (Option<&str>, &str) {
    if let Some(rest) = content.strip_prefix('{') {
        if let Some(end) = rest.find('}') {
            let type_name = rest[..end].trim();
            if !type_name.is_empty() {
                return (Some(type_name), rest[end + 1..].trim());
            }
        }
    }
    (None, content)
}

/// Splits `name - description` (the dash is optional).
fn split_name(content: &str) -> (&str, &str) {
    let content = content.trim();
    let end = content.find(char::is_whitespace).unwrap_or(content.len());
    let (name, rest) = content.split_at(end);
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('-').unwrap_or(rest).trim();
    (name, rest)
}

fn parse_param(content: &str) -> Param {
    let (type_name, rest) = split_type(content);
    let (raw_name, description) = split_name(rest);
    let optional = raw_name.starts_with('[') && raw_name.ends_with(']');
    let name = if optional {
        let inner = &raw_name[1..raw_name.len() - 1];
        inner.split_once('=').map_or(inner, |(n, _)| n)
    } else {
        raw_name
    };
    Param {
        name: name.to_string(),
        type_name: type_name.unwrap_or("unknown").to_string(),
        description: description.to_string(),
        optional,
    }
}

fn parse_api(content: &str) -> Option<ApiTag> {
    let (method, rest) = split_type(content);
    let method = method.filter(|m| m.chars().all(|c| c.is_alphanumeric() || c == '_'))?;
    let (path, description) = rest.trim().split_once(char::is_whitespace).unwrap_or((rest.trim(), ""));
    if path.is_empty() {
        return None;
    }
    Some(ApiTag {
        method: method.to_uppercase(),
        path: path.to_string(),
        description: description.trim().to_string(),
    })
}

fn set_entry(entries: &mut Vec<(String, String)>, key: &str, value: &str) {
    match entries.iter_mut().find(|(k, _)| k == key) {
        Some((_, existing)) => *existing = value.to_string(),
        None => entries.push((key.to_string(), value.to_string())),
    }
}

fn append(target: &mut String, line: &str) {
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(line);
}

fn push_example(examples: &mut Vec<String>, lines: &[String]) {
    let text = lines.join("\n").trim().to_string();
    if !text.is_empty() {
        examples.push(text);
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}
