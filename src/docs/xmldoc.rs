//! C# XML documentation tags.

use regex::Regex;

use crate::error::GleanError;

/// Parsed XML doc block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlDoc {
    /// `<summary>` text, or the whole block with tags removed when absent.
    pub summary: String,
    /// `<param name="...">` entries in order.
    pub params: Vec<(String, String)>,
    /// `<typeparam name="...">` entries in order.
    pub type_params: Vec<(String, String)>,
    /// `<returns>` text.
    pub returns: Option<String>,
    /// `<value>` text.
    pub value: Option<String>,
    /// `<remarks>` text.
    pub remarks: Option<String>,
    /// `<exception cref="...">` entries in order.
    pub exceptions: Vec<(String, String)>,
    /// `<example>` bodies.
    pub examples: Vec<String>,
}

impl XmlDoc {
    /// Renders the populated sections, separated by blank lines.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if !self.summary.is_empty() {
            parts.push(self.summary.clone());
        }
        push_named(&mut parts, "## Type Parameters", &self.type_params, "- **{}**");
        push_named(&mut parts, "## Parameters", &self.params, "- **{}**");
        if let Some(returns) = &self.returns {
            parts.push("## Returns".to_string());
            parts.push(returns.clone());
        }
        if let Some(value) = &self.value {
            parts.push("## Value".to_string());
            parts.push(value.clone());
        }
        push_named(&mut parts, "## Exceptions", &self.exceptions, "- `{}`");
        if let Some(remarks) = &self.remarks {
            parts.push("## Remarks".to_string());
            parts.push(remarks.clone());
        }
        if !self.examples.is_empty() {
            parts.push("## Examples".to_string());
            parts.extend(self.examples.iter().map(|e| format!("```csharp\n{e}\n```")));
        }
        parts.join("\n\n")
    }
}

fn push_named(parts: &mut Vec<String>, heading: &str, entries: &[(String, String)], label: &str) {
    if entries.is_empty() {
        return;
    }
    parts.push(heading.to_string());
    for (name, text) in entries {
        let mut line = label.replace("{}", name);
        if !text.is_empty() {
            line.push_str(&format!(": {text}"));
        }
        parts.push(line);
    }
}

/// Compiled tag patterns.
#[derive(Debug, Clone)]
pub struct XmlDocParser {
    summary: Regex,
    param: Regex,
    type_param: Regex,
    returns: Regex,
    value: Regex,
    remarks: Regex,
    exception: Regex,
    example: Regex,
    inline_ref: Regex,
    inline_code: Regex,
    code_block: Regex,
    any_tag: Regex,
}

impl XmlDocParser {
    /// Compiles the tag patterns.
    ///
    /// # Errors
    ///
    /// Returns [`GleanError::Pattern`] if a pattern fails to compile.
    pub fn new() -> Result<Self, GleanError> {
        let block = |tag: &str| Regex::new(&format!(r"(?s)<{tag}\s*>(.*?)</{tag}\s*>"));
        let named = |tag: &str, attr: &str| {
            Regex::new(&format!(r#"(?s)<{tag}\s+{attr}\s*=\s*"([^"]*)"\s*>(.*?)</{tag}\s*>"#))
        };
        Ok(Self {
            summary: block("summary")?,
            param: named("param", "name")?,
            type_param: named("typeparam", "name")?,
            returns: block("returns")?,
            value: block("value")?,
            remarks: block("remarks")?,
            exception: named("exception", "cref")?,
            example: block("example")?,
            inline_ref: Regex::new(r#"<(?:see|seealso|paramref|typeparamref)\s+(?:cref|name|langword)\s*=\s*"([^"]*)"\s*/>"#)?,
            inline_code: Regex::new(r"(?s)<c>(.*?)</c>")?,
            code_block: Regex::new(r"(?s)<code>(.*?)</code>")?,
            any_tag: Regex::new(r"</?[A-Za-z][^>]*>")?,
        })
    }

    /// Parses a cleaned block body (`///` prefixes already stripped).
    #[must_use]
    pub fn parse(&self, body: &str) -> XmlDoc {
        let one = |re: &Regex| re.captures(body).and_then(|c| c.get(1)).map(|m| self.inline(m.as_str()));
        let many = |re: &Regex| -> Vec<(String, String)> {
            re.captures_iter(body)
                .filter_map(|c| Some((c.get(1)?.as_str().to_string(), self.inline(c.get(2)?.as_str()))))
                .collect()
        };

        let summary = one(&self.summary).unwrap_or_else(|| {
            if body.contains('<') {
                self.inline(&self.strip_sections(body))
            } else {
                self.inline(body)
            }
        });

        XmlDoc {
            summary,
            params: many(&self.param),
            type_params: many(&self.type_param),
            returns: one(&self.returns).filter(|s| !s.is_empty()),
            value: one(&self.value).filter(|s| !s.is_empty()),
            remarks: one(&self.remarks).filter(|s| !s.is_empty()),
            exceptions: many(&self.exception)
                .into_iter()
                .map(|(cref, text)| (cref.trim_start_matches("T:").to_string(), text))
                .collect(),
            examples: self
                .example
                .captures_iter(body)
                .filter_map(|c| c.get(1))
                .map(|m| self.example_text(m.as_str()))
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Removes every known section so only free text remains.
    fn strip_sections(&self, body: &str) -> String {
        let mut text = body.to_string();
        for re in [&self.param, &self.type_param, &self.returns, &self.value, &self.remarks, &self.exception, &self.example] {
            text = re.replace_all(&text, "").into_owned();
        }
        text
    }

    /// Converts inline references and code to Markdown, drops other tags,
    /// decodes entities, and joins wrapped lines.
    fn inline(&self, text: &str) -> String {
        let text = self.inline_ref.replace_all(text, |c: &regex::Captures<'_>| {
            let name = c.get(1).map_or("", |m| m.as_str());
            format!("`{}`", name.split_once(':').map_or(name, |(_, n)| n))
        });
        let text = self.inline_code.replace_all(&text, "`$1`");
        let text = self.any_tag.replace_all(&text, "");
        let joined = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect::<Vec<_>>().join(" ");
        decode_entities(&joined)
    }

    fn example_text(&self, text: &str) -> String {
        let inner = self.code_block.captures(text).and_then(|c| c.get(1)).map_or(text, |m| m.as_str());
        let stripped = self.any_tag.replace_all(inner, "");
        decode_entities(stripped.trim())
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<").replace("&gt;", ">").replace("&quot;", "\"").replace("&apos;", "'").replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> XmlDoc {
        XmlDocParser::new().unwrap().parse(body)
    }

    #[test]
    fn reads_summary_params_and_returns() {
        let doc = parse(
            "<summary>\nFinds a user by\nidentifier.\n</summary>\n<param name=\"id\">The <c>int</c> key.</param>\n<returns>The user, or <see langword=\"null\"/>.</returns>",
        );
        assert_eq!(doc.summary, "Finds a user by identifier.");
        assert_eq!(doc.params, vec![("id".to_string(), "The `int` key.".to_string())]);
        assert_eq!(doc.returns.as_deref(), Some("The user, or `null`."));
    }

    #[test]
    fn cref_prefixes_are_dropped() {
        let doc = parse("<summary>See <see cref=\"T:System.String\"/>.</summary>\n<exception cref=\"T:ArgumentException\">Bad input.</exception>");
        assert_eq!(doc.summary, "See `System.String`.");
        assert_eq!(doc.exceptions, vec![("ArgumentException".to_string(), "Bad input.".to_string())]);
    }

    #[test]
    fn missing_summary_uses_free_text() {
        let doc = parse("Plain note about caching.\n<remarks>Cleared hourly.</remarks>");
        assert_eq!(doc.summary, "Plain note about caching.");
        assert_eq!(doc.remarks.as_deref(), Some("Cleared hourly."));
    }

    #[test]
    fn examples_keep_code_layout() {
        let doc = parse("<example>\n<code>\nvar x = Get(1);\nif (x &lt; 2) { }\n</code>\n</example>");
        assert_eq!(doc.examples, vec!["var x = Get(1);\nif (x < 2) { }"]);
    }

    #[test]
    fn markdown_sections_follow_a_fixed_order() {
        let doc = parse(
            "<summary>Adds.</summary>\n<typeparam name=\"T\">Item type.</typeparam>\n<param name=\"a\">Left.</param>\n<returns>Sum.</returns>\n<exception cref=\"OverflowException\">Too big.</exception>",
        );
        assert_eq!(
            doc.to_markdown(),
            "Adds.\n\n## Type Parameters\n\n- **T**: Item type.\n\n## Parameters\n\n- **a**: Left.\n\n## Returns\n\nSum.\n\n## Exceptions\n\n- `OverflowException`: Too big."
        );
    }
}
