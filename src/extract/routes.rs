//! `[HttpPost]` routes declared in ASP.NET controllers.

use regex::Regex;

use super::{chars_after, chars_before, normalize_endpoint, EndpointMap, RecordKind, TaggedRecord};
use crate::error::GleanError;
use crate::mask::{line_of, mask, QuoteStyle};

/// Characters before the controller class searched for class-level attributes.
const CLASS_ATTRIBUTE_WINDOW: usize = 800;

/// Characters on either side of an `[HttpPost]` attribute searched for `[Route]`.
const ATTRIBUTE_WINDOW: usize = 200;

/// One POST route found in a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteHit {
    /// Endpoint record; `name` holds the combined route.
    pub record: TaggedRecord,
    /// Action method name, when a signature followed the attribute.
    pub method: Option<String>,
    /// Whether `[AllowAnonymous]` applies.
    pub anonymous: bool,
}

impl RouteHit {
    /// Combined, normalized route.
    #[must_use]
    pub fn route(&self) -> &str {
        self.record.display_name()
    }
}

#[derive(Debug, Default)]
struct ControllerInfo {
    base: Option<String>,
    route: Option<String>,
    anonymous: bool,
}

/// Finds POST actions and resolves their full routes.
#[derive(Debug, Clone)]
pub struct RouteExtractor {
    class: Regex,
    post_attribute: Regex,
    route_attribute: Regex,
    allow_anonymous: Regex,
    quoted: Regex,
    method_signature: Regex,
}

impl RouteExtractor {
    /// Compiles the attribute and signature patterns.
    ///
    /// # Errors
    ///
    /// Returns [`GleanError::Pattern`] if a pattern fails to compile.
    pub fn new() -> Result<Self, GleanError> {
        Ok(Self {
            class: Regex::new(r"class\s+([A-Za-z0-9_]*Controller)\b")?,
            post_attribute: Regex::new(r"(?is)\[[^\]]*?HttpPost[^\]]*?\]")?,
            route_attribute: Regex::new(r#"(?i)\[Route\s*\(\s*"([^"]+)"\s*\)\]"#)?,
            allow_anonymous: Regex::new(r"(?i)\[AllowAnonymous\]")?,
            quoted: Regex::new(r#""([^"]+)""#)?,
            method_signature: Regex::new(
                r"\b(?:public|private|protected|internal)\s+(?:static\s+)?(?:async\s+)?[\w<>,\s\[\]]+\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(",
            )?,
        })
    }

    /// All POST routes in one controller source. `path` is stored as each record's source.
    #[must_use]
    pub fn extract(&self, source: &str, path: &str) -> Vec<RouteHit> {
        let masked = mask(source, QuoteStyle::CFamily);
        let controller = self.controller_info(source, &masked.text);
        let mut hits = Vec::new();

        for attr in self.post_attribute.find_iter(source) {
            if masked.in_comment(attr.start()) || masked.in_literal(attr.start()) {
                continue;
            }
            let attr_text = attr.as_str();
            let method = self
                .method_signature
                .captures_at(&masked.text, attr.end())
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string());

            let window = &source[chars_before(source, attr.start(), ATTRIBUTE_WINDOW)
                ..chars_after(source, attr.end(), ATTRIBUTE_WINDOW)];
            let method_route = self
                .quoted
                .captures(attr_text)
                .or_else(|| self.route_attribute.captures(window))
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .or_else(|| method.clone());

            let route = combine(&controller, method_route.as_deref(), method.as_deref());
            let anonymous = self.allow_anonymous.is_match(attr_text)
                || self.allow_anonymous.is_match(window)
                || controller.anonymous;

            hits.push(RouteHit {
                record: TaggedRecord {
                    kind: RecordKind::Endpoint,
                    name: Some(route),
                    body: attr_text.to_string(),
                    source: path.to_string(),
                    line: line_of(source, attr.start()),
                },
                method,
                anonymous,
            });
        }
        hits
    }

    fn controller_info(&self, source: &str, masked: &str) -> ControllerInfo {
        let Some(caps) = self.class.captures(masked) else {
            return ControllerInfo::default();
        };
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            return ControllerInfo::default();
        };
        let name = name.as_str();
        let base = name.get(..name.len() - "Controller".len()).unwrap_or(name).to_string();
        let before = &source[chars_before(source, whole.start(), CLASS_ATTRIBUTE_WINDOW)..whole.start()];
        ControllerInfo {
            base: Some(base),
            route: self
                .route_attribute
                .captures(before)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string()),
            anonymous: self.allow_anonymous.is_match(before),
        }
    }
}

/// Joins the class route (or controller base) with the method route, then
/// substitutes `[controller]` and `[action]` and normalizes.
fn combine(controller: &ControllerInfo, method_route: Option<&str>, method: Option<&str>) -> String {
    let parts: Vec<&str> = [controller.route.as_deref().or(controller.base.as_deref()), method_route]
        .into_iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .collect();
    let mut combined = parts.join("/");
    if let Some(base) = &controller.base {
        combined = combined.replace("[controller]", base);
    }
    if let Some(method) = method {
        combined = combined.replace("[action]", method);
    }
    normalize_endpoint(&combined)
}

/// Folds hits into an endpoint map keyed by route, with `file_name` as the referencing file.
pub fn collect(hits: &[RouteHit], file_name: &str, anonymous_only: bool, map: &mut EndpointMap) -> usize {
    let mut added = 0;
    for hit in hits.iter().filter(|h| h.anonymous || !anonymous_only) {
        map.insert(hit.route(), file_name);
        added += 1;
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> String {
        let pad = "        var padding = 0;\n".repeat(10);
        format!(
            r#"using Microsoft.AspNetCore.Mvc;

[Route("api/[controller]")]
[ApiController]
public class UsersController : ControllerBase
{{
    [HttpPost("create")]
    public async Task<IActionResult> Create([FromBody] User user)
    {{
{pad}    }}

    [HttpPost]
    [AllowAnonymous]
    public IActionResult Login(LoginModel model)
    {{
{pad}    }}

    // [HttpPost("legacy")]
    // public IActionResult Legacy() {{ }}

    [HttpPost]
    [Route("reset/[action]")]
    public IActionResult Reset() {{ }}
}}
"#
        )
    }

    fn routes(source: &str) -> Vec<RouteHit> {
        RouteExtractor::new().unwrap().extract(source, "Controllers/UsersController.cs")
    }

    #[test]
    fn resolves_routes_from_class_attribute_and_method() {
        let hits = routes(&controller());
        let found: Vec<_> = hits.iter().map(RouteHit::route).collect();
        assert_eq!(found, vec!["api/Users/create", "api/Users/Login", "api/Users/reset/Reset"]);
        assert_eq!(hits[0].method.as_deref(), Some("Create"));
        assert_eq!(hits[0].record.kind, RecordKind::Endpoint);
        assert_eq!(hits[0].record.line, 7);
    }

    #[test]
    fn anonymous_is_detected_near_the_attribute() {
        let flags: Vec<_> = routes(&controller()).iter().map(|h| h.anonymous).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn controller_base_is_used_without_class_route() {
        let source = "public class OrdersController : Controller\n{\n    [HttpPost]\n    public IActionResult Submit() { }\n}\n";
        let hits = routes(source);
        assert_eq!(hits[0].route(), "Orders/Submit");
        assert!(!hits[0].anonymous);
    }

    #[test]
    fn class_level_allow_anonymous_applies_to_every_action() {
        let source = "[AllowAnonymous]\npublic class PingController\n{\n    [HttpPost(\"ping/\")]\n    public void Ping() { }\n}\n";
        let hits = routes(source);
        assert_eq!(hits[0].route(), "Ping/ping");
        assert!(hits[0].anonymous);
    }

    #[test]
    fn collect_honors_anonymous_only() {
        let hits = routes(&controller());
        let mut all = EndpointMap::new();
        assert_eq!(collect(&hits, "UsersController.cs", false, &mut all), 3);
        let mut anonymous = EndpointMap::new();
        collect(&hits, "UsersController.cs", true, &mut anonymous);
        assert_eq!(anonymous.len(), 1);
        assert!(anonymous.get("api/Users/Login").is_some());
    }
}
