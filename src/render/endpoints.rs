//! Endpoint lists and the referenced/unreferenced route report.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use crate::extract::EndpointMap;

/// `### <endpoint>` followed by one `` - `file` `` bullet per referencing file.
#[must_use]
pub fn render_endpoint_list(map: &EndpointMap) -> String {
    let mut out = String::new();
    for (endpoint, files) in map.iter() {
        let _ = writeln!(out, "### {endpoint}");
        for file in files {
            let _ = writeln!(out, "- `{file}`");
        }
        out.push('\n');
    }
    out
}

/// Parses an endpoint list back into a map.
///
/// Headings without bullets are kept with an empty file set.
#[must_use]
pub fn load_references(markdown: &str) -> EndpointMap {
    let mut map = EndpointMap::new();
    let mut current: Option<String> = None;
    for line in markdown.lines().map(str::trim) {
        if let Some(heading) = line.strip_prefix("### ") {
            let endpoint = heading.trim().to_string();
            map.touch(endpoint.clone());
            current = Some(endpoint);
        } else if let Some(endpoint) = &current {
            if let Some(file) = line.strip_prefix("- `").and_then(|rest| rest.strip_suffix('`')) {
                map.insert(endpoint.clone(), file.trim());
            }
        }
    }
    map
}

/// Case-insensitive comparison key for a route or a client reference.
///
/// Lower-cases, drops leading `/`, and strips the prefix (compared without
/// its slashes) so `/Api/Users/Login` and `api/Users/Login` meet.
#[must_use]
pub fn reference_key(path: &str, prefix: &str) -> String {
    let lowered = path.to_lowercase();
    let trimmed = lowered.trim_start_matches('/');
    let bare_prefix = prefix.trim_matches('/').to_lowercase();
    if bare_prefix.is_empty() {
        return trimmed.to_string();
    }
    match trimmed.strip_prefix(bare_prefix.as_str()) {
        Some("") => String::new(),
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/').to_string(),
        _ => trimmed.to_string(),
    }
}

type Partition<'a> = BTreeMap<&'a str, Vec<(&'a str, &'a BTreeSet<String>)>>;

/// Renders routes split by whether any client file references them.
pub struct RouteReport<'a> {
    /// H1 title.
    pub title: &'a str,
    /// Client endpoint prefix used by [`reference_key`].
    pub prefix: &'a str,
}

impl RouteReport<'_> {
    /// Renders `routes` (route to controller files) against `references`
    /// (client endpoint to referencing files).
    #[must_use]
    pub fn render(&self, routes: &EndpointMap, references: &EndpointMap) -> String {
        let mut lookup: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (endpoint, files) in references.iter() {
            lookup.entry(reference_key(endpoint, self.prefix)).or_default().extend(files.iter().cloned());
        }

        let mut referenced: Partition<'_> = BTreeMap::new();
        let mut unreferenced: Partition<'_> = BTreeMap::new();
        for (route, defined_in) in routes.iter() {
            let owner = route.split('/').next().unwrap_or(route);
            match lookup.get(&reference_key(route, self.prefix)).filter(|files| !files.is_empty()) {
                Some(used_in) => referenced.entry(owner).or_default().push((route, used_in)),
                None => unreferenced.entry(owner).or_default().push((route, defined_in)),
            }
        }

        let mut out = String::new();
        let _ = write!(out, "# {}\n\n", self.title);
        out.push_str("## Referenced\n\n");
        write_partition(&mut out, &referenced, "used in", "_No referenced POST endpoints found._");
        out.push_str("## Unreferenced\n\n");
        write_partition(&mut out, &unreferenced, "Defined in", "_No unreferenced POST endpoints found._");
        out
    }
}

fn write_partition(out: &mut String, partition: &Partition<'_>, lead: &str, placeholder: &str) {
    if partition.is_empty() {
        let _ = write!(out, "{placeholder}\n\n");
        return;
    }
    for (owner, entries) in partition {
        let _ = write!(out, "### {owner}\n\n");
        for (endpoint, files) in entries {
            let _ = write!(out, "#### {endpoint}\n\n{lead}\n\n");
            for file in *files {
                let _ = writeln!(out, "- `{file}`");
            }
            out.push('\n');
        }
    }
}
