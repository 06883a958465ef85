//! The resolver: Minimum Version Selection over prod+dev
//! deps, with cycle detection and prod/dev conflict classification.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use super::catalog::Catalog;
use super::dep::Dep;
use super::release::Release;
use super::version::{self, Version};
use crate::util::error::{DeftError, DepErrorKind};

/// The resolved release set plus any non-fatal warnings accumulated along
/// the way.
#[derive(Debug, Default)]
pub struct ResolveOutcome {
    pub releases: HashSet<Release>,
    pub warnings: Vec<String>,
}

/// Runs MVS over every active package's declared dependencies.
///
/// `active` both seeds the chosen set and supplies the root deps: an
/// active package's release already carries the deps declared in its
/// local manifest, in `prod_deps`/`dev_deps`.
pub fn resolve(
    catalog: &dyn Catalog,
    active: &HashMap<String, Release>,
) -> Result<ResolveOutcome, DeftError> {
    let mut chosen: HashMap<String, Release> = active.clone();
    let mut warnings = Vec::new();
    let mut worklist: VecDeque<Dep> = VecDeque::new();

    for release in active.values() {
        let (roots, mut own_warnings) = root_deps_for_active_package(release)?;
        warnings.append(&mut own_warnings);
        worklist.extend(roots);
    }

    while let Some(dep) = worklist.pop_front() {
        process_dep(catalog, active, &mut chosen, &mut worklist, &dep)?;
    }

    detect_cycles(&chosen)?;

    Ok(ResolveOutcome {
        releases: chosen.into_values().collect(),
        warnings,
    })
}

/// Applies the prod-vs-dev conflict rule within a single
/// active package's own declared deps, then returns the combined root
/// deps to seed the worklist with.
fn root_deps_for_active_package(release: &Release) -> Result<(Vec<Dep>, Vec<String>), DeftError> {
    let mut warnings = Vec::new();
    let mut roots: Vec<Dep> = release.prod_deps().iter().cloned().collect();

    for dev in release.dev_deps() {
        match release.prod_deps().iter().find(|p| p.name() == dev.name()) {
            None => roots.push(dev.clone()),
            Some(prod) => {
                if version::compatible(prod.version(), dev.version()) {
                    warnings.push(format!(
                        "`{}`: prod dependency `{}` and dev dependency `{}` disagree; \
                         the prod minimum wins",
                        release.name(),
                        prod,
                        dev,
                    ));
                    // prod already in `roots`; the dev minimum is discarded.
                } else {
                    return Err(DeftError::dep_conflict(dev.name(), prod, dev));
                }
            }
        }
    }

    Ok((roots, warnings))
}

fn process_dep(
    catalog: &dyn Catalog,
    active: &HashMap<String, Release>,
    chosen: &mut HashMap<String, Release>,
    worklist: &mut VecDeque<Dep>,
    dep: &Dep,
) -> Result<(), DeftError> {
    if active.contains_key(dep.name()) {
        // Active-package shadowing: the active release is used regardless
        // of what was requested or what the catalog contains.
        return Ok(());
    }

    match chosen.get(dep.name()) {
        Some(existing) => {
            let new_min = version::max(existing.version(), dep.version())
                .map_err(|_| DeftError::dep_conflict(dep.name(), existing.version(), dep.version()))?;
            if &new_min == existing.version() {
                // Already satisfies the newly learned minimum; nothing to do.
                return Ok(());
            }
            let upgraded = candidate(catalog, dep.name(), &new_min)?;
            debug!(
                name = dep.name(),
                from = %existing.version(),
                to = %upgraded.version(),
                "upgrading chosen release"
            );
            for prod in upgraded.prod_deps().iter().cloned() {
                worklist.push_back(prod);
            }
            chosen.insert(dep.name().to_string(), upgraded);
            Ok(())
        }
        None => {
            let selected = candidate(catalog, dep.name(), dep.version())?;
            for prod in selected.prod_deps().iter().cloned() {
                worklist.push_back(prod);
            }
            chosen.insert(dep.name().to_string(), selected);
            Ok(())
        }
    }
}

/// The candidate rule: the smallest version satisfying
/// `compatible?(V, v) && V >= v`, or the exact matching branch release.
///
/// Distinguishes a package the catalog has never heard of (`name` has no
/// releases at all) from one where every release it does have fails to
/// satisfy `min` — the former is `MissingCatalogEntry`, the latter
/// `NoCandidate`.
fn candidate(catalog: &dyn Catalog, name: &str, min: &Version) -> Result<Release, DeftError> {
    let releases = catalog.releases(name);
    if releases.is_empty() {
        return Err(DeftError::missing_catalog_entry(name));
    }
    releases
        .into_iter()
        .find(|r| version::compatible(r.version(), min) && r.version() >= min)
        .cloned()
        .ok_or_else(|| DeftError::no_candidate(name, min))
}

/// Detects cycles in the prod-dep graph over package *names*:
/// an edge `x -> y` exists when `chosen[x]`'s prod-deps include a dep on
/// `y`. Dev-dep edges never participate.
fn detect_cycles(chosen: &HashMap<String, Release>) -> Result<(), DeftError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        White,
        Gray,
        Black,
    }

    let mut colors: HashMap<&str, Color> = chosen.keys().map(|k| (k.as_str(), Color::White)).collect();
    let mut path: Vec<String> = Vec::new();

    fn visit<'a>(
        name: &'a str,
        chosen: &'a HashMap<String, Release>,
        colors: &mut HashMap<&'a str, Color>,
        path: &mut Vec<String>,
    ) -> Result<(), DeftError> {
        match colors.get(name) {
            Some(Color::Black) | None => return Ok(()),
            Some(Color::Gray) => {
                let mut cycle = path.clone();
                cycle.push(name.to_string());
                warn!(cycle = %cycle.join(" -> "), "dependency cycle detected");
                return Err(DeftError::cycle(cycle));
            }
            Some(Color::White) => {}
        }
        colors.insert(name, Color::Gray);
        path.push(name.to_string());
        if let Some(release) = chosen.get(name) {
            for dep in release.prod_deps() {
                visit(dep.name(), chosen, colors, path)?;
            }
        }
        path.pop();
        colors.insert(name, Color::Black);
        Ok(())
    }

    let mut names: Vec<&str> = chosen.keys().map(String::as_str).collect();
    names.sort_unstable();
    for name in names {
        if colors.get(name) == Some(&Color::White) {
            visit(name, chosen, &mut colors, &mut path)?;
        }
    }
    Ok(())
}
