//! Route definitions and the access requirements attached to them.

use crate::token::ROLE_ADMIN;

/// Access requirement attached to a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequirement {
    /// Whether entering needs a signed-in session. Defaults to true.
    pub requires_authentication: bool,
    /// Roles that may enter; empty admits any authenticated user.
    pub required_roles: Vec<String>,
}

impl RouteRequirement {
    /// A route anyone may enter.
    pub fn public() -> Self {
        Self {
            requires_authentication: false,
            required_roles: Vec::new(),
        }
    }

    /// A route open to any signed-in user.
    pub fn authenticated() -> Self {
        Self {
            requires_authentication: true,
            required_roles: Vec::new(),
        }
    }

    /// A route open only to sessions holding one of the given roles.
    pub fn with_roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            requires_authentication: true,
            required_roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for RouteRequirement {
    /// Unannotated routes require a session.
    fn default() -> Self {
        Self::authenticated()
    }
}

/// One navigable route. Children extend the parent's path and inherit
/// its requirement unless they override it.
#[derive(Debug, Clone)]
pub struct RouteDef {
    /// Path segments relative to the parent; a `:name` segment matches
    /// any single value.
    segments: Vec<String>,
    /// Requirement set on this node, if any.
    requirement: Option<RouteRequirement>,
    /// Nested child routes.
    children: Vec<RouteDef>,
}

impl RouteDef {
    /// Creates a route for `path`, with no requirement of its own.
    pub fn new(path: &str) -> Self {
        Self {
            segments: split_segments(path),
            requirement: None,
            children: Vec::new(),
        }
    }

    /// Sets this node's requirement.
    pub fn require(mut self, requirement: RouteRequirement) -> Self {
        self.requirement = Some(requirement);
        self
    }

    /// Adds a nested child route.
    pub fn child(mut self, child: RouteDef) -> Self {
        self.children.push(child);
        self
    }
}

/// The navigation surface: routes, their requirements, and where
/// unknown paths land.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDef>,
    fallback: String,
}

impl RouteTable {
    /// The application's route table.
    ///
    /// Sign-in pages are public; everything under `/employees` needs a
    /// session, and the mutating pages need [`ROLE_ADMIN`] on top.
    pub fn new() -> Self {
        Self::with_routes(
            vec![
                RouteDef::new("login").require(RouteRequirement::public()),
                RouteDef::new("signup").require(RouteRequirement::public()),
                RouteDef::new("unauthorized").require(RouteRequirement::public()),
                RouteDef::new("employees")
                    .require(RouteRequirement::authenticated())
                    .child(
                        RouteDef::new("add").require(RouteRequirement::with_roles([ROLE_ADMIN])),
                    )
                    .child(
                        RouteDef::new("edit/:id")
                            .require(RouteRequirement::with_roles([ROLE_ADMIN])),
                    ),
            ],
            "/employees",
        )
    }

    /// Builds a table from explicit routes.
    pub fn with_routes(routes: Vec<RouteDef>, fallback: impl Into<String>) -> Self {
        Self {
            routes,
            fallback: fallback.into(),
        }
    }

    /// Path unknown paths are redirected to.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Whether `path` names a known route.
    pub fn resolves(&self, path: &str) -> bool {
        self.resolve(path).is_some()
    }

    /// Resolves `path` to its route chain, outermost node first.
    pub fn resolve(&self, path: &str) -> Option<Vec<&RouteDef>> {
        resolve_in(&self.routes, &split_segments(path))
    }

    /// Effective requirement of `path`: roles are unioned across the
    /// chain target-first, and one public node makes the whole path
    /// public.
    pub fn requirement_for(&self, path: &str) -> Option<RouteRequirement> {
        let chain = self.resolve(path)?;
        let mut requires_authentication = true;
        let mut required_roles: Vec<String> = Vec::new();
        for node in chain.iter().rev() {
            let Some(requirement) = &node.requirement else {
                continue;
            };
            if !requirement.requires_authentication {
                requires_authentication = false;
            }
            for role in &requirement.required_roles {
                if !required_roles.contains(role) {
                    required_roles.push(role.clone());
                }
            }
        }
        Some(RouteRequirement {
            requires_authentication,
            required_roles,
        })
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_in<'a>(routes: &'a [RouteDef], segments: &[String]) -> Option<Vec<&'a RouteDef>> {
    for route in routes {
        let Some(rest) = match_prefix(&route.segments, segments) else {
            continue;
        };
        if rest.is_empty() {
            return Some(vec![route]);
        }
        if let Some(mut chain) = resolve_in(&route.children, rest) {
            chain.insert(0, route);
            return Some(chain);
        }
    }
    None
}

/// Matches the route's segments against the front of the path, returning
/// the unconsumed remainder.
fn match_prefix<'p>(route: &[String], path: &'p [String]) -> Option<&'p [String]> {
    if path.len() < route.len() {
        return None;
    }
    for (route_segment, path_segment) in route.iter().zip(path) {
        if !route_segment.starts_with(':') && route_segment != path_segment {
            return None;
        }
    }
    Some(&path[route.len()..])
}

fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
