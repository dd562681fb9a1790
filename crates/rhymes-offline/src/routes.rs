//! Request routing

use rhymes_core::Request;

use crate::strategy::Strategy;

type Matcher = Box<dyn Fn(&Request) -> bool + Send + Sync>;

/// A predicate paired with the strategy that answers matching requests
pub struct Route {
    name: String,
    matcher: Matcher,
    strategy: Strategy,
}

impl Route {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn matches(&self, request: &Request) -> bool {
        (self.matcher)(request)
    }
}

/// Ordered routes; the first matching route wins
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Dataset requests go network-first, everything else cache-first
    pub fn for_dataset(dataset_path: &str) -> Self {
        let suffix = format!("/{}", dataset_path.trim_start_matches('/'));
        Self::new()
            .route(
                "dataset",
                move |request: &Request| request.path().ends_with(&suffix),
                Strategy::NetworkFirst,
            )
            .route("assets", |_: &Request| true, Strategy::CacheFirst)
    }

    /// Append a route
    pub fn route<F>(mut self, name: &str, matcher: F, strategy: Strategy) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.routes.push(Route {
            name: name.to_string(),
            matcher: Box::new(matcher),
            strategy,
        });
        self
    }

    /// First route matching the request
    pub fn resolve(&self, request: &Request) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(request))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
