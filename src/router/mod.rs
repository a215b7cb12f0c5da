//! Regular-expression request routing.
//!
//! Routes are kept per method in registration order and matched by a linear
//! scan: the first pattern that matches the request path wins, with no ranking
//! by specificity. Named capture groups are handed to the handler as query
//! parameters under `:<name>`.
//!
//! A path that only matches under other methods yields `405 Method Not Allowed`
//! with an `Allow` header; a path nobody matches yields `404 Not Found`.
//!
//! Populate the router first, then serve it. Registration needs `&mut self`
//! while dispatch only reads, so a shared router can be dispatched from many
//! threads at once.

use std::{collections::BTreeMap, sync::Arc};

use tracing::{debug, trace};

pub use binding::{InvalidPattern, PatternBinding, SharedHandler};

use crate::{
    method::HttpMethod,
    params::Params,
    request::Request,
    response_writer::ResponseWriter,
    server::Handler,
    status::StatusCode,
};

mod binding;

/// Outcome of routing one request.
pub enum Dispatch<'a> {
    Matched {
        binding: &'a PatternBinding,
        params: Params,
    },
    NotFound,
    /// Methods whose patterns match the path, one entry per matching binding.
    MethodNotAllowed(Vec<&'a str>),
}

#[derive(Debug, Default)]
pub struct Router {
    bindings: BTreeMap<String, Vec<PatternBinding>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `http_method` requests whose path matches
    /// `pattern`.
    ///
    /// # Panics
    ///
    /// If `pattern` is not a valid regular expression.
    #[track_caller]
    pub fn add(
        &mut self,
        http_method: &str,
        pattern: &str,
        handler: impl Handler + Send + Sync + 'static,
    ) {
        self.add_shared(http_method, pattern, Arc::new(handler));
    }

    #[track_caller]
    fn add_shared(&mut self, http_method: &str, pattern: &str, handler: SharedHandler) {
        let binding = PatternBinding::new(pattern, handler);
        debug!(http_method, pattern, "route added");
        self.bindings
            .entry(http_method.to_owned())
            .or_default()
            .push(binding);
    }

    /// Registers for GET and also for HEAD.
    ///
    /// The HEAD binding is appended like any other, so a HEAD route registered
    /// earlier for the same path keeps precedence.
    #[track_caller]
    pub fn get(&mut self, pattern: &str, handler: impl Handler + Send + Sync + 'static) {
        let handler: SharedHandler = Arc::new(handler);
        self.add_shared(HttpMethod::Head.as_str(), pattern, handler.clone());
        self.add_shared(HttpMethod::Get.as_str(), pattern, handler);
    }

    #[track_caller]
    pub fn head(&mut self, pattern: &str, handler: impl Handler + Send + Sync + 'static) {
        self.add(HttpMethod::Head.as_str(), pattern, handler);
    }

    #[track_caller]
    pub fn post(&mut self, pattern: &str, handler: impl Handler + Send + Sync + 'static) {
        self.add(HttpMethod::Post.as_str(), pattern, handler);
    }

    #[track_caller]
    pub fn put(&mut self, pattern: &str, handler: impl Handler + Send + Sync + 'static) {
        self.add(HttpMethod::Put.as_str(), pattern, handler);
    }

    #[track_caller]
    pub fn delete(&mut self, pattern: &str, handler: impl Handler + Send + Sync + 'static) {
        self.add(HttpMethod::Delete.as_str(), pattern, handler);
    }

    #[track_caller]
    pub fn options(&mut self, pattern: &str, handler: impl Handler + Send + Sync + 'static) {
        self.add(HttpMethod::Options.as_str(), pattern, handler);
    }

    pub fn dispatch(&self, http_method: &str, path: &str) -> Dispatch<'_> {
        let own = self.bindings.get(http_method).map(Vec::as_slice).unwrap_or_default();
        for binding in own {
            if let Some(params) = binding.try_match(path) {
                trace!(pattern = binding.pattern(), "match");
                return Dispatch::Matched { binding, params };
            }
        }

        let allowed = self.find_allowed_methods(http_method, path);
        if allowed.is_empty() {
            Dispatch::NotFound
        } else {
            Dispatch::MethodNotAllowed(allowed)
        }
    }

    fn find_allowed_methods(&self, http_method: &str, path: &str) -> Vec<&str> {
        self.bindings
            .iter()
            .filter(|(method, _)| method.as_str() != http_method)
            .flat_map(|(method, bindings)| {
                bindings
                    .iter()
                    .filter(move |binding| binding.is_match(path))
                    .map(move |_| method.as_str())
            })
            .collect()
    }

    /// Routes `r`, merging path params into its query ahead of the original
    /// query string.
    pub fn handle(&self, w: &mut ResponseWriter, r: &mut Request) {
        match self.dispatch(r.get_http_method(), r.get_path()) {
            Dispatch::Matched { binding, params } => {
                debug!(pattern = binding.pattern(), "dispatch");
                if let Some(raw_query) = params.merge_before(r.get_raw_query()) {
                    r.set_raw_query(raw_query);
                }
                binding.handler().handle(w, r);
            }
            Dispatch::MethodNotAllowed(allowed) => {
                debug!(?allowed, "method not allowed");
                w.set_allow_header(&allowed);
                w.error(StatusCode::MethodNotAllowed, "Method Not Allowed");
            }
            Dispatch::NotFound => {
                debug!("not found");
                w.error(StatusCode::NotFound, "404 page not found");
            }
        }
    }
}

impl Handler for Router {
    fn handle(&self, w: &mut ResponseWriter, r: &mut Request) {
        self.handle(w, r);
    }
}
