// routes.rs
//! Ordered route table: `(method, path pattern) -> Route`, first match wins.

use axum::http::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Welcome,
    Health,
    CreatePayment,
    PaymentWebhook,
    StaticFile,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPattern {
    Exact(&'static str),
    Prefix(&'static str),
    Any,
}

impl PathPattern {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(p) => path == *p,
            PathPattern::Prefix(p) => path.starts_with(p),
            PathPattern::Any => true,
        }
    }
}

/// GET entries also answer HEAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodFilter {
    Get,
    Post,
}

impl MethodFilter {
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            MethodFilter::Get => *method == Method::GET || *method == Method::HEAD,
            MethodFilter::Post => *method == Method::POST,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<(MethodFilter, PathPattern, Route)>,
}

impl RouteTable {
    pub fn new(entries: Vec<(MethodFilter, PathPattern, Route)>) -> Self {
        Self { entries }
    }

    pub fn resolve(&self, method: &Method, path: &str) -> Route {
        self.entries
            .iter()
            .find(|(m, p, _)| m.matches(method) && p.matches(path))
            .map(|(_, _, route)| *route)
            .unwrap_or(Route::NotFound)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        use MethodFilter::*;
        use PathPattern::*;

        Self::new(vec![
            (Get, Exact("/"), Route::Welcome),
            (Get, Exact("/index.html"), Route::Welcome),
            (Get, Exact("/health"), Route::Health),
            (Get, Any, Route::StaticFile),
            (Post, Prefix("/create-payment"), Route::CreatePayment),
            (Post, Prefix("/webhook/payment"), Route::PaymentWebhook),
        ])
    }
}
