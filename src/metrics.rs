use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::dispatcher::Route;

/// Prometheus-style counters for the product routes
///
/// Recording is best-effort: relaxed atomic increments that cannot fail and
/// never feed back into a response.
#[derive(Default)]
pub struct Metrics {
    upsert_requests: AtomicU64,
    create_requests: AtomicU64,
    list_requests: AtomicU64,
    get_requests: AtomicU64,
    delete_requests: AtomicU64,
    unsupported_requests: AtomicU64,
    failed_responses: AtomicU64,
    products_listed: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn route_counter(&self, route: Route) -> &AtomicU64 {
        match route {
            Route::Upsert => &self.upsert_requests,
            Route::Create => &self.create_requests,
            Route::ListFirstPage => &self.list_requests,
            Route::GetById => &self.get_requests,
            Route::Delete => &self.delete_requests,
            Route::Unsupported => &self.unsupported_requests,
        }
    }

    pub fn record_request(&self, route: Route) {
        self.route_counter(route).fetch_add(1, Ordering::Relaxed);
    }

    /// Counts responses with a 4xx or 5xx status
    pub fn record_failure(&self) {
        self.failed_responses.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of records a list request returned
    pub fn record_products_listed(&self, count: usize) {
        self.products_listed.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn requests(&self, route: Route) -> u64 {
        self.route_counter(route).load(Ordering::Relaxed)
    }

    pub fn failed_responses(&self) -> u64 {
        self.failed_responses.load(Ordering::Relaxed)
    }

    pub fn products_listed(&self) -> u64 {
        self.products_listed.load(Ordering::Relaxed)
    }

    /// Render all counters in Prometheus text exposition format
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("# HELP products_requests_total Product requests by operation\n");
        out.push_str("# TYPE products_requests_total counter\n");
        for route in Route::ALL {
            let _ = writeln!(
                out,
                "products_requests_total{{operation=\"{}\"}} {}",
                route.label(),
                self.requests(route)
            );
        }
        let _ = write!(
            out,
            "# HELP products_failed_responses_total Responses with a 4xx or 5xx status\n\
             # TYPE products_failed_responses_total counter\n\
             products_failed_responses_total {}\n\
             # HELP products_listed_total Records returned by list requests\n\
             # TYPE products_listed_total counter\n\
             products_listed_total {}\n",
            self.failed_responses(),
            self.products_listed()
        );
        out
    }
}
