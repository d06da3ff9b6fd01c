//! Per-caller call counting

use grpc_metrics::{CounterStore, ServerMetrics};
use tonic::{Code, Status};

use super::{CallContext, Interceptor, UnaryHandler};

/// Requests that can be attributed to a counter label
pub trait CallLabel {
    fn call_label(&self) -> &str;
}

/// Counts every completed call under the label derived from its request
///
/// A failed call still counts as handled. Counting happens after the wrapped
/// handler returns and never produces an error of its own.
#[derive(Clone)]
pub struct MetricsInterceptor {
    calls: CounterStore,
    server: Option<ServerMetrics>,
}

impl MetricsInterceptor {
    pub fn new(calls: CounterStore) -> Self {
        Self {
            calls,
            server: None,
        }
    }

    /// Also record per-method handled counts by status code
    pub fn with_server_metrics(mut self, server: ServerMetrics) -> Self {
        self.server = Some(server);
        self
    }
}

impl<Req, Resp> Interceptor<Req, Resp> for MetricsInterceptor
where
    Req: CallLabel,
{
    fn name(&self) -> &'static str {
        "metrics"
    }

    fn intercept(
        &self,
        ctx: &CallContext,
        request: Req,
        next: &dyn UnaryHandler<Req, Resp>,
    ) -> Result<Resp, Status> {
        let label = request.call_label().to_string();

        let result = next.handle(ctx, request);

        self.calls.increment(&label);
        if let Some(server) = &self.server {
            let method = ctx.method();
            let code = result.as_ref().err().map_or(Code::Ok, Status::code);
            server.record(method.service, method.method, code);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interceptors::{handler_fn, InterceptorChain, MethodDescriptor};
    use grpc_metrics::MetricsRegistry;
    use std::sync::Arc;

    const METHOD: MethodDescriptor = MethodDescriptor::new("test.Echo", "Echo");

    struct Named(String);

    impl CallLabel for Named {
        fn call_label(&self) -> &str {
            &self.0
        }
    }

    fn interceptor(registry: &MetricsRegistry) -> (MetricsInterceptor, CounterStore) {
        let calls = registry
            .register_counter("test_calls_total", "Test calls", "name")
            .unwrap();
        let server = ServerMetrics::register(registry).unwrap();
        (
            MetricsInterceptor::new(calls.clone()).with_server_metrics(server),
            calls,
        )
    }

    #[test]
    fn test_counts_successful_calls_by_label() {
        let registry = MetricsRegistry::new();
        let (metrics, calls) = interceptor(&registry);
        let chain = InterceptorChain::compose(
            vec![Arc::new(metrics) as Arc<dyn Interceptor<Named, String>>],
            handler_fn(|_ctx: &CallContext, request: Named| Ok::<_, Status>(request.0)),
        );
        let ctx = CallContext::new(METHOD);

        chain.handle(&ctx, Named("A".to_string())).unwrap();
        chain.handle(&ctx, Named("A".to_string())).unwrap();
        chain.handle(&ctx, Named("B".to_string())).unwrap();

        let snapshot = calls.snapshot();
        assert_eq!(snapshot.get("A"), Some(2));
        assert_eq!(snapshot.get("B"), Some(1));
    }

    #[test]
    fn test_counts_failed_calls_and_returns_error_verbatim() {
        let registry = MetricsRegistry::new();
        let (metrics, calls) = interceptor(&registry);
        let chain = InterceptorChain::compose(
            vec![Arc::new(metrics) as Arc<dyn Interceptor<Named, String>>],
            handler_fn(|_ctx: &CallContext, _request: Named| {
                Err::<String, _>(Status::internal("boom"))
            }),
        );

        let status = chain
            .handle(&CallContext::new(METHOD), Named("A".to_string()))
            .unwrap_err();

        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), "boom");
        assert_eq!(calls.snapshot().get("A"), Some(1));

        let text = String::from_utf8(registry.encode_text().unwrap()).unwrap();
        assert!(text.contains(
            "grpc_server_handled_total{grpc_code=\"Internal\",grpc_method=\"Echo\",grpc_service=\"test.Echo\"} 1"
        ));
    }

    #[test]
    fn test_increment_happens_after_handler_returns() {
        let registry = MetricsRegistry::new();
        let (metrics, calls) = interceptor(&registry);
        let observed = calls.clone();
        let chain = InterceptorChain::compose(
            vec![Arc::new(metrics) as Arc<dyn Interceptor<Named, String>>],
            handler_fn(move |_ctx: &CallContext, request: Named| {
                Ok::<_, Status>(format!("{:?}", observed.snapshot().get(&request.0)))
            }),
        );

        let seen = chain
            .handle(&CallContext::new(METHOD), Named("A".to_string()))
            .unwrap();
        assert_eq!(seen, "None");
        assert_eq!(calls.snapshot().get("A"), Some(1));
    }
}
