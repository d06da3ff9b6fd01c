//! Structured request/response logging

use std::fmt::Debug;
use std::time::Instant;

use tonic::Status;
use tracing::{info, warn};

use super::{CallContext, Interceptor, UnaryHandler};

/// Logs one record before the call and one after it returns
///
/// Records go through `tracing`, which never reports sink failures back to
/// the caller, so logging cannot fail a call.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingInterceptor;

impl LoggingInterceptor {
    pub fn new() -> Self {
        Self
    }
}

impl<Req, Resp> Interceptor<Req, Resp> for LoggingInterceptor
where
    Req: Debug,
    Resp: Debug,
{
    fn name(&self) -> &'static str {
        "logging"
    }

    fn intercept(
        &self,
        ctx: &CallContext,
        request: Req,
        next: &dyn UnaryHandler<Req, Resp>,
    ) -> Result<Resp, Status> {
        let method = ctx.full_method();
        info!(method = %method, peer = ?ctx.remote_addr(), request = ?request, "request");

        let start = Instant::now();
        let result = next.handle(ctx, request);
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match &result {
            Ok(response) => {
                info!(method = %method, response = ?response, elapsed_ms, "response");
            }
            Err(status) => {
                warn!(
                    method = %method,
                    code = ?status.code(),
                    error = %status.message(),
                    elapsed_ms,
                    "call failed"
                );
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interceptors::{handler_fn, InterceptorChain, MethodDescriptor};
    use std::sync::Arc;

    const METHOD: MethodDescriptor = MethodDescriptor::new("test.Echo", "Echo");

    #[test]
    fn test_passes_response_through_unchanged() {
        let chain = InterceptorChain::compose(
            vec![Arc::new(LoggingInterceptor::new()) as Arc<dyn Interceptor<String, String>>],
            handler_fn(|_ctx: &CallContext, request: String| Ok::<_, Status>(request.to_uppercase())),
        );

        let reply = chain.handle(&CallContext::new(METHOD), "abc".to_string());
        assert_eq!(reply.unwrap(), "ABC");
    }

    #[test]
    fn test_passes_error_through_unchanged() {
        let chain = InterceptorChain::compose(
            vec![Arc::new(LoggingInterceptor::new()) as Arc<dyn Interceptor<String, String>>],
            handler_fn(|_ctx: &CallContext, _request: String| {
                Err::<String, _>(Status::unavailable("backend down"))
            }),
        );

        let status = chain
            .handle(&CallContext::new(METHOD), "abc".to_string())
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unavailable);
        assert_eq!(status.message(), "backend down");
    }
}
