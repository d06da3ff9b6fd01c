//! Unary interceptor chain
//!
//! Interceptors wrap a [`UnaryHandler`] with cross-cutting behaviour. A chain
//! is composed once at startup from an ordered list: the first interceptor is
//! the outermost, so it sees the request first and the result last.
//!
//! The chain runs synchronously inside the task the transport spawned for
//! the call; it has no suspension points of its own.

mod logging;
mod metrics;

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use tonic::Status;

pub use logging::LoggingInterceptor;
pub use metrics::{CallLabel, MetricsInterceptor};

/// Identity of an RPC method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub service: &'static str,
    pub method: &'static str,
}

impl MethodDescriptor {
    pub const fn new(service: &'static str, method: &'static str) -> Self {
        Self { service, method }
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.service, self.method)
    }
}

/// Per-call context handed to every interceptor
#[derive(Debug, Clone)]
pub struct CallContext {
    method: MethodDescriptor,
    remote_addr: Option<SocketAddr>,
}

impl CallContext {
    pub fn new(method: MethodDescriptor) -> Self {
        Self {
            method,
            remote_addr: None,
        }
    }

    pub fn with_remote_addr(mut self, remote_addr: Option<SocketAddr>) -> Self {
        self.remote_addr = remote_addr;
        self
    }

    pub fn method(&self) -> MethodDescriptor {
        self.method
    }

    /// Full method identifier, e.g. `/helloworld.Greeter/SayHello`
    pub fn full_method(&self) -> String {
        self.method.to_string()
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }
}

/// Something that turns a request into a response
pub trait UnaryHandler<Req, Resp>: Send + Sync {
    fn handle(&self, ctx: &CallContext, request: Req) -> Result<Resp, Status>;
}

/// Middleware around a [`UnaryHandler`]
///
/// An interceptor may act before and after calling `next`, or return an
/// error without calling it at all.
pub trait Interceptor<Req, Resp>: Send + Sync {
    /// Short name used when reporting chain order
    fn name(&self) -> &'static str;

    fn intercept(
        &self,
        ctx: &CallContext,
        request: Req,
        next: &dyn UnaryHandler<Req, Resp>,
    ) -> Result<Resp, Status>;
}

/// Adapter turning a closure into a [`UnaryHandler`]
pub struct HandlerFn<F> {
    f: F,
}

/// Wrap a closure as a terminal handler
pub fn handler_fn<F>(f: F) -> HandlerFn<F> {
    HandlerFn { f }
}

impl<F, Req, Resp> UnaryHandler<Req, Resp> for HandlerFn<F>
where
    F: Fn(&CallContext, Req) -> Result<Resp, Status> + Send + Sync,
{
    fn handle(&self, ctx: &CallContext, request: Req) -> Result<Resp, Status> {
        (self.f)(ctx, request)
    }
}

/// One interceptor bound to everything nested inside it
struct Link<Req, Resp> {
    interceptor: Arc<dyn Interceptor<Req, Resp>>,
    next: Box<dyn UnaryHandler<Req, Resp>>,
}

impl<Req, Resp> UnaryHandler<Req, Resp> for Link<Req, Resp> {
    fn handle(&self, ctx: &CallContext, request: Req) -> Result<Resp, Status> {
        self.interceptor.intercept(ctx, request, self.next.as_ref())
    }
}

/// A terminal handler wrapped by an ordered list of interceptors
///
/// `compose([i1, i2, i3], h)` behaves as `i1(i2(i3(h)))`. The composed
/// structure is immutable and shared across all calls.
pub struct InterceptorChain<Req, Resp> {
    head: Box<dyn UnaryHandler<Req, Resp>>,
    order: Vec<&'static str>,
}

impl<Req, Resp> InterceptorChain<Req, Resp>
where
    Req: 'static,
    Resp: 'static,
{
    pub fn compose<H>(interceptors: Vec<Arc<dyn Interceptor<Req, Resp>>>, terminal: H) -> Self
    where
        H: UnaryHandler<Req, Resp> + 'static,
    {
        let order = interceptors.iter().map(|i| i.name()).collect();

        let head = interceptors.into_iter().rev().fold(
            Box::new(terminal) as Box<dyn UnaryHandler<Req, Resp>>,
            |next, interceptor| -> Box<dyn UnaryHandler<Req, Resp>> {
                Box::new(Link { interceptor, next })
            },
        );

        Self { head, order }
    }

    /// Interceptor names, outermost first
    pub fn order(&self) -> &[&'static str] {
        &self.order
    }
}

impl<Req, Resp> UnaryHandler<Req, Resp> for InterceptorChain<Req, Resp> {
    fn handle(&self, ctx: &CallContext, request: Req) -> Result<Resp, Status> {
        self.head.handle(ctx, request)
    }
}
