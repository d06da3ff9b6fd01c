// gRPC server for helloworld.Greeter
use std::sync::Arc;

use tonic::{Request, Response, Status};

use crate::interceptors::{CallContext, CallLabel, InterceptorChain, MethodDescriptor, UnaryHandler};

pub mod helloworld {
    /// The request message containing the user's name
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct HelloRequest {
        #[prost(string, tag = "1")]
        pub name: ::prost::alloc::string::String,
    }

    /// The response message containing the greeting
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct HelloReply {
        #[prost(string, tag = "1")]
        pub message: ::prost::alloc::string::String,
    }

    include!(concat!(env!("OUT_DIR"), "/helloworld.Greeter.rs"));
}

use helloworld::greeter_server::Greeter;
use helloworld::{HelloReply, HelloRequest};

pub use helloworld::greeter_client::GreeterClient;
pub use helloworld::greeter_server::GreeterServer;

pub const GREETER_SERVICE: &str = "helloworld.Greeter";

pub const SAY_HELLO: MethodDescriptor = MethodDescriptor::new(GREETER_SERVICE, "SayHello");

/// Every method the server registers
pub const METHODS: &[MethodDescriptor] = &[SAY_HELLO];

impl CallLabel for HelloRequest {
    fn call_label(&self) -> &str {
        &self.name
    }
}

pub type SayHelloChain = InterceptorChain<HelloRequest, HelloReply>;

/// Adapter from the tonic service trait onto the interceptor chain
#[derive(Clone)]
pub struct GreeterServiceImpl {
    say_hello: Arc<SayHelloChain>,
}

impl GreeterServiceImpl {
    pub fn new(say_hello: Arc<SayHelloChain>) -> Self {
        Self { say_hello }
    }
}

#[tonic::async_trait]
impl Greeter for GreeterServiceImpl {
    async fn say_hello(
        &self,
        request: Request<HelloRequest>,
    ) -> Result<Response<HelloReply>, Status> {
        let ctx = CallContext::new(SAY_HELLO).with_remote_addr(request.remote_addr());
        self.say_hello
            .handle(&ctx, request.into_inner())
            .map(Response::new)
    }
}
