//! Greeting business logic

use tonic::Status;

use crate::grpc::helloworld::{HelloReply, HelloRequest};
use crate::interceptors::{CallContext, UnaryHandler};

/// Build the greeting for `name`. Any input, including the empty string,
/// is accepted.
pub fn greeting(name: &str) -> String {
    format!("Hello {name}")
}

/// Terminal handler for `SayHello`
#[derive(Debug, Clone, Copy, Default)]
pub struct GreetingHandler;

impl UnaryHandler<HelloRequest, HelloReply> for GreetingHandler {
    fn handle(&self, _ctx: &CallContext, request: HelloRequest) -> Result<HelloReply, Status> {
        Ok(HelloReply {
            message: greeting(&request.name),
        })
    }
}
