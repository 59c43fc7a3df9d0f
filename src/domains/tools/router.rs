//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! Used by the STDIO/TCP transports. One route is created per registered
//! descriptor, and every route delegates to the shared [`Dispatcher`], so
//! validation and error mapping are identical across transports.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::Tool,
};
use serde_json::Value;

use super::dispatcher::Dispatcher;
use super::invocation::InvocationRequest;
use super::schema::ToolDescriptor;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(dispatcher: &Dispatcher) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    dispatcher
        .registry()
        .list_all()
        .fold(ToolRouter::new(), |router, descriptor| {
            router.with_route(create_route(descriptor, dispatcher.clone()))
        })
}

/// Create a Tool model (metadata) for a descriptor.
pub fn to_tool(descriptor: &ToolDescriptor) -> Tool {
    Tool {
        name: descriptor.name().to_string().into(),
        description: Some(descriptor.description().to_string().into()),
        input_schema: Arc::new(descriptor.input_schema().to_json_schema()),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Create a ToolRoute that forwards calls to the dispatcher.
fn create_route<S>(descriptor: &ToolDescriptor, dispatcher: Dispatcher) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    let name = descriptor.name().to_string();
    ToolRoute::new_dyn(to_tool(descriptor), move |ctx: ToolCallContext<'_, S>| {
        let arguments = ctx
            .arguments
            .clone()
            .map(Value::Object)
            .unwrap_or(Value::Null);
        let request = InvocationRequest::new(name.clone(), arguments);
        let dispatcher = dispatcher.clone();
        async move {
            let result = dispatcher.invoke(request).await;
            Ok::<_, McpError>(result.into_call_tool_result())
        }
        .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;

    struct TestServer {}

    fn test_dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(ToolRegistry::with_builtin_tools().unwrap()))
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(&test_dispatcher());
        let tools = router.list_all();
        assert_eq!(tools.len(), 2);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"echo"));
        assert!(names.contains(&"reverseEcho"));
    }

    #[test]
    fn test_registry_matches_router() {
        let dispatcher = test_dispatcher();
        let registry_names = dispatcher.registry().names();

        let router: ToolRouter<TestServer> = build_tool_router(&dispatcher);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }

    #[test]
    fn test_tool_model_schema() {
        let registry = ToolRegistry::with_builtin_tools().unwrap();
        let descriptor = registry.lookup("echo").unwrap().descriptor();
        let tool = to_tool(descriptor);

        assert_eq!(tool.name, "echo");
        assert_eq!(
            tool.description.as_deref(),
            Some("Echoes the message back to the client.")
        );
        assert_eq!(tool.input_schema["type"], "object");
        assert_eq!(tool.input_schema["required"], serde_json::json!(["message"]));
    }
}
