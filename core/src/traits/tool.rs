use async_trait::async_trait;
use schemars::JsonSchema;
use schemars::generate::SchemaSettings;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Output of a tool, sent back to the backend as `{"result": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResult {
    pub result: String,
}

impl ToolResult {
    pub fn new(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A function the backend can call.
///
/// Arguments arrive as JSON and are deserialized into `Args` before
/// `execute` runs, so the declared schema and the handler's input are the
/// same type.
#[async_trait]
pub trait Tool: Send + Sync + 'static {
    type Args: DeserializeOwned + JsonSchema + Send;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn parameters_schema(&self) -> serde_json::Value {
        parameters_schema_for::<Self::Args>()
    }

    /// Runs the tool. Domain outcomes such as "nothing found" are `Ok`;
    /// an `Err` is reported to the backend as a failed execution.
    async fn execute(&self, args: Self::Args) -> anyhow::Result<ToolResult>;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// JSON schema for a tool's arguments in the OpenAPI dialect function
/// declarations accept: inlined, no `$schema`, `nullable` for options.
pub fn parameters_schema_for<T: JsonSchema>() -> serde_json::Value {
    SchemaSettings::openapi3()
        .with(|settings| {
            settings.meta_schema = None;
            settings.inline_subschemas = true;
        })
        .into_generator()
        .into_root_schema_for::<T>()
        .to_value()
}
