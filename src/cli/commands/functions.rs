use serde_json::Value;
use tabled::{Table, Tabled};

use crate::api::{FunctionsResponse, HealthResponse};
use crate::cli::api_client::ApiClient;
use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::{apply_table_style, format_required, truncate_with_ellipsis};
use crate::dispatch::OperationInfo;

#[derive(Tabled)]
struct FunctionDisplay {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Required")]
    required: String,
}

impl From<&OperationInfo> for FunctionDisplay {
    fn from(info: &OperationInfo) -> Self {
        Self {
            name: info.name.clone(),
            description: truncate_with_ellipsis(&info.description, 50),
            required: format_required(&info.parameters),
        }
    }
}

/// List callable functions
pub async fn list_functions(api_client: &ApiClient, format: &str) -> CliResult<String> {
    let response: FunctionsResponse =
        ApiClient::handle_response(api_client.get("/functions").send().await?).await?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&response.functions)?),
        _ => {
            if response.functions.is_empty() {
                return Ok("No functions available.".to_string());
            }

            let rows: Vec<FunctionDisplay> =
                response.functions.iter().map(FunctionDisplay::from).collect();
            let mut table = Table::new(rows);
            apply_table_style(&mut table);
            Ok(table.to_string())
        }
    }
}

/// Call a function with JSON parameters and pretty-print its result
pub async fn call_function(
    api_client: &ApiClient,
    name: &str,
    params: Option<&str>,
) -> CliResult<String> {
    let params: Value = match params {
        Some(raw) => serde_json::from_str(raw).map_err(|e| CliError::InvalidParams {
            message: e.to_string(),
        })?,
        None => Value::Object(Default::default()),
    };
    if !params.is_object() {
        return Err(CliError::InvalidParams {
            message: "expected a JSON object".to_string(),
        });
    }

    let response = api_client
        .post(&format!("/functions/{name}"))
        .json(&params)
        .send()
        .await?;
    let data = ApiClient::handle_envelope(response).await?;

    Ok(serde_json::to_string_pretty(&data)?)
}

/// Show gateway and upstream health
pub async fn health(api_client: &ApiClient) -> CliResult<String> {
    let response = api_client.get("/health").send().await?;
    let health: HealthResponse = response.json().await?;

    let upstream = match &health.upstream {
        Value::String(status) => status.clone(),
        other => other
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("healthy")
            .to_string(),
    };

    let mut output = format!("Gateway:  {}\nUpstream: {}", health.gateway, upstream);
    if let Some(error) = health.error {
        output.push_str(&format!("\nError:    {error}"));
    }
    Ok(output)
}
