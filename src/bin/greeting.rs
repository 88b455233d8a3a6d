//! Starter template for a minimal worker: no model, one input field with a
//! documented default.

use anyhow::Result;
use serde::Deserialize;

use pod_worker::serverless;
use pod_worker::serverless::Job;

fn default_name() -> String {
    "World".to_string()
}

#[derive(Deserialize, Debug)]
struct GreetRequest {
    #[serde(default = "default_name")]
    name: String,
}

fn handler(job: Job) -> Result<String> {
    let request: GreetRequest = job.parse_input()?;
    Ok(format!("Hello, {}!", request.name))
}

#[tokio::main]
async fn main() -> Result<()> {
    serverless::start(handler).await
}

#[cfg(test)]
mod tests {
    use pod_worker::serverless::Job;

    use super::handler;

    #[test]
    fn greets_the_world_by_default() {
        let job: Job = serde_json::from_str(r#"{"input": {}}"#).unwrap();
        assert_eq!(handler(job).unwrap(), "Hello, World!");
    }

    #[test]
    fn greets_by_name() {
        let job: Job = serde_json::from_str(r#"{"input": {"name": "Ann"}}"#).unwrap();
        assert_eq!(handler(job).unwrap(), "Hello, Ann!");
    }
}
