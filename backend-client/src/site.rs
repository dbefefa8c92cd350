use crate::client::Client;
use crate::client::data_or_errors;
use crate::error::BackendError;
use crate::error::Result;
use jsonc_parser::ParseOptions;
use jsonc_parser::cst::CstInputValue;
use jsonc_parser::cst::CstRootNode;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;

const CORS_ORIGIN_KEY: &str = "corsOrigin";

const SITE_QUERY: &str = r#"
query Site {
    site {
        id
        configuration {
            id
            effectiveContents
            validationMessages
        }
    }
}
"#;

const UPDATE_SITE_CONFIGURATION_MUTATION: &str = r#"
mutation UpdateSiteConfiguration($lastID: Int!, $input: String!) {
    updateSiteConfiguration(lastID: $lastID, input: $input)
}
"#;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfiguration {
    /// Revision of the stored configuration; updates must quote it back.
    pub id: i64,
    pub effective_contents: String,
    #[serde(default)]
    pub validation_messages: Vec<String>,
}

#[derive(Deserialize)]
struct SiteData {
    site: Site,
}

#[derive(Deserialize)]
struct Site {
    configuration: SiteConfiguration,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateData {
    update_site_configuration: bool,
}

impl Client {
    pub async fn site_configuration(&self) -> Result<SiteConfiguration> {
        let result = self.graphql::<SiteData>(SITE_QUERY, json!({})).await?;
        Ok(data_or_errors(result, "Site")?.site.configuration)
    }

    /// Replaces the site configuration. Returns whether the server reports
    /// that a restart is needed for the change to apply.
    pub async fn update_site_configuration(&self, last_id: i64, input: &str) -> Result<bool> {
        let result = self
            .graphql::<UpdateData>(
                UPDATE_SITE_CONFIGURATION_MUTATION,
                json!({ "lastID": last_id, "input": input }),
            )
            .await?;
        Ok(data_or_errors(result, "UpdateSiteConfiguration")?.update_site_configuration)
    }

    /// Makes sure `origin` is listed in the space-separated `corsOrigin`
    /// setting. Returns `false` without writing when it already was.
    pub async fn ensure_cors_origin(&self, origin: &str) -> Result<bool> {
        let current = self.site_configuration().await?;
        let mut changed = false;
        let patched = patch_json_config(&current.effective_contents, CORS_ORIGIN_KEY, |old| {
            let mut origins: Vec<&str> = old
                .and_then(Value::as_str)
                .map(|value| value.split(' ').filter(|o| !o.is_empty()).collect())
                .unwrap_or_default();
            if !origins.contains(&origin) {
                origins.push(origin);
                changed = true;
            }
            Value::String(origins.join(" "))
        })?;
        if !changed {
            tracing::debug!(origin, "CORS origin already configured");
            return Ok(false);
        }
        tracing::info!(origin, last_id = current.id, "adding CORS origin");
        self.update_site_configuration(current.id, &patched).await?;
        Ok(true)
    }
}

/// Rewrites the top-level property `key` of a JSONC configuration document
/// to `f(old value)`. Only that value is replaced; comments, trailing commas
/// and the layout of the rest of the text are kept. A missing property is
/// appended to the object.
pub fn patch_json_config(
    text: &str,
    key: &str,
    f: impl FnOnce(Option<&Value>) -> Value,
) -> Result<String> {
    let options = ParseOptions::default();
    let current = jsonc_parser::parse_to_serde_value(text, &options)
        .map_err(|err| BackendError::ConfigParse(err.to_string()))?;
    let old = match &current {
        Some(Value::Object(object)) => object.get(key),
        Some(_) => return Err(BackendError::ConfigNotObject),
        None => None,
    };
    let value = to_cst_value(f(old));

    let root = CstRootNode::parse(text, &options)
        .map_err(|err| BackendError::ConfigParse(err.to_string()))?;
    let object = root.object_value_or_set();
    match object.get(key) {
        Some(property) => property.set_value(value),
        None => {
            object.append(key, value);
        }
    }
    Ok(root.to_string())
}

fn to_cst_value(value: Value) -> CstInputValue {
    match value {
        Value::Null => CstInputValue::Null,
        Value::Bool(b) => CstInputValue::Bool(b),
        Value::Number(n) => CstInputValue::Number(n.to_string()),
        Value::String(s) => CstInputValue::String(s),
        Value::Array(items) => {
            CstInputValue::Array(items.into_iter().map(to_cst_value).collect())
        }
        Value::Object(map) => CstInputValue::Object(
            map.into_iter()
                .map(|(key, value)| (key, to_cst_value(value)))
                .collect(),
        ),
    }
}
